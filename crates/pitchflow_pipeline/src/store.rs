//! Object storage seam.

use crate::error::{PipelineError, Result};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Location of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub bucket: String,
    pub name: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    /// `gs://<bucket>/<name>`
    pub fn uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.name)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// Object storage bucket.
pub trait ObjectStore {
    /// Bucket this store writes to
    fn bucket(&self) -> &str;

    /// Upload a local file. Create-only: fails with
    /// [`PipelineError::ObjectExists`] if the name is taken.
    fn upload(&self, source: &Path, object_name: &str) -> Result<ObjectRef>;
}

/// Bucket backed by a local directory (`<root>/<bucket>/<name>`).
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Local path of an object in this bucket.
    pub fn local_path(&self, object: &ObjectRef) -> Result<PathBuf> {
        if object.bucket != self.bucket {
            return Err(PipelineError::BucketMismatch {
                uri: object.uri(),
                expected: self.bucket.clone(),
            });
        }
        validate_object_name(&object.name)?;
        Ok(self.root.join(&self.bucket).join(&object.name))
    }
}

impl ObjectStore for LocalObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn upload(&self, source: &Path, object_name: &str) -> Result<ObjectRef> {
        let object = ObjectRef::new(&self.bucket, object_name);
        let dest = self.local_path(&object)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut input = File::open(source)?;
        let mut output = match OpenOptions::new().write(true).create_new(true).open(&dest) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(PipelineError::ObjectExists(object.uri()));
            }
            Err(e) => return Err(e.into()),
        };
        let bytes = io::copy(&mut input, &mut output)?;

        info!(source = %source.display(), object = %object, bytes, "File uploaded");
        Ok(object)
    }
}

/// Object names are relative, `/`-separated and may not escape the bucket.
fn validate_object_name(name: &str) -> Result<()> {
    let invalid = || PipelineError::InvalidObjectName(name.to_string());
    if name.is_empty() || name.ends_with('/') {
        return Err(invalid());
    }
    let all_normal = Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !all_normal {
        return Err(invalid());
    }
    Ok(())
}
