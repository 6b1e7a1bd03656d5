//! Warehouse schema inference for CSV files.
//!
//! Reads a delimited file fully into memory, classifies every column and
//! produces an ordered list of field descriptors that can be used directly as
//! a destination table's schema declaration.
//!
//! # Pipeline
//!
//! 1. [`reader`] loads the CSV and declares a [`StorageKind`] per column
//! 2. [`naming`] turns each header into a valid column identifier
//! 3. [`inference`] maps the storage kind (and, for text, the values) to a
//!    warehouse [`FieldType`]
//! 4. [`builder`] assembles the [`Schema`] and handles failures
//!
//! # Example
//!
//! ```no_run
//! use pitchflow_schema::{infer_schema, write_schema_json};
//! use std::path::Path;
//!
//! let schema = infer_schema(Path::new("events.csv"));
//! if !schema.is_empty() {
//!     write_schema_json(&schema, Path::new("schema.json")).unwrap();
//! }
//! ```

pub mod builder;
pub mod datetime;
pub mod error;
pub mod inference;
pub mod naming;
pub mod reader;
pub mod types;

pub use builder::{build_schema, infer_schema, try_infer_schema, write_schema_json};
pub use error::{Result, SchemaError};
pub use inference::infer_field_type;
pub use naming::{is_valid_column_name, sanitize_column_name, MAX_COLUMN_NAME_LEN};
pub use reader::{read_table, Table};
pub use types::{Column, FieldDescriptor, FieldMode, FieldType, Schema, StorageKind};
