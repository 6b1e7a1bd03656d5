//! Column and schema types.
//!
//! | Storage kind | Warehouse type |
//! |--------------|----------------|
//! | Integer | INT64 |
//! | Float | FLOAT64 |
//! | Boolean | BOOL |
//! | Timestamp, Date | TIMESTAMP |
//! | Text | DATE, TIMESTAMP or STRING (value-based) |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared scalar category of a column as read from the source file,
/// before any mapping to warehouse types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// true/false
    Boolean,
    /// Date + time
    Timestamp,
    /// Date only
    Date,
    /// UTF-8 text (fallback)
    Text,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Integer => "integer",
            StorageKind::Float => "float",
            StorageKind::Boolean => "boolean",
            StorageKind::Timestamp => "timestamp",
            StorageKind::Date => "date",
            StorageKind::Text => "text",
        }
    }

    /// Returns true if this kind is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, StorageKind::Integer | StorageKind::Float)
    }

    /// Returns true if this kind already carries date/time semantics
    pub fn is_temporal(&self) -> bool {
        matches!(self, StorageKind::Timestamp | StorageKind::Date)
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Warehouse scalar type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Int64,
    Float64,
    Bool,
    Timestamp,
    Date,
    String,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int64 => "INT64",
            FieldType::Float64 => "FLOAT64",
            FieldType::Bool => "BOOL",
            FieldType::Timestamp => "TIMESTAMP",
            FieldType::Date => "DATE",
            FieldType::String => "STRING",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INT64" | "INTEGER" => Ok(FieldType::Int64),
            "FLOAT64" | "FLOAT" => Ok(FieldType::Float64),
            "BOOL" | "BOOLEAN" => Ok(FieldType::Bool),
            "TIMESTAMP" => Ok(FieldType::Timestamp),
            "DATE" => Ok(FieldType::Date),
            "STRING" => Ok(FieldType::String),
            _ => Err(format!("Invalid field type: '{}'", s)),
        }
    }
}

/// Warehouse nullability marker.
///
/// Inference only ever produces `Nullable`; `Required` exists so that
/// hand-edited schemas round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldMode {
    #[default]
    Nullable,
    Required,
}

impl FieldMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldMode::Nullable => "NULLABLE",
            FieldMode::Required => "REQUIRED",
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One column of a table read from a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header exactly as it appeared in the source (after duplicate mangling)
    pub raw_name: String,
    /// Declared storage kind
    pub storage_kind: StorageKind,
    /// Whether any value is absent
    pub nullable: bool,
    /// Values in row order; `None` is an absent value
    pub values: Vec<Option<String>>,
}

/// A destination schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub mode: FieldMode,
    pub description: String,
}

impl FieldDescriptor {
    /// Describe a field inferred from the given source column header.
    pub fn inferred(name: String, field_type: FieldType, mode: FieldMode, raw_name: &str) -> Self {
        Self {
            name,
            field_type,
            mode,
            description: format!("Inferred from CSV column '{}'", raw_name),
        }
    }
}

/// Ordered field descriptors, one per source column.
pub type Schema = Vec<FieldDescriptor>;
