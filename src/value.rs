use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a column. `Json` columns hold structured payloads written
/// by other paths and are not eligible for bulk loading.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColumnType {
    Bool = 1,
    Int = 2,
    Float = 3,
    Str = 4,
    Json = 5,
}

impl ColumnType {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(ColumnType::Bool),
            2 => Some(ColumnType::Int),
            3 => Some(ColumnType::Float),
            4 => Some(ColumnType::Str),
            5 => Some(ColumnType::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ColumnKind {
    Count = 1,
    Percent = 2,
    Categorical = 3,
    Identifier = 4,
    Area = 5,
    Other = 6,
}

impl ColumnKind {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(ColumnKind::Count),
            2 => Some(ColumnKind::Percent),
            3 => Some(ColumnKind::Categorical),
            4 => Some(ColumnKind::Identifier),
            5 => Some(ColumnKind::Area),
            6 => Some(ColumnKind::Other),
            _ => None,
        }
    }
}

/// An uncoerced scalar cell as it arrives from a source dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl RawValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "boolean",
            RawValue::Int(_) => "integer",
            RawValue::Float(_) => "floating-point",
            RawValue::Str(_) => "string",
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Str(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Str(value)
    }
}

/// A scalar that passed coercion against its column's declared type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl CellValue {
    pub fn column_type(&self) -> ColumnType {
        match self {
            CellValue::Bool(_) => ColumnType::Bool,
            CellValue::Int(_) => ColumnType::Int,
            CellValue::Float(_) => ColumnType::Float,
            CellValue::Str(_) => ColumnType::Str,
        }
    }
}

/// How boolean columns treat boolean input. Earlier import runs shipped an
/// inverted check that rejected booleans for boolean columns; `Legacy` keeps
/// that rejection reproducible so old runs can be compared against new ones.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum BoolCoercion {
    /// Accept boolean input, reject everything else.
    #[default]
    Strict,
    /// Reject boolean input the way the inverted check did. Non-boolean input
    /// is also rejected: there is no boolean payload to build from it.
    Legacy,
}

/// One cell that failed coercion, addressed the way the caller sees the batch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TypeViolation {
    pub column: String,
    pub geography: String,
    pub reason: String,
}

impl fmt::Display for TypeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "column '{}' for geography '{}': {}",
            self.column, self.geography, self.reason
        )
    }
}

/// Check one raw scalar against a declared column type. Returns the typed
/// payload to store, or the reason it cannot be stored.
pub fn coerce_value(
    column_type: ColumnType,
    raw: &RawValue,
    bool_mode: BoolCoercion,
) -> Result<CellValue, String> {
    match column_type {
        ColumnType::Float => match raw {
            RawValue::Float(value) => Ok(CellValue::Float(*value)),
            RawValue::Int(value) => Ok(CellValue::Float(*value as f64)),
            other => Err(format!(
                "expected a numeric value, got {}",
                other.kind_name()
            )),
        },
        ColumnType::Int => match raw {
            RawValue::Int(value) => Ok(CellValue::Int(*value)),
            other => Err(format!(
                "expected an integer value, got {}",
                other.kind_name()
            )),
        },
        ColumnType::Str => match raw {
            RawValue::Str(value) => Ok(CellValue::Str(value.clone())),
            other => Err(format!(
                "expected a string value, got {}",
                other.kind_name()
            )),
        },
        ColumnType::Bool => match (bool_mode, raw) {
            (BoolCoercion::Strict, RawValue::Bool(value)) => Ok(CellValue::Bool(*value)),
            (BoolCoercion::Strict, other) => Err(format!(
                "expected a boolean value, got {}",
                other.kind_name()
            )),
            (BoolCoercion::Legacy, RawValue::Bool(_)) => {
                Err("boolean input rejected under legacy coercion".to_string())
            }
            (BoolCoercion::Legacy, other) => Err(format!(
                "cannot store {} in a boolean column",
                other.kind_name()
            )),
        },
        ColumnType::Json => Err("structured columns are not eligible for bulk loading".to_string()),
    }
}
