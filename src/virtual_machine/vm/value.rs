//! Stack and memory cell values.

use serde::{Serialize, Serializer};
use std::fmt;

/// Contents of one stack slot or memory cell.
///
/// Variant order defines the total order used by `MAX`: `Empty` sorts below
/// every integer, integers compare numerically.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Value {
    /// Never written, or cleared by `READ_MEMORY`.
    #[default]
    Empty,
    Int(i64),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Empty => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "Empty",
            Value::Int(_) => "Int",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

/// `Empty` prints as `-`, integers as themselves.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("-"),
            Value::Int(v) => write!(f, "{v}"),
        }
    }
}

/// Integers serialize as JSON numbers; `Empty` as the string `"0"`, which is
/// how result files have always marked untouched cells.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Empty => serializer.serialize_str(EMPTY_MARKER),
            Value::Int(v) => serializer.serialize_i64(*v),
        }
    }
}

/// Serialized form of [`Value::Empty`].
pub const EMPTY_MARKER: &str = "0";
