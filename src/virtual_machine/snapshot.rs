//! Exported view of a memory window.

use crate::virtual_machine::vm::Value;
use serde::Serialize;

/// Copy of `memory[start_address .. start_address + length]`.
///
/// Serializes as `{"start_address": .., "length": .., "data": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub start_address: usize,
    pub length: usize,
    pub data: Vec<Value>,
}

impl MemorySnapshot {
    /// True only for a zero-length window. A window of all-empty cells still
    /// counts as data.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Cells that hold an integer, with their absolute addresses.
    pub fn written(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_int().map(|n| (self.start_address + i, n)))
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        to_json_pretty(self)
    }
}

/// Serializes any value as JSON indented by four spaces.
pub fn to_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}
