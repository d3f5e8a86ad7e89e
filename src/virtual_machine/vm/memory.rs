use super::value::Value;
use crate::virtual_machine::errors::VMError;

/// Number of cells in the engine's memory.
pub const MEMORY_SIZE: usize = 1024;

/// Flat, fixed-size cell array.
///
/// Every cell starts as [`Value::Empty`]. Addresses come straight from
/// instruction operands and are checked on every access.
pub(crate) struct Memory {
    cells: Vec<Value>,
}

impl Memory {
    pub(crate) fn new() -> Self {
        Self {
            cells: vec![Value::Empty; MEMORY_SIZE],
        }
    }

    /// Converts an operand into a cell index.
    ///
    /// Returns [`VMError::InvalidAddress`] if `address` is outside `[0, MEMORY_SIZE)`.
    pub(crate) fn index(&self, address: u32) -> Result<usize, VMError> {
        let idx = address as usize;
        if idx >= self.cells.len() {
            return Err(VMError::InvalidAddress {
                address,
                size: self.cells.len(),
            });
        }
        Ok(idx)
    }

    /// Returns the cell's value and resets it to `Empty`.
    pub(crate) fn take(&mut self, address: u32) -> Result<Value, VMError> {
        let idx = self.index(address)?;
        Ok(std::mem::take(&mut self.cells[idx]))
    }

    pub(crate) fn store(&mut self, address: u32, value: Value) -> Result<(), VMError> {
        let idx = self.index(address)?;
        self.cells[idx] = value;
        Ok(())
    }

    pub(crate) fn get(&self, address: u32) -> Result<Value, VMError> {
        Ok(self.cells[self.index(address)?])
    }

    /// Returns `cells[start .. start + length]`.
    pub(crate) fn range(&self, start: usize, length: usize) -> Result<&[Value], VMError> {
        let out_of_bounds = VMError::RangeOutOfBounds {
            start,
            length,
            size: self.cells.len(),
        };
        let end = start.checked_add(length).ok_or(out_of_bounds.clone())?;
        self.cells.get(start..end).ok_or(out_of_bounds)
    }

    pub(crate) fn cells(&self) -> &[Value] {
        &self.cells
    }
}
