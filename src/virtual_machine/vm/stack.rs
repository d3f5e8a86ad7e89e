use super::value::Value;

/// Unbounded LIFO operand stack.
pub(crate) struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub(crate) fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub(crate) fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    /// Pops the top two values, or nothing if fewer than two are present.
    pub(crate) fn pop_pair(&mut self) -> Option<(Value, Value)> {
        if self.values.len() < 2 {
            return None;
        }
        let first = self.values.pop()?;
        let second = self.values.pop()?;
        Some((first, second))
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn as_slice(&self) -> &[Value] {
        &self.values
    }
}
