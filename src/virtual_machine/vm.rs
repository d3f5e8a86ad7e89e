//! Stack/memory execution engine.
//!
//! The engine owns an unbounded operand stack and [`MEMORY_SIZE`] memory
//! cells. Instructions run strictly in order; there are no jumps and no halt,
//! so a run ends when the instruction list is exhausted or on the first fatal
//! error. Mutations applied before an error are kept.

mod memory;
mod stack;
#[cfg(test)]
mod tests;
mod value;

pub use memory::MEMORY_SIZE;
pub use value::{EMPTY_MARKER, Value};

use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::{Instruction, Opcode};
use crate::virtual_machine::program::Program;
use crate::virtual_machine::snapshot::MemorySnapshot;
use crate::{debug, warn};
use memory::Memory;
use stack::Stack;

/// What a single instruction did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// The instruction took effect.
    Applied,
    /// `WRITE_MEMORY` or `MAX` found too few stack values and did nothing.
    Skipped,
}

/// Interpreter state for one run.
pub struct VM {
    stack: Stack,
    memory: Memory,
    executed: usize,
    skipped: usize,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    /// Creates an engine with an empty stack and all cells `Empty`.
    pub fn new() -> Self {
        Self {
            stack: Stack::new(),
            memory: Memory::new(),
            executed: 0,
            skipped: 0,
        }
    }

    /// Decodes every frame, then executes the result.
    ///
    /// A malformed frame anywhere in the program aborts before any instruction runs.
    pub fn run_program(&mut self, program: &Program) -> Result<(), VMError> {
        let instructions = program.decode()?;
        self.run(&instructions)
    }

    /// Executes instructions in order, stopping at the first fatal error.
    pub fn run(&mut self, instructions: &[Instruction]) -> Result<(), VMError> {
        for (idx, instr) in instructions.iter().enumerate() {
            debug!("[{idx}] {instr}");
            self.step(*instr)?;
        }
        Ok(())
    }

    /// Executes a single instruction.
    ///
    /// The address operand is validated before the stack is touched, so a
    /// failing instruction leaves both stack and memory unchanged.
    pub fn step(&mut self, instr: Instruction) -> Result<StepOutcome, VMError> {
        let outcome = match instr.opcode {
            Opcode::LoadConst => {
                self.stack.push(Value::from(instr.operand));
                StepOutcome::Applied
            }
            Opcode::ReadMemory => {
                let value = self.memory.take(instr.operand)?;
                self.stack.push(value);
                StepOutcome::Applied
            }
            Opcode::WriteMemory => {
                self.memory.index(instr.operand)?;
                match self.stack.pop() {
                    Some(value) => {
                        self.memory.store(instr.operand, value)?;
                        StepOutcome::Applied
                    }
                    None => {
                        warn!("WRITE_MEMORY {}: stack is empty, write skipped", instr.operand);
                        StepOutcome::Skipped
                    }
                }
            }
            Opcode::Max => {
                self.memory.index(instr.operand)?;
                match self.stack.pop_pair() {
                    Some((first, second)) => {
                        self.memory.store(instr.operand, first.max(second))?;
                        StepOutcome::Applied
                    }
                    None => {
                        warn!(
                            "MAX {}: need 2 stack values, have {}; skipped",
                            instr.operand,
                            self.stack.len()
                        );
                        StepOutcome::Skipped
                    }
                }
            }
        };

        self.executed += 1;
        if outcome == StepOutcome::Skipped {
            self.skipped += 1;
        }
        Ok(outcome)
    }

    /// Copies `memory[start .. start + length]` out of the engine.
    pub fn export(&self, start: usize, length: usize) -> Result<MemorySnapshot, VMError> {
        let data = self.memory.range(start, length)?.to_vec();
        Ok(MemorySnapshot {
            start_address: start,
            length,
            data,
        })
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    /// All memory cells.
    pub fn memory(&self) -> &[Value] {
        self.memory.cells()
    }

    /// Value of one cell, without clearing it.
    pub fn cell(&self, address: u32) -> Result<Value, VMError> {
        self.memory.get(address)
    }

    /// Number of instructions executed so far, skipped ones included.
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Number of `WRITE_MEMORY`/`MAX` instructions that found too few stack values.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
