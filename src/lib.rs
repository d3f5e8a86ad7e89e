//! framevm library.
//!
//! Assembles four-instruction programs into fixed 5-byte frames and runs them
//! on a small stack/memory machine.

pub mod types;
pub mod utils;
pub mod virtual_machine;

pub use virtual_machine::assembler::{Assembly, AssemblyLog, assemble_lines, assemble_source};
pub use virtual_machine::errors::VMError;
pub use virtual_machine::frame::Frame;
pub use virtual_machine::isa::{Instruction, Opcode};
pub use virtual_machine::program::Program;
pub use virtual_machine::snapshot::MemorySnapshot;
pub use virtual_machine::vm::{MEMORY_SIZE, VM, Value};
