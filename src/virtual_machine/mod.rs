//! Frame assembler and stack/memory interpreter.
//!
//! # Pipeline
//!
//! ```text
//! source lines ─▶ assembler ─▶ frames ─▶ vm ─▶ memory snapshot
//! ```
//!
//! - **Instructions**: four opcodes (`LOAD_CONST`, `READ_MEMORY`,
//!   `WRITE_MEMORY`, `MAX`), each with one unsigned operand
//! - **Encoding**: every instruction is one fixed 5-byte frame
//! - **Execution model**: unbounded value stack plus 1024 memory cells, no
//!   control flow
//!
//! # Modules
//!
//! - [`assembler`]: source parsing, frame encoding and the assembly log
//! - [`errors`]: error type shared by every stage
//! - [`frame`]: the 5-byte frame codec and its hex text form
//! - [`isa`]: opcode table
//! - [`program`]: frame streams in raw and text form
//! - [`snapshot`]: exported memory windows
//! - [`vm`]: the execution engine

pub mod assembler;
pub mod errors;
pub mod frame;
pub mod isa;
pub mod program;
pub mod snapshot;
pub mod vm;
