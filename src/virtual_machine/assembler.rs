//! Assembly parser and frame encoder.
//!
//! # Syntax
//!
//! ```text
//! MNEMONIC TAG OPERAND
//! ```
//!
//! - One instruction per line, exactly three whitespace-separated tokens
//! - Mnemonics are case-insensitive (`load_const` == `LOAD_CONST`)
//! - `TAG` must repeat the mnemonic's opcode value (63, 32, 97 or 144)
//! - `TAG` and `OPERAND` are unsigned decimal integers
//! - Blank lines are skipped
//!
//! Parsing finishes for the whole source before any frame is encoded, so a bad
//! line is reported even if an earlier operand would not fit its frame.

use crate::info;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::frame::Frame;
use crate::virtual_machine::isa::{Instruction, Opcode};
use crate::virtual_machine::program::Program;
use serde::Serialize;

/// One entry of the assembly log: position, opcode tag and operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub id: usize,
    pub a: u8,
    pub b: u32,
}

/// Record of every accepted instruction, serialized as
/// `{"instructions": [{"id": 0, "a": 63, "b": 366}, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyLog {
    pub instructions: Vec<LogRecord>,
}

/// Output of a successful assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Parsed instructions in source order.
    pub instructions: Vec<Instruction>,
    /// One frame per instruction.
    pub program: Program,
}

impl Assembly {
    pub fn log(&self) -> AssemblyLog {
        AssemblyLog {
            instructions: self
                .instructions
                .iter()
                .enumerate()
                .map(|(id, instr)| LogRecord {
                    id,
                    a: instr.opcode.tag(),
                    b: instr.operand,
                })
                .collect(),
        }
    }
}

/// Parses one source line. Returns `Ok(None)` for a blank line.
///
/// `line_no` is 1-based and only used for error reporting.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Instruction>, VMError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Ok(None);
    };

    let mnemonic = first.to_uppercase();
    let unknown = || VMError::UnknownCommand {
        line: line_no,
        command: mnemonic.clone(),
    };

    let [_, tag, operand] = tokens.as_slice() else {
        return Err(unknown());
    };
    let opcode = Opcode::from_mnemonic(&mnemonic).ok_or_else(unknown)?;
    let tag: u32 = tag.parse().map_err(|_| unknown())?;
    if tag != opcode.tag() as u32 {
        return Err(unknown());
    }
    let operand: u32 = operand.parse().map_err(|_| unknown())?;

    Ok(Some(Instruction::new(opcode, operand)))
}

/// Parses every line, stopping at the first malformed one.
pub fn parse_lines<I, S>(lines: I) -> Result<Vec<Instruction>, VMError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut instructions = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        if let Some(instr) = parse_line(idx + 1, line.as_ref())? {
            instructions.push(instr);
        }
    }
    Ok(instructions)
}

/// Parses and encodes a sequence of source lines.
pub fn assemble_lines<I, S>(lines: I) -> Result<Assembly, VMError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let instructions = parse_lines(lines)?;

    let mut frames = Vec::with_capacity(instructions.len());
    for (id, instr) in instructions.iter().enumerate() {
        frames.push(Frame::from_instruction(instr)?);
        info!("#{id}: {} a={} b={}", instr.opcode, instr.opcode.tag(), instr.operand);
    }

    Ok(Assembly {
        instructions,
        program: Program::new(frames),
    })
}

/// Assembles a whole source text.
pub fn assemble_source(source: &str) -> Result<Assembly, VMError> {
    assemble_lines(source.lines())
}
