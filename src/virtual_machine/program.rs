//! Frame stream representation and serialization.
//!
//! A [`Program`] is the ordered list of frames the assembler produced. It has
//! two interchangeable on-disk forms:
//!
//! - raw: frames back to back, five bytes each, no header
//! - text: one `0xNN, 0xNN, 0xNN, 0xNN, 0xNN` line per frame

use crate::types::encoding::{DecodeError, Encode, EncodeSink, decode_all};
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::frame::{FRAME_LEN, Frame};
use crate::virtual_machine::isa::Instruction;

/// Ordered sequence of encoded instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub frames: Vec<Frame>,
}

impl Program {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Encodes each instruction, stopping at the first operand that does not fit.
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self, VMError> {
        let frames = instructions
            .iter()
            .map(Frame::from_instruction)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Decodes every frame, failing on the first unknown opcode byte.
    pub fn decode(&self) -> Result<Vec<Instruction>, VMError> {
        self.frames.iter().map(Frame::decode).collect()
    }

    /// Reads the raw form. The length must be a whole number of frames.
    pub fn from_bytes(data: &[u8]) -> Result<Self, VMError> {
        let truncated = VMError::TruncatedFrame {
            len: data.len(),
            frame_len: FRAME_LEN,
        };
        if data.len() % FRAME_LEN != 0 {
            return Err(truncated);
        }
        match decode_all::<Frame>(data) {
            Ok(frames) => Ok(Self { frames }),
            Err(DecodeError::UnexpectedEof | DecodeError::TrailingBytes(_)) => Err(truncated),
        }
    }

    /// Renders the text form, one line per frame, each line newline-terminated.
    pub fn to_hex_text(&self) -> String {
        let mut out = String::with_capacity(self.frames.len() * 30);
        for frame in &self.frames {
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        out
    }

    /// Reads the text form. Blank lines are skipped; line numbers are 1-based.
    pub fn from_hex_text(text: &str) -> Result<Self, VMError> {
        let mut frames = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            frames.push(Frame::parse_hex(idx + 1, line)?);
        }
        Ok(Self { frames })
    }
}

impl Encode for Program {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.frames.encode(out);
    }
}
