//! Fixed-width instruction frames.
//!
//! A frame is five bytes: `[opcode, b1, b2, b3, b4]`. The operand is cut into
//! one-byte chunks taken from its hex form, most significant first, and the
//! chunks are placed asymmetrically:
//!
//! | chunks | b1  | b2  | b3     | b4   |
//! |--------|-----|-----|--------|------|
//! | 1      | C0  | 00  | 00     | 00   |
//! | 2      | C1  | C0  | 00     | 00   |
//! | 3      | C2  | C0  | C1     | 00   |
//!
//! The low byte always sits in slot 1 and the high byte always in slot 2. Slot
//! 4 is reserved. A decoder sees a zero in slot 3 as "two chunks", so a
//! three-chunk operand whose middle byte is zero has no unambiguous layout and
//! is rejected by [`Frame::encode`].

use crate::types::encoding::Encode;
use crate::virtual_machine::errors::VMError;
use crate::virtual_machine::isa::{Instruction, Opcode};
use framevm_derive::BinaryCodec;
use std::fmt;

/// Size of one frame in bytes.
pub const FRAME_LEN: usize = 5;

/// Largest operand any frame layout can carry (three chunks).
pub const MAX_FRAME_OPERAND: u32 = 0x00FF_FFFF;

/// One encoded instruction. Field order is the wire order.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, BinaryCodec)]
pub struct Frame {
    pub opcode: u8,
    /// Least-significant chunk.
    pub low: u8,
    /// Most-significant chunk, zero for single-chunk operands.
    pub high: u8,
    /// Middle chunk of a three-chunk operand.
    pub mid: u8,
    pub reserved: u8,
}

impl Frame {
    /// Encodes an opcode/operand pair, validating the operand first.
    pub fn encode(opcode: Opcode, operand: u32) -> Result<Self, VMError> {
        let out_of_range = |reason: &'static str| VMError::OperandOutOfRange {
            mnemonic: opcode.mnemonic(),
            operand,
            reason,
        };

        if operand > opcode.max_operand() {
            return Err(out_of_range(if opcode == Opcode::LoadConst {
                "exceeds the 13-bit constant bound"
            } else {
                "exceeds the 26-bit address bound"
            }));
        }
        if operand > MAX_FRAME_OPERAND {
            return Err(out_of_range("needs more than three frame chunks"));
        }

        let [_, c0, c1, c2] = operand.to_be_bytes();
        let (low, high, mid) = if c0 != 0 {
            if c1 == 0 {
                return Err(out_of_range("three-chunk operand with a zero middle chunk"));
            }
            (c2, c0, c1)
        } else {
            (c2, c1, 0)
        };

        Ok(Self {
            opcode: opcode.tag(),
            low,
            high,
            mid,
            reserved: 0,
        })
    }

    /// Encodes an already-built instruction.
    pub fn from_instruction(instr: &Instruction) -> Result<Self, VMError> {
        Self::encode(instr.opcode, instr.operand)
    }

    /// Decodes the frame back into an instruction.
    ///
    /// Only the opcode byte is validated; the reserved byte is ignored.
    pub fn decode(&self) -> Result<Instruction, VMError> {
        let opcode = Opcode::try_from(self.opcode)?;
        let operand = if self.high == 0 {
            self.low as u32
        } else if self.mid == 0 {
            u32::from_be_bytes([0, 0, self.high, self.low])
        } else {
            u32::from_be_bytes([0, self.high, self.mid, self.low])
        };
        Ok(Instruction::new(opcode, operand))
    }

    /// The five bytes in wire order.
    pub fn as_array(&self) -> [u8; FRAME_LEN] {
        [self.opcode, self.low, self.high, self.mid, self.reserved]
    }

    pub fn from_array(bytes: [u8; FRAME_LEN]) -> Self {
        let [opcode, low, high, mid, reserved] = bytes;
        Self {
            opcode,
            low,
            high,
            mid,
            reserved,
        }
    }

    /// Parses one line of the textual stream, e.g. `0x3F, 0x6E, 0x01, 0x00, 0x00`.
    pub fn parse_hex(line_no: usize, text: &str) -> Result<Self, VMError> {
        let invalid = || VMError::InvalidHexText {
            line: line_no,
            text: text.to_string(),
        };

        let mut bytes = [0u8; FRAME_LEN];
        let mut fields = text.split(',');
        for slot in bytes.iter_mut() {
            let field = fields.next().ok_or_else(invalid)?.trim();
            let digits = field
                .strip_prefix("0x")
                .or_else(|| field.strip_prefix("0X"))
                .ok_or_else(invalid)?;
            if digits.is_empty() || digits.len() > 2 {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
        }
        if fields.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::from_array(bytes))
    }
}

impl From<Frame> for [u8; FRAME_LEN] {
    fn from(frame: Frame) -> Self {
        frame.as_array()
    }
}

/// Textual rendering: `0xNN, 0xNN, 0xNN, 0xNN, 0xNN`, uppercase hex.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.as_array().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "0x{byte:02X}")?;
        }
        Ok(())
    }
}

/// Encodes a frame straight into a byte vector.
pub fn encode_frame(opcode: Opcode, operand: u32) -> Result<Vec<u8>, VMError> {
    Ok(Frame::encode(opcode, operand)?.to_bytes())
}
