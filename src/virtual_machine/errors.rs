use framevm_derive::Error;

/// Errors raised while assembling, decoding, executing or exporting a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VMError {
    /// Unknown mnemonic, tag that disagrees with the mnemonic, or malformed line.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    /// Operand exceeds the opcode's declared bound or the frame layout.
    #[error("operand {operand} is out of range for {mnemonic}: {reason}")]
    OperandOutOfRange {
        mnemonic: &'static str,
        operand: u32,
        reason: &'static str,
    },
    /// Frame whose opcode byte is not one of the four legal tags.
    #[error("malformed frame: unknown opcode byte {opcode:#04X}")]
    MalformedFrame { opcode: u8 },
    /// Raw stream whose length is not a whole number of frames.
    #[error("truncated frame stream: {len} bytes is not a multiple of {frame_len}")]
    TruncatedFrame { len: usize, frame_len: usize },
    /// Line of the textual frame stream that does not parse.
    #[error("line {line}: invalid hex frame '{text}'")]
    InvalidHexText { line: usize, text: String },
    /// Memory index outside `[0, size)`.
    #[error("invalid memory address {address} (memory has {size} cells)")]
    InvalidAddress { address: u32, size: usize },
    /// Export window reaching past the end of memory.
    #[error("range {start}..{start}+{length} is outside memory of {size} cells")]
    RangeOutOfBounds {
        start: usize,
        length: usize,
        size: usize,
    },
}
