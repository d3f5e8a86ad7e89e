//! Instruction set definitions.
//!
//! The [`for_each_opcode!`](crate::for_each_opcode) macro holds the canonical
//! opcode table (tag, mnemonic, declared operand bound) and hands it to a
//! callback macro, so the enum, its decoder and the mnemonic lookup are all
//! generated from one list.
//!
//! # Frame layout
//!
//! Every instruction occupies one 5-byte frame; see [`frame`](super::frame).

use crate::virtual_machine::errors::VMError;
use std::fmt;

/// Invokes a callback macro with the complete opcode list.
#[macro_export]
macro_rules! for_each_opcode {
    ($callback:ident) => {
        $callback! {
            /// LOAD_CONST 63 v ; push integer v
            LoadConst = 63, "LOAD_CONST", 8_191,
            /// READ_MEMORY 32 addr ; push memory[addr], then clear memory[addr]
            ReadMemory = 32, "READ_MEMORY", 67_108_863,
            /// WRITE_MEMORY 97 addr ; memory[addr] = pop
            WriteMemory = 97, "WRITE_MEMORY", 67_108_863,
            /// MAX 144 addr ; memory[addr] = max(pop, pop)
            Max = 144, "MAX", 67_108_863,
        }
    };
}

#[macro_export]
macro_rules! define_opcodes {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $tag:literal, $mnemonic:literal, $bound:expr
        ),* $(,)?
    ) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum Opcode {
            $(
                $(#[$doc])*
                $name = $tag,
            )*
        }

        impl Opcode {
            /// Every opcode, in table order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name),*];

            /// Returns the assembly mnemonic for this opcode.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Opcode::$name => $mnemonic, )*
                }
            }

            /// Largest operand the opcode declares as legal.
            pub const fn max_operand(&self) -> u32 {
                match self {
                    $( Opcode::$name => $bound, )*
                }
            }

            /// Numeric tag written into byte 0 of a frame.
            pub const fn tag(&self) -> u8 {
                *self as u8
            }

            /// Looks up an upper-case mnemonic.
            pub fn from_mnemonic(name: &str) -> Option<Self> {
                match name {
                    $( $mnemonic => Some(Opcode::$name), )*
                    _ => None,
                }
            }
        }

        impl TryFrom<u8> for Opcode {
            type Error = VMError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $tag => Ok(Opcode::$name), )*
                    _ => Err(VMError::MalformedFrame { opcode: value }),
                }
            }
        }
    };
}

for_each_opcode!(define_opcodes);

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One decoded instruction: an opcode and its unsigned operand.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: u32,
}

impl Instruction {
    pub const fn new(opcode: Opcode, operand: u32) -> Self {
        Self { opcode, operand }
    }
}

/// Renders the instruction in assembly source form, e.g. `MAX 144 895`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.opcode.mnemonic(), self.opcode.tag(), self.operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_tags_are_fixed() {
        assert_eq!(Opcode::LoadConst.tag(), 63);
        assert_eq!(Opcode::ReadMemory.tag(), 32);
        assert_eq!(Opcode::WriteMemory.tag(), 97);
        assert_eq!(Opcode::Max.tag(), 144);
    }

    #[test]
    fn opcode_try_from_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::try_from(op.tag()).unwrap(), *op);
        }
    }

    #[test]
    fn opcode_try_from_invalid() {
        assert!(matches!(
            Opcode::try_from(0xFF),
            Err(VMError::MalformedFrame { opcode: 0xFF })
        ));
        assert!(Opcode::try_from(0).is_err());
        assert!(Opcode::try_from(64).is_err());
    }

    #[test]
    fn opcode_from_mnemonic() {
        assert_eq!(Opcode::from_mnemonic("MAX"), Some(Opcode::Max));
        assert_eq!(Opcode::from_mnemonic("LOAD_CONST"), Some(Opcode::LoadConst));
        assert_eq!(Opcode::from_mnemonic("max"), None);
        assert_eq!(Opcode::from_mnemonic("ADD"), None);
    }

    #[test]
    fn declared_bounds() {
        assert_eq!(Opcode::LoadConst.max_operand(), 8_191);
        assert_eq!(Opcode::ReadMemory.max_operand(), 67_108_863);
        assert_eq!(Opcode::WriteMemory.max_operand(), 67_108_863);
        assert_eq!(Opcode::Max.max_operand(), 67_108_863);
    }

    #[test]
    fn instruction_display_matches_source_form() {
        let instr = Instruction::new(Opcode::Max, 895);
        assert_eq!(instr.to_string(), "MAX 144 895");
    }
}
