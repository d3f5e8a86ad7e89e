//! Process-level helpers shared by the library and the binaries.

pub mod log;
