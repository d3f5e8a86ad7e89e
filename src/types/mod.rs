//! Shared serialization primitives.
//!
//! - [`encoding`]: `Encode`/`Decode` traits used by `#[derive(BinaryCodec)]`

pub mod encoding;
