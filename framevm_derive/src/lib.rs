//! Derive macros for the framevm crate.
//!
//! Provides:
//! - `#[derive(BinaryCodec)]` - field-by-field binary encoding for frame records
//! - `#[derive(Error)]` - `Display` and `Error` impls from `#[error("...")]` attributes

mod binary_codec;
mod error;

use proc_macro::TokenStream;

/// Implements `Encode` and `Decode` by visiting fields in declaration order.
#[proc_macro_derive(BinaryCodec)]
pub fn derive_binary_codec(input: TokenStream) -> TokenStream {
    binary_codec::derive_binary_codec(input)
}

/// Implements `Display` and `std::error::Error` for an error enum.
#[proc_macro_derive(Error, attributes(error))]
pub fn derive_error(input: TokenStream) -> TokenStream {
    error::derive_error(input)
}
