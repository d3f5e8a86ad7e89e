//! Derive macro for fixed-layout binary records.
//!
//! Generates `Encode` and `Decode` implementations that write and read every
//! field in declaration order with no framing, so a struct of five `u8` fields
//! occupies exactly five bytes on the wire.
//!
//! Only structs are supported. Enums carry no stable wire discriminant in this
//! crate and unions are rejected.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derives `Encode` and `Decode` for a struct.
///
/// ```ignore
/// use framevm_derive::BinaryCodec;
///
/// #[derive(BinaryCodec)]
/// pub struct Pair {
///     pub tag: u8,
///     pub value: u8,
/// }
/// ```
pub fn derive_binary_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) | Data::Union(_) => {
            return syn::Error::new_spanned(&input, "BinaryCodec derive only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let (encode_body, decode_body) = match fields {
        Fields::Named(named) => {
            let idents: Vec<_> = named.named.iter().map(|f| &f.ident).collect();
            (
                quote! {
                    #( crate::types::encoding::Encode::encode(&self.#idents, out); )*
                },
                quote! {
                    Ok(Self {
                        #( #idents: crate::types::encoding::Decode::decode(input)?, )*
                    })
                },
            )
        }
        Fields::Unnamed(unnamed) => {
            let indices: Vec<_> = (0..unnamed.unnamed.len()).map(syn::Index::from).collect();
            let reads = indices.iter().map(|_| {
                quote! { crate::types::encoding::Decode::decode(input)?, }
            });
            (
                quote! {
                    #( crate::types::encoding::Encode::encode(&self.#indices, out); )*
                },
                quote! { Ok(Self( #(#reads)* )) },
            )
        }
        Fields::Unit => (quote! { let _ = out; }, quote! { let _ = input; Ok(Self) }),
    };

    let expanded = quote! {
        impl #impl_generics crate::types::encoding::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::encoding::EncodeSink>(&self, out: &mut S) {
                #encode_body
            }
        }

        impl #impl_generics crate::types::encoding::Decode for #name #ty_generics #where_clause {
            fn decode(input: &mut &[u8]) -> ::std::result::Result<Self, crate::types::encoding::DecodeError> {
                #decode_body
            }
        }
    };

    TokenStream::from(expanded)
}
