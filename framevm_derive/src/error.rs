//! Derive macro for error enums.
//!
//! Each variant declares its message with `#[error("...")]`. Tuple fields are
//! referenced positionally (`{0}`), struct fields by name (`{address}`). Fields
//! that the message does not mention are left out of the generated `write!`.
//!
//! ```ignore
//! use framevm_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum CodecError {
//!     #[error("unknown tag {0:#04X}")]
//!     UnknownTag(u8),
//!     #[error("value {value} exceeds {max}")]
//!     TooLarge { value: u32, max: u32 },
//!     #[error("stream ended early")]
//!     Eof,
//! }
//! ```

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Lit, Meta, parse_macro_input};

pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Error derive only supports enums",
        ));
    };

    let arms = data
        .variants
        .iter()
        .map(|variant| {
            let ident = &variant.ident;
            let message = message_of(variant)?;

            let arm = match &variant.fields {
                Fields::Unit => quote! {
                    Self::#ident => write!(f, #message),
                },
                Fields::Unnamed(fields) => {
                    let count = fields.unnamed.len();
                    let format = positional_to_named(&message, count);
                    let bindings: Vec<_> = (0..count).map(|i| format_ident!("f{}", i)).collect();
                    let used: Vec<_> = bindings
                        .iter()
                        .filter(|b| mentions(&format, &b.to_string()))
                        .collect();
                    quote! {
                        #[allow(unused_variables)]
                        Self::#ident(#(#bindings),*) => write!(f, #format #(, #used = #used)*),
                    }
                }
                Fields::Named(fields) => {
                    let bindings: Vec<_> = fields
                        .named
                        .iter()
                        .filter_map(|field| field.ident.as_ref())
                        .collect();
                    let used: Vec<_> = bindings
                        .iter()
                        .filter(|b| mentions(&message, &b.to_string()))
                        .collect();
                    quote! {
                        #[allow(unused_variables)]
                        Self::#ident { #(#bindings),* } => write!(f, #message #(, #used = #used)*),
                    }
                }
            };
            Ok(arm)
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#arms)*
                }
            }
        }

        impl #impl_generics ::std::error::Error for #name #ty_generics #where_clause {}
    })
}

/// Reads the string literal out of a variant's `#[error("...")]` attribute.
fn message_of(variant: &syn::Variant) -> syn::Result<String> {
    for attr in &variant.attrs {
        if !attr.path().is_ident("error") {
            continue;
        }
        let Meta::List(list) = &attr.meta else {
            return Err(syn::Error::new_spanned(
                &attr.meta,
                "expected #[error(\"message\")]",
            ));
        };
        return match syn::parse2::<Lit>(list.tokens.clone()) {
            Ok(Lit::Str(lit)) => Ok(lit.value()),
            _ => Err(syn::Error::new_spanned(
                &attr.meta,
                "#[error] message must be a string literal",
            )),
        };
    }

    Err(syn::Error::new_spanned(
        variant,
        format!("variant `{}` is missing #[error(\"...\")]", variant.ident),
    ))
}

/// Rewrites `{0}` / `{0:...}` into `{f0}` / `{f0:...}`.
fn positional_to_named(format: &str, count: usize) -> String {
    let mut out = format.to_string();
    for i in (0..count).rev() {
        out = out
            .replace(&format!("{{{i}}}"), &format!("{{f{i}}}"))
            .replace(&format!("{{{i}:"), &format!("{{f{i}:"));
    }
    out
}

fn mentions(format: &str, ident: &str) -> bool {
    format.contains(&format!("{{{ident}}}")) || format.contains(&format!("{{{ident}:"))
}
