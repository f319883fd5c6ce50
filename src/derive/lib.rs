// SPDX-License-Identifier: Apache-2.0

//! Derive for netconverge internal use
//!
//! [JsonDisplay]: Implement `std::fmt::Display` using compact JSON so desired
//! and current network settings can be logged in a single line, falling back
//! to the Debug output when serialization fails.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(JsonDisplay)]
pub fn derive_json_display(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let type_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) =
        input.generics.split_for_impl();

    let expanded = quote::quote! {
        impl #impl_generics std::fmt::Display for #type_name #ty_generics
            #where_clause
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match serde_json::to_string(&self) {
                    Ok(s) => {
                        // Plain strings are shown without the JSON quotes.
                        let unquoted = if s.matches('"').count() == 2 {
                            s.strip_prefix('"').and_then(|s| s.strip_suffix('"'))
                        } else {
                            None
                        };
                        write!(f, "{}", unquoted.unwrap_or(s.as_str()))
                    }
                    Err(e) => {
                        log::error!(
                            "BUG: Failed to convert {:?} into JSON: {}",
                            self,
                            e
                        );
                        write!(f, "{:?}", self)
                    }
                }
            }
        }
    };

    TokenStream::from(expanded)
}
