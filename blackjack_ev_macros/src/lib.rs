use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote, ToTokens};
use syn::{parse_macro_input, parse_quote};

/// This macro is added before a method of `TrialTable` in the impl block.
/// Use this macro to first check if current trial phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(DealerPlay)]` will make a method first check
/// if current trial phase is `DealerPlay`. If not, the method will return
/// `BlackjackError::WrongPhase`.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let mut ast = parse_macro_input!(item as syn::ImplItemFn);
    let phase = parse_macro_input!(attr as syn::Ident);
    let operation = ast.sig.ident.to_string();
    let phase_name = phase.to_string();
    let early_return: syn::Stmt = parse_quote! {
        if self.current_trial_phase != TrialPhase::#phase {
            return Err(crate::BlackjackError::WrongPhase {
                operation: #operation,
                phase: #phase_name,
            });
        }
    };
    ast.block.stmts.insert(0, early_return);
    ast.into_token_stream().into()
}

/// Derives `BestExpectation` for a struct whose named `f64` fields are the
/// expectations of decisions. Each field name, capitalized, must be a variant
/// of `Decision`. Fields are compared in declaration order and a later field
/// only wins if it is strictly greater.
#[proc_macro_derive(BestExpectation)]
pub fn best_expectation_derive(input: TokenStream1) -> TokenStream1 {
    let ast = parse_macro_input!(input as syn::DeriveInput);
    let struct_name = &ast.ident;
    let named_fields = match ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => fields.named,
        _ => {
            return syn::Error::new_spanned(struct_name, "BestExpectation needs named fields")
                .to_compile_error()
                .into()
        }
    };

    let mut field_names = named_fields.iter().filter_map(|field| field.ident.clone());
    let first = match field_names.next() {
        Some(first) => first,
        None => {
            return syn::Error::new_spanned(struct_name, "BestExpectation needs a field")
                .to_compile_error()
                .into()
        }
    };
    let first_decision = decision_variant(&first);
    let comparisons: Vec<TokenStream2> = field_names
        .map(|field| {
            let decision = decision_variant(&field);
            quote! {
                if best.0 < self.#field {
                    best = (self.#field, crate::Decision::#decision);
                }
            }
        })
        .collect();

    let ts2 = quote! {
        impl BestExpectation for #struct_name {
            #[allow(unused_mut)]
            fn get_max_expectation(&self) -> (f64, crate::Decision) {
                let mut best = (self.#first, crate::Decision::#first_decision);
                #(#comparisons)*
                best
            }
        }
    };
    ts2.into()
}

fn decision_variant(field: &syn::Ident) -> syn::Ident {
    let name = field.to_string();
    let mut chars = name.chars();
    let capitalized: String = match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format_ident!("{}", capitalized)
}
