// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stable diagnostic ids, surfaced as `compile_error!` text at the span of
//! the offending item — the derive-macro analogue of the host analyzer's
//! diagnostic descriptors.

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};

/// A marked candidate that isn't a named-field struct (tuple struct, unit
/// struct, enum, union).
pub const SERIALIZATION_MARKING: &str = "SerializationMarking";
/// A bare trait-object field that isn't the canonical enumerable interface.
pub const INTERFACE_PROPERTIES: &str = "InterfaceProperties";
/// A field whose shape is syntactically unsupported outright (raw pointer,
/// function pointer, `impl Trait`, inferred type).
pub const MISSING_PACKING_METHOD: &str = "MissingPackingMethod";
/// A collection-shaped field whose reconstruction cascade doesn't apply.
pub const ENUMERABLE_PROPERTIES: &str = "EnumerableProperties";

pub fn error(spanned: &dyn ToTokens, id: &str, message: &str) -> syn::Error {
    syn::Error::new_spanned(spanned, format!("[{id}] {message}"))
}

/// Diagnostics collected while emitting one candidate's fields.
///
/// `SerializationMarking` is the only whole-candidate diagnostic (checked in
/// `orchestrator::generate` before any field is visited); the other three
/// are per-field and recoverable, so they are collected here rather than
/// propagated with `?`. Each one still ends up as a `compile_error!` item,
/// spliced in alongside the otherwise-complete `impl` rather than in place
/// of it, and the field itself gets a `panic!` with the same message so the
/// failure is also reachable at runtime if the generated code ever executes.
#[derive(Default)]
pub struct Diagnostics(Vec<syn::Error>);

impl Diagnostics {
    /// Record `error` and return a `panic!` statement carrying the same
    /// message, to be spliced in at the offending field's call site.
    pub fn record(&mut self, spanned: &dyn ToTokens, id: &str, message: &str) -> TokenStream {
        let full_message = format!("[{id}] {message}");
        self.0.push(syn::Error::new_spanned(spanned, &full_message));
        quote! { panic!(#full_message) }
    }

    pub fn into_compile_errors(self) -> TokenStream {
        let errors = self.0.into_iter().map(|err| err.to_compile_error());
        quote! { #(#errors)* }
    }
}
