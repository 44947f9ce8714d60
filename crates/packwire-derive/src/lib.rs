// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `#[derive(Packable)]`: generates a `packwire::Packable` impl that packs
//! and unpacks a struct's fields in declaration order.
//!
//! The engine has no semantic model to query — `syn` hands it the parsed
//! syntax of the annotated struct and nothing else (see `SPEC_FULL.md`
//! §1). Every module below recognizes a field's shape by pattern-matching
//! its `syn::Type`, the same technique `get_field_kind` used in this
//! engine's earlier, narrower incarnation.

extern crate proc_macro;

mod diagnostics;
mod emit_read;
mod emit_write;
mod filter;
mod orchestrator;
mod strategies;
mod symbols;
mod writer;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Supported field shapes: primitives, `String`, `Option<T>`, fixed arrays,
/// the standard sequence/set/map collections, tuples up to arity 7,
/// `SystemTime`/`Duration`, enum fields marked `#[packable(enum_field)]`,
/// and any other type that itself implements `packwire::Packable`.
///
/// See `#[packable(...)]` attributes: `ignore`, `ignore = "read"`,
/// `ignore = "write"`, `force`, `skip_read`, `base`, `enum_field`.
#[proc_macro_derive(Packable, attributes(packable))]
pub fn derive_packable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match orchestrator::generate(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
