// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default Strategies Registry (C3): special-cased types keyed by
//! [`crate::symbols::qualified_key`], consulted before the generic
//! field-by-field machinery.
//!
//! In the host analyzer these strategies hand-emit bespoke wire code
//! because the originating language has no interface a tuple, a
//! date/time, or a duration could implement. Here, `packwire::Packable`
//! already has blanket `impl`s for exactly these types (arities 1..=7,
//! `SystemTime`, `Duration`) — so a registered strategy and the generic
//! "delegate to `Packable`" fallback of rule 5 produce identical bytes.
//! The registry is kept as a distinct, earlier-consulted step (matching
//! the component's place in the pipeline) rather than duplicated by hand,
//! so the wire format can never drift from the runtime's own tests.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::Type;

use crate::symbols::qualified_key;

pub enum Strategy {
    Tuple(usize),
    SystemTime,
    Duration,
}

pub fn lookup(ty: &Type) -> Option<Strategy> {
    if let Type::Tuple(tuple) = ty {
        let arity = tuple.elems.len();
        return (1..=7).contains(&arity).then_some(Strategy::Tuple(arity));
    }
    match qualified_key(ty).as_str() {
        "SystemTime" => Some(Strategy::SystemTime),
        "Duration" => Some(Strategy::Duration),
        _ => None,
    }
}

pub fn emit_write(_strategy: &Strategy, expr: &TokenStream, writer: &Ident) -> TokenStream {
    quote! {
        ::packwire::Packable::pack(#expr, #writer)?;
    }
}

pub fn emit_read(_strategy: &Strategy, ty: &Type, reader: &Ident) -> TokenStream {
    quote! {
        <#ty as ::packwire::Packable>::unpack(#reader)?
    }
}
