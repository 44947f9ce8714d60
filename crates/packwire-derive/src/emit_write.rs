// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Write Emitter (C5): the field-write rules, applied in `spec.md`'s exact
//! order, adapted for a `quote!`-based `CodeWriter` (see `writer.rs`).

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Type;

use crate::diagnostics::Diagnostics;
use crate::symbols::{self, CollectionShape};
use crate::strategies;
use crate::writer::CodeWriter;

/// Emit the statements that write one value of type `ty`, reachable
/// through `expr` (a `TokenStream` producing a shared reference `&ty`),
/// into `writer`.
///
/// Recoverable shape problems (a bare trait object, an unsupported type)
/// are recorded on `diags` rather than aborting the whole candidate: only
/// the `SerializationMarking` whole-candidate check in `orchestrator.rs`
/// short-circuits generation.
pub fn emit_write(expr: &TokenStream, ty: &Type, enum_field: bool, writer: &Ident, diags: &mut Diagnostics) -> TokenStream {
    // 1. Nullable wrapper.
    if let Some(inner) = symbols::option_inner(ty) {
        let inner_write = emit_write(&quote!(value), &inner, enum_field, writer, diags);
        return quote! {
            if let Some(value) = #expr {
                #writer.write_bool(true);
                #inner_write
            } else {
                #writer.write_bool(false);
            }
        };
    }

    // 2. Registered strategy.
    if let Some(strategy) = strategies::lookup(ty) {
        return strategies::emit_write(&strategy, expr, writer);
    }

    // 4. Enum field — checked ahead of the primitive/path fallback since an
    // enum field's declared type is syntactically indistinguishable from
    // any other `Type::Path`.
    if enum_field {
        return quote! {
            #writer.write_i32((#expr).as_i32());
        };
    }

    // 3. Primitive.
    if symbols::is_primitive(ty) {
        return emit_primitive_write(expr, ty, writer);
    }

    // 6. Array: length as i32, then each element. A byte-by-byte loop and a
    // single buffered write produce identical bytes for `[u8; N]`, so the
    // "buffered write" optimization `spec.md` describes is left to the
    // compiler's own inlining rather than a second code path here. Arrays
    // are reference composites (`spec.md` §4.3 rule 5's closing bullet):
    // wrapped in the same presence tag as a collection, written
    // unconditionally `true` since a bare `[T; N]` field can never itself
    // be absent outside an `Option` guard already handled above.
    if let Type::Array(array) = ty {
        let elem_ty = &*array.elem;
        let len = &array.len;
        let elem_write = emit_write(&quote!(elem), elem_ty, false, writer, diags);
        let body = quote! {
            #writer.write_i32(#len as i32);
            for elem in (#expr).iter() {
                #elem_write
            }
        };
        return wrap_ref_comp(writer, body);
    }

    // 5. Class/struct/interface.
    if symbols::is_bare_trait_object(ty) {
        return diags.record(
            ty,
            crate::diagnostics::INTERFACE_PROPERTIES,
            "a bare trait object field cannot be packed; only a concrete type or the canonical `dyn Iterator<Item = T>` / `Box<dyn Iterator<Item = T>>` shape is supported",
        );
    }

    if let Some(shape) = symbols::detect_collection(ty) {
        return emit_collection_write(expr, &shape, ty, writer, diags);
    }

    if symbols::is_unsupported_shape(ty) {
        return diags.record(
            ty,
            crate::diagnostics::MISSING_PACKING_METHOD,
            "raw pointers, function pointers, `impl Trait`, and inferred types have no packing strategy",
        );
    }

    // Otherwise: delegate to `Packable`, trusting the field's type implements
    // it. If it doesn't, rustc reports a trait-bound error at this call site
    // — strictly stronger than a manual diagnostic could be.
    quote! {
        ::packwire::Packable::pack(#expr, #writer)?;
    }
}

fn emit_primitive_write(expr: &TokenStream, ty: &Type, writer: &Ident) -> TokenStream {
    let ident = symbols::last_segment(ty).map(|s| s.ident.to_string()).unwrap_or_default();
    match ident.as_str() {
        "String" => quote! {
            #writer.write_bool(true);
            #writer.write_str(#expr)?;
        },
        "bool" => quote! { #writer.write_bool(*(#expr)); },
        "char" => quote! { #writer.write_char(*(#expr)); },
        other => {
            let method = format_ident!("write_{}", other);
            quote! { #writer.#method(*(#expr)); }
        }
    }
}

/// Wrap `body` in the reference-composite presence tag: `write_bool(true)`
/// followed by `body`, grouped into one scope via `CodeWriter::block` —
/// the nested-conditional-block component `spec.md` §4.2 describes, here
/// closing the single (always-true) block a collection or array dispatch
/// opens. When the field is also `Option`-wrapped, this block nests inside
/// that wrapper's own `if let Some(value) = ...` block, giving the
/// two-deep nesting (Nullable, then RefComp) `spec.md` §4.2 anticipates.
fn wrap_ref_comp(writer: &Ident, body: TokenStream) -> TokenStream {
    let mut scope = CodeWriter::new();
    scope.block(|inner| {
        inner.push(quote! { #writer.write_bool(true); });
        inner.push(body);
    });
    scope.finish()
}

fn emit_collection_write(
    expr: &TokenStream,
    shape: &CollectionShape,
    ty: &Type,
    writer: &Ident,
    diags: &mut Diagnostics,
) -> TokenStream {
    if let CollectionShape::Enumerable { is_trait_object: true, .. } = shape {
        return diags.record(
            ty,
            crate::diagnostics::INTERFACE_PROPERTIES,
            "a bare `dyn Iterator`/`Box<dyn Iterator>` field cannot be packed through `&self`: driving an iterator requires `&mut self`. Store the elements in a concrete collection (Vec, HashSet, ...) instead",
        );
    }

    if let CollectionShape::HashMap(key_ty, value_ty) | CollectionShape::BTreeMap(key_ty, value_ty) = shape {
        let key_write = emit_write(&quote!(key), key_ty, false, writer, diags);
        let value_write = emit_write(&quote!(value), value_ty, false, writer, diags);
        let body = quote! {
            #writer.write_i32((#expr).len() as i32);
            for (key, value) in (#expr).iter() {
                #key_write
                #value_write
            }
        };
        return wrap_ref_comp(writer, body);
    }

    let elem_ty = match shape {
        CollectionShape::Vec(t)
        | CollectionShape::VecDeque(t)
        | CollectionShape::HashSet(t)
        | CollectionShape::BTreeSet(t) => t,
        CollectionShape::Enumerable { elem, .. } => elem,
        CollectionShape::HashMap(..) | CollectionShape::BTreeMap(..) => unreachable!("handled above"),
    };
    let elem_write = emit_write(&quote!(elem), elem_ty, false, writer, diags);
    let body = quote! {
        #writer.write_i32((#expr).len() as i32);
        for elem in (#expr).iter() {
            #elem_write
        }
    };
    wrap_ref_comp(writer, body)
}
