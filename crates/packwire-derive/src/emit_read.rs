// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read Emitter (C6): the field-read rules, mirroring `emit_write`'s order,
//! plus the enumerable-insertion cascade for collection-shaped fields.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Type;

use crate::diagnostics::Diagnostics;
use crate::symbols::{self, CollectionShape};
use crate::strategies;
use crate::writer::CodeWriter;

/// Emit `let #ident = { ... };`, reconstructing one value of type `ty`
/// from `reader`.
///
/// Recoverable shape problems are recorded on `diags` and replaced with a
/// `panic!` at this call site rather than aborting the whole candidate —
/// see `emit_write::emit_write`'s doc comment for the same rule on the
/// write side.
pub fn emit_read(ident: &Ident, ty: &Type, enum_field: bool, reader: &Ident, diags: &mut Diagnostics) -> TokenStream {
    // 1. Nullable wrapper.
    if let Some(inner) = symbols::option_inner(ty) {
        let inner_ident = format_ident!("{}_value", ident);
        let inner_read = emit_read(&inner_ident, &inner, enum_field, reader, diags);
        return quote! {
            let #ident = if #reader.read_bool()? {
                #inner_read
                Some(#inner_ident)
            } else {
                None
            };
        };
    }

    // 2. Registered strategy.
    if let Some(strategy) = strategies::lookup(ty) {
        let expr = strategies::emit_read(&strategy, ty, reader);
        return quote! { let #ident = #expr; };
    }

    // 4. Enum field.
    if enum_field {
        return quote! {
            let #ident = <#ty>::from_i32(#reader.read_i32()?);
        };
    }

    // 3. Primitive.
    if symbols::is_primitive(ty) {
        return emit_primitive_read(ident, ty, reader);
    }

    // 6. Array: length prefix, then each element into a `Vec`, then an
    // infallible-by-construction conversion back into `[T; N]`.
    if let Type::Array(array) = ty {
        return emit_array_read(ident, &array.elem, &array.len, reader, diags);
    }

    // 5. Bare trait object (not the canonical enumerable interface).
    if symbols::is_bare_trait_object(ty) {
        let panic_stmt = diags.record(
            ty,
            crate::diagnostics::INTERFACE_PROPERTIES,
            "a bare trait object field has no way to be reconstructed from the wire",
        );
        return quote! { let #ident = { #panic_stmt }; };
    }

    if let Some(shape) = symbols::detect_collection(ty) {
        return emit_collection_read(ident, &shape, ty, reader, diags);
    }

    if symbols::is_unsupported_shape(ty) {
        let panic_stmt = diags.record(
            ty,
            crate::diagnostics::MISSING_PACKING_METHOD,
            "raw pointers, function pointers, `impl Trait`, and inferred types have no packing strategy",
        );
        return quote! { let #ident = { #panic_stmt }; };
    }

    quote! {
        let #ident = <#ty as ::packwire::Packable>::unpack(#reader)?;
    }
}

fn emit_primitive_read(ident: &Ident, ty: &Type, reader: &Ident) -> TokenStream {
    let name = symbols::last_segment(ty).map(|s| s.ident.to_string()).unwrap_or_default();
    match name.as_str() {
        "String" => quote! {
            let #ident = {
                let _present = #reader.read_bool()?;
                debug_assert!(_present, "packwire: String fields always write a present byte");
                #reader.read_str()?
            };
        },
        other => {
            let method = format_ident!("read_{}", other);
            quote! { let #ident = #reader.#method()?; }
        }
    }
}

/// Wrap `body` (statements ending in a trailing expression) in the
/// reference-composite presence-tag read: consume and check the boolean
/// `emit_write::wrap_ref_comp` wrote, then evaluate `body` as the bound
/// value. Uses `CodeWriter::block` for the same nested-scope reason the
/// write side does.
fn tagged_let(ident: &Ident, reader: &Ident, body: TokenStream) -> TokenStream {
    let mut scope = CodeWriter::new();
    scope.block(|inner| {
        inner.push(quote! {
            let present = #reader.read_bool()?;
            debug_assert!(present, "packwire: reference composite fields always write a present byte");
        });
        inner.push(body);
    });
    let block = scope.finish();
    quote! { let #ident = #block; }
}

fn emit_array_read(ident: &Ident, elem_ty: &Type, len: &syn::Expr, reader: &Ident, diags: &mut Diagnostics) -> TokenStream {
    let count_ident = format_ident!("{}_len", ident);
    let elem_ident = format_ident!("{}_elem", ident);
    let items_ident = format_ident!("{}_items", ident);
    let elem_read = emit_read(&elem_ident, elem_ty, false, reader, diags);
    let body = quote! {
        let #count_ident = #reader.read_i32()?;
        let mut #items_ident: ::std::vec::Vec<#elem_ty> = ::std::vec::Vec::with_capacity(#count_ident.max(0) as usize);
        for _ in 0..#count_ident {
            #elem_read
            #items_ident.push(#elem_ident);
        }
        let array: [#elem_ty; #len] = #items_ident.try_into().map_err(|items: ::std::vec::Vec<#elem_ty>| {
            ::packwire::Error::InvalidLength { offset: #reader.offset(), value: items.len() as i64 }
        })?;
        array
    };
    tagged_let(ident, reader, body)
}

fn emit_collection_read(
    ident: &Ident,
    shape: &CollectionShape,
    ty: &Type,
    reader: &Ident,
    diags: &mut Diagnostics,
) -> TokenStream {
    match shape {
        // a. `Vec`/`VecDeque` → `Default::default()` then push in a loop.
        CollectionShape::Vec(elem) => emit_seq_read(ident, elem, ty, reader, quote!(push), diags),
        CollectionShape::VecDeque(elem) => emit_seq_read(ident, elem, ty, reader, quote!(push_back), diags),
        // c. `HashSet`/`BTreeSet` → `.insert(elem)`, the same single-arg
        // insertion family as `push`.
        CollectionShape::HashSet(elem) | CollectionShape::BTreeSet(elem) => {
            emit_seq_read(ident, elem, ty, reader, quote!(insert), diags)
        }
        // b. `HashMap`/`BTreeMap` → element is the 2-tuple/KeyValuePair
        // case: read each pair, `.insert(k, v)`.
        CollectionShape::HashMap(key_ty, value_ty) | CollectionShape::BTreeMap(key_ty, value_ty) => {
            emit_map_read(ident, key_ty, value_ty, ty, reader, diags)
        }
        // d./e. Unrecognized single-param wrapper, or the canonical
        // enumerable interface.
        CollectionShape::Enumerable { elem, wrapper, is_trait_object } => {
            emit_enumerable_read(ident, elem, wrapper, *is_trait_object, reader, diags)
        }
    }
}

fn emit_seq_read(
    ident: &Ident,
    elem_ty: &Type,
    collection_ty: &Type,
    reader: &Ident,
    insert_method: TokenStream,
    diags: &mut Diagnostics,
) -> TokenStream {
    let count_ident = format_ident!("{}_count", ident);
    let elem_ident = format_ident!("{}_elem", ident);
    let acc_ident = format_ident!("{}_acc", ident);
    let elem_read = emit_read(&elem_ident, elem_ty, false, reader, diags);
    let body = quote! {
        let #count_ident = #reader.read_i32()?;
        let mut #acc_ident: #collection_ty = ::std::default::Default::default();
        for _ in 0..#count_ident {
            #elem_read
            #acc_ident.#insert_method(#elem_ident);
        }
        #acc_ident
    };
    tagged_let(ident, reader, body)
}

fn emit_map_read(
    ident: &Ident,
    key_ty: &Type,
    value_ty: &Type,
    map_ty: &Type,
    reader: &Ident,
    diags: &mut Diagnostics,
) -> TokenStream {
    let count_ident = format_ident!("{}_count", ident);
    let key_ident = format_ident!("{}_key", ident);
    let value_ident = format_ident!("{}_value", ident);
    let acc_ident = format_ident!("{}_acc", ident);
    let key_read = emit_read(&key_ident, key_ty, false, reader, diags);
    let value_read = emit_read(&value_ident, value_ty, false, reader, diags);
    let body = quote! {
        let #count_ident = #reader.read_i32()?;
        let mut #acc_ident: #map_ty = ::std::default::Default::default();
        for _ in 0..#count_ident {
            #key_read
            #value_read
            #acc_ident.insert(#key_ident, #value_ident);
        }
        #acc_ident
    };
    tagged_let(ident, reader, body)
}

fn emit_enumerable_read(
    ident: &Ident,
    elem_ty: &Type,
    wrapper_ty: &Type,
    is_trait_object: bool,
    reader: &Ident,
    diags: &mut Diagnostics,
) -> TokenStream {
    let count_ident = format_ident!("{}_count", ident);
    let elem_ident = format_ident!("{}_elem", ident);
    let items_ident = format_ident!("{}_items", ident);
    let elem_read = emit_read(&elem_ident, elem_ty, false, reader, diags);
    let construct = if is_trait_object {
        quote! { ::std::boxed::Box::new(#items_ident.into_iter()) }
    } else {
        quote! { <#wrapper_ty as ::std::convert::From<::std::vec::Vec<#elem_ty>>>::from(#items_ident) }
    };
    let body = quote! {
        let #count_ident = #reader.read_i32()?;
        let mut #items_ident: ::std::vec::Vec<#elem_ty> = ::std::vec::Vec::with_capacity(#count_ident.max(0) as usize);
        for _ in 0..#count_ident {
            #elem_read
            #items_ident.push(#elem_ident);
        }
        #construct
    };
    tagged_let(ident, reader, body)
}
