// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Symbol Utilities (C1): classify a `syn::Type` purely by its syntax.
//!
//! There is no semantic model available to a proc-macro — `syn` hands us
//! the parsed shape of the annotated item and nothing else. Every function
//! here recognizes a type by matching the last path segment's identifier
//! string, never by resolving a real trait bound.

use syn::{GenericArgument, PathArguments, Type, TypeParamBound};

/// The syntactic shape of a recognized collection-like field type.
pub enum CollectionShape {
    Vec(Type),
    VecDeque(Type),
    HashSet(Type),
    BTreeSet(Type),
    HashMap(Type, Type),
    BTreeMap(Type, Type),
    /// Any other single-type-param generic wrapper, or a bare
    /// `dyn Iterator<Item = T>` / `Box<dyn Iterator<Item = T>>`. Both are
    /// the canonical "enumerable-of-T" interface case.
    Enumerable { elem: Type, wrapper: Type, is_trait_object: bool },
}

pub fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(p) => p.path.segments.last(),
        _ => None,
    }
}

fn ident_str(ty: &Type) -> Option<String> {
    last_segment(ty).map(|s| s.ident.to_string())
}

/// Registry lookup key: last path segment plus a generic-arity suffix for
/// multi-param generics (e.g. `HashMap\`2`), or `Tuple\`N` for an N-ary
/// tuple type — `syn` represents `(A, B)` as `Type::Tuple`, not a path.
pub fn qualified_key(ty: &Type) -> String {
    match ty {
        Type::Tuple(tuple) => format!("Tuple`{}", tuple.elems.len()),
        Type::Path(p) => {
            let Some(seg) = p.path.segments.last() else { return "Unknown".to_string() };
            let arity = match &seg.arguments {
                PathArguments::AngleBracketed(args) => args.args.len(),
                _ => 0,
            };
            if arity > 1 {
                format!("{}`{}", seg.ident, arity)
            } else {
                seg.ident.to_string()
            }
        }
        _ => "Unknown".to_string(),
    }
}

/// bool, i8/16/32/64, u8/16/32/64, f32/f64, char, String. Rust has no
/// boxed-`object` catch-all; see `SPEC_FULL.md` §9 for how that edge case
/// is preserved as an Open Question resolution.
pub fn is_primitive(ty: &Type) -> bool {
    matches!(
        ident_str(ty).as_deref(),
        Some(
            "bool" | "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "f32" | "f64"
                | "char" | "String"
        )
    )
}

/// `Option<T>` → the inner `T`, the Rust realization of a nullable wrapper.
pub fn option_inner(ty: &Type) -> Option<Type> {
    if ident_str(ty).as_deref() != Some("Option") {
        return None;
    }
    single_type_arg(last_segment(ty)?)
}

fn single_type_arg(seg: &syn::PathSegment) -> Option<Type> {
    let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
    args.args.iter().find_map(|a| match a {
        GenericArgument::Type(t) => Some(t.clone()),
        _ => None,
    })
}

fn two_type_args(seg: &syn::PathSegment) -> Option<(Type, Type)> {
    let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
    let mut types = args.args.iter().filter_map(|a| match a {
        GenericArgument::Type(t) => Some(t.clone()),
        _ => None,
    });
    Some((types.next()?, types.next()?))
}

/// `Item = T` out of a `dyn Iterator<Item = T>` trait-object bound.
fn iterator_item_type(ty: &Type) -> Option<Type> {
    let bounds = match ty {
        Type::TraitObject(obj) => &obj.bounds,
        _ => return None,
    };
    for bound in bounds {
        let TypeParamBound::Trait(trait_bound) = bound else { continue };
        let Some(seg) = trait_bound.path.segments.last() else { continue };
        if seg.ident != "Iterator" {
            continue;
        }
        let PathArguments::AngleBracketed(args) = &seg.arguments else { continue };
        for arg in &args.args {
            if let GenericArgument::AssocType(assoc) = arg {
                if assoc.ident == "Item" {
                    return Some(assoc.ty.clone());
                }
            }
        }
    }
    None
}

fn boxed_trait_object(ty: &Type) -> Option<&Type> {
    let seg = last_segment(ty)?;
    if seg.ident != "Box" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else { return None };
    args.args.iter().find_map(|a| match a {
        GenericArgument::Type(inner @ Type::TraitObject(_)) => Some(inner),
        _ => None,
    })
}

/// Replaces member enumeration + `has-method` cascades with syntactic
/// recognition of the well-known sequence/set/map shapes, and the
/// canonical enumerable-interface fallback for anything else.
pub fn detect_collection(ty: &Type) -> Option<CollectionShape> {
    if let Type::TraitObject(_) = ty {
        let elem = iterator_item_type(ty)?;
        return Some(CollectionShape::Enumerable { elem, wrapper: ty.clone(), is_trait_object: true });
    }

    let seg = last_segment(ty)?;
    match seg.ident.to_string().as_str() {
        "Vec" => Some(CollectionShape::Vec(single_type_arg(seg)?)),
        "VecDeque" => Some(CollectionShape::VecDeque(single_type_arg(seg)?)),
        "HashSet" => Some(CollectionShape::HashSet(single_type_arg(seg)?)),
        "BTreeSet" => Some(CollectionShape::BTreeSet(single_type_arg(seg)?)),
        "HashMap" => {
            let (k, v) = two_type_args(seg)?;
            Some(CollectionShape::HashMap(k, v))
        }
        "BTreeMap" => {
            let (k, v) = two_type_args(seg)?;
            Some(CollectionShape::BTreeMap(k, v))
        }
        "Option" => None,
        "Box" => {
            let inner = boxed_trait_object(ty)?;
            let elem = iterator_item_type(inner)?;
            Some(CollectionShape::Enumerable { elem, wrapper: ty.clone(), is_trait_object: true })
        }
        _ => {
            let elem = single_type_arg(seg)?;
            Some(CollectionShape::Enumerable { elem, wrapper: ty.clone(), is_trait_object: false })
        }
    }
}

/// A `dyn Trait` / `Box<dyn Trait>` that is *not* the canonical enumerable
/// interface — the Rust analogue of a bare, non-enumerable interface field.
pub fn is_bare_trait_object(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) => iterator_item_type(ty).is_none(),
        Type::Path(_) => match boxed_trait_object(ty) {
            Some(inner) => iterator_item_type(inner).is_none(),
            None => false,
        },
        _ => false,
    }
}

/// Raw pointers, function pointers, `impl Trait`, and inferred types have no
/// packing strategy syntax could ever recognize.
pub fn is_unsupported_shape(ty: &Type) -> bool {
    matches!(ty, Type::Ptr(_) | Type::BareFn(_) | Type::ImplTrait(_) | Type::Infer(_) | Type::Never(_))
}
