// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property Filter (C4): which fields are included in a generated `pack`/
//! `unpack`, and in which role.
//!
//! Rust structs have no indexers, no write-only properties, and no
//! accessibility modifier narrower than the struct itself at the point a
//! derive macro expands in the same module — the "publicly accessible /
//! not an indexer / not write-only" clauses this filter historically
//! applies are vacuously true for ordinary named fields here, so they are
//! asserted, not computed.

use syn::{Field, FieldsNamed};

/// Parsed `#[packable(...)]` attributes for one field.
#[derive(Default, Clone)]
pub struct FieldAttrs {
    pub ignore_read: bool,
    pub ignore_write: bool,
    /// Always include this field when writing, even if otherwise ignored.
    pub force: bool,
    /// Combined with `force`: write-only — the field is defaulted on read.
    /// The Rust realization of a `readonly` field paired with `Force`.
    pub skip_read: bool,
    /// This field holds the data an inherited type would have packed;
    /// pack/unpack delegate to it before any other field.
    pub base: bool,
    /// Requires `fn as_i32(self) -> i32` / `fn from_i32(v: i32) -> Self`
    /// inherent methods on the field's type, since `syn` cannot otherwise
    /// tell an arbitrary `Type::Path` is a fieldless enum.
    pub enum_field: bool,
}

impl FieldAttrs {
    pub fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs::default();
        for attr in attrs {
            if !attr.path().is_ident("packable") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    if meta.input.peek(syn::Token![=]) {
                        let value = meta.value()?.parse::<syn::LitStr>()?;
                        match value.value().as_str() {
                            "read" => out.ignore_read = true,
                            "write" => out.ignore_write = true,
                            other => {
                                return Err(meta.error(format!("unknown ignore mode `{other}`, expected \"read\" or \"write\"")))
                            }
                        }
                    } else {
                        out.ignore_read = true;
                        out.ignore_write = true;
                    }
                    Ok(())
                } else if meta.path.is_ident("force") {
                    out.force = true;
                    Ok(())
                } else if meta.path.is_ident("skip_read") {
                    out.skip_read = true;
                    Ok(())
                } else if meta.path.is_ident("base") {
                    out.base = true;
                    Ok(())
                } else if meta.path.is_ident("enum_field") {
                    out.enum_field = true;
                    Ok(())
                } else {
                    Err(meta.error("unrecognized `packable` attribute"))
                }
            })?;
        }
        Ok(out)
    }

    /// Included iff: not ignored for write, always when `force`.
    pub fn included_in_write(&self) -> bool {
        self.force || !self.ignore_write
    }

    /// Included iff: not ignored for read, and not the write-only
    /// `force` + `skip_read` combination — which is silently defaulted.
    pub fn included_in_read(&self) -> bool {
        if self.force && self.skip_read {
            return false;
        }
        self.force || !self.ignore_read
    }
}

/// A struct's fields split into the at-most-one `#[packable(base)]`
/// delegate and its own fields, each with parsed attributes, in the
/// textual declaration order `syn::Fields::Named` already gives us.
pub struct ClassifiedFields<'a> {
    pub base: Option<&'a Field>,
    pub own: Vec<(&'a Field, FieldAttrs)>,
}

pub fn classify_fields(fields: &FieldsNamed) -> syn::Result<ClassifiedFields<'_>> {
    let mut base = None;
    let mut own = Vec::new();
    for field in &fields.named {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.base {
            if base.is_some() {
                return Err(syn::Error::new_spanned(field, "at most one #[packable(base)] field is allowed"));
            }
            base = Some(field);
            continue;
        }
        own.push((field, attrs));
    }
    Ok(ClassifiedFields { base, own })
}
