// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! CodeWriter (C2): accumulates `TokenStream` fragments in declaration
//! order instead of writing indented text to a buffer.
//!
//! `quote!`'s own brace-matching gives the "a block always closes, on every
//! exit path" guarantee a textual writer has to earn by hand: a token-tree
//! group can't be emitted half-open. `block` runs a closure against a fresh
//! fragment buffer and splices the result into one `{ #(#body)* }` group.

use proc_macro2::TokenStream;
use quote::quote;

#[derive(Default)]
pub struct CodeWriter {
    fragments: Vec<TokenStream>,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: TokenStream) {
        self.fragments.push(fragment);
    }

    /// Run `body` against a fresh buffer and append its result as one
    /// braced block — the one-shared-close-marker behavior a dispatch that
    /// opens several conditional branches still needs only once.
    pub fn block(&mut self, body: impl FnOnce(&mut CodeWriter)) {
        let mut inner = CodeWriter::new();
        body(&mut inner);
        let stmts = inner.finish();
        self.fragments.push(quote! { { #stmts } });
    }

    pub fn finish(self) -> TokenStream {
        let fragments = self.fragments;
        quote! { #(#fragments)* }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_always_closes_with_one_group() {
        let mut writer = CodeWriter::new();
        writer.push(quote! { let a = 1; });
        writer.block(|inner| {
            inner.push(quote! { let b = 2; });
            inner.push(quote! { let c = 3; });
        });
        writer.push(quote! { let d = 4; });
        let tokens = writer.finish().to_string();
        assert!(tokens.contains("let a"));
        assert!(tokens.contains("{ let b"));
        assert!(tokens.contains("let d"));
    }
}
