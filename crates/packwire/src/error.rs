// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type for pack/unpack operations.

use std::fmt;

/// Result type for pack/unpack operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced while packing or unpacking a [`crate::Packable`] type.
#[derive(Debug, Clone)]
pub enum Error {
    /// The destination buffer ran out of room while writing.
    WriteOverflow { offset: usize, needed: usize },
    /// The source buffer ran out of bytes while reading.
    UnexpectedEof { offset: usize, needed: usize },
    /// A length prefix read back a negative or implausible value.
    InvalidLength { offset: usize, value: i64 },
    /// Bytes did not form valid UTF-8 where a `String` was expected.
    InvalidUtf8 { offset: usize },
    /// A field's declared shape cannot be packed or unpacked.
    ///
    /// Carries the same stable diagnostic id the generator also reported
    /// to the compiler at generation time (`SerializationMarking`,
    /// `InterfaceProperties`, `MissingPackingMethod`, `EnumerableProperties`).
    UnsupportedShape { id: &'static str, message: String },
    /// A gateway-level failure (handler missing, request timed out, ...).
    Gateway(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WriteOverflow { offset, needed } => {
                write!(f, "write overflow at offset {offset}: needed {needed} more bytes")
            }
            Error::UnexpectedEof { offset, needed } => {
                write!(f, "unexpected end of buffer at offset {offset}: needed {needed} more bytes")
            }
            Error::InvalidLength { offset, value } => {
                write!(f, "invalid length prefix at offset {offset}: {value}")
            }
            Error::InvalidUtf8 { offset } => {
                write!(f, "invalid UTF-8 in string starting at offset {offset}")
            }
            Error::UnsupportedShape { id, message } => write!(f, "[{id}] {message}"),
            Error::Gateway(message) => write!(f, "gateway error: {message}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        assert_eq!(
            Error::WriteOverflow { offset: 4, needed: 2 }.to_string(),
            "write overflow at offset 4: needed 2 more bytes"
        );
        assert_eq!(
            Error::UnsupportedShape { id: "InterfaceProperties", message: "bare interface".into() }
                .to_string(),
            "[InterfaceProperties] bare interface"
        );
    }
}
