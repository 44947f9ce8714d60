// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `Packable` trait and the built-in implementations generated code
//! recurses into: primitives, `Option<T>`, fixed arrays, the recognized
//! collection shapes, tuples of arity 1..=7, and the `SystemTime`/`Duration`
//! "known composite" strategies from `spec.md` §4.6.
//!
//! Arrays and every collection shape here are reference composites: each
//! carries a leading presence `bool`, always `true`, ahead of its length
//! prefix (`spec.md` §4.3 rule 5 / §6's `RefComp` wire entry) — the same
//! tag the derive engine emits for a struct field of one of these types.

use crate::error::{Error, Result};
use crate::io::{Reader, Writer};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A type that can be serialized to and deserialized from the packwire
/// wire format.
///
/// `#[derive(packwire_derive::Packable)]` implements this trait for
/// user structs; this module implements it for every type the generator's
/// Default Strategies Registry and primitive/collection rules recognize.
pub trait Packable: Sized {
    fn pack(&self, writer: &mut Writer) -> Result<()>;
    fn unpack(reader: &mut Reader) -> Result<Self>;
}

macro_rules! impl_packable_numeric {
    ($ty:ty, $write:ident, $read:ident) => {
        impl Packable for $ty {
            fn pack(&self, writer: &mut Writer) -> Result<()> {
                writer.$write(*self);
                Ok(())
            }

            fn unpack(reader: &mut Reader) -> Result<Self> {
                reader.$read()
            }
        }
    };
}

impl_packable_numeric!(bool, write_bool, read_bool);
impl_packable_numeric!(i8, write_i8, read_i8);
impl_packable_numeric!(i16, write_i16, read_i16);
impl_packable_numeric!(i32, write_i32, read_i32);
impl_packable_numeric!(i64, write_i64, read_i64);
impl_packable_numeric!(u8, write_u8, read_u8);
impl_packable_numeric!(u16, write_u16, read_u16);
impl_packable_numeric!(u32, write_u32, read_u32);
impl_packable_numeric!(u64, write_u64, read_u64);
impl_packable_numeric!(f32, write_f32, read_f32);
impl_packable_numeric!(f64, write_f64, read_f64);
impl_packable_numeric!(char, write_char, read_char);

// `String` is the one reference-typed primitive (spec.md §4.1). Rust's
// `String` can never be null, so the throw-guard rule 3 describes is
// unreachable; the presence byte it used to gate is kept unconditionally
// (always `0x01`) so the wire shape matches spec.md §8 scenario 1 exactly.
impl Packable for String {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        writer.write_str(self)
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        let present = reader.read_bool()?;
        debug_assert!(present, "String is never null; presence tag is always true");
        reader.read_str()
    }
}

// Nullable wrapper (spec.md §4.3 rule 1 / §4.4 step 1).
impl<T: Packable> Packable for Option<T> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.pack(writer)
            }
            None => {
                writer.write_bool(false);
                Ok(())
            }
        }
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        if reader.read_bool()? {
            Ok(Some(T::unpack(reader)?))
        } else {
            Ok(None)
        }
    }
}

fn write_len(writer: &mut Writer, len: usize) -> Result<()> {
    let len = i32::try_from(len)
        .map_err(|_| Error::InvalidLength { offset: writer.offset(), value: len as i64 })?;
    writer.write_i32(len);
    Ok(())
}

fn read_len(reader: &mut Reader) -> Result<usize> {
    let len = reader.read_i32()?;
    usize::try_from(len).map_err(|_| Error::InvalidLength { offset: reader.offset(), value: i64::from(len) })
}

// `[T; N]` (spec.md §4.3 rule 6 / §4.4 step 6). The generator special-cases
// `[u8; N]`/`Vec<u8>` fields with a single buffered read/write instead of
// an element-by-element loop (see packwire-derive), but that is a
// wire-compatible codegen optimization, not a different trait impl: a
// byte-by-byte loop and a buffered copy produce identical bytes, so one
// generic impl covers every element type without the overlapping-impl
// conflict a separate `[u8; N]` specialization would hit on stable Rust.
// An array is a reference composite (spec.md §4.3 rule 5's closing bullet,
// which rule 6 inherits): wrapped in the same `written:bool` presence tag
// as a collection, always `true` here since a bare `[T; N]` can't itself
// be absent outside an `Option` guard.
impl<T: Packable, const N: usize> Packable for [T; N] {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        write_len(writer, N)?;
        for item in self {
            item.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        let present = reader.read_bool()?;
        debug_assert!(present, "packwire: reference composite fields always write a present byte");
        let len = read_len(reader)?;
        if len != N {
            return Err(Error::InvalidLength { offset: reader.offset(), value: len as i64 });
        }
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::unpack(reader)?);
        }
        match items.try_into() {
            Ok(array) => Ok(array),
            Err(_) => unreachable!("loop above pushes exactly N items"),
        }
    }
}

/// Reads and checks the presence tag a reference-composite write always
/// sets to `true` (spec.md §4.3 rule 5's closing bullet / §6's `RefComp`
/// wire entry).
fn read_ref_comp_tag(reader: &mut Reader) -> Result<()> {
    let present = reader.read_bool()?;
    debug_assert!(present, "packwire: reference composite fields always write a present byte");
    Ok(())
}

macro_rules! impl_packable_seq {
    ($container:ty, $push:ident) => {
        impl<T: Packable> Packable for $container {
            fn pack(&self, writer: &mut Writer) -> Result<()> {
                writer.write_bool(true);
                write_len(writer, self.len())?;
                for item in self {
                    item.pack(writer)?;
                }
                Ok(())
            }

            fn unpack(reader: &mut Reader) -> Result<Self> {
                read_ref_comp_tag(reader)?;
                let len = read_len(reader)?;
                let mut out = Self::default();
                for _ in 0..len {
                    out.$push(T::unpack(reader)?);
                }
                Ok(out)
            }
        }
    };
}

// `Vec<T>` / `VecDeque<T>`: both recognized via the `push(elem)` insertion
// case (spec.md §4.4 case a). `Vec<u8>` is the array-shaped primitive
// spec.md §4.1 calls out ("arrays of bytes ... are primitives too, but at
// the array level"); the generator emits a single buffered write for it,
// which this element-by-element loop reproduces byte-for-byte. Both are
// reference composites, carrying the same presence tag an array does.
impl<T: Packable> Packable for Vec<T> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        write_len(writer, self.len())?;
        for item in self {
            item.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        read_ref_comp_tag(reader)?;
        let len = read_len(reader)?;
        let mut out = Vec::with_capacity(len.min(1 << 20));
        for _ in 0..len {
            out.push(T::unpack(reader)?);
        }
        Ok(out)
    }
}

impl_packable_seq!(VecDeque<T>, push_back);

// `HashSet<T>` / `BTreeSet<T>`: recognized via the `insert(elem)`
// insertion case (spec.md §4.4 case a, the `push`/`insert(elem)` family).
impl<T: Packable + Eq + Hash> Packable for HashSet<T> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        write_len(writer, self.len())?;
        for item in self {
            item.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        read_ref_comp_tag(reader)?;
        let len = read_len(reader)?;
        let mut out = HashSet::with_capacity(len.min(1 << 20));
        for _ in 0..len {
            out.insert(T::unpack(reader)?);
        }
        Ok(out)
    }
}

impl<T: Packable + Ord> Packable for BTreeSet<T> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        write_len(writer, self.len())?;
        for item in self {
            item.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        read_ref_comp_tag(reader)?;
        let len = read_len(reader)?;
        let mut out = BTreeSet::new();
        for _ in 0..len {
            out.insert(T::unpack(reader)?);
        }
        Ok(out)
    }
}

// `HashMap<K, V>` / `BTreeMap<K, V>`: element type is the (K, V) pair
// case; read each pair into a transient tuple then `insert(k, v)`
// (spec.md §4.4 case b, with the Tuple-arity-2 strategy standing in for
// KeyValuePair<K,V> per the merge recorded in SPEC_FULL.md §6).
impl<K: Packable + Eq + Hash, V: Packable> Packable for HashMap<K, V> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        write_len(writer, self.len())?;
        for (key, value) in self {
            key.pack(writer)?;
            value.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        read_ref_comp_tag(reader)?;
        let len = read_len(reader)?;
        let mut out = HashMap::with_capacity(len.min(1 << 20));
        for _ in 0..len {
            let key = K::unpack(reader)?;
            let value = V::unpack(reader)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

impl<K: Packable + Ord, V: Packable> Packable for BTreeMap<K, V> {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        writer.write_bool(true);
        write_len(writer, self.len())?;
        for (key, value) in self {
            key.pack(writer)?;
            value.pack(writer)?;
        }
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        read_ref_comp_tag(reader)?;
        let len = read_len(reader)?;
        let mut out = BTreeMap::new();
        for _ in 0..len {
            let key = K::unpack(reader)?;
            let value = V::unpack(reader)?;
            out.insert(key, value);
        }
        Ok(out)
    }
}

macro_rules! impl_packable_tuple {
    ($($idx:tt => $name:ident),+) => {
        impl<$($name: Packable),+> Packable for ($($name,)+) {
            fn pack(&self, writer: &mut Writer) -> Result<()> {
                $(self.$idx.pack(writer)?;)+
                Ok(())
            }

            fn unpack(reader: &mut Reader) -> Result<Self> {
                Ok(($($name::unpack(reader)?,)+))
            }
        }
    };
}

// Tuple strategies of arity 1..=7 (spec.md §4.6). A bare 2-tuple also
// serves as the KeyValuePair<K,V> strategy: HashMap/BTreeMap iteration
// already yields `(K, V)` tuples, so there is no separate pair type to
// register (SPEC_FULL.md §6).
impl_packable_tuple!(0 => A);
impl_packable_tuple!(0 => A, 1 => B);
impl_packable_tuple!(0 => A, 1 => B, 2 => C);
impl_packable_tuple!(0 => A, 1 => B, 2 => C, 3 => D);
impl_packable_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_packable_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_packable_tuple!(0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);

// SystemTime / Duration (spec.md §4.6's DateTime / TimeSpan strategies):
// both write/read a 64-bit tick count.
impl Packable for SystemTime {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        let nanos = self
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::InvalidLength { offset: writer.offset(), value: -1 })?
            .as_nanos();
        let nanos = i64::try_from(nanos)
            .map_err(|_| Error::InvalidLength { offset: writer.offset(), value: nanos as i64 })?;
        writer.write_i64(nanos);
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        let nanos = reader.read_i64()?;
        if nanos < 0 {
            return Err(Error::InvalidLength { offset: reader.offset(), value: nanos });
        }
        Ok(UNIX_EPOCH + Duration::from_nanos(nanos as u64))
    }
}

impl Packable for Duration {
    fn pack(&self, writer: &mut Writer) -> Result<()> {
        let nanos = i64::try_from(self.as_nanos())
            .map_err(|_| Error::InvalidLength { offset: writer.offset(), value: -1 })?;
        writer.write_i64(nanos);
        Ok(())
    }

    fn unpack(reader: &mut Reader) -> Result<Self> {
        let nanos = reader.read_i64()?;
        if nanos < 0 {
            return Err(Error::InvalidLength { offset: reader.offset(), value: nanos });
        }
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Packable + PartialEq + std::fmt::Debug>(value: T) {
        let mut writer = Writer::new();
        value.pack(&mut writer).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = Reader::new(&bytes);
        assert_eq!(T::unpack(&mut reader).unwrap(), value);
        assert!(reader.is_eof());
    }

    #[test]
    fn option_idempotence_matches_spec_wire_shape() {
        let mut writer = Writer::new();
        None::<i32>.pack(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), vec![0x00]);

        let mut writer = Writer::new();
        Some(5_i32).pack(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), vec![0x01, 0x05, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn list_of_int_matches_spec_scenario_3() {
        let mut writer = Writer::new();
        vec![1_i32, 2, 3].pack(&mut writer).unwrap();
        assert_eq!(
            writer.into_bytes(),
            vec![0x01, 0x03, 0, 0, 0, 0x01, 0, 0, 0, 0x02, 0, 0, 0, 0x03, 0, 0, 0]
        );
    }

    #[test]
    fn byte_array_matches_spec_scenario_5() {
        let mut writer = Writer::new();
        vec![0xAA_u8, 0xBB].pack(&mut writer).unwrap();
        assert_eq!(writer.into_bytes(), vec![0x01, 0x02, 0, 0, 0, 0xAA, 0xBB]);
    }

    #[test]
    fn roundtrips() {
        roundtrip(7_i32);
        roundtrip(true);
        roundtrip("hi".to_string());
        roundtrip(Some(5_i32));
        roundtrip(None::<i32>);
        roundtrip(vec![1_i32, 2, 3]);
        roundtrip((1_i32, "two".to_string(), 3.0_f64));
        roundtrip(Duration::from_millis(1500));
    }

    #[test]
    fn hashmap_roundtrip() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1_i32);
        map.insert("b".to_string(), 2_i32);
        roundtrip(map);
    }
}
