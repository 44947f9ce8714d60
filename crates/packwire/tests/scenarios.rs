// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end `#[derive(Packable)]` scenarios, one per field shape.

use packwire::{Packable, Reader, Writer};

fn roundtrip<T: Packable + PartialEq + std::fmt::Debug>(value: T) -> T {
    let mut writer = Writer::new();
    value.pack(&mut writer).unwrap();
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    let decoded = T::unpack(&mut reader).unwrap();
    assert!(reader.is_eof(), "reader left with unconsumed bytes");
    decoded
}

#[derive(Packable, Debug, PartialEq)]
struct ImageMeta {
    width: i32,
    format: String,
}

#[test]
fn scenario_a_int_and_string() {
    let meta = ImageMeta { width: 1920, format: "png".to_string() };
    assert_eq!(roundtrip(meta), ImageMeta { width: 1920, format: "png".to_string() });
}

#[derive(Packable, Debug, PartialEq)]
struct MaybeCount {
    count: Option<i32>,
}

#[test]
fn scenario_b_nullable_int() {
    assert_eq!(roundtrip(MaybeCount { count: Some(5) }), MaybeCount { count: Some(5) });
    assert_eq!(roundtrip(MaybeCount { count: None }), MaybeCount { count: None });
}

#[derive(Packable, Debug, PartialEq)]
struct Histogram {
    buckets: Vec<i32>,
}

#[test]
fn scenario_c_list_of_int() {
    let histogram = Histogram { buckets: vec![1, 1, 2, 3, 5, 8] };
    assert_eq!(roundtrip(Histogram { buckets: histogram.buckets.clone() }), histogram);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    fn as_i32(self) -> i32 {
        self as i32
    }

    fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::Clubs,
            1 => Self::Diamonds,
            2 => Self::Hearts,
            _ => Self::Spades,
        }
    }
}

#[derive(Packable, Debug, PartialEq)]
struct Card {
    #[packable(enum_field)]
    suit: Suit,
    rank: u8,
}

#[test]
fn scenario_d_enum_field() {
    let card = Card { suit: Suit::Hearts, rank: 12 };
    assert_eq!(roundtrip(Card { suit: card.suit, rank: card.rank }), card);
}

#[derive(Packable, Debug, PartialEq)]
struct Thumbnail {
    pixels: [u8; 4],
}

#[test]
fn scenario_e_byte_array() {
    let thumb = Thumbnail { pixels: [0xDE, 0xAD, 0xBE, 0xEF] };
    assert_eq!(roundtrip(Thumbnail { pixels: thumb.pixels }), thumb);
}

#[derive(Packable, Debug, PartialEq)]
struct Base {
    id: u32,
}

#[derive(Packable, Debug, PartialEq)]
struct Derived {
    #[packable(base)]
    parent: Base,
    extra: i32,
}

#[test]
fn scenario_h_inheritance_via_base_field() {
    let derived = Derived { parent: Base { id: 7 }, extra: -3 };
    assert_eq!(roundtrip(Derived { parent: Base { id: 7 }, extra: -3 }), derived);

    // The base type's own wire shape is a prefix of the derived type's:
    // pack/unpack delegate to it first, then emit only the remaining fields.
    let mut writer = Writer::new();
    derived.pack(&mut writer).unwrap();
    let bytes = writer.into_bytes();
    let mut reader = Reader::new(&bytes);
    let base = Base::unpack(&mut reader).unwrap();
    assert_eq!(base, Base { id: 7 });
    assert_eq!(i32::unpack(&mut reader).unwrap(), -3);
}

#[derive(Packable, Debug, PartialEq)]
struct Settings {
    #[packable(force, skip_read)]
    audit_note: String,
    retries: u8,
}

#[test]
fn force_write_only_field_is_defaulted_on_read() {
    let settings = Settings { audit_note: "applied by admin".to_string(), retries: 3 };
    let mut writer = Writer::new();
    settings.pack(&mut writer).unwrap();
    let bytes = writer.into_bytes();
    assert!(!bytes.is_empty());

    let mut reader = Reader::new(&bytes);
    let decoded = Settings::unpack(&mut reader).unwrap();
    assert_eq!(decoded.audit_note, String::default());
    assert_eq!(decoded.retries, 3);
}

#[derive(Packable, Debug, PartialEq)]
struct Scoreboard {
    entries: std::collections::HashMap<String, i32>,
}

#[test]
fn map_field_roundtrips() {
    let mut entries = std::collections::HashMap::new();
    entries.insert("alice".to_string(), 10);
    entries.insert("bob".to_string(), 20);
    assert_eq!(
        roundtrip(Scoreboard { entries: entries.clone() }),
        Scoreboard { entries }
    );
}

#[derive(Packable, Debug, PartialEq)]
struct EventLog {
    recent: std::collections::VecDeque<i32>,
    tags: std::collections::BTreeSet<String>,
    totals: std::collections::BTreeMap<String, i64>,
}

#[test]
fn deque_set_and_btreemap_fields_roundtrip() {
    let mut recent = std::collections::VecDeque::new();
    recent.push_back(1);
    recent.push_back(2);
    recent.push_back(3);

    let mut tags = std::collections::BTreeSet::new();
    tags.insert("urgent".to_string());
    tags.insert("billing".to_string());

    let mut totals = std::collections::BTreeMap::new();
    totals.insert("usd".to_string(), 4200);
    totals.insert("eur".to_string(), 3100);

    let log = EventLog { recent, tags, totals };
    assert_eq!(
        roundtrip(EventLog {
            recent: log.recent.clone(),
            tags: log.tags.clone(),
            totals: log.totals.clone(),
        }),
        log
    );
}

#[derive(Packable, Debug, PartialEq)]
struct AuditedRecord {
    #[packable(ignore = "read")]
    computed_once: i32,
    id: u32,
}

#[test]
fn ignore_read_subflag_still_writes_but_defaults_on_read() {
    let record = AuditedRecord { computed_once: 7, id: 1 };
    let mut writer = Writer::new();
    record.pack(&mut writer).unwrap();
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 4 + 4, "computed_once is still on the wire");

    let mut reader = Reader::new(&bytes);
    let decoded = AuditedRecord::unpack(&mut reader).unwrap();
    assert_eq!(decoded.computed_once, i32::default());
    assert_eq!(decoded.id, 1);
    assert!(reader.is_eof());
}
