/***************************************************************************************************
 * Copyright (c) 2023, 2024 Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all copies or
 * substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * Test cases from RFC8949 for the data item parser
 *
 * Test cases from RFC8949, Appendix A, driven through the CBOR parser and a recording receiver.
 **************************************************************************************************/

extern crate unibor;

use half::f16;

use unibor::decoder::{CborParser, DecodeConfig, Parser};
use unibor::error::Error;
use unibor::io::SliceInput;
use unibor::types::{ItemKind, Receiver, Tag};
use unibor::Result;

/// An owned mirror of one receiver callback, recorded for comparison.
#[derive(Debug, Clone, PartialEq)]
enum Item {
    Null,
    Undefined,
    Bool(bool),
    Int(i32),
    Long(i64),
    OverLong(bool, u64),
    Float16(f32),
    Float(f32),
    Double(f64),
    Simple(u8),
    Bytes(Vec<u8>),
    BytesStart,
    Text(String),
    TextStart,
    ArrayHeader(u64),
    ArrayStart,
    MapHeader(u64),
    MapStart,
    Break,
    Tagged(Tag),
    EndOfInput,
}

#[derive(Debug, Default)]
struct Recorder {
    items: Vec<Item>,
}

impl Receiver for Recorder {
    fn on_null(&mut self) -> Result<()> {
        self.items.push(Item::Null);
        Ok(())
    }

    fn on_undefined(&mut self) -> Result<()> {
        self.items.push(Item::Undefined);
        Ok(())
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.items.push(Item::Bool(value));
        Ok(())
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        self.items.push(Item::Int(value));
        Ok(())
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        self.items.push(Item::Long(value));
        Ok(())
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.items.push(Item::OverLong(negative, magnitude));
        Ok(())
    }

    fn on_float16(&mut self, value: f16) -> Result<()> {
        self.items.push(Item::Float16(f32::from(value)));
        Ok(())
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        self.items.push(Item::Float(value));
        Ok(())
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        self.items.push(Item::Double(value));
        Ok(())
    }

    fn on_number_string(&mut self, value: &str) -> Result<()> {
        self.items.push(Item::Text(value.to_owned()));
        Ok(())
    }

    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        self.items.push(Item::Simple(value));
        Ok(())
    }

    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.items.push(Item::Bytes(value.to_vec()));
        Ok(())
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        self.items.push(Item::BytesStart);
        Ok(())
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        self.items.push(Item::Text(value.to_owned()));
        Ok(())
    }

    fn on_text_start(&mut self) -> Result<()> {
        self.items.push(Item::TextStart);
        Ok(())
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.items.push(Item::ArrayHeader(length));
        Ok(())
    }

    fn on_array_start(&mut self) -> Result<()> {
        self.items.push(Item::ArrayStart);
        Ok(())
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        self.items.push(Item::MapHeader(length));
        Ok(())
    }

    fn on_map_start(&mut self) -> Result<()> {
        self.items.push(Item::MapStart);
        Ok(())
    }

    fn on_break(&mut self) -> Result<()> {
        self.items.push(Item::Break);
        Ok(())
    }

    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        self.items.push(Item::Tagged(tag));
        Ok(())
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        self.items.push(Item::EndOfInput);
        Ok(())
    }
}

/// Parse `buf` to exhaustion and return all recorded items (without the trailing EndOfInput).
fn items(buf: &[u8]) -> Vec<Item> {
    let mut parser = CborParser::new(SliceInput::new(buf));
    let mut recorder = Recorder::default();
    loop {
        match parser.read_next_data_item(&mut recorder) {
            Ok(ItemKind::EndOfInput) => break,
            Ok(_) => (),
            Err(e) => panic!("unexpected parse failure: {}", e),
        }
    }
    recorder.items.pop();
    recorder.items
}

fn single(buf: &[u8]) -> Item {
    let all = items(buf);
    assert_eq!(all.len(), 1, "expected a single item, got {:?}", all);
    all.into_iter().next().unwrap()
}

fn failure(buf: &[u8]) -> Error {
    let mut parser = CborParser::new(SliceInput::new(buf));
    let mut recorder = Recorder::default();
    loop {
        match parser.read_next_data_item(&mut recorder) {
            Ok(ItemKind::EndOfInput) => panic!("expected a failure, got {:?}", recorder.items),
            Ok(_) => (),
            Err(e) => return e,
        }
    }
}

#[test]
fn decodes_unsigned_integers() {
    assert_eq!(single(&[0x00]), Item::Int(0));
    assert_eq!(single(&[0x01]), Item::Int(1));
    assert_eq!(single(&[0x0a]), Item::Int(10));
    assert_eq!(single(&[0x17]), Item::Int(23));
    assert_eq!(single(&[0x18, 0x18]), Item::Int(24));
    assert_eq!(single(&[0x18, 0x19]), Item::Int(25));
    assert_eq!(single(&[0x18, 0x64]), Item::Int(100));
    assert_eq!(single(&[0x19, 0x03, 0xe8]), Item::Int(1000));
    assert_eq!(single(&[0x1a, 0x00, 0x0f, 0x42, 0x40]), Item::Int(1000000));
    assert_eq!(
        single(&[0x1b, 0x00, 0x00, 0x00, 0xe8, 0xd4, 0xa5, 0x10, 0x00]),
        Item::Long(1000000000000)
    );
}

#[test]
fn decodes_negative_integers() {
    assert_eq!(single(&[0x20]), Item::Int(-1));
    assert_eq!(single(&[0x29]), Item::Int(-10));
    assert_eq!(single(&[0x38, 0x63]), Item::Int(-100));
    assert_eq!(single(&[0x39, 0x03, 0xe7]), Item::Int(-1000));
    assert_eq!(single(&[0x3a, 0x7f, 0xff, 0xff, 0xff]), Item::Int(i32::MIN));
    assert_eq!(
        single(&[0x3a, 0x80, 0x00, 0x00, 0x00]),
        Item::Long(i64::from(i32::MIN) - 1)
    );
}

#[test]
fn splits_integers_on_the_signed_boundaries() {
    // Largest int, smallest long, largest long, then the overlong range.
    assert_eq!(single(&[0x1a, 0x7f, 0xff, 0xff, 0xff]), Item::Int(i32::MAX));
    assert_eq!(
        single(&[0x1a, 0x80, 0x00, 0x00, 0x00]),
        Item::Long(i64::from(i32::MAX) + 1)
    );
    assert_eq!(
        single(&[0x1b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        Item::Long(i64::MAX)
    );
    assert_eq!(
        single(&[0x1b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
        Item::OverLong(false, 1 << 63)
    );
    assert_eq!(
        single(&[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        Item::OverLong(false, u64::MAX)
    );
    // -(2^63) still fits a long; -(2^63)-1 does not.
    assert_eq!(
        single(&[0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        Item::Long(i64::MIN)
    );
    assert_eq!(
        single(&[0x3b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
        Item::OverLong(true, 1 << 63)
    );
    assert_eq!(
        single(&[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
        Item::OverLong(true, u64::MAX)
    );
}

#[test]
fn decodes_floats() {
    assert_eq!(single(&[0xf9, 0x00, 0x00]), Item::Float16(0.0));
    assert_eq!(single(&[0xf9, 0x3c, 0x00]), Item::Float16(1.0));
    assert_eq!(single(&[0xf9, 0x3e, 0x00]), Item::Float16(1.5));
    assert_eq!(single(&[0xf9, 0x7b, 0xff]), Item::Float16(65504.0));
    assert_eq!(single(&[0xf9, 0xc4, 0x00]), Item::Float16(-4.0));
    assert_eq!(
        single(&[0xf9, 0x00, 0x01]),
        Item::Float16(5.960464477539063e-8)
    );
    assert_eq!(single(&[0xf9, 0x7c, 0x00]), Item::Float16(f32::INFINITY));
    assert_eq!(
        single(&[0xfa, 0x47, 0xc3, 0x50, 0x00]),
        Item::Float(100000.0)
    );
    assert_eq!(
        single(&[0xfa, 0x7f, 0x7f, 0xff, 0xff]),
        Item::Float(3.4028234663852886e38)
    );
    assert_eq!(
        single(&[0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]),
        Item::Double(1.1)
    );
    assert_eq!(
        single(&[0xfb, 0xc0, 0x10, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66]),
        Item::Double(-4.1)
    );
}

#[test]
fn decodes_simple_values() {
    assert_eq!(single(&[0xf4]), Item::Bool(false));
    assert_eq!(single(&[0xf5]), Item::Bool(true));
    assert_eq!(single(&[0xf6]), Item::Null);
    assert_eq!(single(&[0xf7]), Item::Undefined);
    assert_eq!(single(&[0xf0]), Item::Simple(16));
    assert_eq!(single(&[0xf8, 0x20]), Item::Simple(32));
    assert_eq!(single(&[0xf8, 0xff]), Item::Simple(255));
}

#[test]
fn decodes_strings() {
    assert_eq!(single(&[0x40]), Item::Bytes(vec![]));
    assert_eq!(
        single(&[0x44, 0x01, 0x02, 0x03, 0x04]),
        Item::Bytes(vec![1, 2, 3, 4])
    );
    assert_eq!(single(&[0x60]), Item::Text(String::new()));
    assert_eq!(single(&[0x61, 0x61]), Item::Text("a".to_owned()));
    assert_eq!(
        single(&[0x64, 0x49, 0x45, 0x54, 0x46]),
        Item::Text("IETF".to_owned())
    );
    assert_eq!(single(&[0x62, 0x22, 0x5c]), Item::Text("\"\\".to_owned()));
    assert_eq!(single(&[0x62, 0xc3, 0xbc]), Item::Text("\u{00fc}".to_owned()));
    assert_eq!(
        single(&[0x63, 0xe6, 0xb0, 0xb4]),
        Item::Text("\u{6c34}".to_owned())
    );
    assert_eq!(
        single(&[0x64, 0xf0, 0x90, 0x85, 0x91]),
        Item::Text("\u{10151}".to_owned())
    );
}

#[test]
fn decodes_arrays_and_maps() {
    assert_eq!(single(&[0x80]), Item::ArrayHeader(0));
    assert_eq!(
        items(&[0x83, 0x01, 0x02, 0x03]),
        vec![
            Item::ArrayHeader(3),
            Item::Int(1),
            Item::Int(2),
            Item::Int(3)
        ]
    );
    assert_eq!(
        items(&[0x83, 0x01, 0x82, 0x02, 0x03, 0x82, 0x04, 0x05]),
        vec![
            Item::ArrayHeader(3),
            Item::Int(1),
            Item::ArrayHeader(2),
            Item::Int(2),
            Item::Int(3),
            Item::ArrayHeader(2),
            Item::Int(4),
            Item::Int(5),
        ]
    );
    assert_eq!(single(&[0xa0]), Item::MapHeader(0));
    assert_eq!(
        items(&[0xa2, 0x01, 0x02, 0x03, 0x04]),
        vec![
            Item::MapHeader(2),
            Item::Int(1),
            Item::Int(2),
            Item::Int(3),
            Item::Int(4),
        ]
    );
    assert_eq!(
        items(&[0xa2, 0x61, 0x61, 0x01, 0x61, 0x62, 0x82, 0x02, 0x03]),
        vec![
            Item::MapHeader(2),
            Item::Text("a".to_owned()),
            Item::Int(1),
            Item::Text("b".to_owned()),
            Item::ArrayHeader(2),
            Item::Int(2),
            Item::Int(3),
        ]
    );
}

#[test]
fn decodes_indefinite_length_items() {
    assert_eq!(
        items(&[0x5f, 0x42, 0x01, 0x02, 0x43, 0x03, 0x04, 0x05, 0xff]),
        vec![
            Item::BytesStart,
            Item::Bytes(vec![1, 2]),
            Item::Bytes(vec![3, 4, 5]),
            Item::Break,
        ]
    );
    assert_eq!(
        items(&[
            0x7f, 0x65, 0x73, 0x74, 0x72, 0x65, 0x61, 0x64, 0x6d, 0x69, 0x6e, 0x67, 0xff
        ]),
        vec![
            Item::TextStart,
            Item::Text("strea".to_owned()),
            Item::Text("ming".to_owned()),
            Item::Break,
        ]
    );
    assert_eq!(
        items(&[0x9f, 0x01, 0x82, 0x02, 0x03, 0xff]),
        vec![
            Item::ArrayStart,
            Item::Int(1),
            Item::ArrayHeader(2),
            Item::Int(2),
            Item::Int(3),
            Item::Break,
        ]
    );
    assert_eq!(
        items(&[0xbf, 0x61, 0x61, 0x01, 0xff]),
        vec![
            Item::MapStart,
            Item::Text("a".to_owned()),
            Item::Int(1),
            Item::Break,
        ]
    );
}

#[test]
fn decodes_tags() {
    assert_eq!(
        items(&[
            0xc0, 0x74, 0x32, 0x30, 0x31, 0x33, 0x2d, 0x30, 0x33, 0x2d, 0x32, 0x31, 0x54, 0x32,
            0x30, 0x3a, 0x30, 0x34, 0x3a, 0x30, 0x30, 0x5a
        ]),
        vec![
            Item::Tagged(Tag::DateTimeString),
            Item::Text("2013-03-21T20:04:00Z".to_owned()),
        ]
    );
    assert_eq!(
        items(&[0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]),
        vec![Item::Tagged(Tag::EpochDateTime), Item::Int(1363896240)]
    );
    assert_eq!(
        items(&[0xd7, 0x44, 0x01, 0x02, 0x03, 0x04]),
        vec![Item::Tagged(Tag::HintBase16), Item::Bytes(vec![1, 2, 3, 4])]
    );
    // Tag 55799 is the self-describe magic.
    assert_eq!(
        items(&[0xd9, 0xd9, 0xf7, 0x01]),
        vec![Item::Tagged(Tag::MagicHeader), Item::Int(1)]
    );
    // Unregistered tags surface their raw value.
    assert_eq!(
        items(&[0xd8, 0x64, 0x01]),
        vec![Item::Tagged(Tag::Other(100)), Item::Int(1)]
    );
}

#[test]
fn reports_truncated_input_with_positions() {
    let e = failure(&[0x18]);
    assert!(matches!(e, Error::UnexpectedEndOfInput { position: 1, .. }), "{:?}", e);
    let e = failure(&[0x19, 0x03]);
    assert!(matches!(e, Error::UnexpectedEndOfInput { .. }), "{:?}", e);
    let e = failure(&[0x62, 0xc3]);
    assert!(matches!(e, Error::UnexpectedEndOfInput { .. }), "{:?}", e);
    let e = failure(&[0x44, 0x01]);
    assert!(matches!(e, Error::UnexpectedEndOfInput { position: 2, .. }), "{:?}", e);
}

#[test]
fn rejects_malformed_encodings() {
    // Reserved additional information values 28..30.
    assert!(matches!(failure(&[0x1c]), Error::InvalidInputData { position: 0, .. }));
    assert!(matches!(failure(&[0x1d]), Error::InvalidInputData { .. }));
    assert!(matches!(failure(&[0x5e]), Error::InvalidInputData { .. }));
    // Indefinite length on major types that do not allow it.
    assert!(matches!(failure(&[0x3f]), Error::InvalidInputData { .. }));
    assert!(matches!(failure(&[0xdf]), Error::InvalidInputData { .. }));
    // A two-byte simple value below 32 must use the one byte form.
    assert!(matches!(failure(&[0xf8, 0x1f]), Error::InvalidInputData { .. }));
    // Text strings must be valid UTF-8.
    assert!(matches!(failure(&[0x61, 0xff]), Error::InvalidInputData { .. }));
}

#[test]
fn rejects_unsupported_major_seven_codes() {
    assert!(matches!(failure(&[0xfc]), Error::Unsupported { position: 0, .. }));
    assert!(matches!(failure(&[0xfd]), Error::Unsupported { .. }));
    assert!(matches!(failure(&[0xfe]), Error::Unsupported { .. }));
}

#[test]
fn enforces_configured_string_bounds() {
    let mut config = DecodeConfig::default();
    config.max_text_string_length = 4;
    let mut parser =
        CborParser::with_config(SliceInput::new(&[0x65, 0x68, 0x65, 0x6c, 0x6c, 0x6f]), config);
    let mut recorder = Recorder::default();
    let e = parser.read_next_data_item(&mut recorder).unwrap_err();
    assert!(matches!(e, Error::Overflow { position: 0, .. }), "{:?}", e);
}

#[test]
fn a_lone_break_is_surfaced_as_an_item() {
    assert_eq!(single(&[0xff]), Item::Break);
}
