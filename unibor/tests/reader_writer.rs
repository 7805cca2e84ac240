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
 * Test cases for the Reader façade and the string comparison fast path
 *
 * Typed reading over the receptacle, indefinite length stream assembly, container element
 * accounting, and the allocation-free map key comparison.
 **************************************************************************************************/

extern crate unibor;

use unibor::decoder::{CborParser, Reader};
use unibor::error::Error;
use unibor::io::SliceInput;
use unibor::types::Tag;

fn reader(buf: &[u8]) -> Reader<CborParser<SliceInput<'_>>> {
    Reader::new(CborParser::new(SliceInput::new(buf)))
}

#[test]
fn assembles_indefinite_text_streams() {
    // 0x7f, "abc", "de", break: one logical text item.
    let mut r = reader(&[0x7f, 0x63, 0x61, 0x62, 0x63, 0x62, 0x64, 0x65, 0xff]);
    assert_eq!(r.read_string().unwrap(), "abcde");
    r.read_end_of_input().unwrap();
}

#[test]
fn assembles_indefinite_byte_streams() {
    let mut r = reader(&[0x5f, 0x42, 0x01, 0x02, 0x43, 0x03, 0x04, 0x05, 0xff]);
    assert_eq!(r.read_bytes().unwrap(), vec![1, 2, 3, 4, 5]);
    r.read_end_of_input().unwrap();
}

#[test]
fn reads_a_tagged_date_time() {
    let mut r = reader(&[
        0xc0, 0x74, 0x32, 0x30, 0x31, 0x33, 0x2d, 0x30, 0x33, 0x2d, 0x32, 0x31, 0x54, 0x32, 0x30,
        0x3a, 0x30, 0x34, 0x3a, 0x30, 0x30, 0x5a,
    ]);
    assert_eq!(r.read_tag().unwrap(), Tag::DateTimeString);
    assert_eq!(r.read_string().unwrap(), "2013-03-21T20:04:00Z");
    r.read_end_of_input().unwrap();
}

#[test]
fn mismatches_carry_the_item_position() {
    let mut r = reader(&[0x82, 0x01, 0x61, 0x61]);
    r.read_array_open(2).unwrap();
    r.read_int().unwrap();
    let e = r.read_int().unwrap_err();
    match e {
        Error::InvalidInputData { position, message } => {
            assert_eq!(position, 2);
            assert!(message.contains("expected int"), "{}", message);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn definite_containers_account_their_elements() {
    // Too many reads.
    let mut r = reader(&[0x82, 0x01, 0x02, 0x03]);
    r.read_array_open(2).unwrap();
    r.read_int().unwrap();
    r.read_int().unwrap();
    assert!(r.read_int().is_err());

    // Too few reads.
    let mut r = reader(&[0x82, 0x01, 0x02]);
    r.read_array_open(2).unwrap();
    r.read_int().unwrap();
    assert!(r.read_array_close().is_err());

    // Exact reads.
    let mut r = reader(&[0x82, 0x01, 0x02]);
    r.read_array_open(2).unwrap();
    r.read_int().unwrap();
    r.read_int().unwrap();
    r.read_array_close().unwrap();
    r.read_end_of_input().unwrap();
}

#[test]
fn indefinite_containers_close_on_break() {
    let mut r = reader(&[0x9f, 0x01, 0x02, 0xff]);
    assert_eq!(r.read_array_open_any().unwrap(), None);
    assert_eq!(r.read_int().unwrap(), 1);
    assert_eq!(r.read_int().unwrap(), 2);
    r.read_array_close().unwrap();
    r.read_end_of_input().unwrap();
}

#[test]
fn try_helpers_leave_non_matching_items_buffered() {
    let mut r = reader(&[0xf6]);
    assert!(!r.try_read_break().unwrap());
    assert!(r.try_read_null().unwrap());
    r.read_end_of_input().unwrap();
}

#[test]
fn numeric_helpers_widen() {
    let mut r = reader(&[0x18, 0x2a]);
    assert_eq!(r.read_double().unwrap(), 42.0);
    let mut r = reader(&[0xf9, 0x3e, 0x00]);
    assert_eq!(r.read_double().unwrap(), 1.5);
    let mut r = reader(&[0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    assert_eq!(r.read_u64().unwrap(), u64::MAX);
    let mut r = reader(&[0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    assert_eq!(r.read_over_long().unwrap(), (true, u64::MAX));
}

fn encoded_text(text: &str) -> Vec<u8> {
    unibor::cbor::encode(&text).to_bytes().unwrap()
}

/// The fast path result must have the same sign as the byte-wise string ordering, and a
/// non-match must leave the item fully decodable.
fn check_compare(item: &str, target: &str) {
    let bytes = encoded_text(item);
    let mut r = reader(&bytes);
    let result = r.try_read_text_compare(target).unwrap();
    let expected = match item.as_bytes().cmp(target.as_bytes()) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    };
    assert_eq!(result, expected, "{:?} vs {:?}", item, target);
    if result != 0 {
        assert_eq!(r.read_string().unwrap(), item, "rewind after mismatch");
    } else {
        r.read_end_of_input().unwrap();
    }
}

#[test]
fn string_comparison_is_consistent_with_ordering() {
    check_compare("color", "color");
    check_compare("color", "colour");
    check_compare("colour", "color");
    check_compare("", "");
    check_compare("", "a");
    check_compare("a", "");
    check_compare("abcdefgh", "abcdefgh");
    check_compare("abcdefghi", "abcdefgh");
    check_compare("abcdefgh", "abcdefghi");
    check_compare("zzz", "aaa");
    // Multi-byte UTF-8 orders by encoded bytes.
    check_compare("gr\u{00f6}\u{00df}er", "gross");
    check_compare("\u{30b0}\u{30ea}\u{30fc}\u{30f3}", "green");
    check_compare("caf\u{00e9}", "cafe");
    // Longer than one comparison chunk.
    check_compare("a maze of twisty little passages", "a maze of twisty little passages");
    check_compare("a maze of twisty little passages", "a maze of twisty little hallways");
}

#[test]
fn comparison_spans_indefinite_text_streams() {
    // "abc" + "de" in two segments.
    let bytes = [0x7f, 0x63, 0x61, 0x62, 0x63, 0x62, 0x64, 0x65, 0xff];
    let mut r = reader(&bytes);
    assert_eq!(r.try_read_text_compare("abcde").unwrap(), 0);
    r.read_end_of_input().unwrap();

    let mut r = reader(&bytes);
    assert_eq!(r.try_read_text_compare("abcdf").unwrap(), -1);
    assert_eq!(r.read_string().unwrap(), "abcde");

    let mut r = reader(&bytes);
    assert_eq!(r.try_read_text_compare("abc").unwrap(), 1);
    assert_eq!(r.read_string().unwrap(), "abcde");
}

#[test]
fn comparison_rejects_non_text_items() {
    let mut r = reader(&[0x01]);
    assert_eq!(r.try_read_text_compare("x").unwrap(), i32::MIN);
    assert_eq!(r.read_int().unwrap(), 1);
}

#[test]
fn comparison_falls_back_beyond_the_rewind_window() {
    let long = "x".repeat(300);
    let bytes = encoded_text(&long);
    let mut r = reader(&bytes);
    assert_eq!(r.try_read_text_compare(&long).unwrap(), i32::MIN);
    assert_eq!(r.read_string().unwrap(), long);
}

#[test]
fn comparison_works_against_a_buffered_item() {
    // A failed long-compare leaves the text item in the receptacle; the text compare must then
    // run against the buffered value.
    let bytes = encoded_text("key");
    let mut r = reader(&bytes);
    assert!(!r.try_read_long_compare(7).unwrap());
    assert_eq!(r.try_read_text_compare("aaa").unwrap(), 1);
    assert_eq!(r.try_read_text_compare("key").unwrap(), 0);
    r.read_end_of_input().unwrap();
}

#[test]
fn long_comparison_consumes_only_matches() {
    let mut r = reader(&[0x18, 0x2a]);
    assert!(!r.try_read_long_compare(41).unwrap());
    assert!(r.try_read_long_compare(42).unwrap());
    r.read_end_of_input().unwrap();
}
