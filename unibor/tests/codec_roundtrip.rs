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
 * Round trip test cases for derived codecs
 *
 * Product and sum derivation over both wire formats, nullable defaults, optional values,
 * recursion, and the signed/overlong integer boundaries.
 **************************************************************************************************/

extern crate unibor;

use chrono::DateTime;

use unibor::{cbor, codec, json, ByteString, Decode, Encode, EpochTime, Error, Nullable};

fn cbor_round_trip<T>(value: &T)
where
    T: Encode + Decode + PartialEq + std::fmt::Debug,
{
    let bytes = cbor::encode(value).to_bytes().unwrap();
    let back: T = cbor::decode_slice(&bytes).unwrap();
    assert_eq!(&back, value);
}

fn json_round_trip<T>(value: &T, expected: &str)
where
    T: Encode + Decode + PartialEq + std::fmt::Debug,
{
    let text = json::encode(value).to_string().unwrap();
    assert_eq!(text, expected);
    let back: T = json::decode_str(&text).unwrap();
    assert_eq!(&back, value);
}

#[derive(Debug, PartialEq, Clone)]
struct Foo {
    string: String,
    int: i32,
    double: f64,
}
codec!(struct Foo { string: String, int: i32, double: f64 });

#[test]
fn product_round_trips_through_json() {
    let foo = Foo {
        string: "hi".to_string(),
        int: 1,
        double: 0.0,
    };
    json_round_trip(&foo, "[\"hi\",1,0.0]");
    cbor_round_trip(&foo);
}

#[derive(Debug, PartialEq, Clone)]
struct Pair {
    int: Nullable<i32>,
    string: Nullable<String>,
}
codec!(struct Pair { int: Nullable<i32>, string: Nullable<String> });

#[test]
fn nullable_fields_decode_null_as_default() {
    let decoded: Pair = json::decode_str("[null,null]").unwrap();
    assert_eq!(
        decoded,
        Pair {
            int: Nullable(0),
            string: Nullable(String::new()),
        }
    );
    json_round_trip(
        &Pair {
            int: Nullable(12),
            string: Nullable("foo".to_string()),
        },
        "[12,\"foo\"]",
    );
}

#[derive(Debug, PartialEq, Clone)]
struct Bar {
    foo: Nullable<Option<Pair>>,
}
codec!(struct Bar { foo: Nullable<Option<Pair>> });

#[test]
fn optional_single_field_products_unwrap() {
    // Arity-1 products are encoded as the bare field value.
    json_round_trip(&Bar { foo: Nullable(None) }, "null");
    json_round_trip(
        &Bar {
            foo: Nullable(Some(Pair {
                int: Nullable(12),
                string: Nullable("foo".to_string()),
            })),
        },
        "[12,\"foo\"]",
    );
    cbor_round_trip(&Bar { foo: Nullable(None) });
}

#[derive(Debug, PartialEq, Clone)]
struct Empty {}
codec!(struct Empty {});

#[test]
fn empty_products_encode_as_empty_arrays() {
    assert_eq!(cbor::encode(&Empty {}).to_bytes().unwrap(), [0x80]);
    cbor_round_trip(&Empty {});
    json_round_trip(&Empty {}, "[]");
}

#[derive(Debug, PartialEq, Clone)]
struct Settings {
    name: String,
    level: u32,
    verbose: bool,
}
codec!(map struct Settings {
    name: String => "n",
    level: u32 => 2,
    verbose: bool,
});

#[test]
fn map_products_round_trip() {
    let settings = Settings {
        name: "probe".to_string(),
        level: 3,
        verbose: true,
    };
    cbor_round_trip(&settings);
    let bytes = cbor::encode(&settings).to_bytes().unwrap();
    // map(3), "n", "probe", 2, 3, "verbose", true
    assert_eq!(bytes[0], 0xa3);
}

#[test]
fn map_products_accept_any_field_order() {
    // Hand-built map: verbose first, then the integer key, then "n".
    let mut bytes = vec![0xa3];
    bytes.extend_from_slice(&[0x67]);
    bytes.extend_from_slice(b"verbose");
    bytes.push(0xf5);
    bytes.push(0x02);
    bytes.push(0x03);
    bytes.extend_from_slice(&[0x61, 0x6e, 0x65]);
    bytes.extend_from_slice(b"probe");
    let decoded: Settings = cbor::decode_slice(&bytes).unwrap();
    assert_eq!(
        decoded,
        Settings {
            name: "probe".to_string(),
            level: 3,
            verbose: true,
        }
    );
}

#[test]
fn map_products_reject_unknown_duplicate_and_missing_keys() {
    // {"x": 1}: unknown key.
    let e = cbor::decode_slice::<Settings>(&[0xa1, 0x61, 0x78, 0x01]).unwrap_err();
    assert!(matches!(e, Error::InvalidInputData { .. }), "{:?}", e);

    // {"n": "a", "n": "b", 2: 1}: duplicate key.
    let mut bytes = vec![0xa3, 0x61, 0x6e, 0x61, 0x61, 0x61, 0x6e, 0x61, 0x62, 0x02, 0x01];
    let e = cbor::decode_slice::<Settings>(&bytes).unwrap_err();
    assert!(matches!(e, Error::InvalidInputData { .. }), "{:?}", e);

    // {"n": "a"}: missing keys.
    bytes = vec![0xa1, 0x61, 0x6e, 0x61, 0x61];
    let e = cbor::decode_slice::<Settings>(&bytes).unwrap_err();
    assert!(matches!(e, Error::InvalidInputData { .. }), "{:?}", e);
}

#[derive(Debug, PartialEq, Clone)]
struct StringKeyed {
    alpha: i32,
    beta: String,
}
codec!(map struct StringKeyed { alpha: i32, beta: String });

#[test]
fn map_products_round_trip_through_json() {
    let value = StringKeyed {
        alpha: 1,
        beta: "x".to_string(),
    };
    json_round_trip(&value, "{\"alpha\":1,\"beta\":\"x\"}");
    // Reordered and spaced out.
    let decoded: StringKeyed =
        json::decode_str("{ \"beta\" : \"x\" , \"alpha\" : 1 }").unwrap();
    assert_eq!(decoded, value);
}

#[derive(Debug, PartialEq, Clone)]
struct Circle {
    radius: f64,
}
codec!(struct Circle { radius: f64 });

#[derive(Debug, PartialEq, Clone)]
struct Rect {
    width: f64,
    height: f64,
}
codec!(struct Rect { width: f64, height: f64 });

#[derive(Debug, PartialEq, Clone)]
enum Shape {
    Circle(Circle),
    Rect(Rect),
    Point,
}
codec!(enum Shape {
    Circle(Circle) => "circle",
    Rect(Rect),
    Point => 7,
});

#[test]
fn sums_round_trip_with_type_ids() {
    cbor_round_trip(&Shape::Circle(Circle { radius: 2.5 }));
    cbor_round_trip(&Shape::Rect(Rect {
        width: 1.0,
        height: 2.0,
    }));
    cbor_round_trip(&Shape::Point);

    // Arity-1 payloads unwrap, so a circle is ["circle", 2.5].
    json_round_trip(&Shape::Circle(Circle { radius: 2.5 }), "[\"circle\",2.5]");
    // The default type id is the variant name.
    json_round_trip(
        &Shape::Rect(Rect {
            width: 1.0,
            height: 2.0,
        }),
        "[\"Rect\",[1.0,2.0]]",
    );
}

#[test]
fn sums_with_integer_ids_round_trip_through_cbor() {
    let bytes = cbor::encode(&Shape::Point).to_bytes().unwrap();
    // [7, []]
    assert_eq!(bytes, [0x82, 0x07, 0x80]);
    let back: Shape = cbor::decode_slice(&bytes).unwrap();
    assert_eq!(back, Shape::Point);
}

#[test]
fn sums_reject_unknown_type_ids() {
    // ["square", 1.0]
    let bytes = [
        0x82, 0x66, 0x73, 0x71, 0x75, 0x61, 0x72, 0x65, 0xfb, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];
    let e = cbor::decode_slice::<Shape>(&bytes).unwrap_err();
    assert!(matches!(e, Error::InvalidInputData { .. }), "{:?}", e);
}

#[derive(Debug, PartialEq, Clone)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}
codec!(struct Node { value: i32, next: Option<Box<Node>> });

#[test]
fn recursive_types_round_trip() {
    let list = Node {
        value: 1,
        next: Some(Box::new(Node {
            value: 2,
            next: Some(Box::new(Node {
                value: 3,
                next: None,
            })),
        })),
    };
    cbor_round_trip(&list);
    json_round_trip(&list, "[1,[2,[3,null]]]");
}

#[test]
fn integers_round_trip_on_the_overlong_boundaries() {
    cbor_round_trip(&i64::MAX);
    cbor_round_trip(&i64::MIN);
    cbor_round_trip(&(1u64 << 63));
    cbor_round_trip(&u64::MAX);
    cbor_round_trip(&((1u64 << 63) - 1));

    // 2^63 - 1 travels as a long, 2^63 as a positive overlong.
    assert_eq!(
        cbor::encode(&((1u64 << 63) - 1)).to_bytes().unwrap()[0],
        0x1b
    );
    let bytes = cbor::encode(&(1u64 << 63)).to_bytes().unwrap();
    assert_eq!(bytes, [0x1b, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn scalars_agree_across_formats() {
    for value in [0i32, 17, -44, i32::MAX, i32::MIN] {
        let from_cbor: i32 =
            cbor::decode_slice(&cbor::encode(&value).to_bytes().unwrap()).unwrap();
        let from_json: i32 =
            json::decode_str(&json::encode(&value).to_string().unwrap()).unwrap();
        assert_eq!(from_cbor, value);
        assert_eq!(from_json, value);
    }
    for value in [0.0f64, 3.25, -1.5e10] {
        let from_cbor: f64 =
            cbor::decode_slice(&cbor::encode(&value).to_bytes().unwrap()).unwrap();
        let from_json: f64 =
            json::decode_str(&json::encode(&value).to_string().unwrap()).unwrap();
        assert_eq!(from_cbor, value);
        assert_eq!(from_json, value);
    }
    for value in ["", "t\u{00e9}xt", "nested \"quotes\""] {
        let owned = value.to_string();
        let from_cbor: String =
            cbor::decode_slice(&cbor::encode(&owned).to_bytes().unwrap()).unwrap();
        let from_json: String =
            json::decode_str(&json::encode(&owned).to_string().unwrap()).unwrap();
        assert_eq!(from_cbor, owned);
        assert_eq!(from_json, owned);
    }
}

#[test]
fn standard_container_codecs_round_trip() {
    cbor_round_trip(&vec![1i32, 2, 3]);
    cbor_round_trip(&vec!["a".to_string(), "b".to_string()]);
    cbor_round_trip(&Some(7i32));
    cbor_round_trip(&(None::<i32>));
    cbor_round_trip(&ByteString(vec![0xde, 0xad, 0xbe, 0xef]));
    cbor_round_trip(&unibor::types::SimpleValue::new(32).unwrap());
}

#[test]
fn date_time_codecs_use_their_tags() {
    let stamp = DateTime::parse_from_rfc3339("2013-03-21T20:04:00+00:00").unwrap();
    let bytes = cbor::encode(&stamp).to_bytes().unwrap();
    assert_eq!(bytes[0], 0xc0);
    cbor_round_trip(&stamp);
    // JSON carries the bare RFC3339 string (tags have no JSON form).
    json_round_trip(&stamp, "\"2013-03-21T20:04:00+00:00\"");

    let epoch = EpochTime(1363896240);
    let bytes = cbor::encode(&epoch).to_bytes().unwrap();
    assert_eq!(bytes[0], 0xc1);
    cbor_round_trip(&epoch);
}

#[test]
fn prefix_only_permits_leftover_bytes() {
    let mut config = unibor::decoder::DecodeConfig::default();
    config.prefix_only = true;
    let value: i32 = cbor::decode_slice_with(&[0x01, 0xff, 0xff], config).unwrap();
    assert_eq!(value, 1);

    let e = cbor::decode_slice::<i32>(&[0x01, 0xff]).unwrap_err();
    assert!(matches!(e, Error::InvalidInputData { .. }), "{:?}", e);
}

#[test]
fn leftover_input_is_recoverable_with_the_parser() {
    use unibor::io::{Input, SliceInput};

    let mut config = unibor::decoder::DecodeConfig::default();
    config.prefix_only = true;
    let bytes = [0x01, 0x61, 0x61];
    let (value, parser) = cbor::decode_with(SliceInput::new(&bytes), config)
        .to_with_input::<i32>()
        .unwrap();
    assert_eq!(value, 1);
    assert_eq!(parser.into_input().cursor(), 1);
}
