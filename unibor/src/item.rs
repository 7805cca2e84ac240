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
 * unibor data item model
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use crate::constants::tags;

/// The closed set of data item kinds that a parser can deliver. Every parsed byte sequence
/// decomposes into a finite stream of data items drawn from this set; each kind corresponds to
/// exactly one [`Receiver`](crate::types::Receiver) callback.
///
/// The parser returns the `ItemKind` of the callback it fired from `read_next_data_item`, which
/// lets the [`Reader`](crate::decoder::Reader) route on the code without re-dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// CBOR `null` / JSON `null`.
    Null,
    /// CBOR `undefined` (rendered as `null` in JSON).
    Undefined,
    /// A boolean value.
    Boolean,
    /// A signed integer fitting 32 bits.
    Int,
    /// A signed integer fitting 64 but not 32 bits.
    Long,
    /// An integer with magnitude in `[2^63, 2^64)`, not representable as `i64`.
    OverLong,
    /// An IEEE-754 binary16 float.
    Float16,
    /// An IEEE-754 binary32 float.
    Float,
    /// An IEEE-754 binary64 float.
    Double,
    /// A CBOR simple value in `{0..19, 32..255}`.
    SimpleValue,
    /// A lexical numeric token (JSON only).
    NumberString,
    /// A definite length byte string.
    Bytes,
    /// Start of an indefinite length byte string, terminated by `Break`.
    BytesStart,
    /// A definite length UTF-8 text string.
    Text,
    /// Start of an indefinite length text string, terminated by `Break`.
    TextStart,
    /// Header of a definite length array of `n` elements.
    ArrayHeader,
    /// Start of an indefinite length array, terminated by `Break`.
    ArrayStart,
    /// Header of a definite length map of `n` key/value pairs.
    MapHeader,
    /// Start of an indefinite length map, terminated by `Break`.
    MapStart,
    /// Terminator of an indefinite length item.
    Break,
    /// A semantic tag modifying the immediately following item.
    Tag,
    /// The input is exhausted at an item boundary.
    EndOfInput,
}

impl ItemKind {
    /// A short human readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Null => "null",
            ItemKind::Undefined => "undefined",
            ItemKind::Boolean => "boolean",
            ItemKind::Int => "int",
            ItemKind::Long => "long",
            ItemKind::OverLong => "overlong integer",
            ItemKind::Float16 => "float16",
            ItemKind::Float => "float",
            ItemKind::Double => "double",
            ItemKind::SimpleValue => "simple value",
            ItemKind::NumberString => "number",
            ItemKind::Bytes => "byte string",
            ItemKind::BytesStart => "byte string start",
            ItemKind::Text => "text string",
            ItemKind::TextStart => "text string start",
            ItemKind::ArrayHeader => "array header",
            ItemKind::ArrayStart => "array start",
            ItemKind::MapHeader => "map header",
            ItemKind::MapStart => "map start",
            ItemKind::Break => "break",
            ItemKind::Tag => "tag",
            ItemKind::EndOfInput => "end of input",
        }
    }
}

/// A semantic tag preceding a data item. The tags named in the RFC8949 registry that the parser
/// recognizes are mapped onto dedicated variants; everything else is carried as [`Tag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Tag 0: standard date/time string.
    DateTimeString,
    /// Tag 1: epoch-based date/time.
    EpochDateTime,
    /// Tag 2: unsigned bignum.
    PositiveBigNum,
    /// Tag 3: negative bignum.
    NegativeBigNum,
    /// Tag 4: decimal fraction.
    DecimalFraction,
    /// Tag 5: bigfloat.
    BigFloat,
    /// Tag 21: expected conversion to base64url.
    HintBase64Url,
    /// Tag 22: expected conversion to base64.
    HintBase64,
    /// Tag 23: expected conversion to base16.
    HintBase16,
    /// Tag 24: embedded CBOR data item.
    EmbeddedCbor,
    /// Tag 32: URI.
    TextUri,
    /// Tag 33: base64url-encoded text.
    TextBase64Url,
    /// Tag 34: base64-encoded text.
    TextBase64,
    /// Tag 35: regular expression.
    TextRegex,
    /// Tag 36: MIME message.
    TextMime,
    /// Tag 55799: self-described CBOR.
    MagicHeader,
    /// Any tag without a dedicated variant.
    Other(u64),
}

impl Tag {
    /// Map a raw tag value onto the recognized variant, or [`Tag::Other`].
    pub fn of(code: u64) -> Tag {
        match code {
            tags::DATE_TIME_STRING => Tag::DateTimeString,
            tags::EPOCH_DATE_TIME => Tag::EpochDateTime,
            tags::POSITIVE_BIG_NUM => Tag::PositiveBigNum,
            tags::NEGATIVE_BIG_NUM => Tag::NegativeBigNum,
            tags::DECIMAL_FRACTION => Tag::DecimalFraction,
            tags::BIG_FLOAT => Tag::BigFloat,
            tags::HINT_BASE64_URL => Tag::HintBase64Url,
            tags::HINT_BASE64 => Tag::HintBase64,
            tags::HINT_BASE16 => Tag::HintBase16,
            tags::EMBEDDED_CBOR => Tag::EmbeddedCbor,
            tags::TEXT_URI => Tag::TextUri,
            tags::TEXT_BASE64_URL => Tag::TextBase64Url,
            tags::TEXT_BASE64 => Tag::TextBase64,
            tags::TEXT_REGEX => Tag::TextRegex,
            tags::TEXT_MIME => Tag::TextMime,
            tags::MAGIC_HEADER => Tag::MagicHeader,
            other => Tag::Other(other),
        }
    }

    /// The raw tag value.
    pub fn code(self) -> u64 {
        match self {
            Tag::DateTimeString => tags::DATE_TIME_STRING,
            Tag::EpochDateTime => tags::EPOCH_DATE_TIME,
            Tag::PositiveBigNum => tags::POSITIVE_BIG_NUM,
            Tag::NegativeBigNum => tags::NEGATIVE_BIG_NUM,
            Tag::DecimalFraction => tags::DECIMAL_FRACTION,
            Tag::BigFloat => tags::BIG_FLOAT,
            Tag::HintBase64Url => tags::HINT_BASE64_URL,
            Tag::HintBase64 => tags::HINT_BASE64,
            Tag::HintBase16 => tags::HINT_BASE16,
            Tag::EmbeddedCbor => tags::EMBEDDED_CBOR,
            Tag::TextUri => tags::TEXT_URI,
            Tag::TextBase64Url => tags::TEXT_BASE64_URL,
            Tag::TextBase64 => tags::TEXT_BASE64,
            Tag::TextRegex => tags::TEXT_REGEX,
            Tag::TextMime => tags::TEXT_MIME,
            Tag::MagicHeader => tags::MAGIC_HEADER,
            Tag::Other(code) => code,
        }
    }
}

/// A CBOR simple value (major type 7). Legal contents are `{0..19, 32..255}`; the values 20..31
/// are either assigned (booleans, null, undefined, floats, break) or reserved by RFC8949.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimpleValue(u8);

impl SimpleValue {
    /// Construct a simple value, rejecting the reserved range 20..=31.
    pub fn new(value: u8) -> Option<SimpleValue> {
        match value {
            20..=31 => None,
            v => Some(SimpleValue(v)),
        }
    }

    /// The raw simple value.
    pub fn value(self) -> u8 {
        self.0
    }

    pub(crate) fn from_unchecked(value: u8) -> SimpleValue {
        SimpleValue(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_mapping_is_involutive() {
        for code in [0u64, 1, 2, 3, 4, 5, 21, 22, 23, 24, 32, 33, 34, 35, 36, 55799, 1234] {
            assert_eq!(Tag::of(code).code(), code);
        }
    }

    #[test]
    fn reserved_simple_values_are_rejected() {
        assert!(SimpleValue::new(19).is_some());
        assert!(SimpleValue::new(20).is_none());
        assert!(SimpleValue::new(31).is_none());
        assert!(SimpleValue::new(32).is_some());
    }
}
