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
 * unibor wire constants
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
/// Additional Information bitmask
pub const AI_MASK: u8 = 0b000_11111;

/// Major Type 0 (Positive integers)
pub const MT_UINT: u8 = 0b000_00000;
/// Major Type 1 (Negative integers)
pub const MT_NINT: u8 = 0b001_00000;
/// Major Type 2 (Byte Strings)
pub const MT_BSTR: u8 = 0b010_00000;
/// Major Type 3 (Text Strings)
pub const MT_TSTR: u8 = 0b011_00000;
/// Major Type 4 (Array)
pub const MT_ARRAY: u8 = 0b100_00000;
/// Major Type 5 (Map)
pub const MT_MAP: u8 = 0b101_00000;
/// Major Type 6 (Tag)
pub const MT_TAG: u8 = 0b110_00000;
/// Major Type 7 (Floats, simple types etc.)
pub const MT_SIMPLE: u8 = 0b111_00000;

/// Maximum value of a "simple" payload mapped on AI bits
pub const PAYLOAD_AI_BITS: u8 = 23;
/// Indicates one byte of length or value information follows MT/AI byte
pub const PAYLOAD_ONE_BYTE: u8 = 24;
/// Indicates two bytes of length or value information follow MT/AI byte
pub const PAYLOAD_TWO_BYTES: u8 = 25;
/// Indicates four bytes of length or value information follow MT/AI byte
pub const PAYLOAD_FOUR_BYTES: u8 = 26;
/// Indicates eight bytes of length or value information follow MT/AI byte
pub const PAYLOAD_EIGHT_BYTES: u8 = 27;
/// Indicates an indefinite length item, terminated by a later break
pub const PAYLOAD_INDEFINITE: u8 = 31;

/// The break byte terminating indefinite length items (MT 7, AI 31)
pub const BREAK_BYTE: u8 = 0xff;

/// Every `Input` implementation must be able to rewind over at least this many of the most
/// recently read bytes. `Input::move_cursor` beyond this window is out of contract.
pub const REWIND_WINDOW: u64 = 256;

/// Well-known tag values from the RFC8949 tag registry, as recognized by the parser.
pub mod tags {
    /// Standard date/time string (RFC3339)
    pub const DATE_TIME_STRING: u64 = 0;
    /// Epoch-based date/time (seconds relative to 1970-01-01T00:00Z)
    pub const EPOCH_DATE_TIME: u64 = 1;
    /// Unsigned bignum (bstr)
    pub const POSITIVE_BIG_NUM: u64 = 2;
    /// Negative bignum (bstr)
    pub const NEGATIVE_BIG_NUM: u64 = 3;
    /// Decimal fraction (array of exponent and mantissa)
    pub const DECIMAL_FRACTION: u64 = 4;
    /// Bigfloat (array of exponent and mantissa)
    pub const BIG_FLOAT: u64 = 5;
    /// Expected conversion to base64url encoding
    pub const HINT_BASE64_URL: u64 = 21;
    /// Expected conversion to base64 encoding
    pub const HINT_BASE64: u64 = 22;
    /// Expected conversion to base16 encoding
    pub const HINT_BASE16: u64 = 23;
    /// Embedded CBOR data item (bstr)
    pub const EMBEDDED_CBOR: u64 = 24;
    /// URI text string
    pub const TEXT_URI: u64 = 32;
    /// base64url-encoded text string
    pub const TEXT_BASE64_URL: u64 = 33;
    /// base64-encoded text string
    pub const TEXT_BASE64: u64 = 34;
    /// Regular expression text string
    pub const TEXT_REGEX: u64 = 35;
    /// MIME message text string
    pub const TEXT_MIME: u64 = 36;
    /// Self-described CBOR magic header
    pub const MAGIC_HEADER: u64 = 55799;
}
