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
 * unibor Receiver protocol
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use half::f16;

use crate::error::Result;
use crate::item::Tag;

/// The universal event contract between parsers and format-agnostic consumers: one typed
/// callback per data item kind.
///
/// A parser fires exactly one of these callbacks per `read_next_data_item` call, sequentially
/// and non-reentrantly. Borrowed payloads (`&str`, `&[u8]`) are only valid for the duration of
/// the call; a receiver that retains them must copy.
///
/// Receivers may fail: renderers are receivers, and e.g. a JSON renderer has items it cannot
/// represent.
pub trait Receiver {
    /// A `null` item.
    fn on_null(&mut self) -> Result<()>;
    /// An `undefined` item.
    fn on_undefined(&mut self) -> Result<()>;
    /// A boolean item.
    fn on_boolean(&mut self, value: bool) -> Result<()>;
    /// An integer fitting 32 bits.
    fn on_int(&mut self, value: i32) -> Result<()>;
    /// An integer fitting 64 but not 32 bits.
    fn on_long(&mut self, value: i64) -> Result<()>;
    /// An integer with magnitude in `[2^63, 2^64)`. A negative overlong denotes the value
    /// `-1 - magnitude`.
    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()>;
    /// A half precision float.
    fn on_float16(&mut self, value: f16) -> Result<()>;
    /// A single precision float.
    fn on_float(&mut self, value: f32) -> Result<()>;
    /// A double precision float.
    fn on_double(&mut self, value: f64) -> Result<()>;
    /// A lexical numeric token (JSON only).
    fn on_number_string(&mut self, value: &str) -> Result<()>;
    /// A CBOR simple value in `{0..19, 32..255}`.
    fn on_simple_value(&mut self, value: u8) -> Result<()>;
    /// A definite length byte string.
    fn on_bytes(&mut self, value: &[u8]) -> Result<()>;
    /// Start of an indefinite length byte string.
    fn on_bytes_start(&mut self) -> Result<()>;
    /// A definite length text string.
    fn on_text(&mut self, value: &str) -> Result<()>;
    /// Start of an indefinite length text string.
    fn on_text_start(&mut self) -> Result<()>;
    /// Header of a definite length array of `length` elements.
    fn on_array_header(&mut self, length: u64) -> Result<()>;
    /// Start of an indefinite length array.
    fn on_array_start(&mut self) -> Result<()>;
    /// Header of a definite length map of `length` pairs.
    fn on_map_header(&mut self, length: u64) -> Result<()>;
    /// Start of an indefinite length map.
    fn on_map_start(&mut self) -> Result<()>;
    /// Terminator of an indefinite length item.
    fn on_break(&mut self) -> Result<()>;
    /// A semantic tag for the following item.
    fn on_tag(&mut self, tag: Tag) -> Result<()>;
    /// The input is exhausted at an item boundary.
    fn on_end_of_input(&mut self) -> Result<()>;
}

/// A receiver decorator that forwards every callback to the wrapped receiver while emitting a
/// `log::trace!` record per data item. This is the tap installed by
/// [`DecodeConfig::log_items`](crate::decoder::DecodeConfig).
pub struct Logging<'a> {
    inner: &'a mut dyn Receiver,
}

impl<'a> Logging<'a> {
    /// Wrap `inner`.
    pub fn new(inner: &'a mut dyn Receiver) -> Logging<'a> {
        Logging { inner }
    }
}

macro_rules! traced {
    ($fmt:literal $(, $arg:expr )*; $call:expr) => {{
        log::trace!(target: "unibor", $fmt $(, $arg)*);
        $call
    }};
}

impl Receiver for Logging<'_> {
    fn on_null(&mut self) -> Result<()> {
        traced!("null"; self.inner.on_null())
    }

    fn on_undefined(&mut self) -> Result<()> {
        traced!("undefined"; self.inner.on_undefined())
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        traced!("boolean {}", value; self.inner.on_boolean(value))
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        traced!("int {}", value; self.inner.on_int(value))
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        traced!("long {}", value; self.inner.on_long(value))
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        traced!("overlong negative={} magnitude={}", negative, magnitude;
            self.inner.on_over_long(negative, magnitude))
    }

    fn on_float16(&mut self, value: f16) -> Result<()> {
        traced!("float16 {}", value; self.inner.on_float16(value))
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        traced!("float {}", value; self.inner.on_float(value))
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        traced!("double {}", value; self.inner.on_double(value))
    }

    fn on_number_string(&mut self, value: &str) -> Result<()> {
        traced!("number {}", value; self.inner.on_number_string(value))
    }

    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        traced!("simple {}", value; self.inner.on_simple_value(value))
    }

    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        traced!("bytes ({} byte(s))", value.len(); self.inner.on_bytes(value))
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        traced!("bytes start"; self.inner.on_bytes_start())
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        traced!("text {:?}", value; self.inner.on_text(value))
    }

    fn on_text_start(&mut self) -> Result<()> {
        traced!("text start"; self.inner.on_text_start())
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        traced!("array header ({})", length; self.inner.on_array_header(length))
    }

    fn on_array_start(&mut self) -> Result<()> {
        traced!("array start"; self.inner.on_array_start())
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        traced!("map header ({})", length; self.inner.on_map_header(length))
    }

    fn on_map_start(&mut self) -> Result<()> {
        traced!("map start"; self.inner.on_map_start())
    }

    fn on_break(&mut self) -> Result<()> {
        traced!("break"; self.inner.on_break())
    }

    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        traced!("tag {:?}", tag; self.inner.on_tag(tag))
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        traced!("end of input"; self.inner.on_end_of_input())
    }
}
