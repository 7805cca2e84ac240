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
 * unibor Writer façade
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use half::f16;

use crate::error::Result;
use crate::item::Tag;
use crate::receiver::Receiver;

/// Typed encoding façade over any [`Receiver`] — usually a format renderer. This is the mirror
/// of the [`Reader`](crate::decoder::Reader): encoders describe their value as a sequence of data
/// items and the receiver turns them into bytes.
#[derive(Debug)]
pub struct Writer<R: Receiver> {
    receiver: R,
}

impl<R: Receiver> Writer<R> {
    /// Construct a writer driving `receiver`.
    pub fn new(receiver: R) -> Writer<R> {
        Writer { receiver }
    }

    /// Recover the receiver once the value is fully written.
    pub fn into_receiver(self) -> R {
        self.receiver
    }

    /// Write a `null` item.
    pub fn write_null(&mut self) -> Result<()> {
        self.receiver.on_null()
    }

    /// Write an `undefined` item.
    pub fn write_undefined(&mut self) -> Result<()> {
        self.receiver.on_undefined()
    }

    /// Write a boolean.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.receiver.on_boolean(value)
    }

    /// Write an integer fitting 32 bits.
    pub fn write_int(&mut self, value: i32) -> Result<()> {
        self.receiver.on_int(value)
    }

    /// Write an integer fitting 64 bits.
    pub fn write_long(&mut self, value: i64) -> Result<()> {
        self.receiver.on_long(value)
    }

    /// Write an integer with magnitude in `[2^63, 2^64)`.
    pub fn write_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.receiver.on_over_long(negative, magnitude)
    }

    /// Write a half precision float.
    pub fn write_float16(&mut self, value: f16) -> Result<()> {
        self.receiver.on_float16(value)
    }

    /// Write a single precision float.
    pub fn write_float(&mut self, value: f32) -> Result<()> {
        self.receiver.on_float(value)
    }

    /// Write a double precision float.
    pub fn write_double(&mut self, value: f64) -> Result<()> {
        self.receiver.on_double(value)
    }

    /// Write a lexical numeric token.
    pub fn write_number_string(&mut self, value: &str) -> Result<()> {
        self.receiver.on_number_string(value)
    }

    /// Write a CBOR simple value.
    pub fn write_simple_value(&mut self, value: u8) -> Result<()> {
        self.receiver.on_simple_value(value)
    }

    /// Write a definite length byte string.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.receiver.on_bytes(value)
    }

    /// Open an indefinite length byte string; follow with byte string segments and a break.
    pub fn write_bytes_start(&mut self) -> Result<()> {
        self.receiver.on_bytes_start()
    }

    /// Write a definite length text string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.receiver.on_text(value)
    }

    /// Open an indefinite length text string; follow with text segments and a break.
    pub fn write_text_start(&mut self) -> Result<()> {
        self.receiver.on_text_start()
    }

    /// Write the header of a definite length array of `length` elements.
    pub fn write_array_header(&mut self, length: u64) -> Result<()> {
        self.receiver.on_array_header(length)
    }

    /// Open an indefinite length array; terminate with a break.
    pub fn write_array_start(&mut self) -> Result<()> {
        self.receiver.on_array_start()
    }

    /// Write the header of a definite length map of `length` pairs.
    pub fn write_map_header(&mut self, length: u64) -> Result<()> {
        self.receiver.on_map_header(length)
    }

    /// Open an indefinite length map; terminate with a break.
    pub fn write_map_start(&mut self) -> Result<()> {
        self.receiver.on_map_start()
    }

    /// Terminate the innermost indefinite length item.
    pub fn write_break(&mut self) -> Result<()> {
        self.receiver.on_break()
    }

    /// Write a semantic tag for the following item.
    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.receiver.on_tag(tag)
    }
}
