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
 * unibor CBOR renderer
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use half::f16;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::item::Tag;
use crate::output::Output;
use crate::receiver::Receiver;

/// The inverse of the CBOR parser: a [`Receiver`] that writes each data item to an [`Output`]
/// in the RFC8949 byte format, using preferred (smallest width) serialization for integer
/// arguments.
#[derive(Debug)]
pub struct CborRenderer<Out: Output> {
    out: Out,
}

impl<Out: Output> CborRenderer<Out> {
    /// Construct a renderer writing to `out`.
    pub fn new(out: Out) -> CborRenderer<Out> {
        CborRenderer { out }
    }

    /// Recover the underlying output once rendering is complete.
    pub fn into_output(self) -> Out {
        self.out
    }

    /// Write an initial byte for `major` with the argument `value` in its smallest
    /// representation.
    fn write_type_and_value(&mut self, major: u8, value: u64) {
        if value < u64::from(PAYLOAD_AI_BITS) + 1 {
            self.out.write_byte(major | value as u8);
        } else if value <= 0xff {
            self.out.write_double(major | PAYLOAD_ONE_BYTE, value as u8);
        } else if value <= 0xffff {
            self.out
                .write_triple(major | PAYLOAD_TWO_BYTES, (value >> 8) as u8, value as u8);
        } else if value <= 0xffff_ffff {
            self.out.write_byte(major | PAYLOAD_FOUR_BYTES);
            self.out.write_quad(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            );
        } else {
            self.out.write_byte(major | PAYLOAD_EIGHT_BYTES);
            self.out.write_slice(&value.to_be_bytes());
        }
    }
}

impl<Out: Output> Receiver for CborRenderer<Out> {
    fn on_null(&mut self) -> Result<()> {
        self.out.write_byte(MT_SIMPLE | 22);
        Ok(())
    }

    fn on_undefined(&mut self) -> Result<()> {
        self.out.write_byte(MT_SIMPLE | 23);
        Ok(())
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.out.write_byte(MT_SIMPLE | if value { 21 } else { 20 });
        Ok(())
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        self.on_long(i64::from(value))
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        if value < 0 {
            self.write_type_and_value(MT_NINT, !value as u64);
        } else {
            self.write_type_and_value(MT_UINT, value as u64);
        }
        Ok(())
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.write_type_and_value(if negative { MT_NINT } else { MT_UINT }, magnitude);
        Ok(())
    }

    fn on_float16(&mut self, value: f16) -> Result<()> {
        let bytes = value.to_be_bytes();
        self.out
            .write_triple(MT_SIMPLE | PAYLOAD_TWO_BYTES, bytes[0], bytes[1]);
        Ok(())
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        let bits = value.to_bits();
        self.out.write_byte(MT_SIMPLE | PAYLOAD_FOUR_BYTES);
        self.out.write_quad(
            (bits >> 24) as u8,
            (bits >> 16) as u8,
            (bits >> 8) as u8,
            bits as u8,
        );
        Ok(())
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        self.out.write_byte(MT_SIMPLE | PAYLOAD_EIGHT_BYTES);
        self.out.write_slice(&value.to_bits().to_be_bytes());
        Ok(())
    }

    fn on_number_string(&mut self, value: &str) -> Result<()> {
        // Number strings originate from JSON input; narrow to the smallest item that represents
        // the token exactly so that JSON → CBOR transcoding stays lossless for integers.
        if let Ok(long) = value.parse::<i64>() {
            return self.on_long(long);
        }
        if let Ok(magnitude) = value.parse::<u64>() {
            return self.on_over_long(false, magnitude);
        }
        match value.parse::<f64>() {
            Ok(double) => self.on_double(double),
            Err(_) => Err(Error::unsupported(
                self.out.size(),
                format!("number string {:?} cannot be rendered as CBOR", value),
            )),
        }
    }

    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        if value < 24 {
            self.out.write_byte(MT_SIMPLE | value);
        } else {
            self.out.write_double(MT_SIMPLE | PAYLOAD_ONE_BYTE, value);
        }
        Ok(())
    }

    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_type_and_value(MT_BSTR, value.len() as u64);
        self.out.write_slice(value);
        Ok(())
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        self.out.write_byte(MT_BSTR | PAYLOAD_INDEFINITE);
        Ok(())
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        self.write_type_and_value(MT_TSTR, value.len() as u64);
        self.out.write_slice(value.as_bytes());
        Ok(())
    }

    fn on_text_start(&mut self) -> Result<()> {
        self.out.write_byte(MT_TSTR | PAYLOAD_INDEFINITE);
        Ok(())
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.write_type_and_value(MT_ARRAY, length);
        Ok(())
    }

    fn on_array_start(&mut self) -> Result<()> {
        self.out.write_byte(MT_ARRAY | PAYLOAD_INDEFINITE);
        Ok(())
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        self.write_type_and_value(MT_MAP, length);
        Ok(())
    }

    fn on_map_start(&mut self) -> Result<()> {
        self.out.write_byte(MT_MAP | PAYLOAD_INDEFINITE);
        Ok(())
    }

    fn on_break(&mut self) -> Result<()> {
        self.out.write_byte(BREAK_BYTE);
        Ok(())
    }

    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        self.write_type_and_value(MT_TAG, tag.code());
        Ok(())
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        Ok(())
    }
}
