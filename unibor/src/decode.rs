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
 * unibor CBOR parser
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use std::str::from_utf8;

use half::f16;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::input::{EndOfInputProbe, FailPadding, Input};
use crate::item::{ItemKind, Tag};
use crate::options::DecodeConfig;
use crate::receiver::Receiver;

#[cfg(feature = "trace")]
use func_trace::trace;

#[cfg(feature = "trace")]
func_trace::init_depth_var!();

/// The format-side contract of a decoding run: something that pulls bytes apart into data items,
/// driving exactly one [`Receiver`] callback per call and reporting the fired callback's
/// [`ItemKind`].
///
/// Both the CBOR and the JSON parser implement this, which is what makes the
/// [`Reader`](crate::decoder::Reader) façade format-agnostic.
pub trait Parser {
    /// Parse one data item, firing exactly one receiver callback.
    fn read_next_data_item(&mut self, receiver: &mut dyn Receiver) -> Result<ItemKind>;

    /// Compare the next data item — expected to be a text string or an indefinite length text
    /// stream — byte-wise against `target` without materializing it.
    ///
    /// Returns the sign of `item.cmp(target)`; on a non-zero result the parser rewinds to the
    /// item start so that the item can still be decoded generically. If the next item is not a
    /// text item (or the comparison cannot stay within the rewind window), `i32::MIN` is
    /// returned and the item remains unconsumed.
    fn try_read_string_compare(&mut self, target: &[u8]) -> Result<i32>;

    /// Byte index of the start of the most recently parsed data item.
    fn value_index(&self) -> u64;
}

/// Comparisons keep their total consumption below this bound so that a mismatch can always be
/// rewound within the input's rewind window.
const COMPARE_SPAN: u64 = REWIND_WINDOW - 8;

/// The streaming CBOR parser. Pulls bytes from an [`Input`] and decomposes them into data items
/// per RFC8949: major type in the top 3 bits of the initial byte, additional info in the low 5,
/// argument in 0/1/2/4/8 following big-endian bytes.
///
/// Any error is terminal: the parser must be discarded afterwards.
#[derive(Debug)]
pub struct CborParser<In: Input> {
    input: In,
    config: DecodeConfig,
    value_index: u64,
}

impl<In: Input> CborParser<In> {
    /// Construct a parser with the default configuration.
    pub fn new(input: In) -> CborParser<In> {
        CborParser::with_config(input, DecodeConfig::default())
    }

    /// Construct a parser with an explicit configuration.
    pub fn with_config(input: In, config: DecodeConfig) -> CborParser<In> {
        CborParser {
            input,
            config,
            value_index: 0,
        }
    }

    /// Recover the underlying input, e.g. to inspect leftover bytes after a prefix decode.
    pub fn into_input(self) -> In {
        self.input
    }

    /// Decode the argument selected by the additional information bits. Info values 0..=23 carry
    /// the argument directly; 24..=27 select a 1/2/4/8 byte big-endian argument; 28..=30 are
    /// reserved. Info 31 must be handled by the caller.
    #[cfg_attr(feature = "trace", trace)]
    fn ulong(&mut self, info: u8) -> Result<u64> {
        match info {
            0..=PAYLOAD_AI_BITS => Ok(u64::from(info)),
            PAYLOAD_ONE_BYTE => self
                .input
                .read_byte_padded(&mut FailPadding)
                .map(u64::from),
            PAYLOAD_TWO_BYTES => self
                .input
                .read_double_byte_padded(&mut FailPadding)
                .map(u64::from),
            PAYLOAD_FOUR_BYTES => self
                .input
                .read_quad_byte_padded(&mut FailPadding)
                .map(u64::from),
            PAYLOAD_EIGHT_BYTES => self.input.read_octa_byte_padded(&mut FailPadding),
            _ => Err(Error::invalid(
                self.value_index,
                format!("reserved additional information {}", info),
            )),
        }
    }

    /// Decode a definite length argument, which must fit 63 unsigned bits.
    fn definite_length(&mut self, info: u8, what: &str) -> Result<u64> {
        let length = self.ulong(info)?;
        if length >= 1 << 63 {
            Err(Error::overflow(
                self.value_index,
                format!("{} length {} does not fit 63 bits", what, length),
            ))
        } else {
            Ok(length)
        }
    }

    fn read_definite_bytes(&mut self, info: u8) -> Result<Vec<u8>> {
        let length = self.definite_length(info, "byte string")?;
        if length > self.config.max_byte_string_length {
            return Err(Error::overflow(
                self.value_index,
                format!(
                    "byte string length {} exceeds the configured maximum of {}",
                    length, self.config.max_byte_string_length
                ),
            ));
        }
        self.input.read_bytes(length, &mut FailPadding)
    }

    fn read_definite_text(&mut self, info: u8) -> Result<Vec<u8>> {
        let length = self.definite_length(info, "text string")?;
        if length > self.config.max_text_string_length {
            return Err(Error::overflow(
                self.value_index,
                format!(
                    "text string length {} exceeds the configured maximum of {}",
                    length, self.config.max_text_string_length
                ),
            ));
        }
        self.input.read_bytes(length, &mut FailPadding)
    }

    fn emit_integer(
        &mut self,
        receiver: &mut dyn Receiver,
        negative: bool,
        ulong: u64,
    ) -> Result<ItemKind> {
        if negative {
            if ulong <= i32::MAX as u64 {
                receiver.on_int(!(ulong as i32))?;
                Ok(ItemKind::Int)
            } else if ulong <= i64::MAX as u64 {
                receiver.on_long(!(ulong as i64))?;
                Ok(ItemKind::Long)
            } else {
                receiver.on_over_long(true, ulong)?;
                Ok(ItemKind::OverLong)
            }
        } else if ulong <= i32::MAX as u64 {
            receiver.on_int(ulong as i32)?;
            Ok(ItemKind::Int)
        } else if ulong <= i64::MAX as u64 {
            receiver.on_long(ulong as i64)?;
            Ok(ItemKind::Long)
        } else {
            receiver.on_over_long(false, ulong)?;
            Ok(ItemKind::OverLong)
        }
    }

    fn emit_major_seven(
        &mut self,
        receiver: &mut dyn Receiver,
        info: u8,
    ) -> Result<ItemKind> {
        match info {
            0..=19 => {
                receiver.on_simple_value(info)?;
                Ok(ItemKind::SimpleValue)
            }
            20 => {
                receiver.on_boolean(false)?;
                Ok(ItemKind::Boolean)
            }
            21 => {
                receiver.on_boolean(true)?;
                Ok(ItemKind::Boolean)
            }
            22 => {
                receiver.on_null()?;
                Ok(ItemKind::Null)
            }
            23 => {
                receiver.on_undefined()?;
                Ok(ItemKind::Undefined)
            }
            PAYLOAD_ONE_BYTE => {
                let value = self.input.read_byte_padded(&mut FailPadding)?;
                if value < 32 {
                    return Err(Error::invalid(
                        self.value_index,
                        format!("simple value {} must be encoded in the initial byte", value),
                    ));
                }
                receiver.on_simple_value(value)?;
                Ok(ItemKind::SimpleValue)
            }
            PAYLOAD_TWO_BYTES => {
                let bits = self.input.read_double_byte_padded(&mut FailPadding)?;
                receiver.on_float16(f16::from_bits(bits))?;
                Ok(ItemKind::Float16)
            }
            PAYLOAD_FOUR_BYTES => {
                let bits = self.input.read_quad_byte_padded(&mut FailPadding)?;
                receiver.on_float(f32::from_bits(bits))?;
                Ok(ItemKind::Float)
            }
            PAYLOAD_EIGHT_BYTES => {
                let bits = self.input.read_octa_byte_padded(&mut FailPadding)?;
                receiver.on_double(f64::from_bits(bits))?;
                Ok(ItemKind::Double)
            }
            PAYLOAD_INDEFINITE => {
                receiver.on_break()?;
                Ok(ItemKind::Break)
            }
            _ => Err(Error::unsupported(
                self.value_index,
                format!("major type 7 additional information {}", info),
            )),
        }
    }

    fn rewind_to(&mut self, mark: u64) {
        let delta = mark as i64 - self.input.cursor() as i64;
        if delta != 0 {
            self.input.move_cursor(delta);
        }
    }

    /// Compare `length` upcoming input bytes against `target[*offset..]`, eight bytes at a time
    /// with the target zero-padded. `offset` accumulates the item's byte count.
    fn compare_segment(
        &mut self,
        length: u64,
        target: &[u8],
        offset: &mut usize,
    ) -> Result<i32> {
        fn octa_from(target: &[u8], offset: usize, count: usize) -> u64 {
            let mut out = 0u64;
            for i in 0..count {
                let byte = target.get(offset + i).copied().unwrap_or(0);
                out = out << 8 | u64::from(byte);
            }
            out
        }

        let mut remaining = length;
        while remaining >= 8 {
            let item_octa = self.input.read_octa_byte_padded(&mut FailPadding)?;
            let target_octa = octa_from(target, *offset, 8);
            if item_octa != target_octa {
                return Ok(if item_octa < target_octa { -1 } else { 1 });
            }
            *offset += 8;
            remaining -= 8;
        }
        if remaining > 0 {
            let count = remaining as usize;
            let mut item_tail = 0u64;
            for _ in 0..count {
                item_tail = item_tail << 8 | u64::from(self.input.read_byte_padded(&mut FailPadding)?);
            }
            let target_tail = octa_from(target, *offset, count);
            if item_tail != target_tail {
                return Ok(if item_tail < target_tail { -1 } else { 1 });
            }
            *offset += count;
        }
        Ok(0)
    }

    fn final_ordering(offset: usize, target_len: usize) -> i32 {
        match offset.cmp(&target_len) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        }
    }
}

impl<In: Input> Parser for CborParser<In> {
    fn read_next_data_item(&mut self, receiver: &mut dyn Receiver) -> Result<ItemKind> {
        self.value_index = self.input.cursor();
        let mut probe = EndOfInputProbe::default();
        let initial = self.input.read_byte_padded(&mut probe)?;
        if probe.end_of_input {
            receiver.on_end_of_input()?;
            return Ok(ItemKind::EndOfInput);
        }
        let major = initial >> 5;
        let info = initial & AI_MASK;
        if info == PAYLOAD_INDEFINITE && matches!(major, 0 | 1 | 6) {
            return Err(Error::invalid(
                self.value_index,
                format!("indefinite length is not allowed for major type {}", major),
            ));
        }
        let kind = match major {
            0 => {
                let ulong = self.ulong(info)?;
                self.emit_integer(receiver, false, ulong)?
            }
            1 => {
                let ulong = self.ulong(info)?;
                self.emit_integer(receiver, true, ulong)?
            }
            2 => {
                if info == PAYLOAD_INDEFINITE {
                    receiver.on_bytes_start()?;
                    ItemKind::BytesStart
                } else {
                    let bytes = self.read_definite_bytes(info)?;
                    receiver.on_bytes(&bytes)?;
                    ItemKind::Bytes
                }
            }
            3 => {
                if info == PAYLOAD_INDEFINITE {
                    receiver.on_text_start()?;
                    ItemKind::TextStart
                } else {
                    let bytes = self.read_definite_text(info)?;
                    let text = from_utf8(&bytes).map_err(|_| {
                        Error::invalid(self.value_index, "text string is not valid UTF-8")
                    })?;
                    receiver.on_text(text)?;
                    ItemKind::Text
                }
            }
            4 => {
                if info == PAYLOAD_INDEFINITE {
                    receiver.on_array_start()?;
                    ItemKind::ArrayStart
                } else {
                    let length = self.definite_length(info, "array")?;
                    receiver.on_array_header(length)?;
                    ItemKind::ArrayHeader
                }
            }
            5 => {
                if info == PAYLOAD_INDEFINITE {
                    receiver.on_map_start()?;
                    ItemKind::MapStart
                } else {
                    let length = self.definite_length(info, "map")?;
                    receiver.on_map_header(length)?;
                    ItemKind::MapHeader
                }
            }
            6 => {
                let code = self.ulong(info)?;
                receiver.on_tag(Tag::of(code))?;
                ItemKind::Tag
            }
            _ => self.emit_major_seven(receiver, info)?,
        };
        self.input.release_before_cursor();
        Ok(kind)
    }

    fn try_read_string_compare(&mut self, target: &[u8]) -> Result<i32> {
        let mark = self.input.cursor();
        self.value_index = mark;
        let mut probe = EndOfInputProbe::default();
        let initial = self.input.read_byte_padded(&mut probe)?;
        if probe.end_of_input {
            return Ok(i32::MIN);
        }
        let major = initial >> 5;
        let info = initial & AI_MASK;
        if major != 3 {
            self.rewind_to(mark);
            return Ok(i32::MIN);
        }
        if info == PAYLOAD_INDEFINITE {
            // Indefinite length text: compare segment by segment and consume the break on a
            // full match.
            let mut offset = 0usize;
            loop {
                let byte = self.input.read_byte_padded(&mut FailPadding)?;
                if byte == BREAK_BYTE {
                    let result = Self::final_ordering(offset, target.len());
                    if result == 0 {
                        self.input.release_before_cursor();
                    } else {
                        self.rewind_to(mark);
                    }
                    return Ok(result);
                }
                let seg_major = byte >> 5;
                let seg_info = byte & AI_MASK;
                if seg_major != 3 || seg_info == PAYLOAD_INDEFINITE {
                    return Err(Error::invalid(
                        self.input.cursor() - 1,
                        "expected a definite length text string segment",
                    ));
                }
                let length = self.definite_length(seg_info, "text string")?;
                if (self.input.cursor() - mark) + length > COMPARE_SPAN {
                    self.rewind_to(mark);
                    return Ok(i32::MIN);
                }
                let result = self.compare_segment(length, target, &mut offset)?;
                if result != 0 {
                    self.rewind_to(mark);
                    return Ok(result);
                }
            }
        } else {
            let length = self.definite_length(info, "text string")?;
            if (self.input.cursor() - mark) + length > COMPARE_SPAN {
                self.rewind_to(mark);
                return Ok(i32::MIN);
            }
            let mut offset = 0usize;
            let mut result = self.compare_segment(length, target, &mut offset)?;
            if result == 0 {
                result = Self::final_ordering(offset, target.len());
            }
            if result == 0 {
                self.input.release_before_cursor();
            } else {
                self.rewind_to(mark);
            }
            Ok(result)
        }
    }

    fn value_index(&self) -> u64 {
        self.value_index
    }
}
