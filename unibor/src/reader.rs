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
 * unibor Reader façade and Receptacle
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use std::mem;

use half::f16;

use crate::decode::Parser;
use crate::error::{Error, Result};
use crate::item::{ItemKind, Tag};
use crate::options::DecodeConfig;
use crate::receiver::{Logging, Receiver};

/// A single-slot scratch record mirroring the fields of the most recent data item. It is the
/// terminal [`Receiver`] of a [`Reader`]'s parse cycles; its lifetime is one `read_next` cycle.
///
/// The string and byte slots are reused across items, so steady-state decoding of map keys and
/// short strings does not allocate.
#[derive(Debug)]
pub struct Receptacle {
    kind: ItemKind,
    bool_value: bool,
    int_value: i32,
    negative: bool,
    long_value: i64,
    float_value: f32,
    double_value: f64,
    string_value: String,
    bytes_value: Vec<u8>,
    tag_value: Tag,
}

impl Default for Receptacle {
    fn default() -> Receptacle {
        Receptacle {
            kind: ItemKind::EndOfInput,
            bool_value: false,
            int_value: 0,
            negative: false,
            long_value: 0,
            float_value: 0.0,
            double_value: 0.0,
            string_value: String::new(),
            bytes_value: Vec::new(),
            tag_value: Tag::Other(0),
        }
    }
}

impl Receptacle {
    /// The kind of the buffered item.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The buffered boolean.
    pub fn bool_value(&self) -> bool {
        self.bool_value
    }

    /// The buffered 32 bit integer (also the simple value).
    pub fn int_value(&self) -> i32 {
        self.int_value
    }

    /// The buffered 64 bit integer (also definite container lengths).
    pub fn long_value(&self) -> i64 {
        self.long_value
    }

    /// The buffered overlong: sign flag and magnitude.
    pub fn over_long(&self) -> (bool, u64) {
        (self.negative, self.long_value as u64)
    }

    /// The buffered single precision float (also holds widened halves).
    pub fn float_value(&self) -> f32 {
        self.float_value
    }

    /// The buffered double precision float.
    pub fn double_value(&self) -> f64 {
        self.double_value
    }

    /// The buffered text (or number token), reconstructed lazily from the reused slot.
    pub fn string_value(&self) -> &str {
        &self.string_value
    }

    /// The buffered byte string.
    pub fn bytes_value(&self) -> &[u8] {
        &self.bytes_value
    }

    /// The buffered tag.
    pub fn tag_value(&self) -> Tag {
        self.tag_value
    }

    fn take_string(&mut self) -> String {
        mem::take(&mut self.string_value)
    }

    fn take_bytes(&mut self) -> Vec<u8> {
        mem::take(&mut self.bytes_value)
    }

    fn set(&mut self, kind: ItemKind) -> Result<()> {
        self.kind = kind;
        Ok(())
    }
}

impl Receiver for Receptacle {
    fn on_null(&mut self) -> Result<()> {
        self.set(ItemKind::Null)
    }

    fn on_undefined(&mut self) -> Result<()> {
        self.set(ItemKind::Undefined)
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.bool_value = value;
        self.set(ItemKind::Boolean)
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        self.int_value = value;
        self.set(ItemKind::Int)
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        self.long_value = value;
        self.set(ItemKind::Long)
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        self.negative = negative;
        self.long_value = magnitude as i64;
        self.set(ItemKind::OverLong)
    }

    fn on_float16(&mut self, value: f16) -> Result<()> {
        self.float_value = f32::from(value);
        self.set(ItemKind::Float16)
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        self.float_value = value;
        self.set(ItemKind::Float)
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        self.double_value = value;
        self.set(ItemKind::Double)
    }

    fn on_number_string(&mut self, value: &str) -> Result<()> {
        self.string_value.clear();
        self.string_value.push_str(value);
        self.set(ItemKind::NumberString)
    }

    fn on_simple_value(&mut self, value: u8) -> Result<()> {
        self.int_value = i32::from(value);
        self.set(ItemKind::SimpleValue)
    }

    fn on_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.bytes_value.clear();
        self.bytes_value.extend_from_slice(value);
        self.set(ItemKind::Bytes)
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        self.set(ItemKind::BytesStart)
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        self.string_value.clear();
        self.string_value.push_str(value);
        self.set(ItemKind::Text)
    }

    fn on_text_start(&mut self) -> Result<()> {
        self.set(ItemKind::TextStart)
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.long_value = length as i64;
        self.set(ItemKind::ArrayHeader)
    }

    fn on_array_start(&mut self) -> Result<()> {
        self.set(ItemKind::ArrayStart)
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        self.long_value = length as i64;
        self.set(ItemKind::MapHeader)
    }

    fn on_map_start(&mut self) -> Result<()> {
        self.set(ItemKind::MapStart)
    }

    fn on_break(&mut self) -> Result<()> {
        self.set(ItemKind::Break)
    }

    fn on_tag(&mut self, tag: Tag) -> Result<()> {
        self.tag_value = tag;
        self.set(ItemKind::Tag)
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        self.set(ItemKind::EndOfInput)
    }
}

/// Per-container state: the number of data items still expected (definite), or `None` for an
/// indefinite container awaiting its break. Maps count 2×n items.
#[derive(Debug)]
struct ContainerFrame {
    remaining: Option<u64>,
    is_map: bool,
}

/// Typed decoding façade over a [`Parser`], a [`Receptacle`] and a [`DecodeConfig`].
///
/// `read_next` drives one data item cycle. The `try_read_*` helpers have peek semantics: a
/// non-matching item stays buffered in the receptacle for the next helper to inspect.
#[derive(Debug)]
pub struct Reader<P: Parser> {
    parser: P,
    recept: Receptacle,
    config: DecodeConfig,
    pending: bool,
    stack: Vec<ContainerFrame>,
}

impl<P: Parser> Reader<P> {
    /// Construct a reader with the default configuration.
    pub fn new(parser: P) -> Reader<P> {
        Reader::with_config(parser, DecodeConfig::default())
    }

    /// Construct a reader with an explicit configuration.
    pub fn with_config(parser: P, config: DecodeConfig) -> Reader<P> {
        Reader {
            parser,
            recept: Receptacle::default(),
            config,
            pending: false,
            stack: Vec::new(),
        }
    }

    /// The configuration of this decoding run.
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Recover the parser, e.g. to get at leftover input.
    pub fn into_parser(self) -> P {
        self.parser
    }

    /// Byte index of the start of the current data item.
    pub fn position(&self) -> u64 {
        self.parser.value_index()
    }

    /// Build an [`Error::InvalidInputData`] positioned at the current data item. Decoders use
    /// this for domain-level rejections (unknown keys, out-of-range values).
    pub fn error_invalid(&self, message: impl Into<String>) -> Error {
        Error::invalid(self.position(), message)
    }

    /// Wrap an arbitrary failure from application code, positioned at the current data item.
    pub fn error_general(
        &self,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Error {
        Error::general(self.position(), cause)
    }

    fn pull(&mut self) -> Result<ItemKind> {
        if !self.pending {
            if self.config.log_items {
                let mut tap = Logging::new(&mut self.recept);
                self.parser.read_next_data_item(&mut tap)?;
            } else {
                self.parser.read_next_data_item(&mut self.recept)?;
            }
            self.pending = true;
        }
        Ok(self.recept.kind())
    }

    /// Consume the pending item as one element of the enclosing container.
    fn consume_element(&mut self) -> Result<()> {
        self.pending = false;
        self.count_element()
    }

    /// Consume the pending item without element accounting (breaks, stream segments, tags).
    fn consume_raw(&mut self) {
        self.pending = false;
    }

    fn count_element(&mut self) -> Result<()> {
        if let Some(frame) = self.stack.last_mut() {
            if let Some(remaining) = frame.remaining.as_mut() {
                if *remaining == 0 {
                    return Err(Error::invalid(
                        self.parser.value_index(),
                        "definite length container holds no further elements",
                    ));
                }
                *remaining -= 1;
            }
        }
        Ok(())
    }

    fn mismatch<T>(&self, expected: &str) -> Result<T> {
        Err(Error::invalid(
            self.parser.value_index(),
            format!("expected {}, got {}", expected, self.recept.kind().name()),
        ))
    }

    /// Drive one data item cycle and return its kind. This is the low-level escape hatch; it
    /// performs no container element accounting.
    pub fn read_next(&mut self) -> Result<ItemKind> {
        let kind = self.pull()?;
        self.consume_raw();
        Ok(kind)
    }

    /// Read a boolean.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.pull()? {
            ItemKind::Boolean => {
                let value = self.recept.bool_value();
                self.consume_element()?;
                Ok(value)
            }
            _ => self.mismatch("boolean"),
        }
    }

    /// Read an integer fitting 32 bits.
    pub fn read_int(&mut self) -> Result<i32> {
        match self.pull()? {
            ItemKind::Int => {
                let value = self.recept.int_value();
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::NumberString => match self.recept.string_value().parse::<i32>() {
                Ok(value) => {
                    self.consume_element()?;
                    Ok(value)
                }
                Err(_) => self.mismatch("int"),
            },
            _ => self.mismatch("int"),
        }
    }

    /// Read an integer fitting 64 bits.
    pub fn read_long(&mut self) -> Result<i64> {
        match self.pull()? {
            ItemKind::Int => {
                let value = i64::from(self.recept.int_value());
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Long => {
                let value = self.recept.long_value();
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::NumberString => match self.recept.string_value().parse::<i64>() {
                Ok(value) => {
                    self.consume_element()?;
                    Ok(value)
                }
                Err(_) => self.mismatch("long"),
            },
            _ => self.mismatch("long"),
        }
    }

    /// Read a non-negative integer fitting 64 unsigned bits (accepting positive overlongs).
    pub fn read_u64(&mut self) -> Result<u64> {
        match self.pull()? {
            ItemKind::Int if self.recept.int_value() >= 0 => {
                let value = self.recept.int_value() as u64;
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Long if self.recept.long_value() >= 0 => {
                let value = self.recept.long_value() as u64;
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::OverLong => {
                let (negative, magnitude) = self.recept.over_long();
                if negative {
                    self.mismatch("unsigned integer")
                } else {
                    self.consume_element()?;
                    Ok(magnitude)
                }
            }
            ItemKind::NumberString => match self.recept.string_value().parse::<u64>() {
                Ok(value) => {
                    self.consume_element()?;
                    Ok(value)
                }
                Err(_) => self.mismatch("unsigned integer"),
            },
            _ => self.mismatch("unsigned integer"),
        }
    }

    /// Read an overlong: the sign flag and the magnitude in `[2^63, 2^64)`.
    pub fn read_over_long(&mut self) -> Result<(bool, u64)> {
        match self.pull()? {
            ItemKind::OverLong => {
                let value = self.recept.over_long();
                self.consume_element()?;
                Ok(value)
            }
            _ => self.mismatch("overlong integer"),
        }
    }

    /// Read a half precision float.
    pub fn read_float16(&mut self) -> Result<f16> {
        match self.pull()? {
            ItemKind::Float16 => {
                let value = f16::from_f32(self.recept.float_value());
                self.consume_element()?;
                Ok(value)
            }
            _ => self.mismatch("float16"),
        }
    }

    /// Read a single precision float, widening halves and narrowing small integers.
    pub fn read_float(&mut self) -> Result<f32> {
        match self.pull()? {
            ItemKind::Float16 | ItemKind::Float => {
                let value = self.recept.float_value();
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Int => {
                let value = self.recept.int_value() as f32;
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Long => {
                let value = self.recept.long_value() as f32;
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::NumberString => match self.recept.string_value().parse::<f32>() {
                Ok(value) => {
                    self.consume_element()?;
                    Ok(value)
                }
                Err(_) => self.mismatch("float"),
            },
            _ => self.mismatch("float"),
        }
    }

    /// Read a double precision float, widening every narrower numeric item.
    pub fn read_double(&mut self) -> Result<f64> {
        match self.pull()? {
            ItemKind::Double => {
                let value = self.recept.double_value();
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Float16 | ItemKind::Float => {
                let value = f64::from(self.recept.float_value());
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Int => {
                let value = f64::from(self.recept.int_value());
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::Long => {
                let value = self.recept.long_value() as f64;
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::NumberString => match self.recept.string_value().parse::<f64>() {
                Ok(value) => {
                    self.consume_element()?;
                    Ok(value)
                }
                Err(_) => self.mismatch("double"),
            },
            _ => self.mismatch("double"),
        }
    }

    /// Read a text string. An indefinite length text stream is assembled segment by segment
    /// into one logical string.
    pub fn read_string(&mut self) -> Result<String> {
        match self.pull()? {
            ItemKind::Text => {
                let value = self.recept.take_string();
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::TextStart => {
                self.consume_element()?;
                let mut value = String::new();
                loop {
                    match self.pull()? {
                        ItemKind::Text => {
                            value.push_str(self.recept.string_value());
                            self.consume_raw();
                        }
                        ItemKind::Break => {
                            self.consume_raw();
                            return Ok(value);
                        }
                        _ => return self.mismatch("text string segment"),
                    }
                }
            }
            _ => self.mismatch("text string"),
        }
    }

    /// Read a byte string. An indefinite length byte stream is assembled segment by segment.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        match self.pull()? {
            ItemKind::Bytes => {
                let value = self.recept.take_bytes();
                self.consume_element()?;
                Ok(value)
            }
            ItemKind::BytesStart => {
                self.consume_element()?;
                let mut value = Vec::new();
                loop {
                    match self.pull()? {
                        ItemKind::Bytes => {
                            value.extend_from_slice(self.recept.bytes_value());
                            self.consume_raw();
                        }
                        ItemKind::Break => {
                            self.consume_raw();
                            return Ok(value);
                        }
                        _ => return self.mismatch("byte string segment"),
                    }
                }
            }
            _ => self.mismatch("byte string"),
        }
    }

    /// Read a CBOR simple value.
    pub fn read_simple_value(&mut self) -> Result<u8> {
        match self.pull()? {
            ItemKind::SimpleValue => {
                let value = self.recept.int_value() as u8;
                self.consume_element()?;
                Ok(value)
            }
            _ => self.mismatch("simple value"),
        }
    }

    /// Read a tag. A tag does not count as a container element of its own: it modifies the item
    /// that follows.
    pub fn read_tag(&mut self) -> Result<Tag> {
        match self.pull()? {
            ItemKind::Tag => {
                let value = self.recept.tag_value();
                self.consume_raw();
                Ok(value)
            }
            _ => self.mismatch("tag"),
        }
    }

    /// Consume the expected tag if it is next; leave the item buffered otherwise.
    pub fn try_read_tag(&mut self, expected: Tag) -> Result<bool> {
        if self.pull()? == ItemKind::Tag && self.recept.tag_value() == expected {
            self.consume_raw();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Read a `null` item.
    pub fn read_null(&mut self) -> Result<()> {
        match self.pull()? {
            ItemKind::Null => {
                self.consume_element()?;
                Ok(())
            }
            _ => self.mismatch("null"),
        }
    }

    /// Consume a `null` item if it is next; leave the item buffered otherwise.
    pub fn try_read_null(&mut self) -> Result<bool> {
        if self.pull()? == ItemKind::Null {
            self.consume_element()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a break if it is next; leave the item buffered otherwise.
    pub fn try_read_break(&mut self) -> Result<bool> {
        if self.pull()? == ItemKind::Break {
            self.consume_raw();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// True when a break is next, without consuming it.
    pub fn peek_break(&mut self) -> Result<bool> {
        Ok(self.pull()? == ItemKind::Break)
    }

    /// Open an array expected to hold exactly `expected` elements. Returns the definite length,
    /// or `None` for an indefinite array (whose end is verified by [`Reader::read_array_close`]).
    pub fn read_array_open(&mut self, expected: u64) -> Result<Option<u64>> {
        match self.read_array_open_any()? {
            Some(length) if length != expected => Err(Error::invalid(
                self.parser.value_index(),
                format!("expected array of length {}, got {}", expected, length),
            )),
            other => Ok(other),
        }
    }

    /// Open an array of any length.
    pub fn read_array_open_any(&mut self) -> Result<Option<u64>> {
        match self.pull()? {
            ItemKind::ArrayHeader => {
                let length = self.recept.long_value() as u64;
                self.consume_element()?;
                self.stack.push(ContainerFrame {
                    remaining: Some(length),
                    is_map: false,
                });
                Ok(Some(length))
            }
            ItemKind::ArrayStart => {
                self.consume_element()?;
                self.stack.push(ContainerFrame {
                    remaining: None,
                    is_map: false,
                });
                Ok(None)
            }
            _ => self.mismatch("array"),
        }
    }

    /// Close the innermost open array: the element count must be exhausted (definite) or the
    /// next item must be the break (indefinite).
    pub fn read_array_close(&mut self) -> Result<()> {
        self.container_close(false)
    }

    /// Open a map of any length; `Some(n)` is the definite number of key/value pairs.
    pub fn read_map_open(&mut self) -> Result<Option<u64>> {
        match self.pull()? {
            ItemKind::MapHeader => {
                let pairs = self.recept.long_value() as u64;
                self.consume_element()?;
                self.stack.push(ContainerFrame {
                    remaining: Some(pairs * 2),
                    is_map: true,
                });
                Ok(Some(pairs))
            }
            ItemKind::MapStart => {
                self.consume_element()?;
                self.stack.push(ContainerFrame {
                    remaining: None,
                    is_map: true,
                });
                Ok(None)
            }
            _ => self.mismatch("map"),
        }
    }

    /// Close the innermost open map: see [`Reader::read_array_close`].
    pub fn read_map_close(&mut self) -> Result<()> {
        self.container_close(true)
    }

    fn container_close(&mut self, is_map: bool) -> Result<()> {
        let frame = match self.stack.pop() {
            Some(frame) if frame.is_map == is_map => frame,
            _ => {
                return Err(Error::invalid(
                    self.parser.value_index(),
                    if is_map {
                        "no map is open here"
                    } else {
                        "no array is open here"
                    },
                ))
            }
        };
        match frame.remaining {
            Some(0) => Ok(()),
            Some(remaining) => Err(Error::invalid(
                self.parser.value_index(),
                format!("{} container element(s) left unread", remaining),
            )),
            None => {
                if self.try_read_break()? {
                    Ok(())
                } else {
                    self.mismatch("break")
                }
            }
        }
    }

    /// Verify that the input is exhausted.
    pub fn read_end_of_input(&mut self) -> Result<()> {
        match self.pull()? {
            ItemKind::EndOfInput => {
                self.consume_raw();
                Ok(())
            }
            _ => self.mismatch("end of input"),
        }
    }

    /// Compare the next item against `target` through the parser's allocation-free fast path
    /// (or against the receptacle if an item is already buffered). Returns the sign of
    /// `item.cmp(target)`, or `i32::MIN` when the next item is not a comparable text item.
    pub fn try_read_text_compare(&mut self, target: &str) -> Result<i32> {
        if self.pending {
            match self.recept.kind() {
                ItemKind::Text => {
                    let ordering =
                        match self.recept.string_value().as_bytes().cmp(target.as_bytes()) {
                            std::cmp::Ordering::Less => -1,
                            std::cmp::Ordering::Equal => 0,
                            std::cmp::Ordering::Greater => 1,
                        };
                    if ordering == 0 {
                        self.consume_element()?;
                    }
                    Ok(ordering)
                }
                _ => Ok(i32::MIN),
            }
        } else {
            let result = self.parser.try_read_string_compare(target.as_bytes())?;
            if result == 0 {
                self.count_element()?;
            }
            Ok(result)
        }
    }

    /// Consume the next item if it is an integer equal to `value`; leave it buffered otherwise.
    pub fn try_read_long_compare(&mut self, value: i64) -> Result<bool> {
        let equal = match self.pull()? {
            ItemKind::Int => i64::from(self.recept.int_value()) == value,
            ItemKind::Long => self.recept.long_value() == value,
            ItemKind::NumberString => self.recept.string_value().parse::<i64>() == Ok(value),
            _ => false,
        };
        if equal {
            self.consume_element()?;
        }
        Ok(equal)
    }

    /// Diagnostic error for a map key (or sum type id) no decoder recognizes.
    pub fn unknown_key_error(&mut self) -> Error {
        match self.pull() {
            Ok(ItemKind::Text) => {
                let key = self.recept.string_value().to_owned();
                self.error_invalid(format!("unknown map key {:?}", key))
            }
            Ok(ItemKind::Int) | Ok(ItemKind::Long) => {
                self.error_invalid(format!("unknown map key {}", self.recept.long_or_int()))
            }
            Ok(ItemKind::EndOfInput) => {
                Error::unexpected_end_of_input(self.position(), "a map key")
            }
            Ok(other) => self.error_invalid(format!("unknown map key of kind {}", other.name())),
            Err(e) => e,
        }
    }
}

impl Receptacle {
    fn long_or_int(&self) -> i64 {
        if self.kind == ItemKind::Int {
            i64::from(self.int_value)
        } else {
            self.long_value
        }
    }
}
