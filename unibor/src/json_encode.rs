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
 * unibor JSON renderer
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use half::f16;

use crate::error::{Error, Result};
use crate::item::Tag;
use crate::output::Output;
use crate::receiver::Receiver;

#[derive(Debug)]
struct WriteLevel {
    is_map: bool,
    /// Total number of items this definite container will hold (2×n for maps); `None` while an
    /// indefinite container awaits its break.
    total: Option<u64>,
    items: u64,
}

/// A [`Receiver`] rendering data items as RFC8259 JSON text.
///
/// Definite containers close themselves once their declared item count has been written;
/// indefinite containers close on the break. Items JSON cannot represent (byte strings,
/// indefinite text, simple values, non-finite floats, non-text map keys) are rejected with
/// [`Error::Unsupported`]; tags carry no JSON representation and are skipped; `undefined`
/// renders as `null`.
#[derive(Debug)]
pub struct JsonRenderer<Out: Output> {
    out: Out,
    levels: Vec<WriteLevel>,
}

impl<Out: Output> JsonRenderer<Out> {
    /// Construct a renderer writing to `out`.
    pub fn new(out: Out) -> JsonRenderer<Out> {
        JsonRenderer {
            out,
            levels: Vec::new(),
        }
    }

    /// Recover the underlying output once rendering is complete.
    pub fn into_output(self) -> Out {
        self.out
    }

    /// Emit the separator this position calls for, rejecting non-text items in key position.
    fn before_item(&mut self, is_text: bool) -> Result<()> {
        if let Some(top) = self.levels.last() {
            if top.is_map {
                if top.items % 2 == 0 {
                    if !is_text {
                        return Err(Error::unsupported(
                            self.out.size(),
                            "JSON map keys must be text strings",
                        ));
                    }
                    if top.items > 0 {
                        self.out.write_byte(b',');
                    }
                } else {
                    self.out.write_byte(b':');
                }
            } else if top.items > 0 {
                self.out.write_byte(b',');
            }
        }
        Ok(())
    }

    /// Account for a completed item, closing definite containers whose count is reached (the
    /// closed container completes an item of its parent in turn).
    fn after_item(&mut self) {
        while let Some(top) = self.levels.last_mut() {
            top.items += 1;
            if top.total == Some(top.items) {
                let bracket = if top.is_map { b'}' } else { b']' };
                self.levels.pop();
                self.out.write_byte(bracket);
                continue;
            }
            break;
        }
    }

    fn open_container(&mut self, is_map: bool, total: Option<u64>) -> Result<()> {
        self.before_item(false)?;
        self.out.write_byte(if is_map { b'{' } else { b'[' });
        if total == Some(0) {
            self.out.write_byte(if is_map { b'}' } else { b']' });
            self.after_item();
        } else {
            self.levels.push(WriteLevel {
                is_map,
                total,
                items: 0,
            });
        }
        Ok(())
    }

    fn scalar(&mut self, text: &str) -> Result<()> {
        self.before_item(false)?;
        self.out.write_slice(text.as_bytes());
        self.after_item();
        Ok(())
    }

    fn write_escaped(&mut self, value: &str) {
        self.out.write_byte(b'"');
        for byte in value.as_bytes() {
            match byte {
                b'"' => self.out.write_double(b'\\', b'"'),
                b'\\' => self.out.write_double(b'\\', b'\\'),
                0x08 => self.out.write_double(b'\\', b'b'),
                0x0c => self.out.write_double(b'\\', b'f'),
                b'\n' => self.out.write_double(b'\\', b'n'),
                b'\r' => self.out.write_double(b'\\', b'r'),
                b'\t' => self.out.write_double(b'\\', b't'),
                control @ 0x00..=0x1f => {
                    const HEX: &[u8; 16] = b"0123456789abcdef";
                    self.out.write_quad(b'\\', b'u', b'0', b'0');
                    self.out.write_double(
                        HEX[usize::from(control >> 4)],
                        HEX[usize::from(control & 0x0f)],
                    );
                }
                other => self.out.write_byte(*other),
            }
        }
        self.out.write_byte(b'"');
    }

    fn unsupported(&self, what: &str) -> Error {
        Error::unsupported(self.out.size(), format!("{} cannot be represented in JSON", what))
    }
}

/// Format a double so that it parses back as a JSON number with a fraction part.
fn format_double(value: f64) -> String {
    let mut text = format!("{}", value);
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn format_float(value: f32) -> String {
    let mut text = format!("{}", value);
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl<Out: Output> Receiver for JsonRenderer<Out> {
    fn on_null(&mut self) -> Result<()> {
        self.scalar("null")
    }

    fn on_undefined(&mut self) -> Result<()> {
        self.scalar("null")
    }

    fn on_boolean(&mut self, value: bool) -> Result<()> {
        self.scalar(if value { "true" } else { "false" })
    }

    fn on_int(&mut self, value: i32) -> Result<()> {
        self.scalar(&value.to_string())
    }

    fn on_long(&mut self, value: i64) -> Result<()> {
        self.scalar(&value.to_string())
    }

    fn on_over_long(&mut self, negative: bool, magnitude: u64) -> Result<()> {
        if negative {
            let value = -1i128 - i128::from(magnitude);
            self.scalar(&value.to_string())
        } else {
            self.scalar(&magnitude.to_string())
        }
    }

    fn on_float16(&mut self, value: f16) -> Result<()> {
        self.on_float(f32::from(value))
    }

    fn on_float(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(self.unsupported("a non-finite float"));
        }
        self.scalar(&format_float(value))
    }

    fn on_double(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(self.unsupported("a non-finite float"));
        }
        self.scalar(&format_double(value))
    }

    fn on_number_string(&mut self, value: &str) -> Result<()> {
        self.scalar(value)
    }

    fn on_simple_value(&mut self, _value: u8) -> Result<()> {
        Err(self.unsupported("a simple value"))
    }

    fn on_bytes(&mut self, _value: &[u8]) -> Result<()> {
        Err(self.unsupported("a byte string"))
    }

    fn on_bytes_start(&mut self) -> Result<()> {
        Err(self.unsupported("an indefinite length byte string"))
    }

    fn on_text(&mut self, value: &str) -> Result<()> {
        self.before_item(true)?;
        self.write_escaped(value);
        self.after_item();
        Ok(())
    }

    fn on_text_start(&mut self) -> Result<()> {
        Err(self.unsupported("an indefinite length text string"))
    }

    fn on_array_header(&mut self, length: u64) -> Result<()> {
        self.open_container(false, Some(length))
    }

    fn on_array_start(&mut self) -> Result<()> {
        self.open_container(false, None)
    }

    fn on_map_header(&mut self, length: u64) -> Result<()> {
        let total = length.checked_mul(2).ok_or_else(|| {
            Error::overflow(self.out.size(), "map pair count overflows the item counter")
        })?;
        self.open_container(true, Some(total))
    }

    fn on_map_start(&mut self) -> Result<()> {
        self.open_container(true, None)
    }

    fn on_break(&mut self) -> Result<()> {
        match self.levels.pop() {
            Some(top) if top.total.is_none() => {
                if top.is_map && top.items % 2 != 0 {
                    return Err(Error::invalid(
                        self.out.size(),
                        "JSON object closed after a key without its value",
                    ));
                }
                self.out.write_byte(if top.is_map { b'}' } else { b']' });
                self.after_item();
                Ok(())
            }
            _ => Err(Error::invalid(
                self.out.size(),
                "break without an open indefinite length container",
            )),
        }
    }

    fn on_tag(&mut self, _tag: Tag) -> Result<()> {
        Ok(())
    }

    fn on_end_of_input(&mut self) -> Result<()> {
        Ok(())
    }
}
