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
 * unibor JSON parser
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use std::str::from_utf8;

use crate::constants::REWIND_WINDOW;
use crate::decode::Parser;
use crate::error::{Error, Result};
use crate::input::{EndOfInputProbe, FailPadding, Input};
use crate::item::ItemKind;
use crate::options::DecodeConfig;
use crate::receiver::Receiver;

const COMPARE_SPAN: u64 = REWIND_WINDOW - 16;

/// Nesting context of the token about to be read.
#[derive(Debug, Clone, Copy)]
enum Level {
    Array { first: bool },
    Object { first: bool, expect_value: bool },
}

/// The streaming JSON parser (RFC8259). It maps JSON onto the shared data item model: objects
/// and arrays become indefinite length maps/arrays terminated by breaks, strings become text
/// items, and numbers are surfaced lexically as `NumberString` items so that the typed reader
/// helpers can narrow them on demand.
#[derive(Debug)]
pub struct JsonParser<In: Input> {
    input: In,
    config: DecodeConfig,
    value_index: u64,
    levels: Vec<Level>,
    root_consumed: bool,
    scratch: Vec<u8>,
}

impl<In: Input> JsonParser<In> {
    /// Construct a parser with the default configuration.
    pub fn new(input: In) -> JsonParser<In> {
        JsonParser::with_config(input, DecodeConfig::default())
    }

    /// Construct a parser with an explicit configuration.
    pub fn with_config(input: In, config: DecodeConfig) -> JsonParser<In> {
        let scratch = Vec::with_capacity(config.initial_charbuffer_size);
        JsonParser {
            input,
            config,
            value_index: 0,
            levels: Vec::new(),
            root_consumed: false,
            scratch,
        }
    }

    /// Recover the underlying input, e.g. to inspect leftover bytes after a prefix decode.
    pub fn into_input(self) -> In {
        self.input
    }

    fn peek(&mut self) -> Result<Option<u8>> {
        let mut probe = EndOfInputProbe::default();
        let byte = self.input.read_byte_padded(&mut probe)?;
        if probe.end_of_input {
            Ok(None)
        } else {
            self.input.move_cursor(-1);
            Ok(Some(byte))
        }
    }

    fn bump(&mut self) {
        self.input.move_cursor(1);
    }

    fn next_byte(&mut self, expected: &'static str) -> Result<u8> {
        let pos = self.input.cursor();
        self.input
            .read_byte_padded(&mut FailPadding)
            .map_err(|_| Error::unexpected_end_of_input(pos, expected))
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        while let Some(byte) = self.peek()? {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => self.bump(),
                _ => break,
            }
        }
        Ok(())
    }

    fn invalid_here(&self, message: impl Into<String>) -> Error {
        Error::invalid(self.input.cursor(), message)
    }

    fn expect_literal(&mut self, rest: &'static [u8], what: &'static str) -> Result<()> {
        for &expected in rest {
            let byte = self.next_byte(what)?;
            if byte != expected {
                return Err(Error::invalid(
                    self.value_index,
                    format!("invalid literal, expected `{}`", what),
                ));
            }
        }
        Ok(())
    }

    /// Lex a string token (after the opening quote) into the scratch buffer, unescaping as it
    /// goes. The scratch holds UTF-8 on success.
    fn lex_string(&mut self) -> Result<()> {
        self.lex_string_bounded(None).map(|_| ())
    }

    /// As [`JsonParser::lex_string`], but when `bound` carries a comparison mark the scan stops
    /// with `Ok(false)` as soon as it would leave the rewind window measured from that mark.
    fn lex_string_bounded(&mut self, bound: Option<u64>) -> Result<bool> {
        self.scratch.clear();
        loop {
            if let Some(mark) = bound {
                if !self.within_span(mark) {
                    return Ok(false);
                }
            }
            if self.scratch.len() as u64 > self.config.max_text_string_length {
                return Err(Error::overflow(
                    self.value_index,
                    format!(
                        "string length exceeds the configured maximum of {}",
                        self.config.max_text_string_length
                    ),
                ));
            }
            let byte = self.next_byte("closing `\"`")?;
            match byte {
                b'"' => break,
                b'\\' => {
                    let escape = self.next_byte("escape character")?;
                    match escape {
                        b'"' => self.scratch.push(b'"'),
                        b'\\' => self.scratch.push(b'\\'),
                        b'/' => self.scratch.push(b'/'),
                        b'b' => self.scratch.push(0x08),
                        b'f' => self.scratch.push(0x0c),
                        b'n' => self.scratch.push(b'\n'),
                        b'r' => self.scratch.push(b'\r'),
                        b't' => self.scratch.push(b'\t'),
                        b'u' => {
                            let ch = self.lex_unicode_escape()?;
                            let mut buf = [0u8; 4];
                            self.scratch.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        }
                        other => {
                            return Err(self.invalid_here(format!(
                                "invalid escape character `{}`",
                                other as char
                            )))
                        }
                    }
                }
                0x00..=0x1f => {
                    return Err(self.invalid_here("unescaped control character in string"))
                }
                other => self.scratch.push(other),
            }
        }
        Ok(true)
    }

    /// Skip whitespace, giving up with `false` when the scan would leave the rewind window.
    fn skip_whitespace_bounded(&mut self, mark: u64) -> Result<bool> {
        while let Some(byte) = self.peek()? {
            match byte {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    if !self.within_span(mark) {
                        return Ok(false);
                    }
                    self.bump();
                }
                _ => break,
            }
        }
        Ok(true)
    }

    fn lex_hex_quad(&mut self) -> Result<u16> {
        let mut value = 0u16;
        for _ in 0..4 {
            let byte = self.next_byte("4 hex digits")?;
            let digit = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => return Err(self.invalid_here("invalid unicode escape digit")),
            };
            value = value << 4 | u16::from(digit);
        }
        Ok(value)
    }

    fn lex_unicode_escape(&mut self) -> Result<char> {
        let unit = self.lex_hex_quad()?;
        match unit {
            0xd800..=0xdbff => {
                // High surrogate: a low surrogate escape must follow.
                if self.next_byte("low surrogate")? != b'\\'
                    || self.next_byte("low surrogate")? != b'u'
                {
                    return Err(self.invalid_here("unpaired surrogate in unicode escape"));
                }
                let low = self.lex_hex_quad()?;
                if !(0xdc00..=0xdfff).contains(&low) {
                    return Err(self.invalid_here("unpaired surrogate in unicode escape"));
                }
                let code = 0x10000
                    + ((u32::from(unit) - 0xd800) << 10)
                    + (u32::from(low) - 0xdc00);
                char::from_u32(code)
                    .ok_or_else(|| self.invalid_here("invalid unicode escape"))
            }
            0xdc00..=0xdfff => Err(self.invalid_here("unpaired surrogate in unicode escape")),
            unit => char::from_u32(u32::from(unit))
                .ok_or_else(|| self.invalid_here("invalid unicode escape")),
        }
    }

    /// Lex a number token into the scratch buffer, enforcing the RFC8259 grammar and the
    /// configured mantissa/exponent bounds.
    fn lex_number(&mut self) -> Result<()> {
        self.scratch.clear();
        let mut mantissa_digits = 0u32;
        if self.peek()? == Some(b'-') {
            self.scratch.push(b'-');
            self.bump();
        }
        match self.peek()? {
            Some(b'0') => {
                self.scratch.push(b'0');
                self.bump();
                mantissa_digits += 1;
                if matches!(self.peek()?, Some(b'0'..=b'9')) {
                    return Err(Error::invalid(self.value_index, "leading zero in number"));
                }
            }
            Some(byte @ b'1'..=b'9') => {
                self.scratch.push(byte);
                self.bump();
                mantissa_digits += 1;
                while let Some(digit @ b'0'..=b'9') = self.peek()? {
                    self.scratch.push(digit);
                    self.bump();
                    mantissa_digits += 1;
                }
            }
            _ => return Err(Error::invalid(self.value_index, "invalid number")),
        }
        if self.peek()? == Some(b'.') {
            self.scratch.push(b'.');
            self.bump();
            let mut fraction_digits = 0u32;
            while let Some(digit @ b'0'..=b'9') = self.peek()? {
                self.scratch.push(digit);
                self.bump();
                fraction_digits += 1;
                mantissa_digits += 1;
            }
            if fraction_digits == 0 {
                return Err(Error::invalid(self.value_index, "truncated number fraction"));
            }
        }
        if matches!(self.peek()?, Some(b'e') | Some(b'E')) {
            self.scratch.push(b'e');
            self.bump();
            if matches!(self.peek()?, Some(b'+') | Some(b'-')) {
                // Unwrap-free: the peek above guarantees a byte.
                let sign = self.next_byte("exponent sign")?;
                self.scratch.push(sign);
            }
            let mut exponent = 0u64;
            let mut exponent_digits = 0u32;
            while let Some(digit @ b'0'..=b'9') = self.peek()? {
                self.scratch.push(digit);
                self.bump();
                exponent = (exponent * 10 + u64::from(digit - b'0')).min(1 << 32);
                exponent_digits += 1;
            }
            if exponent_digits == 0 {
                return Err(Error::invalid(self.value_index, "truncated number exponent"));
            }
            if exponent > u64::from(self.config.max_number_abs_exponent) {
                return Err(Error::overflow(
                    self.value_index,
                    format!(
                        "number exponent exceeds the configured maximum of {}",
                        self.config.max_number_abs_exponent
                    ),
                ));
            }
        }
        if mantissa_digits > self.config.max_number_mantissa_digits {
            return Err(Error::overflow(
                self.value_index,
                format!(
                    "number mantissa exceeds the configured maximum of {} digits",
                    self.config.max_number_mantissa_digits
                ),
            ));
        }
        Ok(())
    }

    fn scratch_str(&self) -> Result<&str> {
        from_utf8(&self.scratch)
            .map_err(|_| Error::invalid(self.value_index, "string is not valid UTF-8"))
    }

    fn mark_value_done(&mut self) {
        if self.levels.is_empty() {
            self.root_consumed = true;
        }
    }

    /// Parse one JSON value whose first byte is next in the input.
    fn parse_value(&mut self, receiver: &mut dyn Receiver) -> Result<ItemKind> {
        let byte = match self.peek()? {
            Some(byte) => byte,
            None => {
                return Err(Error::unexpected_end_of_input(
                    self.input.cursor(),
                    "a JSON value",
                ))
            }
        };
        match byte {
            b'{' => {
                self.bump();
                self.levels.push(Level::Object {
                    first: true,
                    expect_value: false,
                });
                receiver.on_map_start()?;
                Ok(ItemKind::MapStart)
            }
            b'[' => {
                self.bump();
                self.levels.push(Level::Array { first: true });
                receiver.on_array_start()?;
                Ok(ItemKind::ArrayStart)
            }
            b'"' => {
                self.bump();
                self.lex_string()?;
                let text = from_utf8(&self.scratch)
                    .map_err(|_| Error::invalid(self.value_index, "string is not valid UTF-8"))?;
                receiver.on_text(text)?;
                self.mark_value_done();
                Ok(ItemKind::Text)
            }
            b't' => {
                self.expect_literal(b"true", "true")?;
                receiver.on_boolean(true)?;
                self.mark_value_done();
                Ok(ItemKind::Boolean)
            }
            b'f' => {
                self.expect_literal(b"false", "false")?;
                receiver.on_boolean(false)?;
                self.mark_value_done();
                Ok(ItemKind::Boolean)
            }
            b'n' => {
                self.expect_literal(b"null", "null")?;
                receiver.on_null()?;
                self.mark_value_done();
                Ok(ItemKind::Null)
            }
            b'-' | b'0'..=b'9' => {
                self.lex_number()?;
                let token = self.scratch_str()?;
                receiver.on_number_string(token)?;
                self.mark_value_done();
                Ok(ItemKind::NumberString)
            }
            other => Err(Error::invalid(
                self.value_index,
                format!("unexpected character `{}`", other as char),
            )),
        }
    }

    fn rewind_to(&mut self, mark: u64) {
        let delta = mark as i64 - self.input.cursor() as i64;
        if delta != 0 {
            self.input.move_cursor(delta);
        }
    }

    /// True while the comparison scan is still within rewinding distance of `mark`.
    fn within_span(&self, mark: u64) -> bool {
        self.input.cursor() - mark <= COMPARE_SPAN
    }
}

impl<In: Input> Parser for JsonParser<In> {
    fn read_next_data_item(&mut self, receiver: &mut dyn Receiver) -> Result<ItemKind> {
        self.skip_whitespace()?;
        self.value_index = self.input.cursor();
        match self.levels.last().copied() {
            None => {
                if self.root_consumed {
                    match self.peek()? {
                        None => {
                            receiver.on_end_of_input()?;
                            Ok(ItemKind::EndOfInput)
                        }
                        Some(_) => Err(Error::invalid(
                            self.value_index,
                            "expected end of input after the top-level value",
                        )),
                    }
                } else {
                    self.parse_value(receiver)
                }
            }
            Some(Level::Array { first }) => {
                match self.peek()? {
                    None => Err(Error::unexpected_end_of_input(
                        self.input.cursor(),
                        "a value or `]`",
                    )),
                    Some(b']') => {
                        self.bump();
                        self.levels.pop();
                        self.mark_value_done();
                        receiver.on_break()?;
                        Ok(ItemKind::Break)
                    }
                    Some(_) => {
                        if !first {
                            if self.peek()? != Some(b',') {
                                return Err(self.invalid_here("expected `,` or `]`"));
                            }
                            self.bump();
                            self.skip_whitespace()?;
                            self.value_index = self.input.cursor();
                        }
                        let top = self.levels.len() - 1;
                        self.levels[top] = Level::Array { first: false };
                        self.parse_value(receiver)
                    }
                }
            }
            Some(Level::Object {
                first,
                expect_value: false,
            }) => match self.peek()? {
                None => Err(Error::unexpected_end_of_input(
                    self.input.cursor(),
                    "a key or `}`",
                )),
                Some(b'}') => {
                    self.bump();
                    self.levels.pop();
                    self.mark_value_done();
                    receiver.on_break()?;
                    Ok(ItemKind::Break)
                }
                Some(_) => {
                    if !first {
                        if self.peek()? != Some(b',') {
                            return Err(self.invalid_here("expected `,` or `}`"));
                        }
                        self.bump();
                        self.skip_whitespace()?;
                        self.value_index = self.input.cursor();
                    }
                    if self.peek()? != Some(b'"') {
                        return Err(self.invalid_here("expected an object key"));
                    }
                    self.bump();
                    self.lex_string()?;
                    let top = self.levels.len() - 1;
                    self.levels[top] = Level::Object {
                        first: false,
                        expect_value: true,
                    };
                    let key = from_utf8(&self.scratch)
                        .map_err(|_| Error::invalid(self.value_index, "string is not valid UTF-8"))?;
                    receiver.on_text(key)?;
                    Ok(ItemKind::Text)
                }
            },
            Some(Level::Object {
                expect_value: true, ..
            }) => {
                if self.peek()? != Some(b':') {
                    return Err(self.invalid_here("expected `:`"));
                }
                self.bump();
                self.skip_whitespace()?;
                self.value_index = self.input.cursor();
                let top = self.levels.len() - 1;
                self.levels[top] = Level::Object {
                    first: false,
                    expect_value: false,
                };
                self.parse_value(receiver)
            }
        }
    }

    fn try_read_string_compare(&mut self, target: &[u8]) -> Result<i32> {
        let mark = self.input.cursor();
        self.value_index = mark;

        // Structural prefix: whitespace plus the separator this position calls for. Everything
        // consumed here is rewound on any non-match.
        macro_rules! bail {
            () => {{
                self.rewind_to(mark);
                return Ok(i32::MIN);
            }};
        }
        if !self.skip_whitespace_bounded(mark)? {
            bail!();
        }
        let context = self.levels.last().copied();
        match context {
            None => {
                if self.root_consumed {
                    bail!();
                }
            }
            Some(Level::Array { first }) | Some(Level::Object { first, expect_value: false }) => {
                if !first {
                    if self.peek()? != Some(b',') {
                        bail!();
                    }
                    self.bump();
                    if !self.skip_whitespace_bounded(mark)? {
                        bail!();
                    }
                }
            }
            Some(Level::Object { expect_value: true, .. }) => {
                if self.peek()? != Some(b':') {
                    bail!();
                }
                self.bump();
                if !self.skip_whitespace_bounded(mark)? {
                    bail!();
                }
            }
        }
        if self.peek()? != Some(b'"') {
            bail!();
        }
        self.bump();

        // Unescape into the reused scratch buffer, bounded by the rewind window.
        if !self.lex_string_bounded(Some(mark))? {
            bail!();
        }
        self.scratch_str()?;

        let ordering = match self.scratch.as_slice().cmp(target) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        };
        if ordering != 0 {
            self.rewind_to(mark);
            return Ok(ordering);
        }

        // Committed: update the level state exactly as the generic read path would have.
        match context {
            None => self.root_consumed = true,
            Some(Level::Array { .. }) => {
                let top = self.levels.len() - 1;
                self.levels[top] = Level::Array { first: false };
            }
            Some(Level::Object { expect_value: false, .. }) => {
                let top = self.levels.len() - 1;
                self.levels[top] = Level::Object {
                    first: false,
                    expect_value: true,
                };
            }
            Some(Level::Object { expect_value: true, .. }) => {
                let top = self.levels.len() - 1;
                self.levels[top] = Level::Object {
                    first: false,
                    expect_value: false,
                };
            }
        }
        self.input.release_before_cursor();
        Ok(0)
    }

    fn value_index(&self) -> u64 {
        self.value_index
    }
}
