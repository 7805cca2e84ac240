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
 * unibor compound input
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use std::collections::VecDeque;

use crate::constants::REWIND_WINDOW;
use crate::error::Result;
use crate::input::{ascii_render, BoundedInput, Input, PaddingProvider};

/// Read widths supported by the multi-byte primitives.
#[derive(Debug, Clone, Copy)]
enum Width {
    One,
    Two,
    Four,
    Eight,
}

impl Width {
    fn bytes(self) -> u32 {
        match self {
            Width::One => 1,
            Width::Two => 2,
            Width::Four => 4,
            Width::Eight => 8,
        }
    }
}

#[derive(Debug)]
struct Segment<I> {
    base: u64,
    input: I,
}

/// Presents a sequence of [`BoundedInput`] instances as one logical stream.
///
/// The current input is filled first; when it is exhausted in the middle of a multi-byte
/// primitive, the next input is fetched and the primitive is completed by combining the
/// big-endian prefix already read from the prior input with a padded read of the remaining bytes
/// from the new one. A backlog of consumed inputs is kept so that at least
/// [`REWIND_WINDOW`] bytes of history stay rewindable; older inputs are released from
/// [`Input::release_before_cursor`].
///
/// The state progression is: before the first fetch, no segment is live; afterwards exactly one
/// segment is current (with the retained predecessors behind it) until the iterator is drained
/// and the last segment runs out.
#[derive(Debug)]
pub struct CompoundInput<It, I>
where
    It: Iterator<Item = I>,
    I: BoundedInput,
{
    iter: It,
    segments: VecDeque<Segment<I>>,
    /// Index into `segments` of the segment containing the cursor.
    cur: usize,
    cursor: u64,
    drained: bool,
}

impl<It, I> CompoundInput<It, I>
where
    It: Iterator<Item = I>,
    I: BoundedInput,
{
    /// Compose `inputs` into one logical input.
    pub fn new<T>(inputs: T) -> CompoundInput<It, I>
    where
        T: IntoIterator<Item = I, IntoIter = It>,
    {
        CompoundInput {
            iter: inputs.into_iter(),
            segments: VecDeque::new(),
            cur: 0,
            cursor: 0,
            drained: false,
        }
    }

    fn seg_end(&self, index: usize) -> u64 {
        let seg = &self.segments[index];
        seg.base + seg.input.length()
    }

    fn stream_end(&self) -> u64 {
        match self.segments.back() {
            Some(seg) => seg.base + seg.input.length(),
            None => 0,
        }
    }

    fn history_start(&self) -> u64 {
        match self.segments.front() {
            Some(seg) => seg.base,
            None => self.cursor,
        }
    }

    /// Pull the next input from the iterator, appending it as the new frontier segment.
    fn fetch_next(&mut self) -> bool {
        if self.drained {
            return false;
        }
        match self.iter.next() {
            Some(input) => {
                let base = self.stream_end();
                self.segments.push_back(Segment { base, input });
                true
            }
            None => {
                self.drained = true;
                false
            }
        }
    }

    /// Bytes between the cursor and the end of the current segment.
    fn current_available(&self) -> u64 {
        if self.cur < self.segments.len() {
            self.seg_end(self.cur).saturating_sub(self.cursor)
        } else {
            0
        }
    }

    /// Step into the next segment (from the backlog, or freshly fetched). Only called when the
    /// current segment is exhausted.
    fn advance_segment(&mut self) -> bool {
        if !self.segments.is_empty() && self.cur + 1 < self.segments.len() {
            self.cur += 1;
            let seg = &mut self.segments[self.cur];
            let stale = seg.input.cursor();
            if stale != 0 {
                seg.input.move_cursor(-(stale as i64));
            }
            true
        } else if self.fetch_next() {
            self.cur = self.segments.len() - 1;
            true
        } else {
            false
        }
    }

    /// Read up to `width.bytes()` big-endian bytes, crossing any number of input boundaries and
    /// handing the accumulated partial value to `pp` if the whole stream runs out first.
    fn read_padded_value(&mut self, width: Width, pp: &mut dyn PaddingProvider) -> Result<u64> {
        let target = width.bytes();
        let mut acc = 0u64;
        let mut read = 0u32;
        while read < target {
            if self.current_available() == 0 && !self.advance_segment() {
                let pos = self.cursor;
                return match width {
                    Width::One => pp.pad_byte(pos).map(u64::from),
                    Width::Two => pp.pad_double_byte(pos, acc as u16, read).map(u64::from),
                    Width::Four => pp.pad_quad_byte(pos, acc as u32, read).map(u64::from),
                    Width::Eight => pp.pad_octa_byte(pos, acc, read),
                };
            }
            let take = self.current_available().min(u64::from(target - read)) as u32;
            let seg = &mut self.segments[self.cur];
            for _ in 0..take {
                acc = acc << 8 | u64::from(seg.input.read_byte());
            }
            self.cursor += u64::from(take);
            read += take;
        }
        Ok(acc)
    }
}

impl<It, I> Input for CompoundInput<It, I>
where
    It: Iterator<Item = I>,
    I: BoundedInput,
{
    fn cursor(&self) -> u64 {
        self.cursor
    }

    fn move_cursor(&mut self, offset: i64) {
        debug_assert!(
            (-(REWIND_WINDOW as i64 - 1)..=1).contains(&offset),
            "move_cursor offset {} out of contract",
            offset
        );
        let target = (self.cursor as i64 + offset) as u64;
        debug_assert!(
            target >= self.history_start() && target <= self.stream_end(),
            "move_cursor target {} outside the retained window",
            target
        );
        self.cursor = target;
        // Locate the segment containing the target and line its local cursor up. A target on a
        // boundary belongs to the following segment when one exists.
        let mut index = None;
        for i in 0..self.segments.len() {
            if self.segments[i].base <= target && target < self.seg_end(i) {
                index = Some(i);
                break;
            }
        }
        let index = match index {
            Some(i) => i,
            None => self.segments.len().saturating_sub(1),
        };
        if !self.segments.is_empty() {
            self.cur = index;
            let seg = &mut self.segments[index];
            let local_target = target - seg.base;
            let delta = local_target as i64 - seg.input.cursor() as i64;
            if delta != 0 {
                seg.input.move_cursor(delta);
            }
        }
    }

    fn read_byte(&mut self) -> u8 {
        if self.current_available() == 0 {
            let advanced = self.advance_segment();
            debug_assert!(advanced, "read past the end of a compound input");
        }
        let seg = &mut self.segments[self.cur];
        let byte = seg.input.read_byte();
        self.cursor += 1;
        byte
    }

    fn read_double_byte_be(&mut self) -> u16 {
        u16::from(self.read_byte()) << 8 | u16::from(self.read_byte())
    }

    fn read_quad_byte_be(&mut self) -> u32 {
        let mut acc = 0u32;
        for _ in 0..4 {
            acc = acc << 8 | u32::from(self.read_byte());
        }
        acc
    }

    fn read_octa_byte_be(&mut self) -> u64 {
        let mut acc = 0u64;
        for _ in 0..8 {
            acc = acc << 8 | u64::from(self.read_byte());
        }
        acc
    }

    fn read_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u8> {
        self.read_padded_value(Width::One, pp).map(|v| v as u8)
    }

    fn read_double_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u16> {
        self.read_padded_value(Width::Two, pp).map(|v| v as u16)
    }

    fn read_quad_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u32> {
        self.read_padded_value(Width::Four, pp).map(|v| v as u32)
    }

    fn read_octa_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u64> {
        self.read_padded_value(Width::Eight, pp)
    }

    fn read_bytes(&mut self, length: u64, pp: &mut dyn PaddingProvider) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(length.min(65536) as usize);
        let mut remaining = length;
        while remaining > 0 {
            if self.current_available() == 0 && !self.advance_segment() {
                return pp.pad_bytes(self.cursor, out, remaining);
            }
            let take = self.current_available().min(remaining);
            let seg = &mut self.segments[self.cur];
            for _ in 0..take {
                out.push(seg.input.read_byte());
            }
            self.cursor += take;
            remaining -= take;
        }
        Ok(out)
    }

    fn preceding_bytes_as_ascii_string(&mut self, length: usize) -> String {
        let history = (self.cursor - self.history_start()).min(255) as usize;
        let length = length.min(255).min(history);
        if length == 0 {
            return String::new();
        }
        self.move_cursor(-(length as i64));
        let mut bytes = Vec::with_capacity(length);
        for _ in 0..length {
            bytes.push(self.read_byte());
        }
        ascii_render(&bytes)
    }

    fn release_before_cursor(&mut self) {
        let keep_from = self.cursor.saturating_sub(REWIND_WINDOW);
        while self.segments.len() > 1 && self.cur > 0 && self.seg_end(0) <= keep_from {
            self.segments.pop_front();
            self.cur -= 1;
        }
    }
}
