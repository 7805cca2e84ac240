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
 * unibor output sinks
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use std::mem;

use crate::error::{Error, Result};

/// A byte sink that renderers write into. Writes themselves are infallible; a sink that has a
/// size bound reports [`Error::Overflow`] from [`Output::into_result`].
pub trait Output {
    /// The value produced once rendering is complete.
    type Result;

    /// Append one byte.
    fn write_byte(&mut self, byte: u8);

    /// Append two bytes.
    fn write_double(&mut self, a: u8, b: u8);

    /// Append three bytes.
    fn write_triple(&mut self, a: u8, b: u8, c: u8);

    /// Append four bytes.
    fn write_quad(&mut self, a: u8, b: u8, c: u8, d: u8);

    /// Append a byte slice.
    fn write_slice(&mut self, bytes: &[u8]);

    /// Number of bytes written so far.
    fn size(&self) -> u64;

    /// Finish writing and produce the sink's result.
    fn into_result(self) -> Result<Self::Result>;
}

const DEFAULT_CHUNK_SIZE: usize = 4096;

/// An [`Output`] accumulating bytes in fixed-size chunks. The 1..4 byte writes go inline when
/// the current chunk has room and fall back byte-by-byte otherwise, appending a fresh chunk on
/// overflow. [`Output::into_result`] concatenates all chunks into one contiguous array; a total
/// size beyond 2^31 is an overflow error, matching the addressing limit of array-backed sinks.
#[derive(Debug)]
pub struct ChunkedByteOutput {
    full: Vec<Vec<u8>>,
    current: Vec<u8>,
    chunk_size: usize,
}

impl ChunkedByteOutput {
    /// Construct with the default chunk size.
    pub fn new() -> ChunkedByteOutput {
        ChunkedByteOutput::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Construct with a specific chunk size (at least 4 bytes, so that the inline fast paths
    /// are meaningful).
    pub fn with_chunk_size(chunk_size: usize) -> ChunkedByteOutput {
        assert!(chunk_size >= 4, "chunk size must be at least 4");
        ChunkedByteOutput {
            full: Vec::new(),
            current: Vec::with_capacity(chunk_size),
            chunk_size,
        }
    }

    fn room(&self) -> usize {
        self.chunk_size - self.current.len()
    }

    fn append_byte(&mut self, byte: u8) {
        if self.current.len() == self.chunk_size {
            let completed = mem::replace(&mut self.current, Vec::with_capacity(self.chunk_size));
            self.full.push(completed);
        }
        self.current.push(byte);
    }
}

impl Default for ChunkedByteOutput {
    fn default() -> Self {
        ChunkedByteOutput::new()
    }
}

impl Output for ChunkedByteOutput {
    type Result = Vec<u8>;

    fn write_byte(&mut self, byte: u8) {
        self.append_byte(byte);
    }

    fn write_double(&mut self, a: u8, b: u8) {
        if self.room() >= 2 {
            self.current.push(a);
            self.current.push(b);
        } else {
            self.append_byte(a);
            self.append_byte(b);
        }
    }

    fn write_triple(&mut self, a: u8, b: u8, c: u8) {
        if self.room() >= 3 {
            self.current.push(a);
            self.current.push(b);
            self.current.push(c);
        } else {
            self.append_byte(a);
            self.append_byte(b);
            self.append_byte(c);
        }
    }

    fn write_quad(&mut self, a: u8, b: u8, c: u8, d: u8) {
        if self.room() >= 4 {
            self.current.push(a);
            self.current.push(b);
            self.current.push(c);
            self.current.push(d);
        } else {
            self.append_byte(a);
            self.append_byte(b);
            self.append_byte(c);
            self.append_byte(d);
        }
    }

    fn write_slice(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.append_byte(b);
        }
    }

    fn size(&self) -> u64 {
        (self.full.len() * self.chunk_size + self.current.len()) as u64
    }

    fn into_result(self) -> Result<Vec<u8>> {
        let total = self.size();
        if total > i32::MAX as u64 {
            return Err(Error::overflow(
                total,
                "encoded output exceeds the 2^31 byte limit of array-backed sinks",
            ));
        }
        let mut out = Vec::with_capacity(total as usize);
        for chunk in &self.full {
            out.extend_from_slice(chunk);
        }
        out.extend_from_slice(&self.current);
        Ok(out)
    }
}
