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
 * unibor streaming input
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use crate::constants::REWIND_WINDOW;
use crate::error::{Error, Result};

/// A strategy object supplying substitute content when an [`Input`] cannot satisfy a read.
///
/// For the multi-byte reads, the provider receives the bytes that were still available
/// (right-aligned in `partial`, with `read` holding their count) and must return a full-width
/// value or fail. For byte-slice reads it receives the partial prefix and the remaining
/// shortfall. Every method also receives the input's cursor so that failures can be positioned.
pub trait PaddingProvider {
    /// Provide a byte when none is available.
    fn pad_byte(&mut self, pos: u64) -> Result<u8>;

    /// Complete a two byte big-endian read for which only `read` (0..=1) bytes were available.
    fn pad_double_byte(&mut self, pos: u64, partial: u16, read: u32) -> Result<u16>;

    /// Complete a four byte big-endian read for which only `read` (0..=3) bytes were available.
    fn pad_quad_byte(&mut self, pos: u64, partial: u32, read: u32) -> Result<u32>;

    /// Complete an eight byte big-endian read for which only `read` (0..=7) bytes were available.
    fn pad_octa_byte(&mut self, pos: u64, partial: u64, read: u32) -> Result<u64>;

    /// Complete a byte-slice read: `prefix` holds the bytes that were available and `missing`
    /// the remaining shortfall.
    fn pad_bytes(&mut self, pos: u64, prefix: Vec<u8>, missing: u64) -> Result<Vec<u8>>;
}

/// The sentinel padding provider: any under-run fails the read with
/// [`Error::UnexpectedEndOfInput`]. This is what parsers install for all reads occurring inside
/// a data item, where running out of bytes is malformed input.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailPadding;

impl PaddingProvider for FailPadding {
    fn pad_byte(&mut self, pos: u64) -> Result<u8> {
        Err(Error::unexpected_end_of_input(pos, "1 byte"))
    }

    fn pad_double_byte(&mut self, pos: u64, _partial: u16, read: u32) -> Result<u16> {
        Err(Error::unexpected_end_of_input(
            pos,
            format!("{} more byte(s)", 2 - read),
        ))
    }

    fn pad_quad_byte(&mut self, pos: u64, _partial: u32, read: u32) -> Result<u32> {
        Err(Error::unexpected_end_of_input(
            pos,
            format!("{} more byte(s)", 4 - read),
        ))
    }

    fn pad_octa_byte(&mut self, pos: u64, _partial: u64, read: u32) -> Result<u64> {
        Err(Error::unexpected_end_of_input(
            pos,
            format!("{} more byte(s)", 8 - read),
        ))
    }

    fn pad_bytes(&mut self, pos: u64, _prefix: Vec<u8>, missing: u64) -> Result<Vec<u8>> {
        Err(Error::unexpected_end_of_input(
            pos,
            format!("{} more byte(s)", missing),
        ))
    }
}

/// A padding provider that completes any under-run with zero bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroPadding;

impl PaddingProvider for ZeroPadding {
    fn pad_byte(&mut self, _pos: u64) -> Result<u8> {
        Ok(0)
    }

    fn pad_double_byte(&mut self, _pos: u64, partial: u16, read: u32) -> Result<u16> {
        Ok(if read == 0 { 0 } else { partial << (8 * (2 - read)) })
    }

    fn pad_quad_byte(&mut self, _pos: u64, partial: u32, read: u32) -> Result<u32> {
        Ok(if read == 0 { 0 } else { partial << (8 * (4 - read)) })
    }

    fn pad_octa_byte(&mut self, _pos: u64, partial: u64, read: u32) -> Result<u64> {
        Ok(if read == 0 { 0 } else { partial << (8 * (8 - read)) })
    }

    fn pad_bytes(&mut self, _pos: u64, mut prefix: Vec<u8>, missing: u64) -> Result<Vec<u8>> {
        prefix.resize(prefix.len() + missing as usize, 0);
        Ok(prefix)
    }
}

/// A probe used at data item boundaries: the first byte of an item may legitimately be missing,
/// which is an `EndOfInput` item rather than an error. Only the single byte read records the
/// condition; any other under-run through this provider is malformed input.
#[derive(Debug, Default)]
pub(crate) struct EndOfInputProbe {
    pub(crate) end_of_input: bool,
}

impl PaddingProvider for EndOfInputProbe {
    fn pad_byte(&mut self, _pos: u64) -> Result<u8> {
        self.end_of_input = true;
        Ok(0)
    }

    fn pad_double_byte(&mut self, pos: u64, partial: u16, read: u32) -> Result<u16> {
        FailPadding.pad_double_byte(pos, partial, read)
    }

    fn pad_quad_byte(&mut self, pos: u64, partial: u32, read: u32) -> Result<u32> {
        FailPadding.pad_quad_byte(pos, partial, read)
    }

    fn pad_octa_byte(&mut self, pos: u64, partial: u64, read: u32) -> Result<u64> {
        FailPadding.pad_octa_byte(pos, partial, read)
    }

    fn pad_bytes(&mut self, pos: u64, prefix: Vec<u8>, missing: u64) -> Result<Vec<u8>> {
        FailPadding.pad_bytes(pos, prefix, missing)
    }
}

/// A pull interface over an unbounded byte source.
///
/// The unchecked reads are the fast path: the caller must have ensured that the requested bytes
/// are available. The padded variants yield control to a [`PaddingProvider`] when fewer bytes
/// remain than requested.
///
/// Implementations must cache at least the last [`REWIND_WINDOW`] bytes so that
/// [`Input::move_cursor`] can rewind within that range.
pub trait Input {
    /// The index of the next byte to be read.
    fn cursor(&self) -> u64;

    /// Move the cursor by `offset` bytes. The contract covers `offset` in `[-255, 1]`; moves
    /// beyond the rewind window are out of contract and undefined (a debug assertion fires).
    fn move_cursor(&mut self, offset: i64);

    /// Read one byte. The caller has ensured availability.
    fn read_byte(&mut self) -> u8;

    /// Read two bytes as a big-endian `u16`. The caller has ensured availability.
    fn read_double_byte_be(&mut self) -> u16;

    /// Read four bytes as a big-endian `u32`. The caller has ensured availability.
    fn read_quad_byte_be(&mut self) -> u32;

    /// Read eight bytes as a big-endian `u64`. The caller has ensured availability.
    fn read_octa_byte_be(&mut self) -> u64;

    /// Read one byte, or let `pp` provide it.
    fn read_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u8>;

    /// Read a big-endian `u16`, letting `pp` complete the value on under-run.
    fn read_double_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u16>;

    /// Read a big-endian `u32`, letting `pp` complete the value on under-run.
    fn read_quad_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u32>;

    /// Read a big-endian `u64`, letting `pp` complete the value on under-run.
    fn read_octa_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u64>;

    /// Read `length` bytes as an owned (possibly empty) slice, letting `pp` supply any
    /// shortfall.
    fn read_bytes(&mut self, length: u64, pp: &mut dyn PaddingProvider) -> Result<Vec<u8>>;

    /// Up to `length` (≤ 255) bytes preceding the cursor rendered as an ASCII string, with
    /// non-printable bytes replaced by `.`. For diagnostic context; the cursor does not move.
    fn preceding_bytes_as_ascii_string(&mut self, length: usize) -> String;

    /// Hook invoked by parsers after each completed data item: bytes before the cursor (outside
    /// the rewind window) may be reclaimed.
    fn release_before_cursor(&mut self) {}
}

/// An [`Input`] whose total length is known up front. Composition of inputs
/// ([`CompoundInput`](crate::io::CompoundInput)) requires this to compute split-read
/// availability.
pub trait BoundedInput: Input {
    /// Total number of bytes in this input.
    fn length(&self) -> u64;
}

pub(crate) fn ascii_render(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7e => b as char,
            _ => '.',
        })
        .collect()
}

/// An [`Input`] over a borrowed byte slice. The whole slice stays addressable, so rewinds are
/// supported over the entire consumed range, comfortably covering the contract window.
#[derive(Debug, Clone)]
pub struct SliceInput<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> SliceInput<'a> {
    /// Construct an input over `bytes` with the cursor at zero.
    pub fn new(bytes: &'a [u8]) -> SliceInput<'a> {
        SliceInput { bytes, cursor: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.cursor..self.cursor + N]);
        self.cursor += N;
        out
    }
}

impl Input for SliceInput<'_> {
    fn cursor(&self) -> u64 {
        self.cursor as u64
    }

    fn move_cursor(&mut self, offset: i64) {
        let target = self.cursor as i64 + offset;
        debug_assert!(
            (-(REWIND_WINDOW as i64 - 1)..=1).contains(&offset),
            "move_cursor offset {} out of contract",
            offset
        );
        debug_assert!(
            target >= 0 && target <= self.bytes.len() as i64,
            "move_cursor target {} out of bounds",
            target
        );
        self.cursor = target as usize;
    }

    fn read_byte(&mut self) -> u8 {
        let b = self.bytes[self.cursor];
        self.cursor += 1;
        b
    }

    fn read_double_byte_be(&mut self) -> u16 {
        u16::from_be_bytes(self.take())
    }

    fn read_quad_byte_be(&mut self) -> u32 {
        u32::from_be_bytes(self.take())
    }

    fn read_octa_byte_be(&mut self) -> u64 {
        u64::from_be_bytes(self.take())
    }

    fn read_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u8> {
        if self.remaining() >= 1 {
            Ok(self.read_byte())
        } else {
            pp.pad_byte(self.cursor())
        }
    }

    fn read_double_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u16> {
        let avail = self.remaining();
        if avail >= 2 {
            Ok(self.read_double_byte_be())
        } else {
            let mut partial = 0u16;
            for _ in 0..avail {
                partial = partial << 8 | u16::from(self.read_byte());
            }
            pp.pad_double_byte(self.cursor(), partial, avail as u32)
        }
    }

    fn read_quad_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u32> {
        let avail = self.remaining();
        if avail >= 4 {
            Ok(self.read_quad_byte_be())
        } else {
            let mut partial = 0u32;
            for _ in 0..avail {
                partial = partial << 8 | u32::from(self.read_byte());
            }
            pp.pad_quad_byte(self.cursor(), partial, avail as u32)
        }
    }

    fn read_octa_byte_padded(&mut self, pp: &mut dyn PaddingProvider) -> Result<u64> {
        let avail = self.remaining();
        if avail >= 8 {
            Ok(self.read_octa_byte_be())
        } else {
            let mut partial = 0u64;
            for _ in 0..avail {
                partial = partial << 8 | u64::from(self.read_byte());
            }
            pp.pad_octa_byte(self.cursor(), partial, avail as u32)
        }
    }

    fn read_bytes(&mut self, length: u64, pp: &mut dyn PaddingProvider) -> Result<Vec<u8>> {
        let avail = self.remaining() as u64;
        if avail >= length {
            let len = length as usize;
            let out = self.bytes[self.cursor..self.cursor + len].to_vec();
            self.cursor += len;
            Ok(out)
        } else {
            let prefix = self.bytes[self.cursor..].to_vec();
            self.cursor = self.bytes.len();
            pp.pad_bytes(self.cursor(), prefix, length - avail)
        }
    }

    fn preceding_bytes_as_ascii_string(&mut self, length: usize) -> String {
        let length = length.min(255).min(self.cursor);
        ascii_render(&self.bytes[self.cursor - length..self.cursor])
    }
}

impl BoundedInput for SliceInput<'_> {
    fn length(&self) -> u64 {
        self.bytes.len() as u64
    }
}
