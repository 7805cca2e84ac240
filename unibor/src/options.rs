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
 * unibor decoding configuration
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/

/// Configuration for a decoding run. The defaults are safe for untrusted input.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Allow leftover bytes after the top-level value. When false (the default), the decode
    /// surface verifies that the input is exhausted after the value.
    pub prefix_only: bool,
    /// Upper bound for the length of a single definite byte string (or byte string chunk).
    pub max_byte_string_length: u64,
    /// Upper bound for the length of a single definite text string (or text string chunk).
    pub max_text_string_length: u64,
    /// Upper bound for the number of mantissa digits of a JSON number.
    pub max_number_mantissa_digits: u32,
    /// Upper bound for the absolute value of a JSON number exponent.
    pub max_number_abs_exponent: u32,
    /// Initial capacity of the JSON parser's scratch character buffer.
    pub initial_charbuffer_size: usize,
    /// Wrap the receiver in a [`Logging`](crate::types::Logging) tap which traces every data
    /// item through the `log` crate.
    pub log_items: bool,
}

impl Default for DecodeConfig {
    fn default() -> DecodeConfig {
        DecodeConfig {
            prefix_only: false,
            max_byte_string_length: 16 * 1024 * 1024,
            max_text_string_length: 16 * 1024 * 1024,
            max_number_mantissa_digits: 34,
            max_number_abs_exponent: 999,
            initial_charbuffer_size: 256,
            log_items: false,
        }
    }
}
