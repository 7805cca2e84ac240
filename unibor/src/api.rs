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
 * unibor public encode/decode surface
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use crate::codec::Decode;
use crate::decode::Parser;
use crate::reader::Reader;

/// A decoding run bound to a parser; terminate it with [`DecodeOp::to`] or
/// [`DecodeOp::to_with_input`].
#[derive(Debug)]
pub struct DecodeOp<P: Parser> {
    reader: Reader<P>,
}

impl<P: Parser> DecodeOp<P> {
    fn new(reader: Reader<P>) -> DecodeOp<P> {
        DecodeOp { reader }
    }

    /// Decode one value of type `T`. Unless the configuration sets `prefix_only`, the input
    /// must be exhausted afterwards.
    pub fn to<T: Decode>(mut self) -> crate::error::Result<T> {
        let value = T::decode(&mut self.reader)?;
        if !self.reader.config().prefix_only {
            self.reader.read_end_of_input()?;
        }
        Ok(value)
    }

    /// Decode one value of type `T` and hand the parser back alongside it, so that leftover
    /// input can be inspected (pair this with the `prefix_only` option).
    pub fn to_with_input<T: Decode>(mut self) -> crate::error::Result<(T, P)> {
        let value = T::decode(&mut self.reader)?;
        if !self.reader.config().prefix_only {
            self.reader.read_end_of_input()?;
        }
        Ok((value, self.reader.into_parser()))
    }
}

/// Encoding to and decoding from the CBOR wire format.
pub mod cbor {
    use super::DecodeOp;
    use crate::codec::{Decode, Encode};
    use crate::decode::CborParser;
    use crate::encode::CborRenderer;
    use crate::error::Result;
    use crate::input::{Input, SliceInput};
    use crate::options::DecodeConfig;
    use crate::output::{ChunkedByteOutput, Output};
    use crate::reader::Reader;
    use crate::writer::Writer;

    /// A pending CBOR encoding of `value`; terminate it with [`EncodeOp::to`] or
    /// [`EncodeOp::to_bytes`].
    #[derive(Debug)]
    pub struct EncodeOp<'a, T: Encode> {
        value: &'a T,
    }

    impl<T: Encode> EncodeOp<'_, T> {
        /// Render into `out` and produce the sink's result.
        pub fn to<O: Output>(self, out: O) -> Result<O::Result> {
            let mut writer = Writer::new(CborRenderer::new(out));
            self.value.encode(&mut writer)?;
            writer.into_receiver().into_output().into_result()
        }

        /// Render into a fresh chunked byte output.
        pub fn to_bytes(self) -> Result<Vec<u8>> {
            self.to(ChunkedByteOutput::new())
        }
    }

    /// Start encoding `value` as CBOR.
    pub fn encode<T: Encode>(value: &T) -> EncodeOp<'_, T> {
        EncodeOp { value }
    }

    /// Start decoding CBOR from `input` with the default configuration.
    pub fn decode<In: Input>(input: In) -> DecodeOp<CborParser<In>> {
        decode_with(input, DecodeConfig::default())
    }

    /// Start decoding CBOR from `input` with an explicit configuration.
    pub fn decode_with<In: Input>(input: In, config: DecodeConfig) -> DecodeOp<CborParser<In>> {
        let parser = CborParser::with_config(input, config.clone());
        DecodeOp::new(Reader::with_config(parser, config))
    }

    /// Decode one value of type `T` from a byte slice.
    pub fn decode_slice<T: Decode>(bytes: &[u8]) -> Result<T> {
        decode(SliceInput::new(bytes)).to()
    }

    /// Decode one value of type `T` from a byte slice with an explicit configuration.
    pub fn decode_slice_with<T: Decode>(bytes: &[u8], config: DecodeConfig) -> Result<T> {
        decode_with(SliceInput::new(bytes), config).to()
    }
}

/// Encoding to and decoding from the JSON textual format.
pub mod json {
    use super::DecodeOp;
    use crate::codec::{Decode, Encode};
    use crate::error::{Error, Result};
    use crate::input::{Input, SliceInput};
    use crate::json_decode::JsonParser;
    use crate::json_encode::JsonRenderer;
    use crate::options::DecodeConfig;
    use crate::output::{ChunkedByteOutput, Output};
    use crate::reader::Reader;
    use crate::writer::Writer;

    /// A pending JSON encoding of `value`; terminate it with [`EncodeOp::to`],
    /// [`EncodeOp::to_bytes`] or [`EncodeOp::to_string`].
    #[derive(Debug)]
    pub struct EncodeOp<'a, T: Encode> {
        value: &'a T,
    }

    impl<T: Encode> EncodeOp<'_, T> {
        /// Render into `out` and produce the sink's result.
        pub fn to<O: Output>(self, out: O) -> Result<O::Result> {
            let mut writer = Writer::new(JsonRenderer::new(out));
            self.value.encode(&mut writer)?;
            writer.into_receiver().into_output().into_result()
        }

        /// Render into a fresh chunked byte output.
        pub fn to_bytes(self) -> Result<Vec<u8>> {
            self.to(ChunkedByteOutput::new())
        }

        /// Render to a `String`.
        pub fn to_string(self) -> Result<String> {
            let bytes = self.to_bytes()?;
            String::from_utf8(bytes).map_err(|e| Error::general(0, e))
        }
    }

    /// Start encoding `value` as JSON.
    pub fn encode<T: Encode>(value: &T) -> EncodeOp<'_, T> {
        EncodeOp { value }
    }

    /// Start decoding JSON from `input` with the default configuration.
    pub fn decode<In: Input>(input: In) -> DecodeOp<JsonParser<In>> {
        decode_with(input, DecodeConfig::default())
    }

    /// Start decoding JSON from `input` with an explicit configuration.
    pub fn decode_with<In: Input>(input: In, config: DecodeConfig) -> DecodeOp<JsonParser<In>> {
        let parser = JsonParser::with_config(input, config.clone());
        DecodeOp::new(Reader::with_config(parser, config))
    }

    /// Decode one value of type `T` from a byte slice.
    pub fn decode_slice<T: Decode>(bytes: &[u8]) -> Result<T> {
        decode(SliceInput::new(bytes)).to()
    }

    /// Decode one value of type `T` from a string.
    pub fn decode_str<T: Decode>(text: &str) -> Result<T> {
        decode_slice(text.as_bytes())
    }

    /// Decode one value of type `T` from a string with an explicit configuration.
    pub fn decode_str_with<T: Decode>(text: &str, config: DecodeConfig) -> Result<T> {
        decode_with(SliceInput::new(text.as_bytes()), config).to()
    }
}
