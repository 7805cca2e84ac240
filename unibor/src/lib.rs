/***************************************************************************************************
 * Copyright (c) 2023, 2024, Qualcomm Innovation Center, Inc. All rights reserved.
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of this software
 * and associated documentation files (the “Software”), to deal in the Software without
 * restriction, including without limitation the rights to use, copy, modify, merge, publish,
 * distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice (including the next
 * paragraph) shall be included in all copies or substantial portions of the
 * Software.
 *
 * THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING
 * BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
 * NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
 * DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 **************************************************************************************************/
/***************************************************************************************************
 * unibor module definition
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/

#![warn(missing_docs)]

//! # UNIBOR
//!
//! The `unibor` crate provides a streaming (de)serialization engine for two wire formats: CBOR
//! ([RFC 8949](https://datatracker.ietf.org/doc/rfc8949/)) and JSON
//! ([RFC 8259](https://datatracker.ietf.org/doc/rfc8259/)). Both formats are bridged by one
//! abstract *data item* model: a parser decomposes bytes into a stream of data items delivered
//! through the [`types::Receiver`] callback protocol, and a renderer is simply a receiver that
//! writes items back out as bytes. Everything above that line — the typed
//! [`decoder::Reader`]/[`encoder::Writer`] façades and the [`Encode`]/[`Decode`] codec layer —
//! is format agnostic.
//!
//! ## Features
//!
//! - All CBOR item kinds: integers (including the full unsigned 64 bit range via overlong
//!   items), half/single/double floats, byte and text strings (definite and indefinite),
//!   arrays, maps, tags and simple values.
//! - Streaming inputs with padding semantics, including composition of multiple inputs into one
//!   logical stream with a bounded rewind window.
//! - A chunked byte output that assembles the encoding without reallocation.
//! - Allocation-free comparison of incoming text items against expected map keys, giving
//!   derived map codecs O(keys) dispatch.
//! - A [`codec!`] macro deriving array-, map- and sum-shaped codecs for user types, with
//!   build-time detection of key collisions.
//!
//! ## Encoding and decoding
//!
//! ```
//! use unibor::{cbor, codec, json};
//!
//! #[derive(Debug, PartialEq)]
//! struct Claim {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//! codec!(struct Claim { id: u32, name: String, active: bool });
//!
//! fn main() -> Result<(), unibor::Error> {
//!     let claim = Claim {
//!         id: 7,
//!         name: "probe".to_string(),
//!         active: true,
//!     };
//!
//!     // CBOR: a three element array.
//!     let bytes = cbor::encode(&claim).to_bytes()?;
//!     assert_eq!(bytes[0], 0x83);
//!     let back: Claim = cbor::decode_slice(&bytes)?;
//!     assert_eq!(back, claim);
//!
//!     // The same value through JSON.
//!     let text = json::encode(&claim).to_string()?;
//!     assert_eq!(text, "[7,\"probe\",true]");
//!     let back: Claim = json::decode_str(&text)?;
//!     assert_eq!(back, claim);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Decoding accepts a [`decoder::DecodeConfig`] with bounds for untrusted input (string
//! lengths, JSON number size), the `prefix_only` switch for decoding a value off the front of a
//! longer stream, and a receiver tap that traces every data item through the `log` crate.

pub(crate) mod api;
pub(crate) mod codec;
pub(crate) mod compound;
pub(crate) mod constants;
pub(crate) mod decode;
pub(crate) mod derive;
pub(crate) mod encode;
pub(crate) mod input;
pub(crate) mod item;
pub(crate) mod json_decode;
pub(crate) mod json_encode;
pub(crate) mod options;
pub(crate) mod output;
pub(crate) mod reader;
pub(crate) mod receiver;
pub(crate) mod writer;

/// The `error` module contains the positioned error type used throughout `unibor`.
pub mod error;

/// The `types` module exports the data item model: item kinds, tags, simple values, the
/// [`types::Receiver`] protocol and the codec wrapper types.
pub mod types {
    pub use super::codec::{ByteString, EpochTime, Nullable};
    pub use super::derive::{KeyArg, MapKey};
    pub use super::item::{ItemKind, SimpleValue, Tag};
    pub use super::receiver::{Logging, Receiver};
}

/// The `decoder` module exports the parsers for both wire formats and the typed
/// [`decoder::Reader`] façade driving them.
pub mod decoder {
    pub use super::decode::{CborParser, Parser};
    pub use super::json_decode::JsonParser;
    pub use super::options::DecodeConfig;
    pub use super::reader::{Reader, Receptacle};
}

/// The `encoder` module exports the renderers for both wire formats and the typed
/// [`encoder::Writer`] façade driving them.
pub mod encoder {
    pub use super::encode::CborRenderer;
    pub use super::json_encode::JsonRenderer;
    pub use super::writer::Writer;
}

/// The `io` module exports the streaming input and output abstractions.
pub mod io {
    pub use super::compound::CompoundInput;
    pub use super::input::{
        BoundedInput, FailPadding, Input, PaddingProvider, SliceInput, ZeroPadding,
    };
    pub use super::output::{ChunkedByteOutput, Output};
}

pub use api::{cbor, json, DecodeOp};
pub use codec::{ByteString, Decode, Encode, EpochTime, Nullable};
pub use derive::{assert_distinct_keys, KeyArg, MapKey};
pub use error::{Error, Result};
