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
 * unibor Error API
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use std::result;

use thiserror::Error;

/// An alias for Result<T, Error> used throughout this crate.
pub type Result<T> = result::Result<T, Error>;

/// `Error` provides information about failures while encoding or decoding. Every variant carries
/// the byte position in the originating input (or, for [`Error::Overflow`] on the encoding side,
/// the byte position in the output) at which the failure was detected.
///
/// Parser-level failures are terminal: once a parser has returned an error, it must be discarded
/// along with its input.
#[derive(Error, Debug)]
pub enum Error {
    /// More bytes were required to complete the current data item.
    #[error("unexpected end of input at position {position}: expected {expected}")]
    UnexpectedEndOfInput {
        /// Byte index at which input ran out.
        position: u64,
        /// Description of what was being read.
        expected: String,
    },
    /// The input bytes do not form a well-formed encoding, or a decoder met an item of an
    /// incompatible kind.
    #[error("invalid input data at position {position}: {message}")]
    InvalidInputData {
        /// Byte index of the offending item.
        position: u64,
        /// Description of the defect.
        message: String,
    },
    /// A length, size or numeric bound was exceeded.
    #[error("overflow at position {position}: {message}")]
    Overflow {
        /// Byte index of the offending item (or output size for encoding overflow).
        position: u64,
        /// Description of the exceeded bound.
        message: String,
    },
    /// The encoding is recognized but not supported here.
    #[error("unsupported at position {position}: {message}")]
    Unsupported {
        /// Byte index of the offending item.
        position: u64,
        /// Description of the unsupported construct.
        message: String,
    },
    /// An unexpected failure from application code (e.g. a user-supplied decoder), wrapped so
    /// that every error reaching the API boundary carries a position.
    #[error("failure at position {position}: {cause}")]
    General {
        /// Byte index of the item being processed when the failure occurred.
        position: u64,
        /// The wrapped failure.
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// The byte position carried by this error.
    pub fn position(&self) -> u64 {
        match self {
            Error::UnexpectedEndOfInput { position, .. }
            | Error::InvalidInputData { position, .. }
            | Error::Overflow { position, .. }
            | Error::Unsupported { position, .. }
            | Error::General { position, .. } => *position,
        }
    }

    pub(crate) fn unexpected_end_of_input(position: u64, expected: impl Into<String>) -> Self {
        Error::UnexpectedEndOfInput {
            position,
            expected: expected.into(),
        }
    }

    pub(crate) fn invalid(position: u64, message: impl Into<String>) -> Self {
        Error::InvalidInputData {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn overflow(position: u64, message: impl Into<String>) -> Self {
        Error::Overflow {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(position: u64, message: impl Into<String>) -> Self {
        Error::Unsupported {
            position,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary failure, attaching the given position.
    pub fn general(
        position: u64,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::General {
            position,
            cause: cause.into(),
        }
    }
}
