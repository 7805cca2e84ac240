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
 * unibor codec layer
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use chrono::{DateTime, FixedOffset};
use half::f16;

use crate::decode::Parser;
use crate::error::Result;
use crate::item::{SimpleValue, Tag};
use crate::reader::Reader;
use crate::receiver::Receiver;
use crate::writer::Writer;

/// The encoding half of a codec: describe `self` to a [`Writer`] as a sequence of data items.
///
/// For every type taking part in (de)serialization there is exactly one `Encode` and one
/// [`Decode`] implementation; the [`codec!`] macro derives them for products and sums.
///
/// [`codec!`]: macro@crate::codec
pub trait Encode {
    /// Write `self` as data items.
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()>;
}

/// The decoding half of a codec: rebuild a value from the data items a [`Reader`] delivers.
pub trait Decode: Sized {
    /// Read one value.
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Self>;
}

impl Encode for bool {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_bool(*self)
    }
}

impl Decode for bool {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<bool> {
        reader.read_bool()
    }
}

macro_rules! small_int_codec {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
                    writer.write_int(i32::from(*self))
                }
            }

            impl Decode for $t {
                fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<$t> {
                    let value = reader.read_int()?;
                    <$t>::try_from(value).map_err(|_| {
                        reader.error_invalid(format!(
                            "integer {} is out of range for {}",
                            value,
                            stringify!($t)
                        ))
                    })
                }
            }
        )*
    };
}

small_int_codec!(i8, i16, u8, u16);

impl Encode for i32 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_int(*self)
    }
}

impl Decode for i32 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<i32> {
        reader.read_int()
    }
}

impl Encode for u32 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_long(i64::from(*self))
    }
}

impl Decode for u32 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<u32> {
        let value = reader.read_long()?;
        u32::try_from(value)
            .map_err(|_| reader.error_invalid(format!("integer {} is out of range for u32", value)))
    }
}

impl Encode for i64 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_long(*self)
    }
}

impl Decode for i64 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<i64> {
        reader.read_long()
    }
}

/// Values above `i64::MAX` travel as overlong items; everything else as int/long.
impl Encode for u64 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        if *self <= i64::MAX as u64 {
            writer.write_long(*self as i64)
        } else {
            writer.write_over_long(false, *self)
        }
    }
}

impl Decode for u64 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<u64> {
        reader.read_u64()
    }
}

impl Encode for f16 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_float16(*self)
    }
}

impl Decode for f16 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<f16> {
        reader.read_float16()
    }
}

impl Encode for f32 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_float(*self)
    }
}

impl Decode for f32 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<f32> {
        reader.read_float()
    }
}

impl Encode for f64 {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_double(*self)
    }
}

impl Decode for f64 {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<f64> {
        reader.read_double()
    }
}

impl Encode for str {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_string(self)
    }
}

impl Encode for &str {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_string(self)
    }
}

impl Encode for String {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_string(self)
    }
}

impl Decode for String {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<String> {
        reader.read_string()
    }
}

impl Encode for SimpleValue {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_simple_value(self.value())
    }
}

impl Decode for SimpleValue {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<SimpleValue> {
        reader.read_simple_value().map(SimpleValue::from_unchecked)
    }
}

/// `None` is a `null` item; `Some` is the bare value.
impl<T: Encode> Encode for Option<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        match self {
            None => writer.write_null(),
            Some(value) => value.encode(writer),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Option<T>> {
        if reader.try_read_null()? {
            Ok(None)
        } else {
            T::decode(reader).map(Some)
        }
    }
}

/// A wrapper whose decoder turns a `null` item into the inner type's default value. Encoding
/// writes the inner value unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nullable<T>(pub T);

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Nullable<T> {
        Nullable(value)
    }
}

impl<T: Encode> Encode for Nullable<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        self.0.encode(writer)
    }
}

impl<T: Decode + Default> Decode for Nullable<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Nullable<T>> {
        if reader.try_read_null()? {
            Ok(Nullable(T::default()))
        } else {
            T::decode(reader).map(Nullable)
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_array_header(self.len() as u64)?;
        for element in self {
            element.encode(writer)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Vec<T>> {
        let mut out = Vec::new();
        match reader.read_array_open_any()? {
            Some(length) => {
                for _ in 0..length {
                    out.push(T::decode(reader)?);
                }
            }
            None => {
                while !reader.peek_break()? {
                    out.push(T::decode(reader)?);
                }
            }
        }
        reader.read_array_close()?;
        Ok(out)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        (**self).encode(writer)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<Box<T>> {
        T::decode(reader).map(Box::new)
    }
}

/// A byte string. A dedicated wrapper keeps byte strings apart from `Vec<T>` arrays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteString(pub Vec<u8>);

impl Encode for ByteString {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_bytes(&self.0)
    }
}

impl Decode for ByteString {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<ByteString> {
        reader.read_bytes().map(ByteString)
    }
}

/// Tag 0: an RFC3339 date/time string. In JSON (where tags do not exist) the bare string form
/// is used, so decoding treats the tag as optional.
impl Encode for DateTime<FixedOffset> {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_tag(Tag::DateTimeString)?;
        writer.write_string(&self.to_rfc3339())
    }
}

impl Decode for DateTime<FixedOffset> {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<DateTime<FixedOffset>> {
        reader.try_read_tag(Tag::DateTimeString)?;
        let text = reader.read_string()?;
        DateTime::parse_from_rfc3339(&text).map_err(|e| reader.error_general(e))
    }
}

/// Tag 1: an epoch-based date/time carried as whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpochTime(pub i64);

impl Encode for EpochTime {
    fn encode<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        writer.write_tag(Tag::EpochDateTime)?;
        writer.write_long(self.0)
    }
}

impl Decode for EpochTime {
    fn decode<P: Parser>(reader: &mut Reader<P>) -> Result<EpochTime> {
        reader.try_read_tag(Tag::EpochDateTime)?;
        reader.read_long().map(EpochTime)
    }
}
