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
 * unibor codec derivation
 *
 * A streaming, memory efficient, serializer and deserializer for CBOR (RFC8949) and JSON
 * (RFC8259) built around a single data item model shared between both formats.
 **************************************************************************************************/
use crate::decode::Parser;
use crate::error::Result;
use crate::reader::Reader;
use crate::receiver::Receiver;
use crate::writer::Writer;

/// A map key or sum type id used by derived codecs: either a string or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKey {
    /// A text string key.
    Text(&'static str),
    /// An integer key.
    Long(i64),
}

impl MapKey {
    /// Write this key as a data item.
    pub fn write<R: Receiver>(&self, writer: &mut Writer<R>) -> Result<()> {
        match self {
            MapKey::Text(text) => writer.write_string(text),
            MapKey::Long(value) => writer.write_long(*value),
        }
    }

    /// Consume the next item if it equals this key, routing text keys through the parser's
    /// allocation-free comparison fast path. A non-matching item stays buffered.
    pub fn try_matches<P: Parser>(&self, reader: &mut Reader<P>) -> Result<bool> {
        match self {
            MapKey::Text(text) => Ok(reader.try_read_text_compare(text)? == 0),
            MapKey::Long(value) => reader.try_read_long_compare(*value),
        }
    }
}

/// Helper for spelling [`MapKey`] constants from either a string or an integer literal (the two
/// argument shapes a key annotation accepts). The inherent impl per argument type stands in for
/// overloading, and stays const-evaluable so derived codecs can collision-check their keys at
/// build time.
#[derive(Debug, Clone, Copy)]
pub struct KeyArg<T>(pub T);

impl KeyArg<&'static str> {
    /// The key for a string argument.
    pub const fn to_key(self) -> MapKey {
        MapKey::Text(self.0)
    }
}

impl KeyArg<i64> {
    /// The key for an integer argument.
    pub const fn to_key(self) -> MapKey {
        MapKey::Long(self.0)
    }
}

const fn key_eq(a: &MapKey, b: &MapKey) -> bool {
    match (a, b) {
        (MapKey::Text(x), MapKey::Text(y)) => {
            let x = x.as_bytes();
            let y = y.as_bytes();
            if x.len() != y.len() {
                return false;
            }
            let mut i = 0;
            while i < x.len() {
                if x[i] != y[i] {
                    return false;
                }
                i += 1;
            }
            true
        }
        (MapKey::Long(x), MapKey::Long(y)) => *x == *y,
        _ => false,
    }
}

/// Verify at const evaluation time that no two derived keys (or sum type ids) collide. A
/// collision aborts the build.
pub const fn assert_distinct_keys(keys: &[MapKey]) {
    let mut i = 0;
    while i < keys.len() {
        let mut j = i + 1;
        while j < keys.len() {
            if key_eq(&keys[i], &keys[j]) {
                panic!("derived codec declares the same key twice");
            }
            j += 1;
        }
        i += 1;
    }
}

/// Derive an [`Encode`](crate::Encode)/[`Decode`](crate::Decode) pair for a product or sum type.
///
/// # Products
///
/// `codec!(struct Foo { a: A, b: B })` maps a struct to an array of its field values. A struct
/// with exactly one field is encoded as the bare field value, and one with no fields as an
/// empty array.
///
/// `codec!(map struct Foo { a: A => "key", b: B => 7, c: C })` uses the map representation
/// instead: each field is a key/value entry, keyed by the given string or integer (default: the
/// field name). Decoding accepts the entries in any order and rejects unknown, duplicate and
/// missing keys; string keys are matched through the comparison fast path without allocating.
///
/// # Sums
///
/// `codec!(enum Shape { Circle(Circle) => "circle", Rect(Rect), Point => 7 })` maps each
/// variant to the two-element array `[type_id, payload]`. The type id defaults to the variant
/// name; a unit variant carries an empty array payload.
///
/// Key or type id collisions within one type fail the build during const evaluation.
///
/// # Example
///
/// ```
/// use unibor::{cbor, codec};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// codec!(struct Point { x: i32, y: i32 });
///
/// let bytes = cbor::encode(&Point { x: 1, y: -2 }).to_bytes().unwrap();
/// assert_eq!(bytes, [0x82, 0x01, 0x21]);
/// let point: Point = cbor::decode_slice(&bytes).unwrap();
/// assert_eq!(point, Point { x: 1, y: -2 });
/// ```
#[macro_export]
macro_rules! codec {
    // Internal rules ------------------------------------------------------------------------

    (@key $id:ident $key:literal) => {
        $crate::KeyArg($key).to_key()
    };
    (@key $id:ident) => {
        $crate::KeyArg(stringify!($id)).to_key()
    };
    (@unit $id:ident) => {
        ()
    };

    (@sum_encode $self:expr, $w:ident, $key:expr, $name:ident, $variant:ident, ( $vty:ty )) => {
        if let $name::$variant(__value) = $self {
            $w.write_array_header(2)?;
            $key.write($w)?;
            <$vty as $crate::Encode>::encode(__value, $w)?;
            return ::core::result::Result::Ok(());
        }
    };
    (@sum_encode $self:expr, $w:ident, $key:expr, $name:ident, $variant:ident, ( )) => {
        if let $name::$variant = $self {
            $w.write_array_header(2)?;
            $key.write($w)?;
            $w.write_array_header(0)?;
            return ::core::result::Result::Ok(());
        }
    };

    (@sum_decode $r:ident, $key:expr, $name:ident, $variant:ident, ( $vty:ty )) => {
        if $key.try_matches($r)? {
            let __value = <$vty as $crate::Decode>::decode($r)?;
            $r.read_array_close()?;
            return ::core::result::Result::Ok($name::$variant(__value));
        }
    };
    (@sum_decode $r:ident, $key:expr, $name:ident, $variant:ident, ( )) => {
        if $key.try_matches($r)? {
            $r.read_array_open(0)?;
            $r.read_array_close()?;
            $r.read_array_close()?;
            return ::core::result::Result::Ok($name::$variant);
        }
    };

    // Product, single field: encoded as the bare field value ---------------------------------

    (struct $name:ident { $field:ident : $ty:ty $(,)? }) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::types::Receiver>(
                &self,
                writer: &mut $crate::encoder::Writer<R>,
            ) -> $crate::Result<()> {
                <$ty as $crate::Encode>::encode(&self.$field, writer)
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::decoder::Parser>(
                reader: &mut $crate::decoder::Reader<P>,
            ) -> $crate::Result<Self> {
                ::core::result::Result::Ok($name {
                    $field: <$ty as $crate::Decode>::decode(reader)?,
                })
            }
        }
    };

    // Product, array representation ----------------------------------------------------------

    (struct $name:ident { $( $field:ident : $ty:ty ),* $(,)? }) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::types::Receiver>(
                &self,
                writer: &mut $crate::encoder::Writer<R>,
            ) -> $crate::Result<()> {
                const FIELDS: u64 = (&[ $( $crate::codec!(@unit $field) ),* ] as &[()]).len() as u64;
                writer.write_array_header(FIELDS)?;
                $( <$ty as $crate::Encode>::encode(&self.$field, writer)?; )*
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::decoder::Parser>(
                reader: &mut $crate::decoder::Reader<P>,
            ) -> $crate::Result<Self> {
                const FIELDS: u64 = (&[ $( $crate::codec!(@unit $field) ),* ] as &[()]).len() as u64;
                reader.read_array_open(FIELDS)?;
                let value = $name {
                    $( $field: <$ty as $crate::Decode>::decode(reader)? ),*
                };
                reader.read_array_close()?;
                ::core::result::Result::Ok(value)
            }
        }
    };

    // Product, map representation ------------------------------------------------------------

    (map struct $name:ident { $( $field:ident : $ty:ty $( => $key:literal )? ),* $(,)? }) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::types::Receiver>(
                &self,
                writer: &mut $crate::encoder::Writer<R>,
            ) -> $crate::Result<()> {
                const FIELDS: u64 = (&[ $( $crate::codec!(@unit $field) ),* ] as &[()]).len() as u64;
                const KEYS: &[$crate::MapKey] = &[ $( $crate::codec!(@key $field $( $key )?) ),* ];
                const _: () = $crate::assert_distinct_keys(KEYS);
                writer.write_map_header(FIELDS)?;
                let mut __key_index = 0usize;
                $(
                    KEYS[__key_index].write(writer)?;
                    <$ty as $crate::Encode>::encode(&self.$field, writer)?;
                    __key_index += 1;
                )*
                let _ = __key_index;
                ::core::result::Result::Ok(())
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::decoder::Parser>(
                reader: &mut $crate::decoder::Reader<P>,
            ) -> $crate::Result<Self> {
                const KEYS: &[$crate::MapKey] = &[ $( $crate::codec!(@key $field $( $key )?) ),* ];
                const _: () = $crate::assert_distinct_keys(KEYS);
                let pairs = reader.read_map_open()?;
                $( let mut $field: ::core::option::Option<$ty> = ::core::option::Option::None; )*
                let mut __read_entry =
                    |reader: &mut $crate::decoder::Reader<P>| -> $crate::Result<()> {
                        let mut __key_index = 0usize;
                        let mut __matched = false;
                        $(
                            if !__matched && KEYS[__key_index].try_matches(reader)? {
                                if $field.is_some() {
                                    return ::core::result::Result::Err(reader.error_invalid(
                                        concat!(
                                            "duplicate map key for field `",
                                            stringify!($field),
                                            "`"
                                        ),
                                    ));
                                }
                                $field = ::core::option::Option::Some(
                                    <$ty as $crate::Decode>::decode(reader)?,
                                );
                                __matched = true;
                            }
                            __key_index += 1;
                        )*
                        let _ = __key_index;
                        if !__matched {
                            return ::core::result::Result::Err(reader.unknown_key_error());
                        }
                        ::core::result::Result::Ok(())
                    };
                match pairs {
                    ::core::option::Option::Some(count) => {
                        let mut __remaining = count;
                        while __remaining > 0 {
                            __remaining -= 1;
                            __read_entry(reader)?;
                        }
                    }
                    ::core::option::Option::None => {
                        while !reader.peek_break()? {
                            __read_entry(reader)?;
                        }
                    }
                }
                ::core::mem::drop(__read_entry);
                reader.read_map_close()?;
                ::core::result::Result::Ok($name {
                    $(
                        $field: match $field {
                            ::core::option::Option::Some(value) => value,
                            ::core::option::Option::None => {
                                return ::core::result::Result::Err(reader.error_invalid(
                                    concat!("missing map key for field `", stringify!($field), "`"),
                                ))
                            }
                        }
                    ),*
                })
            }
        }
    };

    // Sum: a two-element [type id, payload] array ---------------------------------------------

    (enum $name:ident { $( $variant:ident $( ( $vty:ty ) )? $( => $key:literal )? ),* $(,)? }) => {
        impl $crate::Encode for $name {
            fn encode<R: $crate::types::Receiver>(
                &self,
                writer: &mut $crate::encoder::Writer<R>,
            ) -> $crate::Result<()> {
                const KEYS: &[$crate::MapKey] = &[ $( $crate::codec!(@key $variant $( $key )?) ),* ];
                const _: () = $crate::assert_distinct_keys(KEYS);
                let mut __key_index = 0usize;
                $(
                    $crate::codec!(@sum_encode self, writer, KEYS[__key_index], $name, $variant,
                        ( $( $vty )? ));
                    __key_index += 1;
                )*
                let _ = __key_index;
                ::core::unreachable!()
            }
        }

        impl $crate::Decode for $name {
            fn decode<P: $crate::decoder::Parser>(
                reader: &mut $crate::decoder::Reader<P>,
            ) -> $crate::Result<Self> {
                const KEYS: &[$crate::MapKey] = &[ $( $crate::codec!(@key $variant $( $key )?) ),* ];
                const _: () = $crate::assert_distinct_keys(KEYS);
                reader.read_array_open(2)?;
                let mut __key_index = 0usize;
                $(
                    $crate::codec!(@sum_decode reader, KEYS[__key_index], $name, $variant,
                        ( $( $vty )? ));
                    __key_index += 1;
                )*
                let _ = __key_index;
                ::core::result::Result::Err(reader.unknown_key_error())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_equality_distinguishes_text_and_long() {
        assert!(key_eq(&MapKey::Text("a"), &MapKey::Text("a")));
        assert!(!key_eq(&MapKey::Text("a"), &MapKey::Text("b")));
        assert!(key_eq(&MapKey::Long(7), &MapKey::Long(7)));
        assert!(!key_eq(&MapKey::Text("7"), &MapKey::Long(7)));
    }

    #[test]
    fn distinct_keys_pass_the_build_time_check() {
        const KEYS: &[MapKey] = &[MapKey::Text("a"), MapKey::Text("ab"), MapKey::Long(1)];
        const _: () = assert_distinct_keys(KEYS);
    }
}
