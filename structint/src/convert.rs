//! Value conversion
//!
//! Turns a tagged [`Source`] into the word layout of a [`FixedWidthInt`]. The
//! target width is the instance's own `bit_len`, or the source's natural
//! width when that is zero.

use crate::error::{Result, StructIntError};
use crate::value::FixedWidthInt;
use crate::width::{checked_required_bytes, resolve_width, used_words, WORD_BYTES};
use num_bigint::BigInt;
use num_traits::Signed;

/// Anything a value can be built from
#[derive(Debug, Clone)]
pub enum Source<'a> {
    /// Arbitrary precision integer, stored in two's complement
    Int(BigInt),
    /// Flat byte string; big-endian unless the target is little-endian
    Bytes(&'a [u8]),
    Bool(bool),
    /// No data
    Null,
    /// Another value; only construction accepts this (copy-and-reinterpret)
    Instance(&'a FixedWidthInt),
    /// Something the caller could not map, named for the error message
    Unsupported(&'a str),
}

impl Source<'_> {
    /// Width the source needs when the target leaves it unspecified.
    ///
    /// Integers get their magnitude's bit length plus a sign bit.
    pub fn natural_width(&self) -> usize {
        match self {
            Source::Int(v) => v.bits() as usize + 1,
            Source::Bytes(bytes) => bytes.len() * 8,
            Source::Bool(_) => 1,
            Source::Null => 0,
            Source::Instance(v) => v.bit_len(),
            Source::Unsupported(_) => 0,
        }
    }

    /// Short name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Int(_) => "int",
            Source::Bytes(_) => "bytes",
            Source::Bool(_) => "bool",
            Source::Null => "null",
            Source::Instance(_) => "structint",
            Source::Unsupported(_) => "unsupported",
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Source<'_> {
                fn from(value: $ty) -> Self {
                    Source::Int(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Source<'_> {
    fn from(value: BigInt) -> Self {
        Source::Int(value)
    }
}

impl From<bool> for Source<'_> {
    fn from(value: bool) -> Self {
        Source::Bool(value)
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Source<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Source<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

impl<'a> From<&'a FixedWidthInt> for Source<'a> {
    fn from(value: &'a FixedWidthInt) -> Self {
        Source::Instance(value)
    }
}

impl<'a, T: Into<Source<'a>>> From<Option<T>> for Source<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Source::Null, Into::into)
    }
}

impl FixedWidthInt {
    /// Replace the value with `source`, keeping flags and reusing the buffer.
    ///
    /// Width comes from `bit_len` unless it is zero. On error nothing is
    /// modified.
    pub fn convert<'a>(&mut self, source: impl Into<Source<'a>>) -> Result<&mut Self> {
        let source = source.into();
        if let Source::Instance(_) | Source::Unsupported(_) = source {
            let type_name = match source {
                Source::Unsupported(name) => name.to_string(),
                other => other.kind().to_string(),
            };
            return Err(StructIntError::TypeConversion { type_name });
        }

        let bit_len = resolve_width(self.bit_len, source.natural_width());
        self.buffer.ensure_capacity(checked_required_bytes(bit_len)?)?;

        let count = used_words(bit_len);
        let little_endian = self.flags.little_endian;
        let words = &mut self.buffer.as_mut_slice()[..count];
        match &source {
            Source::Int(v) => fill_from_int(words, v),
            Source::Bytes(bytes) => fill_from_bytes(words, bytes, little_endian),
            Source::Bool(b) => {
                words.fill(0);
                words[0] = u64::from(*b);
            }
            _ => words.fill(0),
        }

        tracing::trace!(kind = source.kind(), bit_len, "converted source");
        self.bit_len = bit_len;
        self.settle(matches!(source, Source::Null));
        Ok(self)
    }
}

/// Successive 64-bit two's complement windows of `value`
fn fill_from_int(words: &mut [u64], value: &BigInt) {
    let bytes = value.to_signed_bytes_le();
    let fill = if value.is_negative() { 0xFF } else { 0x00 };

    for (i, word) in words.iter_mut().enumerate() {
        let mut le = [fill; WORD_BYTES];
        for (j, byte) in le.iter_mut().enumerate() {
            if let Some(&b) = bytes.get(i * WORD_BYTES + j) {
                *byte = b;
            }
        }
        *word = u64::from_le_bytes(le);
    }
}

/// Assemble words from a byte string. Big-endian reads from the end of the
/// buffer; bytes past its length are zero.
fn fill_from_bytes(words: &mut [u64], bytes: &[u8], little_endian: bool) {
    let len = bytes.len();
    for (i, word) in words.iter_mut().enumerate() {
        let mut le = [0u8; WORD_BYTES];
        for (j, byte) in le.iter_mut().enumerate() {
            let k = i * WORD_BYTES + j;
            if k < len {
                *byte = if little_endian { bytes[k] } else { bytes[len - k - 1] };
            }
        }
        *word = u64::from_le_bytes(le);
    }
}
