//! # Fixed-Width Integer Value
//!
//! `FixedWidthInt` stores its value as little-endian `u64` words in an owned
//! `WordBuffer`. Only the first `used_words` words carry meaning. The most
//! significant used word is kept *smeared*: every bit above the sign bit is a
//! copy of the sign (signed) or zero (unsigned / null), so whole-word
//! operations never see stale high bits.
//!
//! ## Layout
//!
//! ```text
//! bit_len = 72, signed, value = -2
//!
//! word 0: 0xFFFF_FFFF_FFFF_FFFE
//! word 1: 0xFFFF_FFFF_FFFF_FFFF   <- sign bit is bit 7, bits 8..63 smeared
//! ```

use crate::buffer::WordBuffer;
use crate::config::Flags;
use crate::convert::Source;
use crate::error::Result;
use crate::width::{
    checked_required_bytes, part_mask, resolve_width, sign_bit_mask, used_words, WORD_BYTES,
};
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use std::fmt;

/// Status bits recomputed by the operation that can trigger them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status {
    /// Last binary operation combined differing widths
    pub asymmetric: bool,
    /// Last arithmetic operation carried out of the most significant word
    pub carry: bool,
    /// Last arithmetic operation's true result did not fit
    pub overflow: bool,
    /// The value is "no data", distinct from zero
    pub null: bool,
}

/// Integer with a configurable, finite bit width
#[derive(Clone)]
pub struct FixedWidthInt {
    pub(crate) buffer: WordBuffer,
    pub(crate) used_words: usize,
    pub(crate) bit_len: usize,
    pub(crate) sign_mask: u64,
    pub(crate) flags: Flags,
    pub(crate) status: Status,
}

impl FixedWidthInt {
    /// Construct from a source at `bit_len` bits (`0` adopts the source's
    /// natural width).
    ///
    /// A `Source::Instance` is copied and reinterpreted: its status bits are
    /// carried over and its words are resized to the resolved width. `flags`
    /// always replace the source's; pass `src.flags()` to inherit them. A
    /// null source becomes zero unless the resolved width is zero.
    pub fn new<'a>(source: impl Into<Source<'a>>, bit_len: usize, flags: Flags) -> Result<Self> {
        match source.into() {
            Source::Instance(src) => Self::reinterpret(src, bit_len, flags),
            other => {
                let mut value = Self::unset(bit_len, flags);
                value.convert(other)?;
                Ok(value)
            }
        }
    }

    /// A null value of the given width
    pub fn null(bit_len: usize, flags: Flags) -> Result<Self> {
        Self::new(Source::Null, bit_len, flags)
    }

    /// Zero at the given width
    pub fn zero(bit_len: usize, flags: Flags) -> Result<Self> {
        Self::new(BigInt::zero(), bit_len, flags)
    }

    /// No storage, no layout. Only valid as the input of a conversion.
    pub(crate) fn unset(bit_len: usize, flags: Flags) -> Self {
        Self {
            buffer: WordBuffer::new(),
            used_words: 0,
            bit_len,
            sign_mask: 0,
            flags,
            status: Status::default(),
        }
    }

    fn reinterpret(src: &FixedWidthInt, bit_len: usize, flags: Flags) -> Result<Self> {
        let bit_len = resolve_width(bit_len, src.bit_len);
        let src_bytes = src.used_words * WORD_BYTES;

        let mut buffer = WordBuffer::with_capacity(checked_required_bytes(bit_len)?)?;
        buffer.copy_from(src.words(), src_bytes)?;

        // Copy zero-fills; a negative source must sign-extend instead
        let target_words = used_words(bit_len);
        let fill = src.extension_word();
        if target_words > src.used_words {
            buffer.as_mut_slice()[src.used_words..target_words].fill(fill);
        }

        let mut value = Self {
            buffer,
            used_words: src.used_words,
            bit_len,
            sign_mask: src.sign_mask,
            flags,
            status: src.status,
        };
        value.settle(false);
        Ok(value)
    }

    /// Change width and/or flags in place.
    ///
    /// A new flag set clears the asymmetric, carry and overflow status. The
    /// value is sign- or zero-extended (per the old signedness) when growing
    /// and truncated when shrinking. A width of `0` makes the value null.
    pub fn reconfigure(&mut self, bit_len: Option<usize>, flags: Option<Flags>) -> Result<&mut Self> {
        let new_len = bit_len.unwrap_or(self.bit_len);
        self.buffer.ensure_capacity(checked_required_bytes(new_len)?)?;
        let new_words = used_words(new_len);

        if new_words > self.used_words {
            let fill = self.extension_word();
            self.buffer.as_mut_slice()[self.used_words..new_words].fill(fill);
        }

        self.bit_len = new_len;
        if let Some(flags) = flags {
            self.flags = flags;
            self.status.asymmetric = false;
            self.status.carry = false;
            self.status.overflow = false;
        }

        let null = self.status.null;
        self.settle(null);
        Ok(self)
    }

    /// Re-derive `used_words` and `sign_mask` from `bit_len`, then either
    /// enter the null state or re-smear. Requires capacity for `bit_len`.
    pub(crate) fn settle(&mut self, null: bool) {
        self.used_words = used_words(self.bit_len);
        if self.bit_len == 0 || null {
            self.set_null();
        } else {
            self.status.null = false;
            self.sign_mask = sign_bit_mask(self.bit_len);
            self.sign_smear();
        }
    }

    fn set_null(&mut self) {
        self.status.null = true;
        self.buffer.zero(self.used_words);
        self.sign_mask = 0;
    }

    /// Restore the sign extension of the most significant used word.
    ///
    /// Bits above the sign bit become copies of it, or zero for unsigned
    /// values. Idempotent; a no-op while `sign_mask` is zero.
    pub fn sign_smear(&mut self) -> &mut Self {
        if self.sign_mask == 0 {
            return self;
        }

        let top = self.used_words - 1;
        let mask = part_mask(self.sign_mask);
        let unsigned = self.flags.unsigned;
        let sign_mask = self.sign_mask;

        let word = &mut self.buffer.as_mut_slice()[top];
        let sign = !unsigned && *word & sign_mask != 0;
        if sign {
            *word |= !mask;
        } else {
            *word &= mask;
        }
        self
    }

    /// Overwrite the used words with `words` at a (possibly new) width.
    ///
    /// Grows the buffer first; if that fails nothing has changed.
    pub(crate) fn commit(&mut self, bit_len: usize, words: &[u64], null: bool) -> Result<()> {
        self.buffer.ensure_capacity(checked_required_bytes(bit_len)?)?;
        debug_assert_eq!(words.len(), used_words(bit_len));
        self.buffer.as_mut_slice()[..words.len()].copy_from_slice(words);
        self.bit_len = bit_len;
        self.settle(null);
        Ok(())
    }

    /// Word `index` of the value extended to any width: used words as
    /// stored, then the sign fill. Null reads as zero.
    #[inline]
    pub(crate) fn extended_word(&self, index: usize) -> u64 {
        if self.status.null {
            0
        } else if index < self.used_words {
            self.buffer.as_slice()[index]
        } else {
            self.extension_word()
        }
    }

    /// Fill word for widening: all ones for a negative signed value
    #[inline]
    pub(crate) fn extension_word(&self) -> u64 {
        if self.is_negative() {
            u64::MAX
        } else {
            0
        }
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    /// Nominal width in bits
    #[inline]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn is_asymmetric(&self) -> bool {
        self.status.asymmetric
    }

    #[inline]
    pub fn has_carry(&self) -> bool {
        self.status.carry
    }

    /// Acknowledge a carry
    #[inline]
    pub fn clear_carry(&mut self) {
        self.status.carry = false;
    }

    #[inline]
    pub fn has_overflowed(&self) -> bool {
        self.status.overflow
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.status.null
    }

    /// Allocated bytes (diagnostic). Always whole 64-bit words, so a 200-bit
    /// value reports 32 rather than the byte-rounded 25 of older layouts.
    #[inline]
    pub fn capacity_bytes(&self) -> usize {
        self.buffer.capacity_bytes()
    }

    /// Meaningful words (diagnostic)
    #[inline]
    pub fn used_words(&self) -> usize {
        self.used_words
    }

    /// Sign bit mask inside the top used word (diagnostic)
    #[inline]
    pub fn sign_mask(&self) -> u64 {
        self.sign_mask
    }

    /// The used words, least significant first
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.buffer.as_slice()[..self.used_words]
    }

    /// Signed and sign bit set
    #[inline]
    pub fn is_negative(&self) -> bool {
        !self.flags.unsigned
            && self.sign_mask != 0
            && self.buffer.as_slice()[self.used_words - 1] & self.sign_mask != 0
    }

    /// Every used word is zero (also true for null)
    pub fn is_zero(&self) -> bool {
        self.words().iter().all(|&w| w == 0)
    }

    /// Read the value back as an arbitrary precision integer.
    ///
    /// Null reads as zero.
    pub fn to_bigint(&self) -> BigInt {
        if self.status.null {
            return BigInt::zero();
        }

        let bytes: Vec<u8> = self.words().iter().flat_map(|w| w.to_le_bytes()).collect();
        if self.flags.unsigned {
            BigInt::from_bytes_le(Sign::Plus, &bytes)
        } else {
            BigInt::from_signed_bytes_le(&bytes)
        }
    }

    /// Largest representable value at the current width and signedness
    pub fn max_value(&self) -> BigInt {
        let bits = if self.flags.unsigned { self.bit_len } else { self.bit_len.saturating_sub(1) };
        (BigInt::one() << bits) - 1
    }

    /// Smallest representable value at the current width and signedness
    pub fn min_value(&self) -> BigInt {
        if self.flags.unsigned || self.bit_len == 0 {
            BigInt::zero()
        } else {
            -(BigInt::one() << (self.bit_len - 1))
        }
    }
}

impl PartialEq for FixedWidthInt {
    /// Same width, flags, null state and used words. Capacity and the
    /// asymmetric / carry / overflow status are not part of the value.
    fn eq(&self, other: &Self) -> bool {
        self.bit_len == other.bit_len
            && self.flags == other.flags
            && self.status.null == other.status.null
            && self.words() == other.words()
    }
}

impl Eq for FixedWidthInt {}

impl fmt::Debug for FixedWidthInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FixedWidthInt<{}, {}>(",
            self.bit_len,
            if self.flags.unsigned { "unsigned" } else { "signed" }
        )?;
        if self.status.null {
            write!(f, "null")?;
        } else {
            for (i, word) in self.words().iter().enumerate().rev() {
                if i + 1 < self.used_words {
                    write!(f, ", ")?;
                }
                write!(f, "{:#018x}", word)?;
            }
        }
        write!(f, ")")
    }
}

impl fmt::Display for FixedWidthInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status.null {
            f.write_str("null")
        } else {
            write!(f, "{}", self.to_bigint())
        }
    }
}

impl fmt::LowerHex for FixedWidthInt {
    /// Raw words, most significant first, zero padded
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        for word in self.words().iter().rev() {
            write!(f, "{:016x}", word)?;
        }
        Ok(())
    }
}
