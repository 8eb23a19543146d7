//! Width and mask arithmetic
//!
//! Pure helpers shared by conversion, the sign smear and the operators. Bit
//! widths are `usize`, words are `u64`.
//!
//! The unchecked helpers assume a width whose storage size fits in `usize`.
//! Caller-supplied widths go through [`checked_required_bytes`] first.

use crate::error::{Result, StructIntError};

/// Bits per storage word
pub const WORD_BITS: usize = 64;

/// Bytes per storage word
pub const WORD_BYTES: usize = 8;

/// Round `value` up to the next multiple of `base` (a power of two).
///
/// A zero request still yields one `base` unit so a zero-width value owns a
/// single word of storage.
#[inline]
pub const fn round_size(value: usize, base: usize) -> usize {
    if value == 0 {
        return base;
    }

    let mask = base - 1;
    let mut res = value & !mask;
    if value & mask != 0 {
        res += base;
    }
    res
}

/// `round_size` that reports `None` instead of overflowing
#[inline]
pub const fn checked_round_size(value: usize, base: usize) -> Option<usize> {
    if value == 0 {
        return Some(base);
    }

    let mask = base - 1;
    let res = value & !mask;
    if value & mask != 0 {
        res.checked_add(base)
    } else {
        Some(res)
    }
}

/// Zero-based index of the word holding bit position `bit - 1`
#[inline]
pub const fn word_index_of_bit(bit: usize) -> usize {
    round_size(bit, WORD_BITS) / WORD_BITS - 1
}

/// Number of meaningful words for `bit_len` (at least one)
#[inline]
pub const fn used_words(bit_len: usize) -> usize {
    word_index_of_bit(bit_len) + 1
}

/// Bytes of storage required for `bit_len`, always whole words
#[inline]
pub const fn required_bytes(bit_len: usize) -> usize {
    round_size(bit_len, WORD_BITS) / WORD_BITS * WORD_BYTES
}

/// Validate a requested width and return its storage size in bytes.
///
/// A width too large for its size to be expressed fails with `OutOfMemory`,
/// the same as an allocation that cannot be satisfied.
pub fn checked_required_bytes(bit_len: usize) -> Result<usize> {
    match checked_round_size(bit_len, WORD_BITS) {
        Some(bits) => Ok(bits / WORD_BITS * WORD_BYTES),
        None => Err(StructIntError::OutOfMemory {
            requested_bytes: usize::MAX,
        }),
    }
}

/// Mask isolating the sign bit inside the most significant used word
#[inline]
pub const fn sign_bit_mask(bit_len: usize) -> u64 {
    if bit_len == 0 {
        return 0;
    }
    1u64 << ((bit_len - 1) % WORD_BITS)
}

/// All bits at or below the sign bit
#[inline]
pub const fn part_mask(sign_mask: u64) -> u64 {
    sign_mask | sign_mask.wrapping_sub(1)
}

/// Zero is a wildcard: adopt `natural` when no width was requested
#[inline]
pub const fn resolve_width(preferred: usize, natural: usize) -> usize {
    if preferred == 0 {
        natural
    } else {
        preferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_size() {
        assert_eq!(round_size(0, 8), 8);
        assert_eq!(round_size(1, 8), 8);
        assert_eq!(round_size(8, 8), 8);
        assert_eq!(round_size(9, 8), 16);
        assert_eq!(round_size(65, 64), 128);
    }

    #[test]
    fn test_word_index_of_bit() {
        assert_eq!(word_index_of_bit(0), 0);
        assert_eq!(word_index_of_bit(1), 0);
        assert_eq!(word_index_of_bit(64), 0);
        assert_eq!(word_index_of_bit(65), 1);
        assert_eq!(word_index_of_bit(128), 1);
        assert_eq!(word_index_of_bit(129), 2);
    }

    #[test]
    fn test_required_bytes() {
        assert_eq!(required_bytes(0), 8);
        assert_eq!(required_bytes(8), 8);
        assert_eq!(required_bytes(64), 8);
        assert_eq!(required_bytes(65), 16);
        assert_eq!(required_bytes(200), 32);
        assert_eq!(used_words(200), 4);
    }

    #[test]
    fn test_checked_round_size() {
        assert_eq!(checked_round_size(0, 64), Some(64));
        assert_eq!(checked_round_size(65, 64), Some(128));
        assert_eq!(checked_round_size(usize::MAX - 63, 64), Some(usize::MAX - 63));
        assert_eq!(checked_round_size(usize::MAX - 62, 64), None);
        assert_eq!(checked_round_size(usize::MAX, 8), None);
    }

    #[test]
    fn test_checked_required_bytes() {
        assert_eq!(checked_required_bytes(200), Ok(32));
        assert_eq!(checked_required_bytes(0), Ok(8));
        assert_eq!(
            checked_required_bytes(usize::MAX),
            Err(StructIntError::OutOfMemory {
                requested_bytes: usize::MAX
            })
        );
        assert!(checked_required_bytes(usize::MAX - 10).is_err());
    }

    #[test]
    fn test_sign_bit_mask() {
        assert_eq!(sign_bit_mask(0), 0);
        assert_eq!(sign_bit_mask(1), 0x1);
        assert_eq!(sign_bit_mask(8), 0x80);
        assert_eq!(sign_bit_mask(64), 0x8000_0000_0000_0000);
        assert_eq!(sign_bit_mask(65), 0x1);
        assert_eq!(sign_bit_mask(72), 0x80);
    }

    #[test]
    fn test_part_mask() {
        assert_eq!(part_mask(0x80), 0xFF);
        assert_eq!(part_mask(0x1), 0x1);
        assert_eq!(part_mask(1 << 63), u64::MAX);
    }
}
