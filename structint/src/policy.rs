//! Operand policies
//!
//! Cross-width compatibility for binary operators and the overflow policy
//! engine shared by the arithmetic operators.

use crate::config::{Flags, OverflowPolicy};
use crate::error::{Result, StructIntError};
use crate::value::FixedWidthInt;
use crate::width::{part_mask, resolve_width, sign_bit_mask, used_words};

/// Reject a binary operation between differing widths unless the left
/// operand permits it.
///
/// A zero width adopts the other side's width before comparing. The error
/// reports the right width first.
pub fn check_compatible_widths(left: &FixedWidthInt, right: &FixedWidthInt) -> Result<()> {
    if left.flags().asymmetric_len {
        return Ok(());
    }

    let left_len = resolve_width(left.bit_len(), right.bit_len());
    let right_len = resolve_width(right.bit_len(), left.bit_len());
    if left_len != right_len {
        return Err(StructIntError::Asymmetric {
            right: right_len,
            left: left_len,
        });
    }

    Ok(())
}

/// Fail when a null operand takes part and the flags forbid it
pub fn check_null_operands(flags: &Flags, operands: &[&FixedWidthInt]) -> Result<()> {
    if flags.null_is_not_zero && operands.iter().any(|v| v.is_null()) {
        return Err(StructIntError::Null);
    }
    Ok(())
}

/// Which representable bound a true result went past
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

/// How an overflowing result is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the wrapped two's complement result
    Wrap,
    /// Replace the result with a representable bound
    Saturate(Bound),
    /// Recompute at a wider width
    Expand(usize),
}

/// Apply the overflow policy to a result that does not fit `bit_len`.
///
/// `saturate_to` is the bound a saturating operator clamps to, and
/// `lossless_width` the width that would hold the true result (`None` when
/// no width can, e.g. a negative result for an unsigned value).
pub fn resolve_overflow(
    flags: &Flags,
    bit_len: usize,
    saturate_to: Bound,
    lossless_width: Option<usize>,
) -> Result<Resolution> {
    let resolution = match flags.overflow {
        OverflowPolicy::None => Resolution::Wrap,
        OverflowPolicy::Saturate => Resolution::Saturate(saturate_to),
        OverflowPolicy::Expand => match lossless_width {
            Some(width) => Resolution::Expand(width),
            None => return Err(StructIntError::Overflow { bit_len }),
        },
        OverflowPolicy::Exception => return Err(StructIntError::Overflow { bit_len }),
    };

    tracing::debug!(bit_len, policy = %flags.overflow, ?resolution, "resolved overflow");
    Ok(resolution)
}

/// Words of the minimum or maximum representable value, already smeared
pub fn bound_words(bit_len: usize, unsigned: bool, bound: Bound) -> Vec<u64> {
    let count = used_words(bit_len);
    let fill = match bound {
        Bound::Min => 0,
        Bound::Max => u64::MAX,
    };
    let mut words = vec![fill; count];

    let sign_mask = sign_bit_mask(bit_len);
    let below_sign = sign_mask.wrapping_sub(1);
    let top = &mut words[count - 1];
    match (unsigned, bound) {
        (true, Bound::Min) => {}
        (true, Bound::Max) => *top = part_mask(sign_mask),
        // Sign clear, everything below set
        (false, Bound::Max) => *top = below_sign,
        // Sign set and smeared, everything below clear
        (false, Bound::Min) => *top = !below_sign,
    }
    words
}
