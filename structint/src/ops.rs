//! Operators
//!
//! Every operator has an in-place `*_assign` form that writes into the left
//! operand and a copying form that returns a new value. Errors leave the
//! destination exactly as it was.
//!
//! ## Binary operators
//!
//! The left operand's flags govern the operation. With `asymmetric_len` the
//! narrower operand is extended per its own signedness to the wider width,
//! the result takes that width and `asymmetric` is set.
//!
//! ## Arithmetic operators
//!
//! `negate` and `absolute` compute `!x + 1` word by word, least significant
//! first. The carry out of the top used word (only possible for zero) sets
//! `carry`. When the true result does not fit, the overflow policy decides:
//! wrap silently, saturate to the minimum, expand by one bit, or fail.

use crate::error::{Result, StructIntError};
use crate::policy::{self, Bound, Resolution};
use crate::value::FixedWidthInt;
use crate::width::{resolve_width, used_words};
use std::ops::{BitAnd, BitOr, BitXor, Neg, Not};

/// Word-wise boolean operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BitOp {
    And,
    Or,
    Xor,
}

impl BitOp {
    #[inline]
    fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            BitOp::And => a & b,
            BitOp::Or => a | b,
            BitOp::Xor => a ^ b,
        }
    }

    fn name(self) -> &'static str {
        match self {
            BitOp::And => "and",
            BitOp::Or => "or",
            BitOp::Xor => "xor",
        }
    }
}

/// Two's complement negation, returning the words and the final carry
fn negate_words(words: &[u64]) -> (Vec<u64>, bool) {
    let mut carry = true;
    let negated = words
        .iter()
        .map(|&w| {
            let (sum, overflowed) = (!w).overflowing_add(u64::from(carry));
            carry = overflowed;
            sum
        })
        .collect();
    (negated, carry)
}

impl FixedWidthInt {
    // ------------------------------------------------------------------------
    // Unary
    // ------------------------------------------------------------------------

    /// Identity
    pub fn positive(&self) -> Self {
        self.clone()
    }

    pub fn invert(&self) -> Result<Self> {
        let mut out = self.clone();
        out.invert_assign()?;
        Ok(out)
    }

    /// Flip every bit of the used words. Null stays null.
    pub fn invert_assign(&mut self) -> Result<&mut Self> {
        policy::check_null_operands(&self.flags, &[&*self])?;
        if self.is_null() {
            return Ok(self);
        }

        let words: Vec<u64> = self.words().iter().map(|w| !w).collect();
        self.commit(self.bit_len, &words, false)?;
        Ok(self)
    }

    pub fn negate(&self) -> Result<Self> {
        let mut out = self.clone();
        out.negate_assign()?;
        Ok(out)
    }

    pub fn negate_assign(&mut self) -> Result<&mut Self> {
        if self.arithmetic_on_null()? {
            return Ok(self);
        }
        self.apply_negation()
    }

    pub fn absolute(&self) -> Result<Self> {
        let mut out = self.clone();
        out.absolute_assign()?;
        Ok(out)
    }

    /// Negate when negative, otherwise leave the words alone
    pub fn absolute_assign(&mut self) -> Result<&mut Self> {
        if self.arithmetic_on_null()? {
            return Ok(self);
        }
        if !self.is_negative() {
            self.status.carry = false;
            self.status.overflow = false;
            return Ok(self);
        }
        self.apply_negation()
    }

    /// Null check shared by the arithmetic operators. Returns `true` when
    /// the operand is null and the operation is already complete.
    fn arithmetic_on_null(&mut self) -> Result<bool> {
        policy::check_null_operands(&self.flags, &[&*self])?;
        if self.is_null() {
            self.status.carry = false;
            self.status.overflow = false;
            return Ok(true);
        }
        Ok(false)
    }

    fn apply_negation(&mut self) -> Result<&mut Self> {
        let (words, carry) = negate_words(self.words());
        let result_negative = words[self.used_words - 1] & self.sign_mask != 0;

        // -x fits unless x is the signed minimum, or any non-zero unsigned value
        let overflow = if self.flags.unsigned {
            !self.is_zero()
        } else {
            self.is_negative() && result_negative
        };

        if carry && self.flags.carry_exception {
            return Err(StructIntError::Carry);
        }

        if !overflow {
            self.commit(self.bit_len, &words, false)?;
            self.status.carry = carry;
            self.status.overflow = false;
            return Ok(self);
        }

        // Only a signed value has a wider width holding its negation
        let lossless_width = (!self.flags.unsigned).then_some(self.bit_len + 1);
        let resolution =
            policy::resolve_overflow(&self.flags, self.bit_len, Bound::Min, lossless_width)?;

        match resolution {
            Resolution::Wrap => {
                self.commit(self.bit_len, &words, false)?;
                self.status.overflow = false;
            }
            Resolution::Saturate(bound) => {
                let bound_words = policy::bound_words(self.bit_len, self.flags.unsigned, bound);
                self.commit(self.bit_len, &bound_words, false)?;
                self.status.overflow = true;
            }
            Resolution::Expand(width) => {
                let extended: Vec<u64> = (0..used_words(width))
                    .map(|i| self.extended_word(i))
                    .collect();
                let (expanded, _) = negate_words(&extended);
                tracing::debug!(from = self.bit_len, to = width, "expanded negation");
                self.commit(width, &expanded, false)?;
                self.status.overflow = true;
            }
        }

        self.status.carry = carry;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Binary
    // ------------------------------------------------------------------------

    pub fn and(&self, rhs: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.and_assign(rhs)?;
        Ok(out)
    }

    pub fn or(&self, rhs: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.or_assign(rhs)?;
        Ok(out)
    }

    pub fn xor(&self, rhs: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.xor_assign(rhs)?;
        Ok(out)
    }

    pub fn and_assign(&mut self, rhs: &Self) -> Result<&mut Self> {
        self.apply_binary(rhs, BitOp::And)
    }

    pub fn or_assign(&mut self, rhs: &Self) -> Result<&mut Self> {
        self.apply_binary(rhs, BitOp::Or)
    }

    pub fn xor_assign(&mut self, rhs: &Self) -> Result<&mut Self> {
        self.apply_binary(rhs, BitOp::Xor)
    }

    fn apply_binary(&mut self, rhs: &Self, op: BitOp) -> Result<&mut Self> {
        policy::check_compatible_widths(self, rhs)?;
        policy::check_null_operands(&self.flags, &[&*self, rhs])?;

        let bit_len = self.bit_len.max(rhs.bit_len);
        let asymmetric =
            resolve_width(self.bit_len, rhs.bit_len) != resolve_width(rhs.bit_len, self.bit_len);
        if asymmetric {
            tracing::debug!(
                op = op.name(),
                left = self.bit_len,
                right = rhs.bit_len,
                "widening asymmetric operands"
            );
        }

        let words: Vec<u64> = (0..used_words(bit_len))
            .map(|i| op.apply(self.extended_word(i), rhs.extended_word(i)))
            .collect();
        let null = self.is_null() && rhs.is_null();

        self.commit(bit_len, &words, null)?;
        self.status.asymmetric = asymmetric;
        Ok(self)
    }
}

impl Neg for &FixedWidthInt {
    type Output = Result<FixedWidthInt>;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Not for &FixedWidthInt {
    type Output = Result<FixedWidthInt>;

    fn not(self) -> Self::Output {
        self.invert()
    }
}

impl BitAnd for &FixedWidthInt {
    type Output = Result<FixedWidthInt>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for &FixedWidthInt {
    type Output = Result<FixedWidthInt>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl BitXor for &FixedWidthInt {
    type Output = Result<FixedWidthInt>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.xor(rhs)
    }
}
