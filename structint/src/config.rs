//! # Flag Configuration for StructInt
//!
//! Every `FixedWidthInt` carries a `Flags` value fixed at construction time.
//! Flags select signedness, whether binary operations may mix widths, the
//! byte order used for byte-buffer sources, and how carry, overflow and null
//! operands are handled.
//!
//! The historical packed representation is a 32-bit word:
//!
//! ```text
//!  31                          8 7       0
//!  ---- ---- ---- ---- ---- ---N -vvC L-AU
//!  0     U  -> UNSIGNED
//!  1     A  -> ASYMMETRIC_LEN
//!  3     L  -> LITTLE_ENDIAN
//!  4     C  -> CARRY_EXCEPTION
//!  6-5   vv -> overflow policy (00 none, 01 saturate, 10 expand, 11 exception)
//!  8     N  -> NULL_IS_NOT_ZERO
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sign bit is never treated as negative
pub const UNSIGNED: u32 = 0x0001;
/// Binary operations may combine operands of different widths
pub const ASYMMETRIC_LEN: u32 = 0x0002;
/// Byte-buffer sources are read least significant byte first
pub const LITTLE_ENDIAN: u32 = 0x0008;
/// A carry out of the top word is an error instead of a status bit
pub const CARRY_EXCEPTION: u32 = 0x0010;
/// Mask of the two-bit overflow policy field
pub const OVERFLOW_FIELD: u32 = 0x0060;
pub const OVERFLOW_SATURATION: u32 = 0x0020;
pub const OVERFLOW_EXPAND: u32 = 0x0040;
pub const OVERFLOW_EXCEPTION: u32 = 0x0060;
/// Using a null operand is an error instead of reading it as zero
pub const NULL_IS_NOT_ZERO: u32 = 0x0100;

/// All bits with a defined meaning
pub const KNOWN_BITS: u32 =
    UNSIGNED | ASYMMETRIC_LEN | LITTLE_ENDIAN | CARRY_EXCEPTION | OVERFLOW_FIELD | NULL_IS_NOT_ZERO;

/// What to do when the true result of an arithmetic operation does not fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Wrap around modulo 2^bit_len
    #[default]
    None,
    /// Clamp to the representable minimum or maximum
    Saturate,
    /// Grow the width until the result fits
    Expand,
    /// Fail with `StructIntError::Overflow`
    Exception,
}

impl OverflowPolicy {
    /// Decode the two-bit overflow field of a packed flag word
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & OVERFLOW_FIELD {
            OVERFLOW_SATURATION => OverflowPolicy::Saturate,
            OVERFLOW_EXPAND => OverflowPolicy::Expand,
            OVERFLOW_EXCEPTION => OverflowPolicy::Exception,
            _ => OverflowPolicy::None,
        }
    }

    /// Encode as the two-bit overflow field
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            OverflowPolicy::None => 0,
            OverflowPolicy::Saturate => OVERFLOW_SATURATION,
            OverflowPolicy::Expand => OVERFLOW_EXPAND,
            OverflowPolicy::Exception => OVERFLOW_EXCEPTION,
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverflowPolicy::None => "none",
            OverflowPolicy::Saturate => "saturate",
            OverflowPolicy::Expand => "expand",
            OverflowPolicy::Exception => "exception",
        };
        f.write_str(name)
    }
}

/// Per-instance configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Flags {
    /// The top bit is data, not a sign
    pub unsigned: bool,
    /// Permit binary operations between differing widths
    pub asymmetric_len: bool,
    /// Byte buffers are little-endian (first byte least significant)
    pub little_endian: bool,
    /// Promote a carry to a fatal error
    pub carry_exception: bool,
    /// Overflow handling for arithmetic operators
    pub overflow: OverflowPolicy,
    /// Promote use of a null operand to a fatal error
    pub null_is_not_zero: bool,
}

impl Flags {
    /// Signed, symmetric, big-endian, wrapping, null reads as zero
    pub const DEFAULT: Self = Self {
        unsigned: false,
        asymmetric_len: false,
        little_endian: false,
        carry_exception: false,
        overflow: OverflowPolicy::None,
        null_is_not_zero: false,
    };

    /// Decode a packed flag word, rejecting bits with no meaning
    pub const fn from_bits(bits: u32) -> Result<Self, ConfigError> {
        if bits & !KNOWN_BITS != 0 {
            return Err(ConfigError::UnknownBits(bits & !KNOWN_BITS));
        }

        Ok(Self::from_bits_truncate(bits))
    }

    /// Decode a packed flag word, ignoring unknown bits
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self {
            unsigned: bits & UNSIGNED != 0,
            asymmetric_len: bits & ASYMMETRIC_LEN != 0,
            little_endian: bits & LITTLE_ENDIAN != 0,
            carry_exception: bits & CARRY_EXCEPTION != 0,
            overflow: OverflowPolicy::from_bits(bits),
            null_is_not_zero: bits & NULL_IS_NOT_ZERO != 0,
        }
    }

    /// Encode into the packed flag word
    pub const fn bits(&self) -> u32 {
        let mut bits = self.overflow.bits();
        if self.unsigned {
            bits |= UNSIGNED;
        }
        if self.asymmetric_len {
            bits |= ASYMMETRIC_LEN;
        }
        if self.little_endian {
            bits |= LITTLE_ENDIAN;
        }
        if self.carry_exception {
            bits |= CARRY_EXCEPTION;
        }
        if self.null_is_not_zero {
            bits |= NULL_IS_NOT_ZERO;
        }
        bits
    }

    #[inline]
    pub const fn with_unsigned(mut self, unsigned: bool) -> Self {
        self.unsigned = unsigned;
        self
    }

    #[inline]
    pub const fn with_asymmetric_len(mut self, allowed: bool) -> Self {
        self.asymmetric_len = allowed;
        self
    }

    #[inline]
    pub const fn with_little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = little_endian;
        self
    }

    #[inline]
    pub const fn with_carry_exception(mut self, raise: bool) -> Self {
        self.carry_exception = raise;
        self
    }

    #[inline]
    pub const fn with_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    #[inline]
    pub const fn with_null_is_not_zero(mut self, raise: bool) -> Self {
        self.null_is_not_zero = raise;
        self
    }

    /// Shorthand for `Flags::DEFAULT.with_unsigned(true)`
    #[inline]
    pub const fn unsigned() -> Self {
        Self::DEFAULT.with_unsigned(true)
    }

    /// Whether the sign bit is interpreted as negative
    #[inline]
    pub const fn is_signed(&self) -> bool {
        !self.unsigned
    }
}

impl TryFrom<u32> for Flags {
    type Error = ConfigError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Flags::from_bits(bits)
    }
}

impl From<Flags> for u32 {
    fn from(flags: Flags) -> u32 {
        flags.bits()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Flags {{ {}, {}, {}-endian, overflow: {}, carry: {}, null: {} }}",
            if self.unsigned { "unsigned" } else { "signed" },
            if self.asymmetric_len { "asymmetric" } else { "symmetric" },
            if self.little_endian { "little" } else { "big" },
            self.overflow,
            if self.carry_exception { "raise" } else { "flag" },
            if self.null_is_not_zero { "raise" } else { "zero" },
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The packed flag word has bits outside `KNOWN_BITS`
    UnknownBits(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownBits(bits) => {
                write!(f, "unknown flag bits {:#06x}", bits)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
