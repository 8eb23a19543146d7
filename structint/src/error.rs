//! # Error Types for StructInt

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructIntError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Conversion errors
    #[error("first argument must be an int, bytes, a bool, a null or another structint, got {type_name}")]
    TypeConversion { type_name: String },

    // Policy errors
    #[error("right side has bit length {right} but left side requires {left}")]
    Asymmetric { right: usize, left: usize },

    #[error("Carry out of the most significant word")]
    Carry,

    #[error("Result does not fit in {bit_len} bits")]
    Overflow { bit_len: usize },

    #[error("Null operand is not zero")]
    Null,

    // Resource errors
    #[error("Out of memory: failed to allocate {requested_bytes} bytes")]
    OutOfMemory { requested_bytes: usize },
}

impl StructIntError {
    /// Check if this error reports a violated flag policy rather than a
    /// resource or input problem
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            StructIntError::Asymmetric { .. }
                | StructIntError::Carry
                | StructIntError::Overflow { .. }
                | StructIntError::Null
        )
    }
}

pub type Result<T> = std::result::Result<T, StructIntError>;
