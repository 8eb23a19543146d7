//! # StructInt
//!
//! Fixed-width integers whose width, signedness, byte order, overflow policy
//! and null semantics are chosen at construction time and enforced after
//! every mutation.
//!
//! ## Key Features
//! - Any width from 1 bit up, stored as little-endian 64-bit words
//! - Signed or unsigned interpretation of the top bit
//! - Construction from integers, byte strings, booleans, null, or another
//!   value (copy-and-reinterpret)
//! - Overflow policies: wrap, saturate, expand, raise
//! - Carry and null handling that can be promoted to errors
//! - Binary operators between differing widths when explicitly allowed
//!
//! ## Example
//!
//! ```rust
//! use structint::{FixedWidthInt, Flags, OverflowPolicy};
//!
//! let flags = Flags::DEFAULT.with_overflow(OverflowPolicy::Expand);
//! let min = FixedWidthInt::new(-128, 8, flags).unwrap();
//! let negated = min.negate().unwrap();
//! assert_eq!(negated.bit_len(), 9);
//! assert_eq!(negated.to_string(), "128");
//! assert!(negated.has_overflowed());
//! ```

pub mod buffer;
pub mod config;
pub mod convert;
pub mod error;
mod ops;
pub mod policy;
pub mod value;
pub mod width;

pub use buffer::WordBuffer;
pub use config::{ConfigError, Flags, OverflowPolicy};
pub use convert::Source;
pub use error::{Result, StructIntError};
pub use policy::check_compatible_widths;
pub use value::{FixedWidthInt, Status};
