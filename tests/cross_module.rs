//! Cross-module interaction tests
//!
//! Checks conversion, policies and operators together against an arbitrary
//! precision reference.

use num_bigint::BigInt;
use num_traits::Signed;
use proptest::prelude::*;
use structint::{FixedWidthInt, Flags, OverflowPolicy, StructIntError};

/// Reduce `v` to `bit_len` bits and read it back the way `flags` interpret it
fn reference(v: &BigInt, bit_len: usize, unsigned: bool) -> BigInt {
    let modulus = BigInt::from(1u8) << bit_len;
    let mut r = ((v % &modulus) + &modulus) % &modulus;
    if !unsigned && r >= (&modulus >> 1) {
        r -= modulus;
    }
    r
}

fn flags(unsigned: bool) -> Flags {
    Flags::DEFAULT.with_unsigned(unsigned)
}

// ============================================================================
// Conversion -> operators
// ============================================================================

#[test]
fn test_bytes_and_int_agree() {
    let from_bytes = FixedWidthInt::new(&[0x12u8, 0x34, 0x56, 0x78, 0x9A], 40, Flags::unsigned())
        .unwrap();
    let from_int = FixedWidthInt::new(0x12_3456_789Au64, 40, Flags::unsigned()).unwrap();
    assert_eq!(from_bytes, from_int);
    assert!((&from_bytes ^ &from_int).unwrap().is_zero());
}

#[test]
fn test_asymmetric_widening_uses_each_sign() {
    let wide_flags = Flags::DEFAULT.with_asymmetric_len(true);
    let signed = FixedWidthInt::new(-1, 8, wide_flags).unwrap();
    let unsigned = FixedWidthInt::new(0xFFu8, 8, Flags::unsigned()).unwrap();
    let wide = FixedWidthInt::new(0, 100, Flags::DEFAULT).unwrap();

    // -1 sign-extends to all ones
    let r = (&signed | &wide).unwrap();
    assert_eq!(r.bit_len(), 100);
    assert_eq!(r.to_bigint(), BigInt::from(-1));
    assert!(r.is_asymmetric());

    // 0xFF as unsigned zero-extends
    let mut u = FixedWidthInt::new(&unsigned, 8, wide_flags).unwrap();
    u.reconfigure(None, Some(Flags::unsigned().with_asymmetric_len(true))).unwrap();
    let r = (&u | &wide).unwrap();
    assert_eq!(r.to_bigint(), BigInt::from(0xFF));
}

#[test]
fn test_policy_error_leaves_operand_untouched() {
    let strict = Flags::DEFAULT
        .with_overflow(OverflowPolicy::Exception)
        .with_null_is_not_zero(true);
    let mut v = FixedWidthInt::new(-32768, 16, strict).unwrap();
    let before = v.clone();

    assert_eq!(v.negate_assign().unwrap_err(), StructIntError::Overflow { bit_len: 16 });
    assert_eq!(v, before);

    let n = FixedWidthInt::null(16, strict).unwrap();
    assert_eq!(v.xor_assign(&n).unwrap_err(), StructIntError::Null);
    assert_eq!(v, before);

    let narrow = FixedWidthInt::new(1, 8, strict).unwrap();
    assert!(v.and_assign(&narrow).unwrap_err().is_policy_violation());
    assert_eq!(v, before);
}

#[test]
fn test_unsigned_negation_policies() {
    let base = Flags::unsigned();

    let wrapped = FixedWidthInt::new(1, 8, base).unwrap().negate().unwrap();
    assert_eq!(wrapped.to_bigint(), BigInt::from(255));

    let saturated = FixedWidthInt::new(1, 8, base.with_overflow(OverflowPolicy::Saturate))
        .unwrap()
        .negate()
        .unwrap();
    assert!(saturated.is_zero());
    assert!(saturated.has_overflowed());

    let expand = FixedWidthInt::new(1, 8, base.with_overflow(OverflowPolicy::Expand)).unwrap();
    assert_eq!(expand.negate().unwrap_err(), StructIntError::Overflow { bit_len: 8 });
}

// ============================================================================
// Reference model
// ============================================================================

proptest! {
    #[test]
    fn test_construction_matches_reference(
        v in any::<i128>(),
        bit_len in 1usize..200,
        unsigned in any::<bool>(),
    ) {
        let x = FixedWidthInt::new(v, bit_len, flags(unsigned)).unwrap();
        prop_assert_eq!(x.to_bigint(), reference(&BigInt::from(v), bit_len, unsigned));
    }

    #[test]
    fn test_bitwise_matches_reference(
        a in any::<i64>(),
        b in any::<i64>(),
        bit_len in 1usize..130,
    ) {
        let x = FixedWidthInt::new(a, bit_len, Flags::DEFAULT).unwrap();
        let y = FixedWidthInt::new(b, bit_len, Flags::DEFAULT).unwrap();
        let (a, b) = (BigInt::from(a), BigInt::from(b));

        prop_assert_eq!((&x & &y).unwrap().to_bigint(), reference(&(&a & &b), bit_len, false));
        prop_assert_eq!((&x | &y).unwrap().to_bigint(), reference(&(&a | &b), bit_len, false));
        prop_assert_eq!((&x ^ &y).unwrap().to_bigint(), reference(&(&a ^ &b), bit_len, false));
        prop_assert_eq!((!&x).unwrap().to_bigint(), reference(&(-&a - 1), bit_len, false));
    }

    #[test]
    fn test_wrapping_negation_matches_reference(
        v in any::<i128>(),
        bit_len in 1usize..140,
        unsigned in any::<bool>(),
    ) {
        let x = FixedWidthInt::new(v, bit_len, flags(unsigned)).unwrap();
        let n = x.negate().unwrap();
        prop_assert_eq!(n.to_bigint(), reference(&-x.to_bigint(), bit_len, unsigned));
        prop_assert!(!n.has_overflowed());
        prop_assert_eq!(n.has_carry(), x.is_zero());
    }

    #[test]
    fn test_expand_is_lossless(v in any::<i64>(), bit_len in 1usize..100) {
        let f = Flags::DEFAULT.with_overflow(OverflowPolicy::Expand);
        let x = FixedWidthInt::new(v, bit_len, f).unwrap();
        let n = x.negate().unwrap();
        prop_assert_eq!(n.to_bigint(), -x.to_bigint());
        prop_assert_eq!(n.has_overflowed(), n.bit_len() == bit_len + 1);

        let a = x.absolute().unwrap();
        prop_assert_eq!(a.to_bigint(), x.to_bigint().abs());
    }
}
