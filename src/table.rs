//! Precomputed 128-bit approximations of powers of ten.
//!
//! [`power_of_ten_128`] returns the round-to-nearest-even 128-bit mantissa of
//! `10^q`, normalized so the top bit of the high half is set, for `q` in
//! `[SMALLEST_POWER_OF_TEN, LARGEST_POWER_OF_TEN]`. This is the table the
//! Eisel-Lemire fast path (see [`crate::lemire`]) multiplies the scanned
//! significand against.
//!
//! The real-world versions of this table this crate is modeled on (e.g.
//! fast-float/sonic's `table.rs`) ship it as a ~650-entry literal array of
//! hex constants, computed offline once and transcribed into source. That
//! literal wasn't available in the reference material this crate was built
//! from, and hand-transcribing 650 128-bit magic numbers from memory risks
//! silent transposition errors that would be invisible until a rare decimal
//! exponent misrounds. Instead the table is computed here from exact
//! power-of-five big-integer arithmetic the first time it's needed, cached
//! behind a `OnceLock` so the cost (a few hundred microseconds) is paid once
//! per process rather than once per parse. See `DESIGN.md`.

use std::sync::OnceLock;

/// Smallest decimal exponent for which the fast path has a table entry.
/// Below this, `w * 10^q` always underflows to zero for any `w` that fits
/// in the scanner's 19-digit accumulator.
pub(crate) const SMALLEST_POWER_OF_TEN: i32 = -342;
/// Largest decimal exponent for which the fast path has a table entry.
/// Above this, `w * 10^q` always overflows to infinity.
pub(crate) const LARGEST_POWER_OF_TEN: i32 = 308;

const TABLE_LEN: usize = (LARGEST_POWER_OF_TEN - SMALLEST_POWER_OF_TEN + 1) as usize;

/// Returns the 128-bit mantissa `(hi, lo)` of `10^q`, or `None` if `q` falls
/// outside the covered range. `hi` always has its top bit set.
#[inline]
pub(crate) fn power_of_ten_128(q: i32) -> Option<(u64, u64)> {
    if !(SMALLEST_POWER_OF_TEN..=LARGEST_POWER_OF_TEN).contains(&q) {
        return None;
    }
    static TABLE: OnceLock<Vec<(u64, u64)>> = OnceLock::new();
    let table = TABLE.get_or_init(build_table);
    Some(table[(q - SMALLEST_POWER_OF_TEN) as usize])
}

fn build_table() -> Vec<(u64, u64)> {
    let mut table = Vec::with_capacity(TABLE_LEN);
    for q in SMALLEST_POWER_OF_TEN..=LARGEST_POWER_OF_TEN {
        table.push(pow10_mantissa_128(q));
    }
    table
}

/// Little-endian base-2^64 big integer, always kept trimmed (no trailing
/// zero limbs, except the canonical empty vector for zero).
type Big = Vec<u64>;

fn big_trim(a: &mut Big) {
    while matches!(a.last(), Some(0)) {
        a.pop();
    }
}

fn big_mul_small(a: &Big, m: u64) -> Big {
    let mut out = Vec::with_capacity(a.len() + 1);
    let mut carry: u128 = 0;
    for &limb in a {
        let prod = (limb as u128) * (m as u128) + carry;
        out.push(prod as u64);
        carry = prod >> 64;
    }
    if carry > 0 {
        out.push(carry as u64);
    }
    big_trim(&mut out);
    out
}

fn big_shl1(a: &mut Big) {
    let mut carry = 0u64;
    for limb in a.iter_mut() {
        let new_carry = *limb >> 63;
        *limb = (*limb << 1) | carry;
        carry = new_carry;
    }
    if carry != 0 {
        a.push(carry);
    }
}

fn big_sub_assign(a: &mut Big, b: &Big) {
    debug_assert!(big_ge(a, b));
    let mut borrow: i128 = 0;
    for i in 0..a.len() {
        let bv = if i < b.len() { b[i] as i128 } else { 0 };
        let mut diff = a[i] as i128 - bv - borrow;
        if diff < 0 {
            diff += 1i128 << 64;
            borrow = 1;
        } else {
            borrow = 0;
        }
        a[i] = diff as u64;
    }
    big_trim(a);
}

fn big_ge(a: &Big, b: &Big) -> bool {
    if a.len() != b.len() {
        return a.len() > b.len();
    }
    for i in (0..a.len()).rev() {
        if a[i] != b[i] {
            return a[i] > b[i];
        }
    }
    true
}

fn big_is_zero(a: &Big) -> bool {
    a.is_empty()
}

fn big_bit_length(a: &Big) -> u32 {
    match a.last() {
        None => 0,
        Some(&top) => (a.len() as u32 - 1) * 64 + (64 - top.leading_zeros()),
    }
}

fn big_get_bit(a: &Big, pos: u32) -> bool {
    let limb = (pos / 64) as usize;
    let bit = pos % 64;
    limb < a.len() && (a[limb] >> bit) & 1 == 1
}

/// Whether any bit in `[0, pos)` is set.
fn big_any_bit_below(a: &Big, pos: u32) -> bool {
    if pos == 0 {
        return false;
    }
    let full_limbs = (pos / 64) as usize;
    for &limb in a.iter().take(full_limbs.min(a.len())) {
        if limb != 0 {
            return true;
        }
    }
    let rem_bits = pos % 64;
    if rem_bits > 0 && full_limbs < a.len() {
        let mask = (1u64 << rem_bits) - 1;
        if a[full_limbs] & mask != 0 {
            return true;
        }
    }
    false
}

/// Exact value of `5^q` as a big integer.
fn pow5_exact(q: u32) -> Big {
    let mut value: Big = vec![1];
    for _ in 0..q {
        value = big_mul_small(&value, 5);
    }
    value
}

/// Rounds `(hi, lo)` (a 128-bit unsigned integer) to nearest, ties to even,
/// given the bit immediately below it (`round_bit`) and whether any lower
/// bit beyond that was set (`sticky`). A carry out of bit 127 can't happen
/// for any actual power-of-ten mantissa (it would require 128 consecutive
/// one-bits), so it's treated as an internal invariant rather than handled.
fn round_to_nearest_even(hi: &mut u64, lo: &mut u64, round_bit: bool, sticky: bool) {
    if !round_bit {
        return;
    }
    let round_up = sticky || (*lo & 1 == 1);
    if !round_up {
        return;
    }
    let (new_lo, carry) = lo.overflowing_add(1);
    *lo = new_lo;
    if carry {
        let (new_hi, carry2) = hi.overflowing_add(1);
        *hi = new_hi;
        debug_assert!(!carry2, "power-of-ten mantissa rounding overflowed 128 bits");
    }
}

/// Returns bits `[drop, drop + 128)` of `a` (i.e. `a >> drop`, truncated to
/// 128 bits) as `(hi, lo)`.
fn top_128_shifted_right(a: &Big, drop: u32) -> (u64, u64) {
    let limb_shift = (drop / 64) as usize;
    let bit_shift = drop % 64;
    let get_limb = |i: usize| -> u64 {
        let idx = i + limb_shift;
        if idx >= a.len() {
            0
        } else {
            a[idx]
        }
    };
    let shifted_limb = |j: usize| -> u64 {
        if bit_shift == 0 {
            get_limb(j)
        } else {
            (get_limb(j) >> bit_shift) | (get_limb(j + 1) << (64 - bit_shift))
        }
    };
    (shifted_limb(1), shifted_limb(0))
}

/// Returns `a << shift` (where `a`'s bit length plus `shift` equals exactly
/// 128) as `(hi, lo)`.
fn shift_left_to_128(a: &Big, shift: u32) -> (u64, u64) {
    let limb_shift = (shift / 64) as i64;
    let bit_shift = shift % 64;
    let get_limb = |i: i64| -> u64 {
        if i < 0 {
            return 0;
        }
        let i = i as usize;
        if i >= a.len() {
            0
        } else {
            a[i]
        }
    };
    let shifted_limb = |j: i64| -> u64 {
        if bit_shift == 0 {
            get_limb(j - limb_shift)
        } else {
            (get_limb(j - limb_shift) << bit_shift) | (get_limb(j - limb_shift - 1) >> (64 - bit_shift))
        }
    };
    (shifted_limb(1), shifted_limb(0))
}

/// `5^q`, rounded to the nearest 128-bit value with its top bit set.
fn pow5_mantissa_128(q: u32) -> (u64, u64) {
    let d = pow5_exact(q);
    let b = big_bit_length(&d);
    debug_assert!(b > 0, "5^q is never zero");
    if b <= 128 {
        let shift = 128 - b;
        return shift_left_to_128(&d, shift);
    }
    let drop = b - 128;
    let (mut hi, mut lo) = top_128_shifted_right(&d, drop);
    let round_bit = big_get_bit(&d, drop - 1);
    let sticky = big_any_bit_below(&d, drop - 1);
    round_to_nearest_even(&mut hi, &mut lo, round_bit, sticky);
    (hi, lo)
}

/// `1 / 5^q_abs`, rounded to the nearest 128-bit value with its top bit set,
/// computed via binary long division: `rem` starts at the integer 1 and is
/// repeatedly doubled and reduced modulo the divisor, producing one quotient
/// bit per iteration (the standard "restoring division" used to expand a
/// reciprocal to arbitrary binary precision).
fn pow5_reciprocal_mantissa_128(q_abs: u32) -> (u64, u64) {
    let d = pow5_exact(q_abs);
    let b = big_bit_length(&d);
    // The first set bit of 1/d appears within the first `b` iterations
    // (since d < 2^b); pad with extra iterations so at least 128 mantissa
    // bits plus a round bit are available after it.
    let total_iters = b + 133;
    let mut rem: Big = vec![1];
    let mut bits: Vec<u8> = Vec::with_capacity(total_iters as usize);
    for _ in 0..total_iters {
        big_shl1(&mut rem);
        if big_ge(&rem, &d) {
            big_sub_assign(&mut rem, &d);
            bits.push(1);
        } else {
            bits.push(0);
        }
    }
    let first_one = bits
        .iter()
        .position(|&bit| bit == 1)
        .expect("1/5^q is never zero");
    debug_assert!(
        bits.len() - first_one >= 129,
        "insufficient precision margin computing 5^-q"
    );

    let mut hi = 0u64;
    let mut lo = 0u64;
    for (i, &bit) in bits[first_one..first_one + 128].iter().enumerate() {
        if i < 64 {
            hi = (hi << 1) | bit as u64;
        } else {
            lo = (lo << 1) | bit as u64;
        }
    }
    let round_bit = bits[first_one + 128] == 1;
    let sticky = !big_is_zero(&rem) || bits[first_one + 129..].iter().any(|&bit| bit == 1);
    round_to_nearest_even(&mut hi, &mut lo, round_bit, sticky);
    (hi, lo)
}

/// `10^q = 5^q * 2^q`; the `2^q` factor only shifts the binary exponent, so
/// the 128-bit mantissa of `10^q` equals that of `5^q`.
fn pow10_mantissa_128(q: i32) -> (u64, u64) {
    if q >= 0 {
        pow5_mantissa_128(q as u32)
    } else {
        pow5_reciprocal_mantissa_128((-q) as u32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounds_are_exclusive_outside_range() {
        assert!(power_of_ten_128(SMALLEST_POWER_OF_TEN - 1).is_none());
        assert!(power_of_ten_128(LARGEST_POWER_OF_TEN + 1).is_none());
    }

    #[test]
    fn ten_to_the_zero_is_one_normalized() {
        // 10^0 = 1 = 1.0 * 2^0; normalized to 128 bits its mantissa is
        // 2^127 exactly (hi's top bit set, everything else zero).
        let (hi, lo) = power_of_ten_128(0).unwrap();
        assert_eq!(hi, 1u64 << 63);
        assert_eq!(lo, 0);
    }

    #[test]
    fn ten_to_the_one_is_normalized_one_zero_one_zero() {
        // 10 = 1.01 (binary) * 2^3; normalized mantissa's top two bits are
        // `10100...`.
        let (hi, _lo) = power_of_ten_128(1).unwrap();
        assert_eq!(hi >> 60, 0b1010);
    }

    #[test]
    fn every_table_entry_is_normalized() {
        for q in SMALLEST_POWER_OF_TEN..=LARGEST_POWER_OF_TEN {
            let (hi, _) = power_of_ten_128(q).unwrap();
            assert_eq!(hi >> 63, 1, "q={q} entry not normalized");
        }
    }
}
