//! Decimal literal scanning and rounding: `[0-9]*(\.[0-9]*)?([eE][+-]?[0-9]+)?`.

use crate::common::{self, biased_fp_to_f64, POW10_UINT};
use crate::lemire;

/// Result of scanning a decimal significand: `value == w * 10^q`, modulo the
/// rounding error `truncated` flags.
pub(crate) struct Literal {
    pub w: u64,
    pub q: i64,
    /// Set when the integer or fractional run held more digits than fit in
    /// `w`'s 19-digit budget; the dropped digits were consumed (so scanning
    /// still covers the whole literal) but not folded into `w`, so `w`
    /// alone may under-state the true significand.
    pub truncated: bool,
}

/// Scans a decimal mantissa plus optional exponent starting at `data[0]`.
/// Returns `None` if `data` isn't entirely consumed by a valid literal —
/// the caller has already stripped any sign, so this only ever sees the
/// unsigned body.
pub(crate) fn scan(data: &[u8]) -> Option<Literal> {
    let mut index = 0usize;
    let mut w: u64 = 0;

    // Leading zeros are free: they don't change `w`, so they must not eat
    // into the 19-digit budget that real digits further along still need.
    let leading_zeros_int = common::skip_leading_zeros(data, &mut index);
    let (int_accum, int_extra) = common::accumulate_decimal_digits(data, &mut index, &mut w, 19);
    let mut truncated = int_extra > 0;
    let mut digit_count = leading_zeros_int + int_accum + int_extra;
    let mut frac_digits_folded = 0usize;

    if index < data.len() && data[index] == b'.' {
        index += 1;
        // Only skip fractional leading zeros for free when no nonzero digit
        // has been seen yet (an integer part like "1" makes any zero after
        // the point a real placeholder digit, not a free leading zero).
        // These skipped zeros still shift where the next real digit sits,
        // so (unlike the integer run) they must still count toward `q`.
        let leading_zeros_frac = if w == 0 {
            common::skip_leading_zeros(data, &mut index)
        } else {
            0
        };
        let remaining_budget = 19usize.saturating_sub(int_accum);
        let (frac_accum, frac_extra) =
            common::accumulate_decimal_digits(data, &mut index, &mut w, remaining_budget);
        frac_digits_folded = leading_zeros_frac + frac_accum;
        digit_count += leading_zeros_frac + frac_accum + frac_extra;
        truncated |= frac_extra > 0;
    }

    if digit_count == 0 {
        return None;
    }

    let mut q = -(frac_digits_folded as i64) + int_extra as i64;

    if index < data.len() && matches!(data[index], b'e' | b'E') {
        index += 1;
        let exponent = common::parse_exponent_field(data, &mut index)?;
        q += exponent;
    }

    if index != data.len() {
        return None;
    }

    Some(Literal { w, q, truncated })
}

/// Powers of ten exactly representable as `f64` (`5^q < 2^53` for
/// `q <= 22`, so `2^q * 5^q` loses nothing rounding to a double).
const POW10_F64: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

const MIN_EXPONENT_FAST_PATH: i64 = -22;
const MAX_EXPONENT_FAST_PATH: i64 = 22;
const MAX_EXPONENT_DISGUISED_FAST_PATH: i64 = 37;
const MAX_MANTISSA_FAST_PATH: u64 = 1u64 << 53;

/// Clinger's fast path (and its "disguised" extension up to `q = 37`, which
/// folds a few powers of ten into `w` itself as long as it stays exactly
/// representable): computes `w * 10^q` using plain `f64` arithmetic when
/// both operands are exactly representable, so the hardware's correctly
/// rounded multiply/divide is trivially also correctly rounded here.
fn try_fast_path(w: u64, q: i64, negative: bool) -> Option<f64> {
    if w > MAX_MANTISSA_FAST_PATH {
        return None;
    }
    let value = if (MIN_EXPONENT_FAST_PATH..=MAX_EXPONENT_FAST_PATH).contains(&q) {
        if q < 0 {
            w as f64 / POW10_F64[(-q) as usize]
        } else {
            w as f64 * POW10_F64[q as usize]
        }
    } else if (MAX_EXPONENT_FAST_PATH + 1..=MAX_EXPONENT_DISGUISED_FAST_PATH).contains(&q) {
        let shift = (q - MAX_EXPONENT_FAST_PATH) as usize;
        let scaled = w.checked_mul(POW10_UINT[shift])?;
        if scaled > MAX_MANTISSA_FAST_PATH {
            return None;
        }
        scaled as f64 * POW10_F64[MAX_EXPONENT_FAST_PATH as usize]
    } else {
        return None;
    };
    Some(if negative { -value } else { value })
}

/// Rounds `w * 10^q` (or its negation) to the nearest `f64`, returning
/// `None` if neither the fast path nor the Eisel-Lemire path can prove the
/// result — the caller must then defer to the reference parser.
pub(crate) fn to_f64(negative: bool, w: u64, q: i64, truncated: bool) -> Option<f64> {
    if w == 0 {
        return Some(if negative { -0.0 } else { 0.0 });
    }

    if !truncated {
        if let Some(value) = try_fast_path(w, q, negative) {
            return Some(value);
        }
    }

    let fp = lemire::compute_float(q, w);
    if !fp.is_provable() {
        return None;
    }
    if truncated {
        // Any digits dropped while scanning can only have been nonzero, so
        // the true significand is somewhere in `[w, w+1)` in these units.
        // If rounding `w + 1` lands on the same float, the dropped digits'
        // exact value can't have mattered.
        let fp_hi = lemire::compute_float(q, w + 1);
        if !fp_hi.is_provable() || fp_hi != fp {
            return None;
        }
    }

    let mut value = biased_fp_to_f64(fp);
    if negative {
        value = -value;
    }
    Some(value)
}
