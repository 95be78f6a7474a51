//! Correctly-rounded decimal and hexadecimal floating-point literal parsing.
//!
//! [`parse`] and [`parse_at`] convert a byte span into an [`f64`], matching
//! the grammar and rounding behavior of a reference decimal parser while
//! running a branch-light, allocation-free fast path on well-formed input.
//! The grammar also accepts hexadecimal floating-point literals
//! (`0x1.8p3`-style), which have no reference parser to fall back on, so
//! that path is self-contained and always exactly rounded.
//!
//! ```
//! assert_eq!(litefloat::parse(b"3.14159").unwrap(), 3.14159);
//! assert_eq!(litefloat::parse(b" -Infinity ").unwrap(), f64::NEG_INFINITY);
//! assert_eq!(litefloat::parse(b"0x1.8p1").unwrap(), 3.0);
//! assert!(litefloat::parse(b"not a number").is_err());
//! ```

mod arch;
mod common;
mod decimal;
mod error;
mod hex;
mod lemire;
mod table;

pub use error::Error;

/// Parses `bytes` as a complete floating-point literal.
///
/// Equivalent to `parse_at(bytes, 0, bytes.len())`.
pub fn parse(bytes: &[u8]) -> Result<f64, Error> {
    parse_at(bytes, 0, bytes.len())
}

/// Parses the sub-span `bytes[off..off + len]` as a complete
/// floating-point literal.
///
/// Accepts the grammar `WS* Sign? Body WS*`, where `Body` is `NaN`,
/// `Infinity`, a decimal literal, or a `0x`/`0X`-prefixed hexadecimal
/// literal (which requires a `p`/`P` binary exponent). Leading and
/// trailing whitespace (bytes `<= 0x20`) are permitted; whitespace inside
/// the literal is not. Returns [`Error`] on any grammar violation.
pub fn parse_at(bytes: &[u8], off: usize, len: usize) -> Result<f64, Error> {
    let span = bytes
        .get(off..off.wrapping_add(len))
        .ok_or_else(|| Error::malformed(bytes))?;
    parse_span(span)
}

fn is_ascii_ws(b: u8) -> bool {
    b <= 0x20
}

fn parse_span(span: &[u8]) -> Result<f64, Error> {
    let trimmed_front = span.iter().position(|&b| !is_ascii_ws(b));
    let Some(start) = trimmed_front else {
        return Err(Error::malformed(span));
    };
    let end = span.iter().rposition(|&b| !is_ascii_ws(b)).unwrap() + 1;
    let mut body = &span[start..end];

    let negative = match body.first() {
        Some(b'-') => {
            body = &body[1..];
            true
        }
        Some(b'+') => {
            body = &body[1..];
            false
        }
        _ => false,
    };

    if body.is_empty() {
        return Err(Error::malformed(span));
    }

    if body == b"NaN" {
        let bits = f64::NAN.to_bits() | ((negative as u64) << 63);
        return Ok(f64::from_bits(bits));
    }
    if body == b"Infinity" {
        return Ok(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    if body.len() >= 2 && body[0] == b'0' && matches!(body[1], b'x' | b'X') {
        return match hex::scan(&body[2..]) {
            Some(lit) => Ok(hex::to_f64(negative, lit.w, lit.e, lit.sticky_nonzero)),
            None => Err(Error::malformed(span)),
        };
    }

    match decimal::scan(body) {
        Some(lit) => match decimal::to_f64(negative, lit.w, lit.q, lit.truncated) {
            Some(value) => Ok(value),
            None => fallback_parse(span, body, negative),
        },
        None => Err(Error::malformed(span)),
    }
}

/// Invoked only when the decimal math kernel can't prove correct rounding
/// on otherwise grammatically valid input (ambiguous ties, truncated
/// significands near a rounding boundary). The grammar already accepted
/// `body`, which is pure ASCII, so UTF-8 re-validation can't fail.
fn fallback_parse(original_span: &[u8], body: &[u8], negative: bool) -> Result<f64, Error> {
    let text = core::str::from_utf8(body).expect("grammar only accepts ASCII bytes");
    match text.parse::<f64>() {
        Ok(value) => Ok(if negative { -value } else { value }),
        Err(_) => Err(Error::malformed(original_span)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse(b"1").unwrap(), 1.0);
        assert_eq!(parse(b"-0.5").unwrap(), -0.5);
        assert_eq!(parse(b" +3.14159 ").unwrap(), 3.14159);
        assert_eq!(parse(b"1e308").unwrap(), 1e308);
    }

    #[test]
    fn keywords() {
        assert!(parse(b"NaN").unwrap().is_nan());
        assert_eq!(parse(b"-Infinity").unwrap(), f64::NEG_INFINITY);
        assert_eq!(parse(b"Infinity").unwrap(), f64::INFINITY);
    }

    #[test]
    fn hex_literal() {
        let got = parse(b"0x1.fffffffffffffp+1023").unwrap();
        assert_eq!(got, f64::MAX);
    }

    #[test]
    fn signed_zero() {
        assert!(parse(b"-0").unwrap().is_sign_negative());
        assert!(parse(b"-0.0").unwrap().is_sign_negative());
        assert!(parse(b"-0e10").unwrap().is_sign_negative());
        assert!(parse(b"0").unwrap().is_sign_positive());
        assert!(parse(b"+0").unwrap().is_sign_positive());
    }

    #[test]
    fn huge_exponents_saturate() {
        assert_eq!(parse(b"1e10000").unwrap(), f64::INFINITY);
        assert_eq!(parse(b"1e-10000").unwrap(), 0.0);
    }

    #[test]
    fn boundary_failures() {
        assert!(parse(b".").is_err());
        assert!(parse(b"").is_err());
        assert!(parse(b"+").is_err());
        assert!(parse(b"1..2").is_err());
        assert!(parse(b"0x").is_err());
        assert!(parse(b"0x.p0").is_err());
        assert!(parse(b"0x1.0").is_err());
    }

    #[test]
    fn boundary_successes() {
        assert_eq!(parse(b".5").unwrap(), 0.5);
        assert_eq!(parse(b"0x1p0").unwrap(), 1.0);
        assert_eq!(parse(b"9999999999999999999").unwrap(), 9999999999999999999.0);
    }

    #[test]
    fn subnormal_boundaries() {
        assert_eq!(parse(b"2.2250738585072014E-308").unwrap(), f64::MIN_POSITIVE);
        assert_eq!(parse(b"5E-324").unwrap(), f64::from_bits(1));
        assert_eq!(parse(b"4.9e-324").unwrap(), f64::from_bits(1));
    }

    #[test]
    fn whitespace_invariance() {
        let a = parse(b"123.456").unwrap();
        let b = parse(b"   123.456   ").unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn rejects_interior_whitespace() {
        assert!(parse(b"1 2").is_err());
        assert!(parse(b"1. 2").is_err());
    }

    #[test]
    fn out_of_bounds_span_is_malformed() {
        assert!(parse_at(b"1.0", 0, 100).is_err());
    }

    #[test]
    fn long_non_digit_garbage_is_malformed_not_a_panic() {
        // Regression: at >=16 bytes this used to reach the vectorized
        // digit-run decoder with a non-digit first byte and panic instead
        // of reporting a grammar error.
        assert!(parse(b"hello world test12345").is_err());
        assert!(parse(b"not a number at all!!").is_err());
    }

    #[test]
    fn leading_zeros_dont_truncate_real_digits() {
        assert_eq!(
            parse(b"0.000000000000000000001").unwrap(),
            1e-21
        );
        assert_eq!(parse(b"0x0000000000000001p0").unwrap(), 1.0);
        assert_eq!(
            parse(b"0000000000000000000000001234567890123456789").unwrap(),
            1234567890123456789.0
        );
    }
}
