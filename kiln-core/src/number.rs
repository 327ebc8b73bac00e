//! Numeric values.
//!
//! A JSON number is stored as whichever of three representations the parser
//! found cheapest: an exact [`i64`] for integers that fit, an [`f64`]
//! otherwise, or — with the `big-number` feature enabled — an arbitrary
//! precision [`num::BigRational`] alongside the original decimal text, so
//! that `multipleOf`/`const` comparisons and round-trip serialization stay
//! exact for numbers an `f64` cannot represent faithfully. Parsed
//! digit-by-digit rather than through a `FromStr` that could silently lose
//! precision.

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "big-number")]
use num::{BigInt, BigRational, FromPrimitive, ToPrimitive, Zero};

/// A parsed JSON number.
#[derive(Clone, Debug)]
pub enum Number {
    /// An integer that fit in an `i64` without loss.
    Integer(i64),
    /// Anything else, stored as an `f64`.
    Double(f64),
    /// Arbitrary precision decimal, kept alongside its original literal text
    /// for exact round-trip serialization. Only constructible with the
    /// `big-number` feature.
    #[cfg(feature = "big-number")]
    Big(BigRational, Box<str>),
}

impl Number {
    /// Parses the digits of a JSON number token (as produced by the
    /// tokenizer; assumed already validated against RFC 8259's grammar).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            return Number::Integer(i);
        }
        #[cfg(feature = "big-number")]
        {
            if let Some(big) = parse_big_rational(text) {
                return Number::Big(big, text.into());
            }
        }
        Number::Double(text.parse::<f64>().unwrap_or(f64::NAN))
    }

    /// The value as an `f64`, lossily for the `Big` variant.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Double(d) => *d,
            #[cfg(feature = "big-number")]
            Number::Big(r, _) => r.numer().to_f64().unwrap_or(f64::NAN)
                / r.denom().to_f64().unwrap_or(1.0),
        }
    }

    /// `true` if this number has no fractional part and is finite.
    ///
    /// JSON Schema's `type: integer` rule: NaN and infinity are never
    /// integers.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Double(d) => d.is_finite() && d.fract() == 0.0,
            #[cfg(feature = "big-number")]
            Number::Big(r, _) => r.is_integer(),
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Double(d) => d.is_finite(),
            #[cfg(feature = "big-number")]
            Number::Big(_, _) => true,
        }
    }

    /// The original literal text, when one is retained (`Big` only).
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match self {
            #[cfg(feature = "big-number")]
            Number::Big(_, text) => Some(text),
            _ => None,
        }
    }

    /// Tests `self % divisor == 0` exactly where possible, falling back to a
    /// tolerant floating point check (as `serde_json`-style validators do)
    /// otherwise.
    #[must_use]
    pub fn is_multiple_of(&self, divisor: &Number) -> bool {
        #[cfg(feature = "big-number")]
        {
            if let (Number::Big(a, _), _) | (_, Number::Big(a, _)) = (self, divisor) {
                let _ = a;
                if let (Some(a), Some(b)) = (self.to_big_rational(), divisor.to_big_rational()) {
                    if b.is_zero() {
                        return false;
                    }
                    let quotient = &a / &b;
                    return quotient.is_integer();
                }
            }
        }
        let d = divisor.as_f64();
        if d == 0.0 {
            return false;
        }
        let quotient = self.as_f64() / d;
        (quotient - quotient.round()).abs() < 1e-9
    }

    #[cfg(feature = "big-number")]
    fn to_big_rational(&self) -> Option<BigRational> {
        match self {
            Number::Integer(i) => BigRational::from_i64(*i),
            Number::Double(d) => BigRational::from_f64_relaxed(*d),
            Number::Big(r, _) => Some(r.clone()),
        }
    }
}

#[cfg(feature = "big-number")]
trait FromF64Relaxed {
    fn from_f64_relaxed(v: f64) -> Option<BigRational>;
}
#[cfg(feature = "big-number")]
impl FromF64Relaxed for BigRational {
    fn from_f64_relaxed(v: f64) -> Option<BigRational> {
        num::BigRational::from_float(v)
    }
}

#[cfg(feature = "big-number")]
fn parse_big_rational(text: &str) -> Option<BigRational> {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text),
    };
    let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (rest, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let digits: String = format!("{int_part}{frac_part}");
    let numerator: BigInt = digits.parse().ok()?;
    let scale = exponent - frac_part.len() as i32;
    let ten = BigInt::from_u8(10).unwrap();
    let value = if scale >= 0 {
        BigRational::from_integer(numerator * ten.pow(scale as u32))
    } else {
        BigRational::new(numerator, ten.pow((-scale) as u32))
    };
    Some(if sign < 0 { -value } else { value })
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        #[cfg(feature = "big-number")]
        {
            if matches!(self, Number::Big(..)) || matches!(other, Number::Big(..)) {
                return self.to_big_rational()?.partial_cmp(&other.to_big_rational()?);
            }
        }
        if let (Number::Integer(a), Number::Integer(b)) = (self, other) {
            return a.partial_cmp(b);
        }
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Double(d) => {
                if d.is_nan() || d.is_infinite() {
                    write!(f, "null")
                } else if d.fract() == 0.0 && d.abs() < 1e15 {
                    write!(f, "{d:.0}")
                } else {
                    write!(f, "{d}")
                }
            }
            #[cfg(feature = "big-number")]
            Number::Big(_, text) => write!(f, "{text}"),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Integer(v)
    }
}
impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Double(v)
    }
}
impl From<u64> for Number {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or_else(|_| Number::Double(v as f64), Number::Integer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integer_fast_path() {
        assert!(matches!(Number::parse("42"), Number::Integer(42)));
        assert!(matches!(Number::parse("-7"), Number::Integer(-7)));
    }

    #[test]
    fn parses_double() {
        let n = Number::parse("3.25");
        assert_eq!(n.as_f64(), 3.25);
        assert!(!n.is_integer());
    }

    #[test]
    fn integer_check_handles_nan_and_infinity() {
        assert!(!Number::Double(f64::NAN).is_integer());
        assert!(!Number::Double(f64::INFINITY).is_integer());
        assert!(Number::Double(4.0).is_integer());
    }

    #[test]
    fn multiple_of() {
        assert!(Number::parse("9").is_multiple_of(&Number::parse("3")));
        assert!(!Number::parse("10").is_multiple_of(&Number::parse("3")));
        assert!(Number::parse("1.5").is_multiple_of(&Number::parse("0.5")));
    }

    #[test]
    fn ordering_mixes_integer_and_double() {
        assert!(Number::parse("2") < Number::parse("2.5"));
    }
}
