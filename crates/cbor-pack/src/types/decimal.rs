//! [`Decimal`]: arbitrary-precision decimal fractions (tag 4).

use std::str::FromStr;

use malachite::Integer;

use crate::error::InvalidValue;

/// A base-10 number `significand * 10^exponent`, or one of the non-finite
/// decimal specials.
///
/// Parsing keeps trailing zeros, so `"1.50"` is `150 * 10^-2`, not
/// `15 * 10^-1`.
///
/// ```
/// use cbor_pack::Decimal;
///
/// let d: Decimal = "273.15".parse().unwrap();
/// assert_eq!(d, Decimal::new(27315, -2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Decimal {
    Finite { significand: Integer, exponent: i64 },
    NaN,
    Infinity,
    NegInfinity,
}

impl Decimal {
    pub fn new(significand: impl Into<Integer>, exponent: i64) -> Self {
        Decimal::Finite {
            significand: significand.into(),
            exponent,
        }
    }
}

impl FromStr for Decimal {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidValue::MalformedDecimal(s.to_owned());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        match body.to_ascii_lowercase().as_str() {
            "nan" => return Ok(Decimal::NaN),
            "inf" | "infinity" if negative => return Ok(Decimal::NegInfinity),
            "inf" | "infinity" => return Ok(Decimal::Infinity),
            _ => {}
        }

        let (mantissa, scale) = match body.find(['e', 'E']) {
            Some(pos) => {
                let scale = body[pos + 1..].parse::<i64>().map_err(|_| malformed())?;
                (&body[..pos], scale)
            }
            None => (body, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let digits = format!("{int_part}{frac_part}");
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| malformed())?;
        let exponent = scale.checked_sub(frac_len).ok_or_else(malformed)?;
        let magnitude = digits.parse::<Integer>().map_err(|_| malformed())?;
        let significand = if negative { -magnitude } else { magnitude };
        Ok(Decimal::Finite {
            significand,
            exponent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_plain_and_fractional() {
        assert_eq!(parse("42"), Decimal::new(42, 0));
        assert_eq!(parse("-1.5"), Decimal::new(-15, -1));
        assert_eq!(parse("1.50"), Decimal::new(150, -2));
        assert_eq!(parse(".5"), Decimal::new(5, -1));
        assert_eq!(parse("5."), Decimal::new(5, 0));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!(parse("1e10"), Decimal::new(1, 10));
        assert_eq!(parse("2.5E-3"), Decimal::new(25, -4));
        assert_eq!(parse("+7e+2"), Decimal::new(7, 2));
    }

    #[test]
    fn test_parse_specials() {
        assert_eq!(parse("NaN"), Decimal::NaN);
        assert_eq!(parse("Infinity"), Decimal::Infinity);
        assert_eq!(parse("-inf"), Decimal::NegInfinity);
    }

    #[test]
    fn test_parse_large_significand() {
        let d = parse("123456789012345678901234567890.1");
        assert_eq!(
            d,
            Decimal::Finite {
                significand: "1234567890123456789012345678901".parse().unwrap(),
                exponent: -1,
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-", ".", "1.2.3", "1e", "abc", "1_000"] {
            assert_eq!(
                bad.parse::<Decimal>(),
                Err(InvalidValue::MalformedDecimal(bad.to_owned())),
                "{bad:?}"
            );
        }
    }
}
