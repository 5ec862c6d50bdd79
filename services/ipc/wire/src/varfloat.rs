//! Decomposed floats.
//!
//! A float travels as `varint(exp)` followed by its decimal mantissa `int`,
//! so that `value = int * 10^-exp`. The mantissa comes from the shortest
//! decimal text that round-trips the float, which keeps short decimals such as
//! `3.14` down to a few bytes instead of a fixed eight. Precision is that of
//! the decimal text, not of the IEEE-754 bit pattern.

use crate::context::DecodeContext;
use crate::error::{Result, WireError};
use crate::varint::{decode_svarint, decode_varint, encode_svarint, encode_varint};
use bytes::BytesMut;
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, ToPrimitive};

/// A float split into a decimal mantissa and a base-10 exponent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed {
    /// Number of decimal digits after the point
    pub exp: u32,
    /// All decimal digits as one integer, signed
    pub int: BigInt,
}

impl Decomposed {
    /// Split a finite float
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(WireError::UnsupportedType(format!(
                "non-finite float {value}"
            )));
        }

        // Display for f64 is the shortest round-trip decimal, never in
        // exponent notation
        let text = value.to_string();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.as_str()),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let exp = u32::try_from(frac.len())
            .map_err(|_| WireError::FloatExponent(frac.len().to_string()))?;
        let digits = format!("{whole}{frac}");
        let magnitude: BigInt = digits
            .parse()
            .map_err(|_| WireError::UnsupportedType(format!("float {value}")))?;

        Ok(Self {
            exp,
            int: if negative { -magnitude } else { magnitude },
        })
    }

    /// Reassemble the float
    ///
    /// The result is the float nearest to the decimal `int * 10^-exp`, i.e.
    /// rounded to exactly as many significant digits as `int` carries.
    pub fn to_f64(&self) -> Result<f64> {
        format!("{}e-{}", self.int, self.exp)
            .parse::<f64>()
            .map_err(|e| WireError::FloatExponent(e.to_string()))
    }
}

/// Append an unsigned decomposed float
pub fn encode_varfloat(parts: &Decomposed, buf: &mut BytesMut) -> Result<()> {
    let magnitude = parts.int.to_biguint().ok_or_else(|| {
        WireError::mismatch(format!(
            "negative mantissa {} under an unsigned float tag",
            parts.int
        ))
    })?;
    encode_varint(&BigUint::from(parts.exp), buf);
    encode_varint(&magnitude, buf);
    Ok(())
}

/// Append a signed decomposed float
pub fn encode_svarfloat(parts: &Decomposed, buf: &mut BytesMut) {
    encode_varint(&BigUint::from(parts.exp), buf);
    encode_svarint(&parts.int, buf);
}

/// Read an unsigned decomposed float
pub fn decode_varfloat(ctx: &mut DecodeContext<'_>) -> Result<f64> {
    let exp = decode_exp(ctx)?;
    let int = BigInt::from(decode_varint(ctx)?);
    Decomposed { exp, int }.to_f64()
}

/// Read a signed decomposed float
pub fn decode_svarfloat(ctx: &mut DecodeContext<'_>) -> Result<f64> {
    let exp = decode_exp(ctx)?;
    let int = decode_svarint(ctx)?;
    Decomposed { exp, int }.to_f64()
}

fn decode_exp(ctx: &mut DecodeContext<'_>) -> Result<u32> {
    let exp = decode_varint(ctx)?;
    exp.to_u32()
        .ok_or_else(|| WireError::FloatExponent(exp.to_string()))
}

/// Whether the float has a fractional part
pub fn is_fractional(value: f64) -> bool {
    value.is_finite() && value % 1.0 != 0.0
}

/// Whether the mantissa is negative
pub fn is_negative(parts: &Decomposed) -> bool {
    parts.int.is_negative()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: f64) -> f64 {
        let parts = Decomposed::from_f64(value).unwrap();
        let mut buf = BytesMut::new();
        if is_negative(&parts) {
            encode_svarfloat(&parts, &mut buf);
            let mut ctx = DecodeContext::new(&buf);
            let decoded = decode_svarfloat(&mut ctx).unwrap();
            assert_eq!(ctx.offset(), buf.len());
            decoded
        } else {
            encode_varfloat(&parts, &mut buf).unwrap();
            let mut ctx = DecodeContext::new(&buf);
            let decoded = decode_varfloat(&mut ctx).unwrap();
            assert_eq!(ctx.offset(), buf.len());
            decoded
        }
    }

    #[test]
    fn test_decompose() {
        assert_eq!(
            Decomposed::from_f64(3.14).unwrap(),
            Decomposed {
                exp: 2,
                int: BigInt::from(314)
            }
        );
        assert_eq!(
            Decomposed::from_f64(-123.456).unwrap(),
            Decomposed {
                exp: 3,
                int: BigInt::from(-123456)
            }
        );
        assert_eq!(
            Decomposed::from_f64(0.05).unwrap(),
            Decomposed {
                exp: 2,
                int: BigInt::from(5)
            }
        );
        assert_eq!(
            Decomposed::from_f64(42.0).unwrap(),
            Decomposed {
                exp: 0,
                int: BigInt::from(42)
            }
        );
    }

    #[test]
    fn test_compact_encoding() {
        let mut buf = BytesMut::new();
        encode_varfloat(&Decomposed::from_f64(3.14).unwrap(), &mut buf).unwrap();
        // exp = 2, int = 314 = [0xBA, 0x02]
        assert_eq!(&buf[..], &[0x02, 0xBA, 0x02]);
    }

    #[test]
    fn test_roundtrip_values() {
        for value in [
            0.1, 0.29, 3.14, 123.456, 213213.122, 3.212, 1e-7, 1.79e308, 5e-324,
        ] {
            assert_eq!(roundtrip(value), value);
        }
        for value in [-0.1, -3.14, -123.456, -2.5e-10] {
            assert_eq!(roundtrip(value), value);
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Decomposed::from_f64(value),
                Err(WireError::UnsupportedType(_))
            ));
        }
    }

    #[test]
    fn test_negative_mantissa_needs_signed_tag() {
        let parts = Decomposed::from_f64(-1.5).unwrap();
        let mut buf = BytesMut::new();
        assert!(matches!(
            encode_varfloat(&parts, &mut buf),
            Err(WireError::TypeContextMismatch(_))
        ));
    }

    #[test]
    fn test_truncated_float() {
        let mut ctx = DecodeContext::new(&[0x02]);
        assert!(matches!(
            decode_varfloat(&mut ctx),
            Err(WireError::MalformedBuffer { .. })
        ));
    }

    #[test]
    fn test_exponent_out_of_range() {
        let mut buf = BytesMut::new();
        encode_varint(&(BigUint::from(u32::MAX) + 1u32), &mut buf);
        encode_varint(&BigUint::from(1u32), &mut buf);
        let mut ctx = DecodeContext::new(&buf);
        assert!(matches!(
            decode_varfloat(&mut ctx),
            Err(WireError::FloatExponent(_))
        ));
    }

    #[test]
    fn test_is_fractional() {
        assert!(is_fractional(0.5));
        assert!(is_fractional(-2.25));
        assert!(!is_fractional(3.0));
        assert!(!is_fractional(f64::NAN));
    }
}
