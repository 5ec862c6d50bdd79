//! Base-128 varints and the zigzag transform over arbitrary-precision integers.
//!
//! ```text
//! 300 = 0b1_0010_1100  ->  [1010_1100, 0000_0010]
//!                           ^ more       ^ last
//! ```
//!
//! Signed integers are zigzag-mapped first so that small magnitudes of either
//! sign stay short: 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...

use crate::context::DecodeContext;
use crate::error::{Result, WireError};
use bytes::{BufMut, BytesMut};
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, ToPrimitive};

/// Longest varint needed for a `u64`
pub const MAX_VARINT_LEN_U64: usize = 10;

/// Zigzag-map a signed integer onto the naturals
pub fn zigzag_encode(value: &BigInt) -> BigUint {
    let doubled: BigUint = value.magnitude() << 1u32;
    if value.is_negative() {
        doubled - 1u32
    } else {
        doubled
    }
}

/// Inverse of [`zigzag_encode`]
pub fn zigzag_decode(value: &BigUint) -> BigInt {
    let half = BigInt::from(value >> 1u32);
    if value.bit(0) {
        -half - 1
    } else {
        half
    }
}

/// Encoded length of `value` in bytes
pub fn varint_len(value: &BigUint) -> usize {
    let bits = value.bits().max(1);
    bits.div_ceil(7) as usize
}

/// Append a `u64` varint
pub fn encode_varint_u64(mut value: u64, buf: &mut BytesMut) {
    while value > 0x7F {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Append an unsigned varint
pub fn encode_varint(value: &BigUint, buf: &mut BytesMut) {
    if let Some(small) = value.to_u64() {
        encode_varint_u64(small, buf);
        return;
    }

    let mut rest = value.clone();
    while rest.bits() > 7 {
        buf.put_u8((low_byte(&rest) & 0x7F) | 0x80);
        rest >>= 7u32;
    }
    buf.put_u8(low_byte(&rest));
}

/// Append a zigzag varint
pub fn encode_svarint(value: &BigInt, buf: &mut BytesMut) {
    encode_varint(&zigzag_encode(value), buf);
}

/// Read an unsigned varint at the cursor
///
/// Stops at the first byte with the high bit clear. Running out of input
/// before that byte is a [`crate::WireError::MalformedBuffer`].
pub fn decode_varint(ctx: &mut DecodeContext<'_>) -> Result<BigUint> {
    let start = ctx.offset();
    match read_u64_prefix(ctx)? {
        U64Prefix::Complete(value) => Ok(BigUint::from(value)),
        U64Prefix::Overflow { more } => decode_varint_wide(ctx, start, more),
    }
}

/// Read a varint that must fit in a `u64`
///
/// Reads at most [`MAX_VARINT_LEN_U64`] bytes; anything wider is a
/// [`WireError::LengthOverflow`].
pub fn decode_varint_u64(ctx: &mut DecodeContext<'_>) -> Result<u64> {
    let start = ctx.offset();
    match read_u64_prefix(ctx)? {
        U64Prefix::Complete(value) => Ok(value),
        U64Prefix::Overflow { .. } => Err(WireError::LengthOverflow { offset: start }),
    }
}

enum U64Prefix {
    Complete(u64),
    /// The value needs more than 64 bits; `more` is set while continuation
    /// bytes are still pending
    Overflow { more: bool },
}

fn read_u64_prefix(ctx: &mut DecodeContext<'_>) -> Result<U64Prefix> {
    let mut value: u64 = 0;

    for shift in (0..64u32).step_by(7) {
        let byte = ctx.read_u8()?;
        let low = u64::from(byte & 0x7F);
        // Only the lowest bit of the tenth group still fits
        if shift == 63 && low > 1 {
            return Ok(U64Prefix::Overflow {
                more: byte & 0x80 != 0,
            });
        }
        value |= low << shift;
        if byte & 0x80 == 0 {
            return Ok(U64Prefix::Complete(value));
        }
    }
    Ok(U64Prefix::Overflow { more: true })
}

/// Finish a varint wider than `u64`: gather base-128 digits, convert once
fn decode_varint_wide(
    ctx: &mut DecodeContext<'_>,
    start: usize,
    mut more: bool,
) -> Result<BigUint> {
    let mut digits: Vec<u8> = ctx.buffer()[start..ctx.offset()]
        .iter()
        .map(|byte| byte & 0x7F)
        .collect();

    while more {
        let byte = ctx.read_u8()?;
        digits.push(byte & 0x7F);
        more = byte & 0x80 != 0;
    }

    BigUint::from_radix_le(&digits, 128).ok_or(WireError::LengthOverflow { offset: start })
}

/// Read a zigzag varint at the cursor
pub fn decode_svarint(ctx: &mut DecodeContext<'_>) -> Result<BigInt> {
    Ok(zigzag_decode(&decode_varint(ctx)?))
}

/// Read a varint used as a length or count
pub fn decode_len(ctx: &mut DecodeContext<'_>) -> Result<usize> {
    let start = ctx.offset();
    let value = decode_varint_u64(ctx)?;
    usize::try_from(value).map_err(|_| WireError::LengthOverflow { offset: start })
}

fn low_byte(value: &BigUint) -> u8 {
    value.iter_u32_digits().next().unwrap_or(0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_u(value: impl Into<BigUint>) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_varint(&value.into(), &mut buf);
        buf.to_vec()
    }

    fn encode_s(value: impl Into<BigInt>) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_svarint(&value.into(), &mut buf);
        buf.to_vec()
    }

    #[test]
    fn test_zigzag_encoding() {
        let cases: [(i64, u64); 6] = [(0, 0), (-1, 1), (1, 2), (-2, 3), (2, 4), (-64, 127)];
        for (signed, unsigned) in cases {
            assert_eq!(zigzag_encode(&BigInt::from(signed)), BigUint::from(unsigned));
            assert_eq!(zigzag_decode(&BigUint::from(unsigned)), BigInt::from(signed));
        }
    }

    #[test]
    fn test_zigzag_beyond_i64() {
        let big = -(BigInt::from(1u8) << 100u32);
        assert_eq!(zigzag_decode(&zigzag_encode(&big)), big);
        let big = (BigInt::from(1u8) << 100u32) + 12345;
        assert_eq!(zigzag_decode(&zigzag_encode(&big)), big);
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode_u(0u32), vec![0x00]);
        assert_eq!(encode_u(1u32), vec![0x01]);
        assert_eq!(encode_u(127u32), vec![0x7F]);
        assert_eq!(encode_u(128u32), vec![0x80, 0x01]);
        assert_eq!(encode_u(300u32), vec![0xAC, 0x02]);
        assert_eq!(encode_s(-1), vec![0x01]);
        assert_eq!(encode_s(63), vec![0x7E]);
        assert_eq!(encode_s(64), vec![0x80, 0x01]);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(varint_len(&BigUint::from(0u32)), 1);
        assert_eq!(varint_len(&BigUint::from(127u32)), 1);
        assert_eq!(varint_len(&BigUint::from(128u32)), 2);
        assert_eq!(varint_len(&BigUint::from(16383u32)), 2);
        assert_eq!(varint_len(&BigUint::from(16384u32)), 3);
        assert_eq!(varint_len(&BigUint::from(u64::MAX)), MAX_VARINT_LEN_U64);
        assert_eq!(encode_u(u64::MAX).len(), MAX_VARINT_LEN_U64);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let values = [
            BigUint::from(0u32),
            BigUint::from(255u32),
            BigUint::from(u64::MAX),
            BigUint::from(u64::MAX) + 1u32,
            BigUint::from(1u8) << 200u32,
        ];
        for value in values {
            let bytes = encode_u(value.clone());
            assert_eq!(bytes.len(), varint_len(&value));
            let mut ctx = DecodeContext::new(&bytes);
            assert_eq!(decode_varint(&mut ctx).unwrap(), value);
            assert_eq!(ctx.offset(), bytes.len());
        }
    }

    #[test]
    fn test_signed_large_magnitudes() {
        let values = [
            BigInt::from(i64::MIN),
            BigInt::from(i64::MAX),
            -(BigInt::from(1u8) << 62u32),
            (BigInt::from(1u8) << 62u32) - 1,
        ];
        for value in values {
            let bytes = encode_s(value.clone());
            let mut ctx = DecodeContext::new(&bytes);
            assert_eq!(decode_svarint(&mut ctx).unwrap(), value);
        }
    }

    #[test]
    fn test_truncated_varint() {
        let mut ctx = DecodeContext::new(&[0x80, 0x80]);
        assert!(matches!(
            decode_varint(&mut ctx),
            Err(WireError::MalformedBuffer { offset: 2, .. })
        ));

        let mut ctx = DecodeContext::new(&[]);
        assert!(decode_svarint(&mut ctx).is_err());
    }

    #[test]
    fn test_decode_len_overflow() {
        let bytes = encode_u(BigUint::from(1u8) << 80u32);
        let mut ctx = DecodeContext::new(&bytes);
        assert!(matches!(
            decode_len(&mut ctx),
            Err(WireError::LengthOverflow { offset: 0 })
        ));

        // u64::MAX is the widest accepted length prefix
        let bytes = encode_u(u64::MAX);
        let mut ctx = DecodeContext::new(&bytes);
        assert_eq!(decode_varint_u64(&mut ctx).unwrap(), u64::MAX);
    }

    #[test]
    fn test_u64_boundary() {
        let max = encode_u(u64::MAX);
        assert_eq!(*max.last().unwrap(), 0x01);
        let mut ctx = DecodeContext::new(&max);
        assert_eq!(decode_varint(&mut ctx).unwrap(), BigUint::from(u64::MAX));

        let mut wider = max.clone();
        *wider.last_mut().unwrap() = 0x02;
        let mut ctx = DecodeContext::new(&wider);
        assert_eq!(
            decode_varint(&mut ctx).unwrap(),
            BigUint::from(u64::MAX >> 1) + (BigUint::from(1u8) << 64u32)
        );
        assert_eq!(ctx.offset(), wider.len());
    }

    #[test]
    fn test_long_continuation_run() {
        // 50k continuation bytes of zero, then a final 1: 2^(7 * 50k)
        let mut bytes = vec![0x80u8; 50_000];
        bytes.push(0x01);
        let mut ctx = DecodeContext::new(&bytes);
        assert_eq!(
            decode_varint(&mut ctx).unwrap(),
            BigUint::from(1u8) << (7u64 * 50_000)
        );
        assert_eq!(ctx.offset(), bytes.len());

        // The same run as a length gives up after ten bytes
        let mut ctx = DecodeContext::new(&bytes);
        assert!(matches!(
            decode_len(&mut ctx),
            Err(WireError::LengthOverflow { offset: 0 })
        ));
        assert_eq!(ctx.offset(), MAX_VARINT_LEN_U64);
    }
}
