//! Tag dispatch for encoding and decoding whole values.
//!
//! [`encode_wire`] writes `[tag][body]` for one value, [`decode_wire`] reads
//! it back. The `*_body` variants skip the tag and are what typed arrays use
//! for their elements, or what a caller uses when the tag travels out-of-band.

use crate::collection::{
    decode_array, decode_map, decode_type_array, encode_array, encode_map, encode_type_array,
};
use crate::context::{DecodeContext, EncodeContext, TypeArrayParams};
use crate::error::{Result, WireError};
use crate::infer::wire_type_of;
use crate::primitive::{
    decode_boolean, decode_bytes, decode_string, encode_boolean, encode_bytes, encode_string,
};
use crate::value::Value;
use crate::varfloat::{
    decode_svarfloat, decode_varfloat, encode_svarfloat, encode_varfloat, is_fractional, Decomposed,
};
use crate::varint::{decode_svarint, decode_varint, encode_svarint, encode_varint};
use crate::wire_type::WireType;
use bytes::{Bytes, BytesMut};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, Zero};
use tracing::{debug, trace};

/// A decoded value and the number of bytes it occupied
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// The value
    pub value: Value,
    /// Bytes consumed from the start offset, tag included
    pub consumed: usize,
}

/// Encode one value with an inferred tag
pub fn encode(value: &Value) -> Result<Bytes> {
    encode_with(&EncodeContext::new(), value)
}

/// Encode one value under the given context
pub fn encode_with(ctx: &EncodeContext, value: &Value) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    encode_wire(ctx, value, &mut buf)?;
    Ok(buf.freeze())
}

/// Decode one value starting at `offset`
pub fn decode(buf: &[u8], offset: usize) -> Result<Decoded> {
    decode_from(&mut DecodeContext::at(buf, offset))
}

/// Decode one value at the cursor of an existing context
pub fn decode_from(ctx: &mut DecodeContext<'_>) -> Result<Decoded> {
    let start = ctx.offset();
    match decode_wire(ctx) {
        Ok(value) => Ok(Decoded {
            value,
            consumed: ctx.offset() - start,
        }),
        Err(e) => {
            debug!(start, offset = ctx.offset(), error = %e, "wire decode failed");
            Err(e)
        }
    }
}

/// Decode a buffer holding exactly one value
pub fn decode_all(buf: &[u8]) -> Result<Value> {
    let decoded = decode(buf, 0)?;
    if decoded.consumed != buf.len() {
        return Err(WireError::TrailingBytes(buf.len() - decoded.consumed));
    }
    Ok(decoded.value)
}

/// Write tag and body for one value
pub fn encode_wire(ctx: &EncodeContext, value: &Value, buf: &mut BytesMut) -> Result<()> {
    let wire_type = match ctx.wire_type() {
        Some(wire_type) => wire_type,
        None => wire_type_of(value)?,
    };
    trace!(%wire_type, value = value.type_name(), "encoding value");
    wire_type.encode(buf);
    encode_body(wire_type, ctx.params(), value, buf)
}

/// Write the body of `value` as `wire_type`, without a tag
pub fn encode_body(
    wire_type: WireType,
    params: Option<&TypeArrayParams>,
    value: &Value,
    buf: &mut BytesMut,
) -> Result<()> {
    match (wire_type, value) {
        (WireType::Custom, _) => {}
        (WireType::Boolean, Value::Bool(b)) => encode_boolean(*b, buf),
        (WireType::VarInt, _) => {
            let int = integer_of(wire_type, value)?;
            let magnitude = int.to_biguint().ok_or_else(|| {
                WireError::mismatch(format!("negative value {int} under {wire_type}"))
            })?;
            encode_varint(&magnitude, buf);
        }
        (WireType::SVarInt, _) => encode_svarint(&integer_of(wire_type, value)?, buf),
        (WireType::VarFloat, _) => encode_varfloat(&decomposed_of(wire_type, value)?, buf)?,
        (WireType::SVarFloat, _) => encode_svarfloat(&decomposed_of(wire_type, value)?, buf),
        (WireType::String, Value::Text(s)) => encode_string(s, buf),
        (WireType::Bytes, Value::Bytes(b)) => encode_bytes(b, buf),
        (WireType::Array, Value::Array(items)) => {
            encode_array(items, buf, |item, buf| {
                encode_wire(&EncodeContext::new(), item, buf)
            })?;
        }
        (WireType::Map, Value::Map(entries)) => {
            encode_map(entries, buf, |item, buf| {
                encode_wire(&EncodeContext::new(), item, buf)
            })?;
        }
        (WireType::TypeArray, Value::Array(items)) => {
            let params = params.ok_or_else(|| {
                WireError::mismatch("typearray encoded without element params")
            })?;
            encode_type_array(params.element_type, items, buf, |item, buf| {
                encode_body(params.element_type, params.nested.as_deref(), item, buf)
            })?;
        }
        (wire_type, value) => {
            return Err(WireError::mismatch(format!(
                "{} cannot be encoded as {wire_type}",
                value.type_name()
            )));
        }
    }
    Ok(())
}

/// Read tag and body for one value
pub fn decode_wire(ctx: &mut DecodeContext<'_>) -> Result<Value> {
    let wire_type = WireType::decode(ctx)?;
    decode_body(ctx, wire_type)
}

/// Read the body of a value whose tag is already known
pub fn decode_body(ctx: &mut DecodeContext<'_>, wire_type: WireType) -> Result<Value> {
    trace!(%wire_type, offset = ctx.offset(), "decoding body");
    let value = match wire_type {
        // Reserved extension slot: empty body, reads as zero
        WireType::Custom => Value::Int(BigInt::zero()),
        WireType::Boolean => Value::Bool(decode_boolean(ctx)?),
        WireType::VarInt => Value::Int(decode_varint(ctx)?.into()),
        WireType::SVarInt => Value::Int(decode_svarint(ctx)?),
        WireType::VarFloat => Value::Float(decode_varfloat(ctx)?),
        WireType::SVarFloat => Value::Float(decode_svarfloat(ctx)?),
        WireType::String => Value::Text(decode_string(ctx)?),
        WireType::Bytes => Value::Bytes(decode_bytes(ctx)?),
        WireType::Array => Value::Array(nested(ctx, |ctx| decode_array(ctx, decode_wire))?),
        WireType::Map => Value::Map(nested(ctx, |ctx| decode_map(ctx, decode_wire))?),
        WireType::TypeArray => {
            Value::Array(nested(ctx, |ctx| decode_type_array(ctx, decode_body))?)
        }
    };
    Ok(value)
}

fn nested<T>(
    ctx: &mut DecodeContext<'_>,
    f: impl FnOnce(&mut DecodeContext<'_>) -> Result<T>,
) -> Result<T> {
    ctx.enter()?;
    let result = f(ctx);
    ctx.leave();
    result
}

fn integer_of(wire_type: WireType, value: &Value) -> Result<BigInt> {
    match value {
        Value::Int(n) => Ok(n.clone()),
        Value::Float(f) if f.is_finite() && !is_fractional(*f) => BigInt::from_f64(*f)
            .ok_or_else(|| WireError::UnsupportedType(format!("float {f}"))),
        other => Err(WireError::mismatch(format!(
            "{} cannot be encoded as {wire_type}",
            other.type_name()
        ))),
    }
}

fn decomposed_of(wire_type: WireType, value: &Value) -> Result<Decomposed> {
    match value {
        Value::Float(f) => Decomposed::from_f64(*f),
        Value::Int(n) => Ok(Decomposed {
            exp: 0,
            int: n.clone(),
        }),
        other => Err(WireError::mismatch(format!(
            "{} cannot be encoded as {wire_type}",
            other.type_name()
        ))),
    }
}
