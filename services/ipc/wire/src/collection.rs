//! Collection bodies: arrays, maps and typed arrays.
//!
//! ```text
//! Array      varint(count) [tag body] [tag body] ...
//! Map        varint(count) [tag body]key [tag body]value ...
//! TypeArray  varint(count) tag body body ...
//! ```
//!
//! Elements are encoded through callbacks so these resolvers stay independent
//! of the top-level dispatch in [`crate::codec`].

use crate::context::DecodeContext;
use crate::error::{Result, WireError};
use crate::value::Value;
use crate::varint::{decode_len, encode_varint_u64};
use crate::wire_type::WireType;
use bytes::BytesMut;

/// Append an array body; `on_encode` writes one tagged element
pub fn encode_array<F>(items: &[Value], buf: &mut BytesMut, mut on_encode: F) -> Result<()>
where
    F: FnMut(&Value, &mut BytesMut) -> Result<()>,
{
    encode_varint_u64(items.len() as u64, buf);
    for item in items {
        on_encode(item, buf)?;
    }
    Ok(())
}

/// Read an array body; `on_decode` reads one tagged element
pub fn decode_array<F>(ctx: &mut DecodeContext<'_>, mut on_decode: F) -> Result<Vec<Value>>
where
    F: FnMut(&mut DecodeContext<'_>) -> Result<Value>,
{
    let count = decode_len(ctx)?;
    // Each tagged element takes at least its tag byte
    ctx.check_count(count, 1)?;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(on_decode(ctx)?);
    }
    Ok(items)
}

/// Append a map body; `on_encode` writes one tagged key or value
pub fn encode_map<F>(
    entries: &[(Value, Value)],
    buf: &mut BytesMut,
    mut on_encode: F,
) -> Result<()>
where
    F: FnMut(&Value, &mut BytesMut) -> Result<()>,
{
    encode_varint_u64(entries.len() as u64, buf);
    for (key, value) in entries {
        on_encode(key, buf)?;
        on_encode(value, buf)?;
    }
    Ok(())
}

/// Read a map body; `on_decode` reads one tagged key or value
pub fn decode_map<F>(
    ctx: &mut DecodeContext<'_>,
    mut on_decode: F,
) -> Result<Vec<(Value, Value)>>
where
    F: FnMut(&mut DecodeContext<'_>) -> Result<Value>,
{
    let count = decode_len(ctx)?;
    ctx.check_count(count, 2)?;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let key = on_decode(ctx)?;
        let value = on_decode(ctx)?;
        entries.push((key, value));
    }
    Ok(entries)
}

/// Append a typed array body; `on_encode` writes one untagged element body
pub fn encode_type_array<F>(
    element_type: WireType,
    items: &[Value],
    buf: &mut BytesMut,
    mut on_encode: F,
) -> Result<()>
where
    F: FnMut(&Value, &mut BytesMut) -> Result<()>,
{
    check_element_type(element_type)?;
    encode_varint_u64(items.len() as u64, buf);
    element_type.encode(buf);
    for item in items {
        on_encode(item, buf)?;
    }
    Ok(())
}

/// Read a typed array body; `on_decode` reads one body of the shared type
pub fn decode_type_array<F>(ctx: &mut DecodeContext<'_>, mut on_decode: F) -> Result<Vec<Value>>
where
    F: FnMut(&mut DecodeContext<'_>, WireType) -> Result<Value>,
{
    let count = decode_len(ctx)?;
    let element_type = WireType::decode(ctx)?;
    check_element_type(element_type)?;
    // Every non-custom body takes at least one byte
    ctx.check_count(count, 1)?;

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(on_decode(ctx, element_type)?);
    }
    Ok(items)
}

fn check_element_type(element_type: WireType) -> Result<()> {
    if element_type == WireType::Custom {
        return Err(WireError::mismatch(
            "custom elements have no body and cannot form a typed array",
        ));
    }
    Ok(())
}
