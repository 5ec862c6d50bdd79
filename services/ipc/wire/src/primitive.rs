//! Leaf bodies: boolean, string and bytes.

use crate::context::DecodeContext;
use crate::error::Result;
use crate::varint::{decode_len, encode_varint_u64};
use bytes::{BufMut, Bytes, BytesMut};

/// Append a boolean body
pub fn encode_boolean(value: bool, buf: &mut BytesMut) {
    buf.put_u8(if value { 0x01 } else { 0x00 });
}

/// Read a boolean body; only `0x01` is true
pub fn decode_boolean(ctx: &mut DecodeContext<'_>) -> Result<bool> {
    Ok(ctx.read_u8()? == 0x01)
}

/// Append a length-prefixed UTF-8 string
pub fn encode_string(value: &str, buf: &mut BytesMut) {
    encode_bytes(value.as_bytes(), buf);
}

/// Read a length-prefixed UTF-8 string
pub fn decode_string(ctx: &mut DecodeContext<'_>) -> Result<String> {
    let len = decode_len(ctx)?;
    let raw = ctx.read_slice(len)?;
    Ok(std::str::from_utf8(raw)?.to_owned())
}

/// Append a length-prefixed byte blob
pub fn encode_bytes(value: &[u8], buf: &mut BytesMut) {
    buf.reserve(value.len() + 2);
    encode_varint_u64(value.len() as u64, buf);
    buf.put_slice(value);
}

/// Read a length-prefixed byte blob
pub fn decode_bytes(ctx: &mut DecodeContext<'_>) -> Result<Bytes> {
    let len = decode_len(ctx)?;
    Ok(Bytes::copy_from_slice(ctx.read_slice(len)?))
}
