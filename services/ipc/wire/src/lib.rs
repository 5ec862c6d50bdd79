//! Schema-less binary codec for IPC messages.
//!
//! This crate turns dynamically typed [`Value`]s into a compact, self-describing
//! byte sequence and back. Every value is a one-byte wire tag followed by a
//! body; container bodies embed further tagged values. The transport layer
//! calls [`encode`] and [`decode`] once per message and owns framing.
//!
//! ## Features
//!
//! - **Varints**: base-128 little-endian integers of any size, zigzag for signed
//! - **Decomposed Floats**: decimal mantissa and exponent instead of IEEE bytes
//! - **Collections**: arrays and maps of heterogeneous values
//! - **Typed Arrays**: homogeneous arrays that hoist the element tag once
//! - **Bounds-Checked Decoding**: every read is checked, nesting is limited
//!
//! ## Wire Format
//!
//! ```text
//! +-----------------+-------------------------------------------------+
//! | Boolean   0x1   | 0x00 / 0x01                                     |
//! | VarInt    0x2   | varint(n)                                       |
//! | SVarInt   0x3   | varint(zigzag(n))                               |
//! | VarFloat  0x4   | varint(exp) varint(int)                         |
//! | SVarFloat 0x5   | varint(exp) varint(zigzag(int))                 |
//! | String    0x6   | varint(len) utf-8                               |
//! | Bytes     0x7   | varint(len) raw                                 |
//! | Array     0x8   | varint(count) count x [tag body]                |
//! | Map       0x9   | varint(count) count x [tag body][tag body]      |
//! | TypeArray 0xA   | varint(count) tag count x [body]                |
//! +-----------------+-------------------------------------------------+
//! ```
//!
//! ## Example
//!
//! ```
//! use ipc_wire::{decode, encode, Value};
//!
//! let encoded = encode(&Value::from("ab")).unwrap();
//! assert_eq!(&encoded[..], &[0x06, 0x02, 0x61, 0x62]);
//!
//! let decoded = decode(&encoded, 0).unwrap();
//! assert_eq!(decoded.value, Value::from("ab"));
//! assert_eq!(decoded.consumed, 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod collection;
pub mod context;
pub mod error;
pub mod infer;
pub mod json;
pub mod primitive;
pub mod value;
pub mod varfloat;
pub mod varint;
pub mod wire_type;

// Re-export main types
pub use codec::{
    decode, decode_all, decode_body, decode_from, decode_wire, encode, encode_body, encode_wire,
    encode_with, Decoded,
};
pub use context::{DecodeContext, EncodeContext, TypeArrayParams, DEFAULT_MAX_DEPTH};
pub use error::{Result, WireError};
pub use infer::wire_type_of;
pub use json::{from_json, to_json};
pub use value::Value;
pub use varfloat::Decomposed;
pub use varint::{zigzag_decode, zigzag_encode};
pub use wire_type::WireType;
