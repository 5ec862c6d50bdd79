//! Wire type tags.
//!
//! Every encoded unit starts with a single tag byte naming the body layout that
//! follows. The only exception are the elements of a [`WireType::TypeArray`],
//! whose shared tag is written once after the element count.

use crate::context::DecodeContext;
use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire type discriminator
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireType {
    /// Extension slot with an empty body; never chosen by inference
    Custom = 0x0,
    /// One byte, 0x00 or 0x01
    Boolean = 0x1,
    /// Unsigned base-128 varint
    VarInt = 0x2,
    /// Zigzag varint
    SVarInt = 0x3,
    /// Decomposed float with unsigned mantissa
    VarFloat = 0x4,
    /// Decomposed float with zigzag mantissa
    SVarFloat = 0x5,
    /// Length-prefixed UTF-8
    String = 0x6,
    /// Length-prefixed raw bytes
    Bytes = 0x7,
    /// Count-prefixed sequence of tagged values
    Array = 0x8,
    /// Count-prefixed sequence of tagged key/value pairs
    Map = 0x9,
    /// Count-prefixed sequence of untagged bodies sharing one tag
    TypeArray = 0xA,
}

impl WireType {
    /// All wire types in tag order
    pub const ALL: [WireType; 11] = [
        WireType::Custom,
        WireType::Boolean,
        WireType::VarInt,
        WireType::SVarInt,
        WireType::VarFloat,
        WireType::SVarFloat,
        WireType::String,
        WireType::Bytes,
        WireType::Array,
        WireType::Map,
        WireType::TypeArray,
    ];

    /// Tag byte value
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Lowercase name, as accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            WireType::Custom => "custom",
            WireType::Boolean => "boolean",
            WireType::VarInt => "varint",
            WireType::SVarInt => "svarint",
            WireType::VarFloat => "varfloat",
            WireType::SVarFloat => "svarfloat",
            WireType::String => "string",
            WireType::Bytes => "bytes",
            WireType::Array => "array",
            WireType::Map => "map",
            WireType::TypeArray => "typearray",
        }
    }

    /// Write the tag byte
    pub fn encode(self, buf: &mut BytesMut) {
        buf.put_u8(self as u8);
    }

    /// Read one tag byte at the cursor
    pub fn decode(ctx: &mut DecodeContext<'_>) -> Result<Self, crate::WireError> {
        WireType::try_from(ctx.read_u8()?)
    }
}

impl TryFrom<u8> for WireType {
    type Error = crate::WireError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(WireType::Custom),
            0x1 => Ok(WireType::Boolean),
            0x2 => Ok(WireType::VarInt),
            0x3 => Ok(WireType::SVarInt),
            0x4 => Ok(WireType::VarFloat),
            0x5 => Ok(WireType::SVarFloat),
            0x6 => Ok(WireType::String),
            0x7 => Ok(WireType::Bytes),
            0x8 => Ok(WireType::Array),
            0x9 => Ok(WireType::Map),
            0xA => Ok(WireType::TypeArray),
            _ => Err(crate::WireError::UnknownWireType(value)),
        }
    }
}

impl FromStr for WireType {
    type Err = crate::WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        WireType::ALL
            .into_iter()
            .find(|ty| ty.name() == lower)
            .ok_or_else(|| crate::WireError::UnsupportedType(format!("unknown wire type name {s:?}")))
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.name(), self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_type_conversion() {
        for ty in WireType::ALL {
            assert_eq!(WireType::try_from(ty.tag()).unwrap(), ty);
        }
        assert_eq!(WireType::try_from(0x06).unwrap(), WireType::String);
        assert!(matches!(
            WireType::try_from(0x0B),
            Err(crate::WireError::UnknownWireType(0x0B))
        ));
    }

    #[test]
    fn test_tag_values() {
        assert_eq!(WireType::Custom.tag(), 0x0);
        assert_eq!(WireType::SVarInt.tag(), 0x3);
        assert_eq!(WireType::TypeArray.tag(), 0xA);
    }

    #[test]
    fn test_encode_decode_tag() {
        let mut buf = BytesMut::new();
        WireType::Map.encode(&mut buf);
        assert_eq!(&buf[..], &[0x09]);

        let mut ctx = DecodeContext::new(&buf);
        assert_eq!(WireType::decode(&mut ctx).unwrap(), WireType::Map);
        assert_eq!(ctx.offset(), 1);
        assert!(WireType::decode(&mut ctx).is_err());
    }

    #[test]
    fn test_parse_name() {
        assert_eq!("string".parse::<WireType>().unwrap(), WireType::String);
        assert_eq!(" SVarInt ".parse::<WireType>().unwrap(), WireType::SVarInt);
        assert_eq!("typearray".parse::<WireType>().unwrap(), WireType::TypeArray);
        assert!("double".parse::<WireType>().is_err());
    }
}
