//! Wire type inference.

use crate::error::{Result, WireError};
use crate::value::Value;
use crate::varfloat::is_fractional;
use crate::wire_type::WireType;
use num_traits::Signed;

/// Pick the wire type a value is encoded under when the caller names none.
///
/// Negative numbers take the signed variant. Floats without a fractional part
/// travel as integers. Inference never yields [`WireType::Custom`] or
/// [`WireType::TypeArray`]; both must be requested explicitly.
pub fn wire_type_of(value: &Value) -> Result<WireType> {
    let ty = match value {
        Value::Bool(_) => WireType::Boolean,
        Value::Text(_) => WireType::String,
        Value::Int(n) if n.is_negative() => WireType::SVarInt,
        Value::Int(_) => WireType::VarInt,
        Value::Float(f) if !f.is_finite() => {
            return Err(WireError::UnsupportedType(format!("non-finite float {f}")));
        }
        Value::Float(f) => match (is_fractional(*f), *f < 0.0) {
            (true, true) => WireType::SVarFloat,
            (true, false) => WireType::VarFloat,
            (false, true) => WireType::SVarInt,
            (false, false) => WireType::VarInt,
        },
        Value::Bytes(_) => WireType::Bytes,
        Value::Array(_) => WireType::Array,
        Value::Map(_) => WireType::Map,
    };
    Ok(ty)
}
