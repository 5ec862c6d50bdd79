//! Encode and decode contexts.
//!
//! An [`EncodeContext`] carries the (optionally caller-chosen) wire type of one
//! value plus the element parameters a [`WireType::TypeArray`] needs. A
//! [`DecodeContext`] is the single cursor over the input: nested decodes borrow
//! it mutably, so sibling elements advance the same offset strictly in call
//! order.

use crate::error::{Result, WireError};
use crate::value::Value;
use crate::wire_type::WireType;

/// Default nesting limit for decoding
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Element description for a homogeneous typed array
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeArrayParams {
    /// Wire type shared by every element
    pub element_type: WireType,
    /// Element parameters when the elements are typed arrays themselves
    pub nested: Option<Box<TypeArrayParams>>,
}

impl TypeArrayParams {
    /// Params for a flat typed array
    pub fn new(element_type: WireType) -> Self {
        Self {
            element_type,
            nested: None,
        }
    }

    /// Params for a typed array of typed arrays
    pub fn nested(inner: TypeArrayParams) -> Self {
        Self {
            element_type: WireType::TypeArray,
            nested: Some(Box::new(inner)),
        }
    }

    /// Parse a comma-separated chain of wire type names, outermost element first.
    ///
    /// `"typearray,string"` describes an array of string arrays.
    pub fn parse_chain(chain: &str) -> Result<Self> {
        let types = chain
            .split(',')
            .map(str::parse::<WireType>)
            .collect::<Result<Vec<_>>>()?;

        let mut iter = types.into_iter().rev();
        let innermost = iter
            .next()
            .ok_or_else(|| WireError::mismatch("empty type array element chain"))?;
        let mut params = TypeArrayParams::new(innermost);
        for ty in iter {
            if ty != WireType::TypeArray {
                return Err(WireError::mismatch(format!(
                    "only typearray may wrap a nested element type, found {ty}"
                )));
            }
            params = TypeArrayParams::nested(params);
        }
        Ok(params)
    }
}

/// Per-value encode parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeContext {
    wire_type: Option<WireType>,
    params: Option<TypeArrayParams>,
}

impl EncodeContext {
    /// Context that infers the wire type from the value
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with the wire type already inferred from `value`
    pub fn for_value(value: &Value) -> Result<Self> {
        Ok(Self::for_type(crate::infer::wire_type_of(value)?))
    }

    /// Context with a caller-chosen wire type
    pub fn for_type(wire_type: WireType) -> Self {
        Self {
            wire_type: Some(wire_type),
            params: None,
        }
    }

    /// Context for a typed array with the given element params
    pub fn for_type_array(params: TypeArrayParams) -> Self {
        Self {
            wire_type: Some(WireType::TypeArray),
            params: Some(params),
        }
    }

    /// Attach typed array params; only the first call takes effect
    pub fn with_params(mut self, params: TypeArrayParams) -> Self {
        if self.params.is_none() {
            self.params = Some(params);
        }
        self
    }

    /// Caller-chosen wire type, if any
    pub fn wire_type(&self) -> Option<WireType> {
        self.wire_type
    }

    /// Typed array params, if any
    pub fn params(&self) -> Option<&TypeArrayParams> {
        self.params.as_ref()
    }
}

/// Cursor over one input buffer
#[derive(Debug)]
pub struct DecodeContext<'a> {
    buf: &'a [u8],
    offset: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> DecodeContext<'a> {
    /// Cursor at the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self::at(buf, 0)
    }

    /// Cursor at `offset` within `buf`
    pub fn at(buf: &'a [u8], offset: usize) -> Self {
        Self {
            buf,
            offset,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Position of the next byte to read
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The whole input, independent of the cursor
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    /// Whether the cursor is at or past the end
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read one byte and advance
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.buf.get(self.offset).ok_or_else(|| self.overrun(1))?;
        self.offset += 1;
        Ok(byte)
    }

    /// Read `len` bytes and advance
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let buf = self.buf;
        let slice = self
            .offset
            .checked_add(len)
            .and_then(|end| buf.get(self.offset..end))
            .ok_or_else(|| self.overrun(len))?;
        self.offset += len;
        Ok(slice)
    }

    /// Check that `count` items of at least `min_each` bytes can still follow
    pub(crate) fn check_count(&self, count: usize, min_each: usize) -> Result<()> {
        let needed = count.saturating_mul(min_each);
        if needed > self.remaining() {
            return Err(self.overrun(needed));
        }
        Ok(())
    }

    pub(crate) fn overrun(&self, needed: usize) -> WireError {
        WireError::MalformedBuffer {
            offset: self.offset,
            needed,
            available: self.remaining(),
        }
    }

    pub(crate) fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(WireError::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
