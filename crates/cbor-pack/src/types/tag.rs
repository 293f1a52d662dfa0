//! [`Tag`] and [`SimpleValue`].

use crate::error::InvalidValue;
use crate::Value;

/// A semantic tag: a tag number wrapping an arbitrary payload.
///
/// When the encoder meets a `Tag` it writes a major type 6 header with the
/// tag number and then encodes the payload. Tag 256 additionally opens a
/// fresh string-reference namespace for its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    tag: u64,
    value: Value,
}

impl Tag {
    pub fn new(tag: u64, value: impl Into<Value>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Builds a tag from a wider integer, rejecting numbers outside `0..2^64`.
    ///
    /// ```
    /// use cbor_pack::{Tag, Value};
    ///
    /// assert!(Tag::try_new(6000, Value::Null).is_ok());
    /// assert!(Tag::try_new(-1, Value::Null).is_err());
    /// assert!(Tag::try_new(1i128 << 64, Value::Null).is_err());
    /// ```
    pub fn try_new(tag: i128, value: impl Into<Value>) -> Result<Self, InvalidValue> {
        let tag = u64::try_from(tag).map_err(|_| InvalidValue::TagOutOfRange(tag))?;
        Ok(Self::new(tag, value))
    }

    pub fn tag(&self) -> u64 {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_parts(self) -> (u64, Value) {
        (self.tag, self.value)
    }
}

/// A major type 7 simple value outside the boolean/null/undefined/float set.
///
/// Values 24 through 31 are reserved by the wire format and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimpleValue(u8);

impl SimpleValue {
    pub fn new(value: u8) -> Result<Self, InvalidValue> {
        if (24..=31).contains(&value) {
            return Err(InvalidValue::SimpleValueOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SimpleValue {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
