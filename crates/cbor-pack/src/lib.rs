//! CBOR encoder with semantic tags, canonical ordering, value sharing and
//! string references.
//!
//! ```
//! use cbor_pack::{dumps, EncoderOptions, Value};
//!
//! let bytes = dumps(&Value::map([("a", 1)]), EncoderOptions::default()).unwrap();
//! assert_eq!(bytes, [0xa1, 0x61, 0x61, 0x01]);
//!
//! let canonical = EncoderOptions { canonical: true, ..Default::default() };
//! assert_eq!(dumps(&Value::from(2.5), canonical).unwrap(), [0xf9, 0x41, 0x00]);
//! ```

pub mod constants;
mod encoder;
mod error;
mod options;
mod types;
mod value;

use std::io::Write;

pub use encoder::{Encodable, Encoder};
pub use error::{EncodeError, InvalidValue};
pub use options::{DefaultHandler, EncodeFn, EncoderOptions, TypePredicate};
pub use types::{Decimal, FrozenMap, IpNetwork, MimeMessage, SimpleValue, Tag};
pub use value::{CustomValue, Shared, Value};

/// Encodes `value` with a one-off encoder and returns the bytes.
pub fn dumps(value: &Value, options: EncoderOptions) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    dump(value, &mut out, options)?;
    Ok(out)
}

/// Encodes `value` into `sink` with a one-off encoder.
pub fn dump<W: Write>(value: &Value, sink: W, options: EncoderOptions) -> Result<(), EncodeError> {
    let mut encoder = Encoder::new(sink, options);
    encoder.encode(value)?;
    encoder.flush()
}
