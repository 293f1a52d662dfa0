//! The CBOR [`Encoder`].
//!
//! Values are written into an in-memory [`Writer`] and handed to the sink
//! each time a top-level [`Encoder::encode`] call returns, so the sink sees
//! one `write_all` per document. [`Encoder::encode_to_bytes`] swaps in a
//! scratch writer for the duration of the call.

mod containers;
mod primitives;
mod registry;
mod sharing;
mod stringref;
mod tags;

use std::io::Write;

use cbor_pack_buffers::Writer;

use crate::error::EncodeError;
use crate::options::EncoderOptions;
use crate::value::Value;

pub use registry::Encodable;
use registry::Registry;
use sharing::SharingTracker;
use stringref::StringRefTable;

/// Streaming CBOR encoder.
///
/// An encoder keeps value-sharing and string-reference state across calls;
/// call [`Encoder::reset`] before reusing it for an unrelated document.
///
/// ```
/// use cbor_pack::{Encoder, EncoderOptions, Value};
///
/// let mut out = Vec::new();
/// let mut encoder = Encoder::new(&mut out, EncoderOptions::default());
/// encoder.encode(&Value::array([Value::from(1), Value::from(2), Value::from(3)])).unwrap();
/// drop(encoder);
/// assert_eq!(out, [0x83, 0x01, 0x02, 0x03]);
/// ```
pub struct Encoder<'a> {
    sink: Box<dyn Write + 'a>,
    writer: Writer,
    options: EncoderOptions,
    registry: Registry,
    shared: SharingTracker,
    strings: StringRefTable,
    /// Whether strings are currently checked against `strings`.
    string_referencing: bool,
    /// The next container opens the implicit tag 256 namespace.
    namespace_pending: bool,
    depth: usize,
    captures: usize,
}

impl<'a> Encoder<'a> {
    pub fn new<W: Write + 'a>(sink: W, options: EncoderOptions) -> Self {
        let string_referencing = options.string_referencing;
        Self {
            sink: Box::new(sink),
            writer: Writer::new(),
            options,
            registry: Registry::default(),
            shared: SharingTracker::default(),
            strings: StringRefTable::default(),
            string_referencing,
            namespace_pending: string_referencing,
            depth: 0,
            captures: 0,
        }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    /// Encodes one value.
    ///
    /// On failure, bytes produced before the error are still handed to the
    /// sink.
    pub fn encode(&mut self, value: &Value) -> Result<(), EncodeError> {
        self.depth += 1;
        let result = self.encode_value(value);
        self.depth -= 1;
        if self.depth == 0 && self.captures == 0 {
            let drained = self.drain();
            result?;
            return drained;
        }
        result
    }

    /// Encodes `value` into a fresh buffer and returns it.
    ///
    /// Sharing, string-reference and registry state are those of this
    /// encoder, so the result is only meaningful inside the current
    /// document.
    pub fn encode_to_bytes(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let outer = std::mem::take(&mut self.writer);
        self.captures += 1;
        let result = self.encode(value);
        self.captures -= 1;
        let mut inner = std::mem::replace(&mut self.writer, outer);
        result.map(|()| inner.flush())
    }

    /// Writes pre-encoded CBOR bytes verbatim.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.writer.buf(bytes);
    }

    /// Hands pending bytes to the sink and flushes it.
    pub fn flush(&mut self) -> Result<(), EncodeError> {
        self.drain()?;
        self.sink.flush()?;
        Ok(())
    }

    /// Hands pending bytes to the sink, then forgets shared containers and
    /// string references and re-arms the implicit string namespace.
    /// Registered encoders are kept. The state is cleared even when the
    /// sink fails.
    pub fn reset(&mut self) -> Result<(), EncodeError> {
        let drained = self.drain();
        self.shared.clear();
        self.strings = StringRefTable::default();
        self.string_referencing = self.options.string_referencing;
        self.namespace_pending = self.options.string_referencing;
        drained
    }

    fn drain(&mut self) -> Result<(), EncodeError> {
        if !self.writer.is_empty() {
            let bytes = self.writer.flush();
            self.sink.write_all(&bytes)?;
        }
        Ok(())
    }

    fn encode_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Null => self.encode_null(),
            Value::Undefined => self.encode_undefined(),
            Value::Bool(b) => self.encode_bool(*b),
            Value::Integer(i) => self.encode_int(*i),
            Value::UInteger(u) => self.encode_uint(*u),
            Value::BigInt(i) => self.encode_big_int(i),
            Value::Float(f) => self.encode_float_value(*f),
            Value::Bytes(b) => self.encode_bytes(b),
            Value::Str(s) => self.encode_str(s),
            Value::Array(items) => return self.encode_container(|e| e.encode_array(items)),
            Value::Map(entries) => return self.encode_container(|e| e.encode_map(entries)),
            Value::FrozenMap(map) => {
                return self.encode_container(|e| e.encode_map(map.entries()))
            }
            Value::Set(members) => return self.encode_container(|e| e.encode_set(members)),
            Value::Tag(tag) => return self.encode_semantic(tag),
            Value::Simple(simple) => self.encode_simple_value(*simple),
            Value::DateTime(dt) => return self.encode_datetime(dt),
            Value::NaiveDateTime(dt) => return self.encode_naive_datetime(dt),
            Value::Date(date) => return self.encode_date(date),
            Value::Decimal(decimal) => self.encode_decimal(decimal),
            Value::Rational(rational) => self.encode_rational(rational),
            Value::Regex(re) => self.encode_regex(re),
            Value::Mime(message) => self.encode_mime(message),
            Value::Uuid(uuid) => self.encode_uuid(uuid),
            Value::IpAddress(addr) => self.encode_ip_address(addr),
            Value::IpNetwork(network) => self.encode_ip_network(network),
            Value::Shared(handle) => return self.encode_shared(handle),
            Value::Custom(custom) => return self.encode_custom(custom),
        }
        Ok(())
    }
}

impl Drop for Encoder<'_> {
    fn drop(&mut self) {
        // Errors cannot be reported here; call `flush` to observe them.
        let _ = self.flush();
    }
}
