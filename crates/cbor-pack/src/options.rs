//! Encoder configuration.

use std::fmt;
use std::rc::Rc;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::encoder::Encoder;
use crate::error::EncodeError;
use crate::value::CustomValue;

/// Encoder callback for a caller-defined type.
///
/// The callback receives the encoder itself and may call back into
/// [`Encoder::encode`] or [`Encoder::encode_to_bytes`].
pub type EncodeFn = Rc<dyn Fn(&mut Encoder<'_>, &CustomValue) -> Result<(), EncodeError>>;

/// Callback invoked for custom values no registered encoder accepts.
pub type DefaultHandler = EncodeFn;

/// Predicate used by fallback registrations.
pub type TypePredicate = Rc<dyn Fn(&CustomValue) -> bool>;

/// Options controlling how values are encoded.
///
/// Everything except `default_handler` can be loaded from JSON:
///
/// ```
/// use cbor_pack::EncoderOptions;
///
/// let options = EncoderOptions::from_json(r#"{"canonical": true, "default_timezone": 3600}"#).unwrap();
/// assert!(options.canonical);
/// assert_eq!(options.default_timezone.map(|tz| tz.local_minus_utc()), Some(3600));
/// ```
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Encode datetimes as epoch timestamps (tag 1) instead of strings
    /// (tag 0), and dates as epoch days (tag 100) instead of strings
    /// (tag 1004).
    pub datetime_as_timestamp: bool,
    /// Encode dates as midnight datetimes in the default timezone.
    pub date_as_datetime: bool,
    /// Offset applied to naive datetimes. Serialized as seconds east of UTC.
    #[serde(with = "offset_seconds")]
    pub default_timezone: Option<FixedOffset>,
    /// Mark containers with tag 28 and replace repeats with tag 29.
    pub value_sharing: bool,
    /// Replace repeated strings with tag 25 references inside a tag 256
    /// namespace.
    pub string_referencing: bool,
    /// Sort maps and sets by encoded key and use minimal-width floats.
    pub canonical: bool,
    #[serde(skip)]
    pub default_handler: Option<DefaultHandler>,
}

impl EncoderOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn with_default_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Encoder<'_>, &CustomValue) -> Result<(), EncodeError> + 'static,
    {
        self.default_handler = Some(Rc::new(handler));
        self
    }
}

impl fmt::Debug for EncoderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderOptions")
            .field("datetime_as_timestamp", &self.datetime_as_timestamp)
            .field("date_as_datetime", &self.date_as_datetime)
            .field("default_timezone", &self.default_timezone)
            .field("value_sharing", &self.value_sharing)
            .field("string_referencing", &self.string_referencing)
            .field("canonical", &self.canonical)
            .field("default_handler", &self.default_handler.is_some())
            .finish()
    }
}

mod offset_seconds {
    use chrono::FixedOffset;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        offset: &Option<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match offset {
            Some(offset) => serializer.serialize_some(&offset.local_minus_utc()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<FixedOffset>, D::Error> {
        match Option::<i32>::deserialize(deserializer)? {
            Some(seconds) => FixedOffset::east_opt(seconds)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("utc offset {seconds}s out of range"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_off() {
        let options = EncoderOptions::default();
        assert!(!options.datetime_as_timestamp);
        assert!(!options.date_as_datetime);
        assert!(options.default_timezone.is_none());
        assert!(!options.value_sharing);
        assert!(!options.string_referencing);
        assert!(!options.canonical);
        assert!(options.default_handler.is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let options = EncoderOptions {
            value_sharing: true,
            default_timezone: FixedOffset::west_opt(5 * 3600),
            ..Default::default()
        };
        let json = options.to_json().unwrap();
        let back = EncoderOptions::from_json(&json).unwrap();
        assert!(back.value_sharing);
        assert_eq!(back.default_timezone, FixedOffset::west_opt(5 * 3600));
    }

    #[test]
    fn test_json_rejects_bad_offset() {
        assert!(EncoderOptions::from_json(r#"{"default_timezone": 999999}"#).is_err());
    }

    #[test]
    fn test_debug_hides_handler() {
        let options = EncoderOptions::default().with_default_handler(|_, _| Ok(()));
        let text = format!("{options:?}");
        assert!(text.contains("default_handler: true"));
    }
}
