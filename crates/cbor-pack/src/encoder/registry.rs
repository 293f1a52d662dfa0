//! Encoders for caller-defined types.
//!
//! [`Value::Custom`](crate::Value::Custom) values are resolved in this order:
//!
//! 1. the canonical override for the exact type (canonical mode only),
//! 2. the encoder registered for the exact type,
//! 3. fallback predicates, in registration order (a match is remembered
//!    under the value's exact type),
//! 4. the `default_handler` from [`EncoderOptions`](crate::EncoderOptions).

use std::any::{Any, TypeId};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use super::Encoder;
use crate::error::EncodeError;
use crate::options::{EncodeFn, TypePredicate};
use crate::value::CustomValue;

/// A type that knows how to write itself as CBOR.
///
/// ```
/// use cbor_pack::{Encodable, EncodeError, Encoder, EncoderOptions, Value};
///
/// struct Point(i64, i64);
///
/// impl Encodable for Point {
///     fn encode_cbor(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
///         encoder.encode(&Value::array([Value::from(self.0), Value::from(self.1)]))
///     }
/// }
///
/// let mut out = Vec::new();
/// let mut encoder = Encoder::new(&mut out, EncoderOptions::default());
/// encoder.register_encodable::<Point>();
/// encoder.encode(&Value::custom(Point(1, 2))).unwrap();
/// drop(encoder);
/// assert_eq!(out, [0x82, 0x01, 0x02]);
/// ```
pub trait Encodable: Any {
    fn encode_cbor(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError>;
}

#[derive(Default, Clone)]
pub(crate) struct Registry {
    exact: IndexMap<TypeId, EncodeFn>,
    canonical: IndexMap<TypeId, EncodeFn>,
    fallbacks: Vec<(TypePredicate, EncodeFn)>,
}

impl Registry {
    pub fn insert(&mut self, type_id: TypeId, f: EncodeFn) {
        self.exact.insert(type_id, f);
    }

    pub fn insert_canonical(&mut self, type_id: TypeId, f: EncodeFn) {
        self.canonical.insert(type_id, f);
    }

    pub fn push_fallback(&mut self, predicate: TypePredicate, f: EncodeFn) {
        self.fallbacks.push((predicate, f));
    }

    pub fn resolve(&mut self, value: &CustomValue, canonical: bool) -> Option<EncodeFn> {
        let type_id = value.value_type_id();
        if canonical {
            if let Some(f) = self.canonical.get(&type_id) {
                return Some(f.clone());
            }
        }
        if let Some(f) = self.exact.get(&type_id) {
            return Some(f.clone());
        }
        let f = self
            .fallbacks
            .iter()
            .find(|(predicate, _)| predicate(value))
            .map(|(_, f)| f.clone())?;
        debug!(type_name = value.type_name(), "memoizing fallback encoder");
        self.exact.insert(type_id, f.clone());
        Some(f)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.exact.len()
    }
}

/// Wraps a typed callback into an [`EncodeFn`] that downcasts first.
fn typed<T, F>(f: F) -> EncodeFn
where
    T: Any,
    F: Fn(&mut Encoder<'_>, &T) -> Result<(), EncodeError> + 'static,
{
    Rc::new(move |encoder, value| match value.downcast_ref::<T>() {
        Some(v) => f(encoder, v),
        None => Err(EncodeError::UnsupportedType(value.type_name().to_owned())),
    })
}

impl Encoder<'_> {
    /// Registers `f` for values whose concrete type is exactly `T`.
    /// A later registration for the same type replaces the earlier one.
    pub fn register_encoder<T, F>(&mut self, f: F) -> &mut Self
    where
        T: Any,
        F: Fn(&mut Encoder<'_>, &T) -> Result<(), EncodeError> + 'static,
    {
        self.registry.insert(TypeId::of::<T>(), typed(f));
        self
    }

    /// Registers an encoder used for `T` only in canonical mode.
    pub fn register_canonical_encoder<T, F>(&mut self, f: F) -> &mut Self
    where
        T: Any,
        F: Fn(&mut Encoder<'_>, &T) -> Result<(), EncodeError> + 'static,
    {
        self.registry.insert_canonical(TypeId::of::<T>(), typed(f));
        self
    }

    /// Registers an encoder for every custom value `predicate` accepts.
    ///
    /// Predicates are tried in registration order after the exact-type
    /// lookup fails. The first match is remembered for the value's concrete
    /// type, so the predicate should depend on the type alone.
    pub fn register_fallback<P, F>(&mut self, predicate: P, f: F) -> &mut Self
    where
        P: Fn(&CustomValue) -> bool + 'static,
        F: Fn(&mut Encoder<'_>, &CustomValue) -> Result<(), EncodeError> + 'static,
    {
        self.registry.push_fallback(Rc::new(predicate), Rc::new(f));
        self
    }

    pub fn register_encodable<T: Encodable>(&mut self) -> &mut Self {
        self.register_encoder::<T, _>(|encoder, value: &T| value.encode_cbor(encoder))
    }

    pub(crate) fn encode_custom(&mut self, value: &CustomValue) -> Result<(), EncodeError> {
        let canonical = self.options.canonical;
        if let Some(f) = self.registry.resolve(value, canonical) {
            return f(self, value);
        }
        match self.options.default_handler.clone() {
            Some(handler) => handler(self, value),
            None => Err(EncodeError::UnsupportedType(value.type_name().to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EncoderOptions;
    use crate::value::Value;

    struct Celsius(f64);
    struct Kelvin(f64);

    fn enc_with(
        options: EncoderOptions,
        setup: impl FnOnce(&mut Encoder<'_>),
        value: &Value,
    ) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        {
            let mut encoder = Encoder::new(&mut out, options);
            setup(&mut encoder);
            encoder.encode(value)?;
        }
        Ok(out)
    }

    #[test]
    fn test_exact_registration() {
        let out = enc_with(
            EncoderOptions::default(),
            |e| {
                e.register_encoder::<Celsius, _>(|e, c| e.encode(&Value::from(c.0 as i64)));
            },
            &Value::custom(Celsius(5.0)),
        )
        .unwrap();
        assert_eq!(out, vec![0x05]);
    }

    #[test]
    fn test_unregistered_type_fails() {
        let err = enc_with(EncoderOptions::default(), |_| {}, &Value::custom(Kelvin(1.0)))
            .unwrap_err();
        match err {
            EncodeError::UnsupportedType(name) => assert!(name.ends_with("Kelvin")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_fallback_match_is_memoized() {
        let mut out = Vec::new();
        let mut encoder = Encoder::new(&mut out, EncoderOptions::default());
        encoder.register_fallback(|v| v.is::<Kelvin>(), |e, _| e.encode(&Value::Null));
        assert_eq!(encoder.registry.len(), 0);
        encoder.encode(&Value::custom(Kelvin(0.0))).unwrap();
        assert_eq!(encoder.registry.len(), 1);
        encoder.encode(&Value::custom(Kelvin(1.0))).unwrap();
        drop(encoder);
        assert_eq!(out, vec![0xf6, 0xf6]);
    }

    #[test]
    fn test_first_matching_fallback_wins() {
        let out = enc_with(
            EncoderOptions::default(),
            |e| {
                e.register_fallback(|_| true, |e, _| e.encode(&Value::from(1)));
                e.register_fallback(|_| true, |e, _| e.encode(&Value::from(2)));
            },
            &Value::custom(Kelvin(0.0)),
        )
        .unwrap();
        assert_eq!(out, vec![0x01]);
    }

    #[test]
    fn test_default_handler_used_last() {
        let options = EncoderOptions::default()
            .with_default_handler(|e, v| e.encode(&Value::text(v.type_name().rsplit("::").next().unwrap_or(""))));
        let out = enc_with(options, |_| {}, &Value::custom(Kelvin(0.0))).unwrap();
        assert_eq!(out, b"\x66Kelvin".to_vec());
    }

    #[test]
    fn test_canonical_override_only_applies_in_canonical_mode() {
        fn setup(e: &mut Encoder<'_>) {
            e.register_encoder::<Celsius, _>(|e, _| e.encode(&Value::from(1)));
            e.register_canonical_encoder::<Celsius, _>(|e, _| e.encode(&Value::from(2)));
        }
        let value = Value::custom(Celsius(0.0));
        let regular = enc_with(EncoderOptions::default(), setup, &value).unwrap();
        let canonical = enc_with(
            EncoderOptions {
                canonical: true,
                ..Default::default()
            },
            setup,
            &value,
        )
        .unwrap();
        assert_eq!(regular, vec![0x01]);
        assert_eq!(canonical, vec![0x02]);
    }

    #[test]
    fn test_canonical_mode_without_override_uses_regular_encoder() {
        let out = enc_with(
            EncoderOptions {
                canonical: true,
                ..Default::default()
            },
            |e| {
                e.register_encoder::<Celsius, _>(|e, _| e.encode(&Value::from(7)));
            },
            &Value::custom(Celsius(0.0)),
        )
        .unwrap();
        assert_eq!(out, vec![0x07]);
    }

    #[test]
    fn test_encodable_trait() {
        impl Encodable for Kelvin {
            fn encode_cbor(&self, encoder: &mut Encoder<'_>) -> Result<(), EncodeError> {
                encoder.encode_float(self.0);
                Ok(())
            }
        }
        let out = enc_with(
            EncoderOptions::default(),
            |e| {
                e.register_encodable::<Kelvin>();
            },
            &Value::custom(Kelvin(1.5)),
        )
        .unwrap();
        assert_eq!(out, vec![0xfb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]);
    }
}
