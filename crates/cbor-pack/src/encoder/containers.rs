//! Arrays, maps, sets and the wrappers every container goes through:
//! the implicit string namespace and the value-sharing marker.

use cbor_pack_buffers::cmp_canonical;
use tracing::{debug, trace};

use super::sharing::SharedState;
use super::stringref::StringRefTable;
use super::Encoder;
use crate::constants::*;
use crate::error::{EncodeError, InvalidValue};
use crate::value::{Shared, Value};

impl Encoder<'_> {
    pub fn encode_array(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        self.encode_length(MAJOR_ARR, items.len() as u64);
        for item in items {
            self.encode(item)?;
        }
        Ok(())
    }

    /// Writes map entries in order, or sorted by encoded key in canonical
    /// mode.
    pub fn encode_map(&mut self, entries: &[(Value, Value)]) -> Result<(), EncodeError> {
        if self.options.canonical {
            return self.encode_canonical_map(entries);
        }
        self.encode_length(MAJOR_MAP, entries.len() as u64);
        for (key, value) in entries {
            self.encode(key)?;
            self.encode(value)?;
        }
        Ok(())
    }

    /// Writes tag 258 over the members, sorted by encoding in canonical
    /// mode.
    pub fn encode_set(&mut self, members: &[Value]) -> Result<(), EncodeError> {
        self.encode_length(MAJOR_TAG, TAG_SET);
        if !self.options.canonical {
            return self.encode_array(members);
        }
        let mut keyed = Vec::with_capacity(members.len());
        for member in members {
            keyed.push((self.sortable_key(member)?, member));
        }
        keyed.sort_by(|a, b| cmp_canonical(&a.0, &b.0));
        self.encode_length(MAJOR_ARR, keyed.len() as u64);
        let reencode = self.must_reencode_keys();
        for (sort_key, member) in keyed {
            if reencode {
                self.encode(member)?;
            } else {
                self.write_raw(&sort_key);
            }
        }
        Ok(())
    }

    fn encode_canonical_map(&mut self, entries: &[(Value, Value)]) -> Result<(), EncodeError> {
        let mut keyed = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            keyed.push((self.sortable_key(key)?, key, value));
        }
        keyed.sort_by(|a, b| cmp_canonical(&a.0, &b.0));
        self.encode_length(MAJOR_MAP, keyed.len() as u64);
        // References must be numbered in emission order, so the cached
        // bytes are only reusable when no stream state is involved.
        let reencode = self.must_reencode_keys();
        for (sort_key, key, value) in keyed {
            if reencode {
                self.encode(key)?;
            } else {
                self.write_raw(&sort_key);
            }
            self.encode(value)?;
        }
        Ok(())
    }

    fn must_reencode_keys(&self) -> bool {
        self.string_referencing || self.options.value_sharing
    }

    /// Encodes `key` on the side with string referencing off. Sharing state
    /// is rolled back afterwards so the side encoding consumes no indices.
    fn sortable_key(&mut self, key: &Value) -> Result<Vec<u8>, EncodeError> {
        let referencing = std::mem::replace(&mut self.string_referencing, false);
        let pending = std::mem::replace(&mut self.namespace_pending, false);
        let shared = self.shared.clone();
        let result = self.encode_to_bytes(key);
        self.string_referencing = referencing;
        self.namespace_pending = pending;
        self.shared = shared;
        result
    }

    /// Runs `body` for a container: inside the implicit string namespace if
    /// it is still pending, after a tag 28 marker if sharing is on.
    pub(crate) fn encode_container<F>(&mut self, body: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        self.in_namespace(|e| {
            if e.options.value_sharing {
                e.encode_length(MAJOR_TAG, TAG_SHAREABLE);
                e.shared.next_index();
            }
            body(e)
        })
    }

    fn in_namespace<F>(&mut self, body: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        if self.namespace_pending {
            self.namespace_pending = false;
            let result = self.with_string_namespace(body);
            self.namespace_pending = true;
            return result;
        }
        body(self)
    }

    /// Writes tag 256 and runs `body` against a fresh reference table,
    /// restoring the enclosing table afterwards.
    pub(crate) fn with_string_namespace<F>(&mut self, body: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        trace!("opening string reference namespace");
        self.encode_length(MAJOR_TAG, TAG_STRINGREF_NAMESPACE);
        let table = std::mem::replace(&mut self.strings, StringRefTable::default());
        let referencing = std::mem::replace(&mut self.string_referencing, true);
        let result = body(self);
        self.strings = table;
        self.string_referencing = referencing;
        result
    }

    /// Encodes a shared handle.
    ///
    /// With value sharing on, the first occurrence is marked with tag 28 and
    /// later ones become tag 29 back-references. With sharing off, meeting a
    /// handle again while it is still being encoded is a cycle and fails.
    pub fn encode_shared(&mut self, handle: &Shared) -> Result<(), EncodeError> {
        match self.shared.state(handle) {
            Some(SharedState::Indexed(index)) => {
                self.encode_length(MAJOR_TAG, TAG_SHAREDREF);
                self.encode_uint(index);
                Ok(())
            }
            Some(SharedState::InProgress) => {
                debug!(id = handle.id(), "cyclic structure with value sharing disabled");
                Err(InvalidValue::CyclicStructure.into())
            }
            None => self.in_namespace(|e| e.encode_new_shared(handle)),
        }
    }

    fn encode_new_shared(&mut self, handle: &Shared) -> Result<(), EncodeError> {
        let inner = handle.borrow();
        if self.options.value_sharing {
            self.shared.mark(handle);
            self.encode_length(MAJOR_TAG, TAG_SHAREABLE);
            return self.encode_unmarked(&inner);
        }
        self.shared.enter(handle);
        let result = self.encode_unmarked(&inner);
        self.shared.leave(handle);
        result
    }

    /// Encodes a container body without its own marker; anything else goes
    /// through the regular dispatch.
    fn encode_unmarked(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Array(items) => self.encode_array(items),
            Value::Map(entries) => self.encode_map(entries),
            Value::FrozenMap(map) => self.encode_map(map.entries()),
            Value::Set(members) => self.encode_set(members),
            other => self.encode(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EncoderOptions;
    use crate::types::FrozenMap;

    fn enc(value: &Value, options: EncoderOptions) -> Result<Vec<u8>, EncodeError> {
        crate::dumps(value, options)
    }

    fn canonical() -> EncoderOptions {
        EncoderOptions {
            canonical: true,
            ..Default::default()
        }
    }

    fn sharing() -> EncoderOptions {
        EncoderOptions {
            value_sharing: true,
            ..Default::default()
        }
    }

    fn self_cyclic_list() -> Shared {
        let list = Shared::new(Value::Array(vec![]));
        if let Value::Array(items) = &mut *list.borrow_mut() {
            items.push(Value::Shared(list.clone()));
        }
        list
    }

    #[test]
    fn test_map_keeps_insertion_order() {
        let value = Value::map([("b", 1), ("a", 2)]);
        assert_eq!(
            enc(&value, EncoderOptions::default()).unwrap(),
            vec![0xa2, 0x61, b'b', 0x01, 0x61, b'a', 0x02]
        );
    }

    #[test]
    fn test_canonical_map_sorts_by_length_then_bytes() {
        let value = Value::map([
            (Value::from("aa"), Value::from(1)),
            (Value::from(100), Value::from(2)),
            (Value::from("b"), Value::from(3)),
            (Value::from(-1), Value::from(4)),
        ]);
        assert_eq!(
            enc(&value, canonical()).unwrap(),
            vec![
                0xa4, // map(4)
                0x20, 0x04, // -1
                0x18, 0x64, 0x02, // 100
                0x61, b'b', 0x03, // "b"
                0x62, b'a', b'a', 0x01, // "aa"
            ]
        );
    }

    #[test]
    fn test_frozen_map_encodes_like_map() {
        let value = Value::FrozenMap(FrozenMap::new([("x", 1)]));
        assert_eq!(
            enc(&value, EncoderOptions::default()).unwrap(),
            vec![0xa1, 0x61, b'x', 0x01]
        );
    }

    #[test]
    fn test_set_is_tagged() {
        let value = Value::set([Value::from(2), Value::from(1)]);
        assert_eq!(
            enc(&value, EncoderOptions::default()).unwrap(),
            vec![0xd9, 0x01, 0x02, 0x82, 0x02, 0x01]
        );
        assert_eq!(
            enc(&value, canonical()).unwrap(),
            vec![0xd9, 0x01, 0x02, 0x82, 0x01, 0x02]
        );
    }

    #[test]
    fn test_owned_containers_are_marked_when_sharing() {
        let value = Value::array([Value::array([])]);
        assert_eq!(
            enc(&value, sharing()).unwrap(),
            vec![0xd8, 0x1c, 0x81, 0xd8, 0x1c, 0x80]
        );
    }

    #[test]
    fn test_self_cyclic_list_with_sharing() {
        let list = self_cyclic_list();
        assert_eq!(
            enc(&Value::Shared(list), sharing()).unwrap(),
            vec![0xd8, 0x1c, 0x81, 0xd8, 0x1d, 0x00]
        );
    }

    #[test]
    fn test_cycle_without_sharing_fails() {
        let list = self_cyclic_list();
        let err = enc(&Value::Shared(list), EncoderOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::InvalidValue(InvalidValue::CyclicStructure)
        ));
    }

    #[test]
    fn test_repeated_acyclic_shared_without_sharing_is_duplicated() {
        let inner = Shared::new(Value::array([Value::from(1)]));
        let value = Value::array([Value::Shared(inner.clone()), Value::Shared(inner)]);
        assert_eq!(
            enc(&value, EncoderOptions::default()).unwrap(),
            vec![0x82, 0x81, 0x01, 0x81, 0x01]
        );
    }

    #[test]
    fn test_repeated_shared_gets_back_reference() {
        let inner = Shared::new(Value::array([]));
        let value = Value::array([Value::Shared(inner.clone()), Value::Shared(inner)]);
        assert_eq!(
            enc(&value, sharing()).unwrap(),
            vec![0xd8, 0x1c, 0x82, 0xd8, 0x1c, 0x80, 0xd8, 0x1d, 0x01]
        );
    }

    #[test]
    fn test_canonical_sort_keys_do_not_consume_share_indices() {
        let key = Shared::new(Value::array([]));
        let options = EncoderOptions {
            canonical: true,
            value_sharing: true,
            ..Default::default()
        };
        let value = Value::map([(Value::Shared(key.clone()), Value::Shared(key))]);
        assert_eq!(
            enc(&value, options).unwrap(),
            vec![0xd8, 0x1c, 0xa1, 0xd8, 0x1c, 0x80, 0xd8, 0x1d, 0x01]
        );
    }

    #[test]
    fn test_implicit_namespace_wraps_outer_container_only() {
        let options = EncoderOptions {
            string_referencing: true,
            ..Default::default()
        };
        let value = Value::array([Value::array([]), Value::from("abc"), Value::from("abc")]);
        assert_eq!(
            enc(&value, options).unwrap(),
            vec![
                0xd9, 0x01, 0x00, 0x83, 0x80, 0x63, b'a', b'b', b'c', 0xd8, 0x19, 0x00
            ]
        );
    }

    #[test]
    fn test_namespace_precedes_share_marker() {
        let options = EncoderOptions {
            string_referencing: true,
            value_sharing: true,
            ..Default::default()
        };
        assert_eq!(
            enc(&Value::array([]), options).unwrap(),
            vec![0xd9, 0x01, 0x00, 0xd8, 0x1c, 0x80]
        );
    }
}
