//! [`Value`]: the in-memory data model the encoder understands natively.

use std::any::{Any, TypeId};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use malachite::{Integer, Rational};
use regex::Regex;
use uuid::Uuid;

use crate::types::{Decimal, FrozenMap, IpNetwork, MimeMessage, SimpleValue, Tag};

/// A value to be encoded.
///
/// Containers own their children, so an owned [`Value::Array`] can never
/// appear twice in one document. Use [`Value::Shared`] for data that is
/// referenced from several places or that refers back to itself.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Integer(i64),
    UInteger(u64),
    /// Arbitrary-precision integer; values outside the 64-bit range encode
    /// as bignum tags 2 and 3.
    BigInt(Integer),
    Float(f64),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<Value>),
    /// Ordered map entries; keys may be any value.
    Map(Vec<(Value, Value)>),
    FrozenMap(FrozenMap),
    /// Set members, encoded under tag 258.
    Set(Vec<Value>),
    Tag(Box<Tag>),
    Simple(SimpleValue),
    DateTime(DateTime<FixedOffset>),
    /// A datetime without offset; needs a default timezone to encode.
    NaiveDateTime(NaiveDateTime),
    Date(NaiveDate),
    Decimal(Decimal),
    Rational(Rational),
    Regex(Regex),
    Mime(MimeMessage),
    Uuid(Uuid),
    IpAddress(IpAddr),
    IpNetwork(IpNetwork),
    Shared(Shared),
    Custom(CustomValue),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(b.into())
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a set, dropping repeated members (first occurrence wins).
    pub fn set(members: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        Value::Set(unique)
    }

    pub fn tag(tag: u64, value: impl Into<Value>) -> Self {
        Value::Tag(Box::new(Tag::new(tag, value)))
    }

    pub fn custom<T: Any>(value: T) -> Self {
        Value::Custom(CustomValue::new(value))
    }

    pub fn shared(value: impl Into<Value>) -> Self {
        Value::Shared(Shared::new(value.into()))
    }
}

/// A reference-counted, mutable value with identity.
///
/// Cloning a `Shared` clones the handle, not the value: both handles refer
/// to the same allocation, and the encoder recognises them as one object.
/// Handles compare and hash by identity, never by content, so cyclic
/// structures are safe to compare, hash and format.
///
/// ```
/// use cbor_pack::{Shared, Value};
///
/// let list = Shared::new(Value::Array(vec![]));
/// if let Value::Array(items) = &mut *list.borrow_mut() {
///     items.push(Value::Shared(list.clone()));
/// }
/// assert_eq!(list.clone(), list);
/// ```
#[derive(Clone)]
pub struct Shared(Rc<RefCell<Value>>);

impl Shared {
    pub fn new(value: Value) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    pub fn replace(&self, value: Value) -> Value {
        self.0.replace(value)
    }

    pub fn ptr_eq(&self, other: &Shared) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the shared allocation.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for Shared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.id())
    }
}

/// An opaque caller-defined value, dispatched through the encoder's
/// registry or its default handler.
#[derive(Clone)]
pub struct CustomValue {
    inner: Rc<dyn Any>,
    type_name: &'static str,
}

impl CustomValue {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            inner: Rc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// `TypeId` of the wrapped value (not of the wrapper).
    pub fn value_type_id(&self) -> TypeId {
        Any::type_id(&*self.inner)
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomValue").field(&self.type_name).finish()
    }
}

/// Integer variants compare and hash by numeric value, so `Integer(1)`,
/// `UInteger(1)` and `BigInt(1)` are one member of a set.
#[derive(PartialEq, Eq, Hash)]
enum IntegerKey<'a> {
    Small(i128),
    Big(&'a Integer),
}

impl Value {
    fn integer_key(&self) -> Option<IntegerKey<'_>> {
        match self {
            Value::Integer(i) => Some(IntegerKey::Small(i128::from(*i))),
            Value::UInteger(u) => Some(IntegerKey::Small(i128::from(*u))),
            Value::BigInt(i) => Some(match i128::try_from(i) {
                Ok(small) => IntegerKey::Small(small),
                Err(_) => IntegerKey::Big(i),
            }),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        if let (Some(a), Some(b)) = (self.integer_key(), other.integer_key()) {
            return a == b;
        }
        match (self, other) {
            (Null, Null) | (Undefined, Undefined) => true,
            (Bool(a), Bool(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Bytes(a), Bytes(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Array(a), Array(b)) | (Set(a), Set(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (FrozenMap(a), FrozenMap(b)) => a == b,
            (Tag(a), Tag(b)) => a == b,
            (Simple(a), Simple(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b && a.offset() == b.offset(),
            (NaiveDateTime(a), NaiveDateTime(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Decimal(a), Decimal(b)) => a == b,
            (Rational(a), Rational(b)) => a == b,
            (Regex(a), Regex(b)) => a.as_str() == b.as_str(),
            (Mime(a), Mime(b)) => a == b,
            (Uuid(a), Uuid(b)) => a == b,
            (IpAddress(a), IpAddress(b)) => a == b,
            (IpNetwork(a), IpNetwork(b)) => a == b,
            (Shared(a), Shared(b)) => a.ptr_eq(b),
            (Custom(a), Custom(b)) => a.addr() == b.addr(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        use Value::*;
        if let Some(key) = self.integer_key() {
            key.hash(state);
            return;
        }
        std::mem::discriminant(self).hash(state);
        match self {
            Null | Undefined | Integer(_) | UInteger(_) | BigInt(_) => {}
            Bool(b) => b.hash(state),
            Float(f) => f.to_bits().hash(state),
            Bytes(b) => b.hash(state),
            Str(s) => s.hash(state),
            Array(items) | Set(items) => items.hash(state),
            Map(entries) => entries.hash(state),
            FrozenMap(map) => map.hash(state),
            Tag(tag) => tag.hash(state),
            Simple(simple) => simple.hash(state),
            DateTime(dt) => {
                dt.hash(state);
                dt.offset().local_minus_utc().hash(state);
            }
            NaiveDateTime(dt) => dt.hash(state),
            Date(date) => date.hash(state),
            Decimal(decimal) => decimal.hash(state),
            Rational(rational) => rational.hash(state),
            Regex(re) => re.as_str().hash(state),
            Mime(message) => message.hash(state),
            Uuid(uuid) => uuid.hash(state),
            IpAddress(addr) => addr.hash(state),
            IpNetwork(network) => network.hash(state),
            Shared(shared) => shared.id().hash(state),
            Custom(custom) => custom.addr().hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::UInteger(u as u64)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInteger(u)
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        if let Ok(small) = i64::try_from(i) {
            Value::Integer(small)
        } else if let Ok(unsigned) = u64::try_from(i) {
            Value::UInteger(unsigned)
        } else {
            Value::BigInt(Integer::from(i))
        }
    }
}

impl From<Integer> for Value {
    fn from(i: Integer) -> Self {
        Value::BigInt(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<Tag> for Value {
    fn from(tag: Tag) -> Self {
        Value::Tag(Box::new(tag))
    }
}

impl From<SimpleValue> for Value {
    fn from(simple: SimpleValue) -> Self {
        Value::Simple(simple)
    }
}

impl From<FrozenMap> for Value {
    fn from(map: FrozenMap) -> Self {
        Value::FrozenMap(map)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.into())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::NaiveDateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Date(date)
    }
}

impl From<Decimal> for Value {
    fn from(decimal: Decimal) -> Self {
        Value::Decimal(decimal)
    }
}

impl From<Rational> for Value {
    fn from(rational: Rational) -> Self {
        Value::Rational(rational)
    }
}

impl From<Regex> for Value {
    fn from(re: Regex) -> Self {
        Value::Regex(re)
    }
}

impl From<MimeMessage> for Value {
    fn from(message: MimeMessage) -> Self {
        Value::Mime(message)
    }
}

impl From<Uuid> for Value {
    fn from(uuid: Uuid) -> Self {
        Value::Uuid(uuid)
    }
}

impl From<IpAddr> for Value {
    fn from(addr: IpAddr) -> Self {
        Value::IpAddress(addr)
    }
}

impl From<IpNetwork> for Value {
    fn from(network: IpNetwork) -> Self {
        Value::IpNetwork(network)
    }
}

impl From<Shared> for Value {
    fn from(shared: Shared) -> Self {
        Value::Shared(shared)
    }
}

impl From<CustomValue> for Value {
    fn from(custom: CustomValue) -> Self {
        Value::Custom(custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of(value: &Value) -> u64 {
        let mut h = DefaultHasher::new();
        value.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_i128_conversion_picks_narrowest_variant() {
        assert!(matches!(Value::from(-5i128), Value::Integer(-5)));
        assert!(matches!(
            Value::from(u64::MAX as i128),
            Value::UInteger(u64::MAX)
        ));
        assert!(matches!(Value::from(i128::MIN), Value::BigInt(_)));
    }

    #[test]
    fn test_integer_variants_compare_by_number() {
        let forms = [
            Value::Integer(1),
            Value::UInteger(1),
            Value::BigInt(Integer::from(1)),
        ];
        for a in &forms {
            for b in &forms {
                assert_eq!(a, b);
                assert_eq!(hash_of(a), hash_of(b));
            }
        }
        assert_ne!(Value::Integer(-1), Value::UInteger(u64::MAX));
        assert_ne!(Value::Integer(1), Value::Float(1.0));
        assert_ne!(Value::Integer(1), Value::Bool(true));
        let huge = Value::BigInt(Integer::from(1) << 200u64);
        assert_eq!(huge, Value::BigInt(Integer::from(1) << 200u64));
        assert_ne!(huge, Value::UInteger(u64::MAX));
    }

    #[test]
    fn test_set_drops_numerically_equal_members() {
        let set = Value::set([Value::from(1i32), Value::from(1u32), Value::Integer(2)]);
        assert_eq!(set, Value::Set(vec![Value::Integer(1), Value::Integer(2)]));
        if let Value::Set(members) = &set {
            assert_eq!(members.len(), 2);
        }
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn test_set_constructor_drops_duplicates() {
        let set = Value::set(vec![Value::from(1), Value::from("a"), Value::from(1)]);
        assert_eq!(set, Value::Set(vec![Value::from(1), Value::from("a")]));
    }

    #[test]
    fn test_shared_identity() {
        let a = Shared::new(Value::from(1));
        let b = Shared::new(Value::from(1));
        assert_eq!(Value::Shared(a.clone()), Value::Shared(a.clone()));
        assert_ne!(Value::Shared(a), Value::Shared(b));
    }

    #[test]
    fn test_cyclic_value_hashes_and_formats() {
        let list = Shared::new(Value::Array(vec![]));
        if let Value::Array(items) = &mut *list.borrow_mut() {
            items.push(Value::Shared(list.clone()));
        }
        let value = Value::Tag(Box::new(Tag::new(1000, Value::Shared(list.clone()))));
        let mut keys = HashSet::new();
        keys.insert(value.clone());
        assert!(keys.contains(&value));
        assert!(format!("{value:?}").contains("Shared(0x"));
    }

    #[test]
    fn test_custom_value_downcast() {
        #[derive(Debug, PartialEq)]
        struct Point(i32, i32);
        let custom = CustomValue::new(Point(1, 2));
        assert!(custom.is::<Point>());
        assert_eq!(custom.value_type_id(), TypeId::of::<Point>());
        assert_eq!(custom.downcast_ref::<Point>(), Some(&Point(1, 2)));
        assert!(custom.type_name().ends_with("Point"));
        assert_eq!(Value::Custom(custom.clone()), Value::Custom(custom));
    }

    #[test]
    fn test_equal_values_hash_equal() {
        let a = Value::map([("k", Value::from(vec![1u8, 2]))]);
        let b = Value::map([("k", Value::from(vec![1u8, 2]))]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
