use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};

/// An ordered key → [`Value`] map.
///
/// AMF0 object bodies are written key-by-key in insertion order and the
/// parser must reproduce that order byte-for-byte on re-encode, so a
/// `HashMap` won't do. This is a small `Vec` of pairs rather than a pulled-in
/// `indexmap::IndexMap` — the codec never needs more than linear scan plus
/// append, and the property counts involved (object field lists) are small.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PropertyList {
    entries: Vec<(String, Value)>,
}

impl PropertyList {
    pub fn new() -> Self {
        PropertyList { entries: Vec::new() }
    }

    /// Insert in insertion order; re-inserting an existing key updates the
    /// value in place without moving it to the end.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for PropertyList {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut list = PropertyList::new();
        for (k, v) in iter {
            list.insert(k, v);
        }
        list
    }
}

/// A reference-counted, interior-mutable object body, shared by every
/// `Value` that points at the same identity (an object reachable from two
/// places in the encoded graph, or a cycle).
///
/// `Rc` gives the codec's reference table something to compare by pointer
/// (`Rc::ptr_eq`) rather than by structural equality, matching §3's
/// invariant that a second emission of the *same* identity becomes a
/// back-reference, not a structurally-equal copy. `RefCell` lets the parser
/// allocate an empty container, register it in the slot table, and populate
/// it afterwards — the "insert-before-populate" step that makes cyclic
/// graphs resolvable.
pub type ObjectRef = Rc<RefCell<PropertyList>>;
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

pub fn new_object_ref() -> ObjectRef {
    Rc::new(RefCell::new(PropertyList::new()))
}

pub fn new_array_ref() -> ArrayRef {
    Rc::new(RefCell::new(Vec::new()))
}

/// A host-language value as the codec understands it. Closed sum type —
/// dispatch on it is an exhaustive match, never a runtime type check.
///
/// `Reference` and `ObjectTerm` from the wire format (markers 0x07 and 0x09)
/// have no variant here: a `Reference` is resolved to the shared `ObjectRef`/
/// `ArrayRef` it points at before it ever reaches a caller, and `ObjectTerm`
/// is a pure sentinel the parser consumes internally. Surfacing either as a
/// `Value` would leak wire-format plumbing into the data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    String(String),
    Object(ObjectRef),
    MovieClip,
    Null,
    Undefined,
    MixedArray(ObjectRef),
    Array(ArrayRef),
    Date { millis: f64, tz_offset_min: i16 },
    LongString(String),
    Unsupported,
    RecordSet,
    Xml(String),
    TypedObject(String, ObjectRef),
    /// Opaque AMF3 payload, captured verbatim by the dispatcher (§4.5).
    SwitchAmf3(Vec<u8>),
}

impl Value {
    /// Builds a `String` or, once the UTF-8 byte length reaches 2^16,
    /// automatically promotes to `LongString` — the type-fidelity rule
    /// §4.3 describes as the encoder's job, applied here so every caller
    /// gets it for free rather than having to remember the threshold.
    pub fn string(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.len() >= 1 << 16 {
            Value::LongString(s)
        } else {
            Value::String(s)
        }
    }

    pub fn object(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Object(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    pub fn array(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values.into_iter().collect())))
    }

    pub fn mixed_array(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::MixedArray(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    pub fn typed_object(alias: impl Into<String>, entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::TypedObject(alias.into(), Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::LongString(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) | Value::MixedArray(obj) | Value::TypedObject(_, obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<Value> {
        self.as_object().and_then(|obj| obj.borrow().get(key).cloned())
    }

    /// Builds a `Date` from a UTC instant, with no timezone offset — AMF0's
    /// `tz_offset_min` field is a vestige clients are expected to ignore
    /// on read (§4.3), so there's no lossy round trip to guard against here.
    pub fn date(instant: DateTime<Utc>) -> Self {
        Value::Date { millis: instant.timestamp_millis() as f64, tz_offset_min: 0 }
    }

    /// The `Date`'s instant as a UTC `DateTime`, ignoring `tz_offset_min`.
    /// Returns `None` for anything other than `Value::Date`, or if `millis`
    /// doesn't fit a representable timestamp.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date { millis, .. } => Utc.timestamp_millis_opt(*millis as i64).single(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// The pointer identity the encoder's reference table keys on. `None`
    /// for scalars, which §3 says are never referenced.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Value::Object(obj) | Value::MixedArray(obj) | Value::TypedObject(_, obj) => {
                Some(Rc::as_ptr(obj) as usize)
            }
            Value::Array(arr) => Some(Rc::as_ptr(arr) as usize),
            _ => None,
        }
    }
}
