//! Per-document interners populated during unmarshal.
//!
//! RFC 7951 documents repeat the same member names and leaf values many times
//! over. Collapsing duplicates while decoding keeps large documents compact.
//! Interning is purely a cache; nothing may rely on it for correctness.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::value::Value;

/// Maps string content to a canonical shared string.
#[derive(Debug, Default)]
pub(crate) struct StringInterner {
    strings: HashSet<Arc<str>>,
}

impl StringInterner {
    pub(crate) fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(hit) = self.strings.get(s) {
            return hit.clone();
        }
        let canonical: Arc<str> = Arc::from(s);
        self.strings.insert(canonical.clone());
        canonical
    }
}

/// Keys leaf values by their datum. Containers are structurally distinct and
/// never interned.
#[derive(Debug, Default)]
pub(crate) struct ValueInterner {
    values: HashMap<InternKey, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InternKey {
    Null,
    Empty,
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    // f64 is not Eq; key by bit pattern instead.
    F64(u64),
    Str(Arc<str>),
}

impl ValueInterner {
    pub(crate) fn intern(&mut self, value: Value) -> Value {
        let key = match &value {
            Value::Null => InternKey::Null,
            Value::Empty => InternKey::Empty,
            Value::Bool(b) => InternKey::Bool(*b),
            Value::I32(v) => InternKey::I32(*v),
            Value::U32(v) => InternKey::U32(*v),
            Value::I64(v) => InternKey::I64(*v),
            Value::U64(v) => InternKey::U64(*v),
            Value::F64(v) => InternKey::F64(v.to_bits()),
            Value::String(s) => InternKey::Str(s.clone()),
            _ => return value,
        };
        self.values.entry(key).or_insert(value).clone()
    }
}

/// The interner pair threaded through a single unmarshal invocation.
#[derive(Debug, Default)]
pub(crate) struct Interners {
    pub(crate) strings: StringInterner,
    pub(crate) values: ValueInterner,
}
