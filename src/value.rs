use std::cmp::Ordering;
use std::sync::Arc;

use crate::array::Array;
use crate::edit::{EditAction, EditEntry};
use crate::instance_id::InstanceId;
use crate::object::Object;
use crate::tree::Tree;

/// A single RFC 7951 datum.
///
/// A `Value` holds exactly one of the RFC 7951 representable kinds: the JSON
/// scalars, the YANG `empty` leaf, an instance identifier, or a nested
/// [`Object`] or [`Array`]. Values are immutable and cheap to clone; nested
/// containers share structure with their originals.
///
/// Because the model is schema-less, numeric construction is canonicalized so
/// that values built in code compare equal to values decoded from the wire:
/// 32-bit integers prefer the unsigned form when non-negative, and so do
/// 64-bit integers. Numeric equality is variant-exact; `U32(1)` does not equal
/// `I64(1)`.
///
/// ```rust
/// use rfc7951_data::Value;
///
/// assert_eq!(Value::from(7), Value::from(7u32));
/// assert_ne!(Value::from(7u32), Value::from(7u64));
/// assert_eq!(Value::from(-7).as_i32(), -7);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// The absent datum; round-trips to JSON `null`.
    #[default]
    Null,
    /// The YANG `empty` leaf; round-trips to the literal `[null]`.
    Empty,
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Arc<str>),
    InstanceId(Arc<InstanceId>),
    Object(Object),
    Array(Array),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::from(i32::from(v))
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::from(i32::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        if v < 0 {
            Value::I32(v)
        } else {
            Value::U32(v as u32)
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U32(u32::from(v))
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U32(u32::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        if v < 0 {
            Value::I64(v)
        } else {
            Value::U64(v as u64)
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F64(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Arc::from(v.as_str()))
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Value::String(v)
    }
}

impl From<InstanceId> for Value {
    fn from(v: InstanceId) -> Self {
        Value::InstanceId(Arc::new(v))
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// One typed behavior for [`Value::perform`].
///
/// Handlers are tried strictly in the order the caller supplies them and the
/// first match wins. A numeric handler also matches the opposite signedness at
/// the same width when the stored value fits, so narrower handlers must be
/// listed before wider catch-alls or they will be shadowed.
pub enum Handler<'a, R> {
    Null(Box<dyn FnOnce() -> R + 'a>),
    Empty(Box<dyn FnOnce() -> R + 'a>),
    Bool(Box<dyn FnOnce(bool) -> R + 'a>),
    I32(Box<dyn FnOnce(i32) -> R + 'a>),
    U32(Box<dyn FnOnce(u32) -> R + 'a>),
    I64(Box<dyn FnOnce(i64) -> R + 'a>),
    U64(Box<dyn FnOnce(u64) -> R + 'a>),
    F64(Box<dyn FnOnce(f64) -> R + 'a>),
    String(Box<dyn FnOnce(&str) -> R + 'a>),
    InstanceId(Box<dyn FnOnce(&InstanceId) -> R + 'a>),
    Object(Box<dyn FnOnce(&Object) -> R + 'a>),
    Array(Box<dyn FnOnce(&Array) -> R + 'a>),
    /// Matches any non-null value; receives the RFC 7951 string form.
    Text(Box<dyn FnOnce(String) -> R + 'a>),
    /// Matches every value, including null.
    Any(Box<dyn FnOnce(&Value) -> R + 'a>),
}

impl<'a, R> Handler<'a, R> {
    pub fn on_null(f: impl FnOnce() -> R + 'a) -> Self {
        Handler::Null(Box::new(f))
    }

    pub fn on_empty(f: impl FnOnce() -> R + 'a) -> Self {
        Handler::Empty(Box::new(f))
    }

    pub fn on_bool(f: impl FnOnce(bool) -> R + 'a) -> Self {
        Handler::Bool(Box::new(f))
    }

    pub fn on_i32(f: impl FnOnce(i32) -> R + 'a) -> Self {
        Handler::I32(Box::new(f))
    }

    pub fn on_u32(f: impl FnOnce(u32) -> R + 'a) -> Self {
        Handler::U32(Box::new(f))
    }

    pub fn on_i64(f: impl FnOnce(i64) -> R + 'a) -> Self {
        Handler::I64(Box::new(f))
    }

    pub fn on_u64(f: impl FnOnce(u64) -> R + 'a) -> Self {
        Handler::U64(Box::new(f))
    }

    pub fn on_f64(f: impl FnOnce(f64) -> R + 'a) -> Self {
        Handler::F64(Box::new(f))
    }

    pub fn on_string(f: impl FnOnce(&str) -> R + 'a) -> Self {
        Handler::String(Box::new(f))
    }

    pub fn on_instance_id(f: impl FnOnce(&InstanceId) -> R + 'a) -> Self {
        Handler::InstanceId(Box::new(f))
    }

    pub fn on_object(f: impl FnOnce(&Object) -> R + 'a) -> Self {
        Handler::Object(Box::new(f))
    }

    pub fn on_array(f: impl FnOnce(&Array) -> R + 'a) -> Self {
        Handler::Array(Box::new(f))
    }

    pub fn on_text(f: impl FnOnce(String) -> R + 'a) -> Self {
        Handler::Text(Box::new(f))
    }

    pub fn on_any(f: impl FnOnce(&Value) -> R + 'a) -> Self {
        Handler::Any(Box::new(f))
    }
}

impl Value {
    /// Applies the first matching handler to the value.
    ///
    /// This is the pattern-match analogue for callers that hold values of
    /// unknown kind and want typed access without the hard `as_*` assertions.
    /// Handlers are tried in the order given; see [`Handler`] for the
    /// numeric-narrowing rules. Returns `None` when no handler matches.
    ///
    /// ```rust
    /// use rfc7951_data::{Handler, Value};
    ///
    /// let v = Value::from(42u32);
    /// let label = v.perform([
    ///     Handler::on_i32(|n| format!("i32 {n}")),
    ///     Handler::on_u64(|n| format!("u64 {n}")),
    /// ]);
    /// // The stored u32 fits in i32, and the i32 handler is listed first.
    /// assert_eq!(label.as_deref(), Some("i32 42"));
    /// ```
    pub fn perform<'a, R>(&self, handlers: impl IntoIterator<Item = Handler<'a, R>>) -> Option<R> {
        for handler in handlers {
            match handler {
                Handler::Any(f) => return Some(f(self)),
                Handler::Text(f) => {
                    if !self.is_null() {
                        return Some(f(self.rfc7951_string()));
                    }
                }
                Handler::Null(f) => {
                    if let Value::Null = self {
                        return Some(f());
                    }
                }
                Handler::Empty(f) => {
                    if let Value::Empty = self {
                        return Some(f());
                    }
                }
                Handler::Bool(f) => {
                    if let Value::Bool(b) = self {
                        return Some(f(*b));
                    }
                }
                Handler::I32(f) => match self {
                    Value::I32(v) => return Some(f(*v)),
                    Value::U32(v) if *v <= i32::MAX as u32 => return Some(f(*v as i32)),
                    _ => {}
                },
                Handler::U32(f) => match self {
                    Value::U32(v) => return Some(f(*v)),
                    Value::I32(v) if *v >= 0 => return Some(f(*v as u32)),
                    _ => {}
                },
                Handler::I64(f) => match self {
                    Value::I64(v) => return Some(f(*v)),
                    Value::U64(v) if *v <= i64::MAX as u64 => return Some(f(*v as i64)),
                    _ => {}
                },
                Handler::U64(f) => match self {
                    Value::U64(v) => return Some(f(*v)),
                    Value::I64(v) if *v >= 0 => return Some(f(*v as u64)),
                    _ => {}
                },
                Handler::F64(f) => {
                    if let Value::F64(v) = self {
                        return Some(f(*v));
                    }
                }
                Handler::String(f) => {
                    if let Value::String(s) = self {
                        return Some(f(s));
                    }
                }
                Handler::InstanceId(f) => {
                    if let Value::InstanceId(id) = self {
                        return Some(f(id));
                    }
                }
                Handler::Object(f) => {
                    if let Value::Object(o) = self {
                        return Some(f(o));
                    }
                }
                Handler::Array(f) => {
                    if let Value::Array(a) = self {
                        return Some(f(a));
                    }
                }
            }
        }
        None
    }

    /// Returns the textual rendering used in marshaled output, without any
    /// quoting: integers in base 10, floats in shortest round-trip decimal
    /// form, strings as their raw characters, the empty leaf as `[null]`, and
    /// containers as their JSON encoding.
    pub fn rfc7951_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Empty => "[null]".to_string(),
            Value::Bool(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::String(s) => s.to_string(),
            Value::InstanceId(id) => id.to_string(),
            Value::Object(o) => o.to_string(),
            Value::Array(a) => a.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns whether this is the distinguished empty leaf.
    pub fn is_empty_leaf(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Returns the held boolean. The empty leaf reads as `true`.
    ///
    /// # Panics
    ///
    /// Panics if the value is neither a boolean nor the empty leaf.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Empty => true,
            other => panic!("cannot take {} as bool", other.kind()),
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Empty)
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Empty => Some(true),
            _ => None,
        }
    }

    /// Returns the value as an `i32`. Same-width unsigned values convert when
    /// they fit.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable as an `i32`.
    pub fn as_i32(&self) -> i32 {
        match self.narrow_i32() {
            Some(v) => v,
            None => panic!("cannot take {} as i32", self.kind()),
        }
    }

    pub fn is_i32(&self) -> bool {
        self.narrow_i32().is_some()
    }

    /// Returns the value as an `i32`, converting from any numeric variant,
    /// or `None` for non-numeric values.
    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            Value::U32(v) => Some(*v as i32),
            Value::I64(v) => Some(*v as i32),
            Value::U64(v) => Some(*v as i32),
            Value::F64(v) => Some(*v as i32),
            _ => None,
        }
    }

    fn narrow_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            Value::U32(v) if *v <= i32::MAX as u32 => Some(*v as i32),
            _ => None,
        }
    }

    /// Returns the value as a `u32`. Same-width signed values convert when
    /// non-negative.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable as a `u32`.
    pub fn as_u32(&self) -> u32 {
        match self.narrow_u32() {
            Some(v) => v,
            None => panic!("cannot take {} as u32", self.kind()),
        }
    }

    pub fn is_u32(&self) -> bool {
        self.narrow_u32().is_some()
    }

    pub fn to_u32(&self) -> Option<u32> {
        match self {
            Value::I32(v) => Some(*v as u32),
            Value::U32(v) => Some(*v),
            Value::I64(v) => Some(*v as u32),
            Value::U64(v) => Some(*v as u32),
            Value::F64(v) => Some(*v as u32),
            _ => None,
        }
    }

    fn narrow_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => Some(*v),
            Value::I32(v) if *v >= 0 => Some(*v as u32),
            _ => None,
        }
    }

    /// Returns the value as an `i64`. Same-width unsigned values convert when
    /// they fit.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable as an `i64`.
    pub fn as_i64(&self) -> i64 {
        match self.narrow_i64() {
            Some(v) => v,
            None => panic!("cannot take {} as i64", self.kind()),
        }
    }

    pub fn is_i64(&self) -> bool {
        self.narrow_i64().is_some()
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::I32(v) => Some(i64::from(*v)),
            Value::U32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            Value::U64(v) => Some(*v as i64),
            Value::F64(v) => Some(*v as i64),
            _ => None,
        }
    }

    fn narrow_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            Value::U64(v) if *v <= i64::MAX as u64 => Some(*v as i64),
            _ => None,
        }
    }

    /// Returns the value as a `u64`. Same-width signed values convert when
    /// non-negative.
    ///
    /// # Panics
    ///
    /// Panics if the value is not representable as a `u64`.
    pub fn as_u64(&self) -> u64 {
        match self.narrow_u64() {
            Some(v) => v,
            None => panic!("cannot take {} as u64", self.kind()),
        }
    }

    pub fn is_u64(&self) -> bool {
        self.narrow_u64().is_some()
    }

    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Value::I32(v) => Some(*v as u64),
            Value::U32(v) => Some(u64::from(*v)),
            Value::I64(v) => Some(*v as u64),
            Value::U64(v) => Some(*v),
            Value::F64(v) => Some(*v as u64),
            _ => None,
        }
    }

    fn narrow_u64(&self) -> Option<u64> {
        match self {
            Value::U64(v) => Some(*v),
            Value::I64(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    /// Returns the held float.
    ///
    /// # Panics
    ///
    /// Panics if the value is not an `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::F64(v) => *v,
            other => panic!("cannot take {} as f64", other.kind()),
        }
    }

    pub fn is_f64(&self) -> bool {
        matches!(self, Value::F64(_))
    }

    /// Returns the value as an `f64`, converting from any numeric variant.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::I32(v) => Some(f64::from(*v)),
            Value::U32(v) => Some(f64::from(*v)),
            Value::I64(v) => Some(*v as f64),
            Value::U64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the held string.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a string.
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(s) => s,
            other => panic!("cannot take {} as string", other.kind()),
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn to_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the held object.
    ///
    /// # Panics
    ///
    /// Panics if the value is not an object.
    pub fn as_object(&self) -> &Object {
        match self {
            Value::Object(o) => o,
            other => panic!("cannot take {} as object", other.kind()),
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn to_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the held array.
    ///
    /// # Panics
    ///
    /// Panics if the value is not an array.
    pub fn as_array(&self) -> &Array {
        match self {
            Value::Array(a) => a,
            other => panic!("cannot take {} as array", other.kind()),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn to_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the held instance identifier. A string value is parsed on the
    /// fly.
    ///
    /// # Panics
    ///
    /// Panics if the value is neither an instance identifier nor a string
    /// that parses as one.
    pub fn as_instance_id(&self) -> Arc<InstanceId> {
        match self.to_instance_id() {
            Some(id) => id,
            None => panic!("cannot take {} as instance identifier", self.kind()),
        }
    }

    pub fn is_instance_id(&self) -> bool {
        self.to_instance_id().is_some()
    }

    pub fn to_instance_id(&self) -> Option<Arc<InstanceId>> {
        match self {
            Value::InstanceId(id) => Some(id.clone()),
            Value::String(s) => s.parse::<InstanceId>().ok().map(Arc::new),
            _ => None,
        }
    }

    /// Wraps the value in a [`Tree`]. Objects become the tree root directly;
    /// any other value is placed under the single member `rfc7951:data`.
    pub fn to_tree(&self) -> Tree {
        match self {
            Value::Object(o) => Tree::from_object(o.clone()),
            other => Tree::from_value(other.clone()),
        }
    }

    /// Combines this value with `other` and returns the result.
    ///
    /// Objects and arrays merge recursively and accretively; unlike kinds
    /// keep `self`; leaves are replaced by `other`.
    pub fn merge(&self, other: &Value) -> Value {
        match self {
            Value::Object(o) => o.merge(other),
            Value::Array(a) => a.merge(other),
            _ => other.clone(),
        }
    }

    /// Orders values by variant rank, then naturally within numeric, string,
    /// and container variants. This is the default comparison used by
    /// [`Array::sort`].
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => numeric_cmp(a, b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::InstanceId(a), Value::InstanceId(b)) => a.to_string().cmp(&b.to_string()),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                a.len().cmp(&b.len())
            }
            (Value::Object(a), Value::Object(b)) => a.len().cmp(&b.len()),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::I32(_) | Value::U32(_) | Value::I64(_) | Value::U64(_) | Value::F64(_)
        )
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Empty => 1,
            Value::Bool(_) => 2,
            Value::I32(_) | Value::U32(_) | Value::I64(_) | Value::U64(_) | Value::F64(_) => 3,
            Value::String(_) => 4,
            Value::InstanceId(_) => 5,
            Value::Array(_) => 6,
            Value::Object(_) => 7,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Empty => "empty",
            Value::Bool(_) => "bool",
            Value::I32(_) => "int32",
            Value::U32(_) => "uint32",
            Value::I64(_) => "int64",
            Value::U64(_) => "uint64",
            Value::F64(_) => "float64",
            Value::String(_) => "string",
            Value::InstanceId(_) => "instance-identifier",
            Value::Object(_) => "object",
            Value::Array(_) => "array",
        }
    }

    /// Retags the value with `module` when it is a container; leaves pass
    /// through unchanged.
    pub(crate) fn belongs_to(&self, module: &str) -> Value {
        match self {
            Value::Object(o) => Value::Object(o.belongs_to(module)),
            Value::Array(a) => Value::Array(a.belongs_to(module)),
            other => other.clone(),
        }
    }

    pub(crate) fn diff(&self, new: &Value, path: &InstanceId) -> Vec<EditEntry> {
        match self {
            Value::Object(o) => o.diff(new, path),
            Value::Array(a) => a.diff(new, path),
            _ => {
                if self == new {
                    Vec::new()
                } else {
                    vec![EditEntry {
                        action: EditAction::Assoc,
                        path: path.clone(),
                        value: Some(new.clone()),
                    }]
                }
            }
        }
    }
}

fn numeric_cmp(a: &Value, b: &Value) -> Ordering {
    fn as_int(v: &Value) -> Option<i128> {
        match v {
            Value::I32(v) => Some(i128::from(*v)),
            Value::U32(v) => Some(i128::from(*v)),
            Value::I64(v) => Some(i128::from(*v)),
            Value::U64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }
    match (as_int(a), as_int(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => {
            let x = a.to_f64().unwrap_or_default();
            let y = b.to_f64().unwrap_or_default();
            x.total_cmp(&y)
        }
    }
}
