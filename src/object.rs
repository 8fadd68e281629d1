use im::HashMap;

use crate::edit::{EditAction, EditEntry};
use crate::instance_id::InstanceId;
use crate::value::Value;

/// An RFC 7159 (JSON) object augmented for RFC 7951 behaviors.
///
/// Objects are immutable; the mutation methods return a structurally shared
/// copy with the change applied, leaving the original untouched. Members are
/// stored under their fully qualified `module:name` key, but every operation
/// also accepts the bare name when the member belongs to the same module as
/// the containing object.
///
/// ```rust
/// use rfc7951_data::object;
///
/// let obj = object! {
///     "module-v1:foo" => object! { "bar" => "baz" },
/// };
/// let foo = obj.at("module-v1:foo").unwrap().as_object().clone();
/// assert_eq!(foo.at("bar"), foo.at("module-v1:bar"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    pub(crate) module: String,
    pub(crate) store: HashMap<String, Value>,
}

impl Object {
    /// Creates an empty object with no module association.
    pub fn new() -> Object {
        Object::default()
    }

    pub(crate) fn from_parts(module: String, store: HashMap<String, Value>) -> Object {
        Object { module, store }
    }

    /// The module this object belongs to. Empty until the object is inserted
    /// under a qualified key or decoded from a qualified member.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the value stored under `key`, which may be bare or qualified.
    pub fn at(&self, key: &str) -> Option<&Value> {
        self.store.get(&self.adapt_key(key))
    }

    /// Returns whether `key` names a member of this object.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(&self.adapt_key(key))
    }

    /// Associates `value` with `key`, returning the updated object.
    ///
    /// Inserted containers are retagged with the module the key implies, so
    /// marshaling can omit redundant prefixes later.
    pub fn assoc(&self, key: &str, value: impl Into<Value>) -> Object {
        let (key, value) = self.adapt(key, value.into());
        Object {
            module: self.module.clone(),
            store: self.store.update(key, value),
        }
    }

    /// Removes `key` from the object. Unknown keys are a no-op.
    pub fn delete(&self, key: &str) -> Object {
        Object {
            module: self.module.clone(),
            store: self.store.without(&self.adapt_key(key)),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterates over `(qualified key, value)` pairs. The order is
    /// unspecified but consistent within one snapshot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the qualified member keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// Iterates over the member values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.store.values()
    }

    /// Runs `f` against a mutable transient view of this object and returns
    /// the rebuilt immutable object. The transient must not escape `f`.
    pub fn transform(&self, f: impl FnOnce(&mut TransientObject)) -> Object {
        let mut t = TransientObject {
            module: self.module.clone(),
            store: self.store.clone(),
        };
        f(&mut t);
        Object {
            module: t.module,
            store: t.store,
        }
    }

    /// Merges `other` into this object and returns the result.
    ///
    /// Keys present in both merge recursively; keys only in `other` are
    /// inserted; keys only in `self` are retained. Merging with a non-object
    /// keeps `self` unchanged.
    pub(crate) fn merge(&self, other: &Value) -> Value {
        let Value::Object(new) = other else {
            return Value::Object(self.clone());
        };
        let merged = self.transform(|t| {
            for (key, value) in self.iter() {
                if let Some(theirs) = new.at(key) {
                    t.assoc(key, value.merge(theirs));
                }
            }
            for (key, value) in new.iter() {
                if !t.contains(key) {
                    t.assoc(key, value.clone());
                }
            }
        });
        Value::Object(merged)
    }

    pub(crate) fn diff(&self, new: &Value, path: &InstanceId) -> Vec<EditEntry> {
        let Value::Object(other) = new else {
            return vec![EditEntry {
                action: EditAction::Assoc,
                path: path.clone(),
                value: Some(new.clone()),
            }];
        };
        let mut out = Vec::new();
        for (key, value) in self.iter() {
            match other.at(key) {
                Some(theirs) => out.extend(value.diff(theirs, &path.push(key))),
                None => out.push(EditEntry {
                    action: EditAction::Delete,
                    path: path.push(key),
                    value: None,
                }),
            }
        }
        for (key, value) in other.iter() {
            if !self.contains(key) {
                out.push(EditEntry {
                    action: EditAction::Assoc,
                    path: path.push(key),
                    value: Some(value.clone()),
                });
            }
        }
        out
    }

    /// Retags the object as belonging to `module`, re-keying members whose
    /// module matched the old one and recursively retagging their values.
    pub(crate) fn belongs_to(&self, module: &str) -> Object {
        if module == self.module {
            return self.clone();
        }
        let mut store = self.store.clone();
        for (key, value) in self.store.iter() {
            let (key_module, local) = self.parse_key(key);
            if key_module == self.module || key_module.is_empty() {
                store.remove(key);
                store.insert(Self::qualify(module, local), value.belongs_to(module));
            }
        }
        Object {
            module: module.to_string(),
            store,
        }
    }

    /// Splits a key into its module and local parts, inheriting the object's
    /// module when no prefix is written.
    pub(crate) fn parse_key<'a>(&'a self, key: &'a str) -> (&'a str, &'a str) {
        match key.split_once(':') {
            Some((module, local)) => (module, local),
            None => (self.module.as_str(), key),
        }
    }

    fn adapt_key(&self, key: &str) -> String {
        let (module, local) = self.parse_key(key);
        Self::qualify(module, local)
    }

    fn adapt(&self, key: &str, value: Value) -> (String, Value) {
        let (module, local) = self.parse_key(key);
        let value = value.belongs_to(module);
        (Self::qualify(module, local), value)
    }

    fn qualify(module: &str, local: &str) -> String {
        if module.is_empty() {
            local.to_string()
        } else {
            format!("{module}:{local}")
        }
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Object {
        Object::new().transform(|t| {
            for (key, value) in pairs {
                t.assoc(key.as_ref(), value);
            }
        })
    }
}

/// A single-owner mutable view over an [`Object`], obtained through
/// [`Object::transform`]. Not thread-safe; must not be aliased.
#[derive(Debug)]
pub struct TransientObject {
    module: String,
    store: HashMap<String, Value>,
}

impl TransientObject {
    pub fn at(&self, key: &str) -> Option<&Value> {
        self.store.get(&self.adapt_key(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(&self.adapt_key(key))
    }

    pub fn assoc(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let (module, local) = match key.split_once(':') {
            Some((module, local)) => (module, local),
            None => (self.module.as_str(), key),
        };
        let value = value.into().belongs_to(module);
        let key = Object::qualify(module, local);
        self.store.insert(key, value);
        self
    }

    pub fn delete(&mut self, key: &str) -> &mut Self {
        let key = self.adapt_key(key);
        self.store.remove(&key);
        self
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn adapt_key(&self, key: &str) -> String {
        match key.split_once(':') {
            Some(_) => key.to_string(),
            None => Object::qualify(&self.module, key),
        }
    }
}
