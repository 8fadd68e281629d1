use std::cmp::Ordering;

use im::Vector;

use crate::edit::{EditAction, EditEntry};
use crate::instance_id::InstanceId;
use crate::value::Value;

/// An RFC 7159 array augmented for RFC 7951 behaviors.
///
/// Arrays are immutable; mutation methods return structurally shared copies.
/// Like [`Object`](crate::Object), an array carries a module association used
/// to tag containers inserted without an explicit module of their own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array {
    pub(crate) module: String,
    pub(crate) store: Vector<Value>,
}

impl Array {
    /// Creates an empty array with no module association.
    pub fn new() -> Array {
        Array::default()
    }

    pub(crate) fn from_parts(module: String, store: Vector<Value>) -> Array {
        Array { module, store }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the value at `index`, or `None` when out of range.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.store.get(index)
    }

    /// Returns whether `index` is within the array bounds.
    pub fn contains(&self, index: usize) -> bool {
        index < self.store.len()
    }

    /// Associates `value` with `index`. An index past the end pads the array
    /// with null values up to `index` before setting it.
    pub fn assoc(&self, index: usize, value: impl Into<Value>) -> Array {
        let mut store = self.store.clone();
        while store.len() <= index {
            store.push_back(Value::Null);
        }
        Array {
            module: self.module.clone(),
            store: store.update(index, self.adapt(value.into())),
        }
    }

    /// Appends `value` at the end of the array.
    pub fn append(&self, value: impl Into<Value>) -> Array {
        let mut store = self.store.clone();
        store.push_back(self.adapt(value.into()));
        Array {
            module: self.module.clone(),
            store,
        }
    }

    /// Removes the element at `index`, shifting the tail down. Out-of-range
    /// indices are a no-op.
    pub fn delete(&self, index: usize) -> Array {
        if index >= self.store.len() {
            return self.clone();
        }
        let mut store = self.store.clone();
        store.remove(index);
        Array {
            module: self.module.clone(),
            store,
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.store.iter()
    }

    /// Returns a new array sorted with the default [`Value::compare`] order.
    pub fn sort(&self) -> Array {
        self.sort_by(Value::compare)
    }

    /// Returns a new array sorted with the supplied comparator.
    pub fn sort_by(&self, cmp: impl Fn(&Value, &Value) -> Ordering) -> Array {
        let mut items: Vec<Value> = self.store.iter().cloned().collect();
        items.sort_by(|a, b| cmp(a, b));
        Array {
            module: self.module.clone(),
            store: items.into_iter().collect(),
        }
    }

    /// Runs `f` against a mutable transient view of this array and returns
    /// the rebuilt immutable array. The transient must not escape `f`.
    pub fn transform(&self, f: impl FnOnce(&mut TransientArray)) -> Array {
        let mut t = TransientArray {
            module: self.module.clone(),
            store: self.store.clone(),
        };
        f(&mut t);
        Array {
            module: t.module,
            store: t.store,
        }
    }

    /// Merges `other` positionally: overlapping indices merge recursively,
    /// extra elements in `other` are appended, and a longer `self` keeps its
    /// tail. Merging with a non-array keeps `self` unchanged.
    pub(crate) fn merge(&self, other: &Value) -> Value {
        let Value::Array(new) = other else {
            return Value::Array(self.clone());
        };
        let merged = self.transform(|t| {
            for (i, value) in self.iter().enumerate() {
                if let Some(theirs) = new.at(i) {
                    t.assoc(i, value.merge(theirs));
                }
            }
            for value in new.iter().skip(self.len()) {
                t.append(value.clone());
            }
        });
        Value::Array(merged)
    }

    pub(crate) fn diff(&self, new: &Value, path: &InstanceId) -> Vec<EditEntry> {
        let Value::Array(other) = new else {
            return vec![EditEntry {
                action: EditAction::Assoc,
                path: path.clone(),
                value: Some(new.clone()),
            }];
        };
        let mut out = Vec::new();
        for (i, value) in self.iter().enumerate().take(other.len()) {
            if let Some(theirs) = other.at(i) {
                out.extend(value.diff(theirs, &path.with_pos_predicate(i)));
            }
        }
        // Deletes run highest index first so that applying them in order does
        // not shift the elements later entries address.
        for i in (other.len()..self.len()).rev() {
            out.push(EditEntry {
                action: EditAction::Delete,
                path: path.with_pos_predicate(i),
                value: None,
            });
        }
        for (i, value) in other.iter().enumerate().skip(self.len()) {
            out.push(EditEntry {
                action: EditAction::Assoc,
                path: path.with_pos_predicate(i),
                value: Some(value.clone()),
            });
        }
        out
    }

    /// Returns the first element satisfying `pred`, if any.
    pub(crate) fn detect(&self, pred: impl Fn(&Value) -> bool) -> Option<&Value> {
        self.store.iter().find(|v| pred(v))
    }

    /// Returns the subsequence of elements satisfying `pred`, keeping this
    /// array's module.
    pub(crate) fn select(&self, pred: impl Fn(&Value) -> bool) -> Array {
        Array {
            module: self.module.clone(),
            store: self.store.iter().filter(|v| pred(v)).cloned().collect(),
        }
    }

    pub(crate) fn belongs_to(&self, module: &str) -> Array {
        if module == self.module {
            return self.clone();
        }
        Array {
            module: module.to_string(),
            store: self.store.iter().map(|v| v.belongs_to(module)).collect(),
        }
    }

    fn adapt(&self, value: Value) -> Value {
        value.belongs_to(&self.module)
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(values: I) -> Array {
        Array::new().transform(|t| {
            for value in values {
                t.append(value);
            }
        })
    }
}

/// A single-owner mutable view over an [`Array`], obtained through
/// [`Array::transform`]. Not thread-safe; must not be aliased.
#[derive(Debug)]
pub struct TransientArray {
    module: String,
    store: Vector<Value>,
}

impl TransientArray {
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.store.get(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.store.len()
    }

    pub fn assoc(&mut self, index: usize, value: impl Into<Value>) -> &mut Self {
        while self.store.len() <= index {
            self.store.push_back(Value::Null);
        }
        let value = value.into().belongs_to(&self.module);
        self.store.set(index, value);
        self
    }

    pub fn append(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into().belongs_to(&self.module);
        self.store.push_back(value);
        self
    }

    pub fn delete(&mut self, index: usize) -> &mut Self {
        if index < self.store.len() {
            self.store.remove(index);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn sort(&mut self) -> &mut Self {
        self.sort_by(Value::compare)
    }

    pub fn sort_by(&mut self, cmp: impl Fn(&Value, &Value) -> Ordering) -> &mut Self {
        let mut items: Vec<Value> = self.store.iter().cloned().collect();
        items.sort_by(|a, b| cmp(a, b));
        self.store = items.into_iter().collect();
        self
    }
}
