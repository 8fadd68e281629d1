use std::fmt;

use crate::edit::EditOperation;
use crate::error::{Error, Result};
use crate::instance_id::{Identity, InstanceId, NodeId, Selector};
use crate::object::Object;
use crate::value::Value;

/// An RFC 7951 document rooted at an [`Object`], addressed with instance
/// identifiers instead of single keys.
///
/// Trees are immutable: every mutating operation returns a new tree that
/// shares unchanged structure with the original, so copies are cheap and
/// old snapshots stay valid.
///
/// ```rust
/// use rfc7951_data::{Tree, Value};
///
/// let tree = Tree::new()
///     .assoc("/m:system/hostname", "router1")
///     .unwrap();
/// assert_eq!(tree.at("/m:system/hostname").unwrap(), Value::from("router1"));
///
/// let trimmed = tree.delete("/m:system/hostname").unwrap();
/// assert_eq!(trimmed.at("/m:system/hostname").unwrap(), Value::Null);
/// // The original tree is unchanged.
/// assert!(tree.contains("/m:system/hostname").unwrap());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tree {
    root: Value,
}

/// A traversal handler for [`Tree::range`].
///
/// Each variant carries a closure returning `true` to continue or `false` to
/// stop the whole traversal.
pub enum Visit<'a> {
    PathAndValue(Box<dyn FnMut(&InstanceId, &Value) -> bool + 'a>),
    PathOnly(Box<dyn FnMut(&InstanceId) -> bool + 'a>),
    ValueOnly(Box<dyn FnMut(&Value) -> bool + 'a>),
}

impl<'a> Visit<'a> {
    pub fn path_and_value(f: impl FnMut(&InstanceId, &Value) -> bool + 'a) -> Self {
        Visit::PathAndValue(Box::new(f))
    }

    pub fn path_only(f: impl FnMut(&InstanceId) -> bool + 'a) -> Self {
        Visit::PathOnly(Box::new(f))
    }

    pub fn value_only(f: impl FnMut(&Value) -> bool + 'a) -> Self {
        Visit::ValueOnly(Box::new(f))
    }

    fn call(&mut self, path: &InstanceId, value: &Value) -> bool {
        match self {
            Visit::PathAndValue(f) => f(path, value),
            Visit::PathOnly(f) => f(path),
            Visit::ValueOnly(f) => f(value),
        }
    }
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Tree {
        Tree::default()
    }

    /// Creates a tree rooted at the supplied object.
    pub fn from_object(root: Object) -> Tree {
        Tree {
            root: Value::Object(root),
        }
    }

    /// Creates a tree holding `value` under the single member
    /// `rfc7951:data`.
    pub fn from_value(value: Value) -> Tree {
        Tree::from_object(Object::new().assoc("rfc7951:data", value))
    }

    /// The tree's root object as a value.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Returns the value at `path`, or [`Value::Null`] when the path does not
    /// resolve. Fails only when `path` does not parse.
    pub fn at(&self, path: &str) -> Result<Value> {
        Ok(self.at_id(&path.parse()?))
    }

    pub fn at_id(&self, id: &InstanceId) -> Value {
        id.match_against(&self.root)
    }

    /// Returns the value at `path`, or `None` when the path does not resolve.
    pub fn find(&self, path: &str) -> Result<Option<Value>> {
        Ok(self.find_id(&path.parse()?))
    }

    pub fn find_id(&self, id: &InstanceId) -> Option<Value> {
        id.find(&self.root)
    }

    /// Returns whether `path` resolves to a node in the tree.
    pub fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.find_id(&path.parse()?).is_some())
    }

    /// Associates `value` at `path`, creating any missing interior nodes:
    /// plain segments create objects, predicate segments create arrays, and
    /// expression predicates inject their key into new list entries.
    pub fn assoc(&self, path: &str, value: impl Into<Value>) -> Result<Tree> {
        self.assoc_id(&path.parse()?, value.into())
    }

    pub fn assoc_id(&self, id: &InstanceId, value: Value) -> Result<Tree> {
        let ids = id.segments();
        // Queue each (parent value, selector) pair bottom up, synthesizing
        // missing parents as the selector dictates.
        let mut queue: Vec<(Value, Selector<'_>)> = Vec::new();
        for n in (0..ids.len()).rev() {
            let segment = &ids[n];
            if !segment.predicates().is_empty() {
                let selector = Selector::Preds(segment.predicates());
                let parent = self
                    .lookup(&ids[..n], Some(segment))
                    .filter(|v| !v.is_null())
                    .unwrap_or_else(|| selector.create_node());
                queue.push((parent, selector));
            }
            let selector = Selector::Node(segment);
            let parent = self
                .lookup(&ids[..n], None)
                .filter(|v| !v.is_null())
                .unwrap_or_else(|| selector.create_node());
            queue.push((parent, selector));
        }
        // Fold the queue, rewriting each parent with the child identity its
        // selector computes.
        let mut value = value;
        for (parent, selector) in queue {
            value = selector.modify_match(value);
            let identity = selector.compute_identifier_default(&parent);
            value = match (parent, identity) {
                (Value::Object(obj), Identity::Key(key)) => {
                    Value::Object(obj.assoc(&key, value))
                }
                (Value::Array(arr), Identity::Index(index)) => {
                    Value::Array(arr.assoc(index, value))
                }
                (parent, _) => {
                    return Err(Error::node(format!(
                        "cannot write through a {} node",
                        parent.kind()
                    )))
                }
            };
        }
        match value {
            Value::Object(root) => Ok(Tree::from_object(root)),
            other => Err(Error::node(format!(
                "document root must be an object, not a {}",
                other.kind()
            ))),
        }
    }

    /// Removes the node at `path`. A path that does not resolve is a no-op;
    /// empty containers left behind are not pruned.
    pub fn delete(&self, path: &str) -> Result<Tree> {
        self.delete_id(&path.parse()?)
    }

    pub fn delete_id(&self, id: &InstanceId) -> Result<Tree> {
        if id.is_empty() || self.find_id(id).is_none() {
            return Ok(self.clone());
        }
        let Some(selector) = id.selector() else {
            return Ok(self.clone());
        };
        let parent_path = id.parent();
        let parent = parent_path.match_against(&self.root);
        let Some(identity) = selector.compute_identifier(&parent) else {
            return Ok(self.clone());
        };
        let parent = match (parent, identity) {
            (Value::Object(obj), Identity::Key(key)) => Value::Object(obj.delete(&key)),
            (Value::Array(arr), Identity::Index(index)) => Value::Array(arr.delete(index)),
            _ => return Ok(self.clone()),
        };
        self.assoc_id(&parent_path, parent)
    }

    /// Merges `other` into this tree, recursively and accretively.
    pub fn merge(&self, other: &Tree) -> Tree {
        match self.root.merge(&other.root) {
            Value::Object(root) => Tree::from_object(root),
            _ => self.clone(),
        }
    }

    /// Compares two trees and returns the edit script that transforms this
    /// tree into `other`.
    pub fn diff(&self, other: &Tree) -> EditOperation {
        EditOperation::new(self.root.diff(&other.root, &InstanceId::empty()))
    }

    /// Applies an edit script, entry by entry, returning the edited tree.
    pub fn edit(&self, op: &EditOperation) -> Result<Tree> {
        let mut tree = self.clone();
        for entry in &op.actions {
            tree = entry.apply(&tree)?;
        }
        Ok(tree)
    }

    /// Walks the tree in pre-order, visiting containers before their members.
    /// Array elements extend the path with a positional predicate. The
    /// visitor may stop the traversal by returning `false`.
    pub fn range(&self, mut visit: Visit<'_>) {
        let Value::Object(root) = &self.root else {
            return;
        };
        let path = InstanceId::empty();
        for (key, value) in root.iter() {
            if !range_recur(&path.push(key), value, &mut visit) {
                break;
            }
        }
    }

    /// Counts every node in the tree, containers included.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.range(Visit::value_only(|_| {
            count += 1;
            true
        }));
        count
    }

    pub fn is_empty(&self) -> bool {
        match &self.root {
            Value::Object(o) => o.is_empty(),
            _ => true,
        }
    }

    /// Encodes the tree as RFC 7951 data.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a tree from RFC 7951 data. The document root must be an
    /// object.
    pub fn unmarshal(bytes: &[u8]) -> Result<Tree> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Resolves the value addressed by `segments`, optionally descending one
    /// more step into `tail`'s member without applying its predicates.
    fn lookup(&self, segments: &[NodeId], tail: Option<&NodeId>) -> Option<Value> {
        let mut current = self.root.clone();
        for segment in segments {
            current = segment.find(&current)?;
        }
        match tail {
            Some(tail) => tail.find_child(&current),
            None => Some(current),
        }
    }
}

fn range_recur(path: &InstanceId, value: &Value, visit: &mut Visit<'_>) -> bool {
    match value {
        Value::Object(obj) => {
            if !visit.call(path, value) {
                return false;
            }
            for (key, child) in obj.iter() {
                if !range_recur(&path.push(key), child, visit) {
                    return false;
                }
            }
            true
        }
        Value::Array(arr) => {
            if !visit.call(path, value) {
                return false;
            }
            for (i, child) in arr.iter().enumerate() {
                if !range_recur(&path.with_pos_predicate(i), child, visit) {
                    return false;
                }
            }
            true
        }
        leaf => visit.call(path, leaf),
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
