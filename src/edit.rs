use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::instance_id::InstanceId;
use crate::tree::Tree;
use crate::value::Value;

/// The operation an [`EditEntry`] performs against a tree.
///
/// Unknown action strings fail decoding; the closed enum makes an unknown
/// action impossible to encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Assoc,
    Delete,
    Merge,
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditAction::Assoc => "assoc",
            EditAction::Delete => "delete",
            EditAction::Merge => "merge",
        })
    }
}

/// One step of an edit script: an action, the path to perform it at, and the
/// value to use. `value` is absent for deletes and omitted on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditEntry {
    pub action: EditAction,
    pub path: InstanceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl EditEntry {
    /// Builds an assoc entry, parsing `path`.
    pub fn assoc(path: &str, value: impl Into<Value>) -> Result<EditEntry> {
        Ok(EditEntry {
            action: EditAction::Assoc,
            path: path.parse()?,
            value: Some(value.into()),
        })
    }

    /// Builds a delete entry, parsing `path`.
    pub fn delete(path: &str) -> Result<EditEntry> {
        Ok(EditEntry {
            action: EditAction::Delete,
            path: path.parse()?,
            value: None,
        })
    }

    /// Builds a merge entry, parsing `path`.
    pub fn merge(path: &str, value: impl Into<Value>) -> Result<EditEntry> {
        Ok(EditEntry {
            action: EditAction::Merge,
            path: path.parse()?,
            value: Some(value.into()),
        })
    }

    pub(crate) fn apply(&self, tree: &Tree) -> Result<Tree> {
        match self.action {
            EditAction::Assoc => {
                tree.assoc_id(&self.path, self.value.clone().unwrap_or_default())
            }
            EditAction::Delete => tree.delete_id(&self.path),
            EditAction::Merge => {
                let current = tree.at_id(&self.path);
                let merged = current.merge(&self.value.clone().unwrap_or_default());
                tree.assoc_id(&self.path, merged)
            }
        }
    }
}

/// An ordered edit script that can be applied to a [`Tree`] and round-tripped
/// through the codec as `{"actions":[…]}`.
///
/// ```rust
/// use rfc7951_data::{EditEntry, EditOperation};
///
/// let op = EditOperation::new(vec![
///     EditEntry::assoc("/m:container/leaf", "value").unwrap(),
///     EditEntry::delete("/m:old-leaf").unwrap(),
/// ]);
/// let bytes = op.marshal().unwrap();
/// assert_eq!(EditOperation::unmarshal(&bytes).unwrap(), op);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditOperation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<EditEntry>,
}

impl EditOperation {
    pub fn new(actions: Vec<EditEntry>) -> EditOperation {
        EditOperation { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Encodes the operation in its RFC 7951 wire form.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes an operation from its RFC 7951 wire form. Entries with
    /// unknown actions fail the whole decode.
    pub fn unmarshal(bytes: &[u8]) -> Result<EditOperation> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
