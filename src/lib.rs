//! # rfc7951-data
//!
//! An in-memory document model and edit engine for RFC 7951 encoded data,
//! the JSON encoding of YANG-modeled configuration and state.
//!
//! The library is schema-less: it ingests, stores, queries, mutates, diffs,
//! and re-emits RFC 7951 documents while preserving the module-prefix
//! conventions that distinguish RFC 7951 from plain JSON. It knows nothing
//! about any particular YANG schema and performs no validation.
//!
//! Everything is built around four pieces:
//!
//! - [`Value`] — a tagged, immutable cell holding one RFC 7951 datum:
//!   null, the empty leaf, booleans, the four integer widths, floats,
//!   strings, instance identifiers, and nested containers.
//! - [`Object`] and [`Array`] — persistent containers. Mutation returns a new
//!   handle that shares unchanged structure with the old one, so snapshots
//!   are cheap and may be shared freely across threads.
//! - [`InstanceId`] — a parsed RFC 7951 §6.11 instance identifier with
//!   positional and key-expression predicates.
//! - [`Tree`] — a facade over a root object with instance-identifier
//!   addressed query, update, deep merge, structural diff, and edit-script
//!   application.
//!
//! ## Quick start
//!
//! ```rust
//! use rfc7951_data::{array, object, Tree, Value};
//!
//! let tree = Tree::from_object(object! {
//!     "ietf-interfaces:interfaces" => object! {
//!         "interface" => array![
//!             object! { "name" => "eth0", "enabled" => true },
//!             object! { "name" => "eth1", "enabled" => false },
//!         ],
//!     },
//! });
//!
//! let enabled = tree
//!     .at("/ietf-interfaces:interfaces/interface[name='eth0']/enabled")
//!     .unwrap();
//! assert_eq!(enabled, Value::Bool(true));
//!
//! // Writes share structure with the original tree instead of mutating it.
//! let updated = tree
//!     .assoc("/ietf-interfaces:interfaces/interface[name='eth1']/enabled", true)
//!     .unwrap();
//! assert_eq!(
//!     updated.at("/ietf-interfaces:interfaces/interface[name='eth1']/enabled").unwrap(),
//!     Value::Bool(true)
//! );
//! assert_eq!(
//!     tree.at("/ietf-interfaces:interfaces/interface[name='eth1']/enabled").unwrap(),
//!     Value::Bool(false)
//! );
//! ```
//!
//! ## Diff and edit scripts
//!
//! Two trees can be diffed into an [`EditOperation`], an ordered list of
//! `assoc`, `delete`, and `merge` entries that round-trips through the codec
//! and applies to any tree:
//!
//! ```rust
//! use rfc7951_data::{object, Tree};
//!
//! let a = Tree::from_object(object! { "m:leaf" => 1 });
//! let b = a.assoc("/m:leaf", 2).unwrap();
//!
//! let diff = a.diff(&b);
//! assert_eq!(a.edit(&diff).unwrap(), b);
//! ```
//!
//! ## Wire format
//!
//! [`Tree::marshal`], [`Tree::unmarshal`], and their [`Value`] counterparts
//! implement the RFC 7951 conventions: 64-bit integers, floats, and strings
//! are quoted, 32-bit integers and booleans are bare, the YANG `empty` leaf
//! is the literal `[null]`, and member keys carry a `module:` prefix exactly
//! when the member's module differs from its parent's.

mod array;
mod codec;
mod edit;
mod error;
mod instance_id;
mod intern;
mod macros;
mod object;
mod tree;
mod value;

pub use array::{Array, TransientArray};
pub use edit::{EditAction, EditEntry, EditOperation};
pub use error::{Error, Result};
pub use instance_id::InstanceId;
pub use object::{Object, TransientObject};
pub use tree::{Tree, Visit};
pub use value::{Handler, Value};
