use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, opt, recognize},
    sequence::{delimited, pair, terminated},
    IResult,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::array::Array;
use crate::error::{Error, Result};
use crate::object::Object;
use crate::value::Value;

/// An RFC 7951 §6.11 instance identifier.
///
/// Instance identifiers address a single node inside an RFC 7951 document.
/// They match the grammar:
///
/// ```text
/// instance-identifier = 1*("/" (node-identifier *predicate))
/// node-identifier     = [prefix ":"] identifier
/// predicate           = "[" *WSP (predicate-expr / pos) *WSP "]"
/// predicate-expr      = (node-identifier / ".") *WSP "=" *WSP
///                       ((DQUOTE string DQUOTE) / (SQUOTE string SQUOTE))
/// identifier          = (ALPHA / "_") *(ALPHA / DIGIT / "_" / "-" / ".")
/// ```
///
/// A segment without an explicit prefix inherits the previous segment's
/// prefix; the first segment must be written with one. The [`Display`]
/// rendering is normalized: single quotes, no predicate whitespace, and
/// inherited prefixes omitted.
///
/// ```rust
/// use rfc7951_data::InstanceId;
///
/// let id: InstanceId = "/ietf-interfaces:interfaces/interface[name = \"eth0\"]/ip"
///     .parse()
///     .unwrap();
/// assert_eq!(
///     id.to_string(),
///     "/ietf-interfaces:interfaces/interface[name='eth0']/ip"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceId {
    ids: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NodeId {
    prefix: String,
    identifier: String,
    prefix_inferred: bool,
    predicates: Vec<Predicate>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Predicate {
    /// `[3]`
    Position(u64),
    /// `[node='value']` or `[.='value']`; the `.` form is stored as a node
    /// whose identifier is `.`.
    Expr { node: NodeId, value: String },
}

/// The child key or index a selector resolves to within its parent.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Identity {
    Key(String),
    Index(usize),
}

/// The last addressing step of an instance identifier: either a plain
/// node identifier selecting an object member, or the predicate set
/// selecting within an array.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Selector<'a> {
    Node(&'a NodeId),
    Preds(&'a [Predicate]),
}

impl FromStr for InstanceId {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let segments = split_segments(input)?;
        let Some((first, rest)) = segments.split_first() else {
            return Err(Error::parse("must specify at least one node-identifier"));
        };
        if !first.is_empty() {
            return Err(Error::parse("must start with a \"/\""));
        }
        if rest.is_empty() {
            return Err(Error::parse("must specify at least one node-identifier"));
        }
        let mut ids = Vec::with_capacity(rest.len());
        let mut prefix = String::new();
        for segment in rest {
            let node = NodeId::parse(&prefix, segment)?;
            prefix = node.prefix.clone();
            ids.push(node);
        }
        Ok(InstanceId { ids })
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in &self.ids {
            write!(f, "/{id}")?;
        }
        if self.ids.is_empty() {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl Serialize for InstanceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InstanceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl InstanceId {
    /// Resolves the identifier against `root`, returning the addressed value
    /// or `None` when the path does not exist.
    pub fn find(&self, root: &Value) -> Option<Value> {
        let mut current = root.clone();
        for id in &self.ids {
            current = id.find(&current)?;
        }
        Some(current)
    }

    /// Like [`find`](Self::find) but absorbs the missing case into
    /// [`Value::Null`].
    pub fn match_against(&self, root: &Value) -> Value {
        self.find(root).unwrap_or_default()
    }

    pub(crate) fn empty() -> InstanceId {
        InstanceId { ids: Vec::new() }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn segments(&self) -> &[NodeId] {
        &self.ids
    }

    /// The identifier up to the last fully addressable node: predicates are
    /// stripped from the final segment first, then the segment itself.
    pub(crate) fn parent(&self) -> InstanceId {
        let mut out = self.clone();
        match out.ids.last_mut() {
            Some(last) if !last.predicates.is_empty() => last.predicates.clear(),
            _ => {
                out.ids.pop();
            }
        }
        out
    }

    /// The selector matching the final addressing step, if any.
    pub(crate) fn selector(&self) -> Option<Selector<'_>> {
        let last = self.ids.last()?;
        Some(if last.predicates.is_empty() {
            Selector::Node(last)
        } else {
            Selector::Preds(&last.predicates)
        })
    }

    /// Extends the identifier with an object member key, inheriting the
    /// previous segment's prefix for bare keys.
    pub(crate) fn push(&self, key: &str) -> InstanceId {
        let prev = self.ids.last().map(|id| id.prefix.as_str()).unwrap_or("");
        let node = NodeId::from_key(prev, key);
        let mut out = self.clone();
        out.ids.push(node);
        out
    }

    /// Extends the final segment with a positional predicate.
    pub(crate) fn with_pos_predicate(&self, index: usize) -> InstanceId {
        let mut out = self.clone();
        let Some(last) = out.ids.last_mut() else {
            return out;
        };
        last.predicates.push(Predicate::Position(index as u64));
        out
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.prefix.is_empty() && !self.prefix_inferred {
            write!(f, "{}:", self.prefix)?;
        }
        f.write_str(&self.identifier)?;
        for pred in &self.predicates {
            write!(f, "{pred}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Position(pos) => write!(f, "[{pos}]"),
            Predicate::Expr { node, value } => write!(f, "[{node}='{value}']"),
        }
    }
}

impl NodeId {
    fn parse(prev_prefix: &str, input: &str) -> Result<NodeId> {
        let (name, preds) = match input.find('[') {
            Some(at) => (&input[..at], &input[at..]),
            None => (input, ""),
        };
        let (prefix, identifier) = match all_consuming(node_identifier)(name) {
            Ok((_, parts)) => parts,
            Err(_) => return Err(Error::parse(format!("invalid node-identifier {name}"))),
        };
        if let Some(prefix) = prefix {
            check_not_xml(prefix)?;
        }
        check_not_xml(identifier)?;
        let (prefix, prefix_inferred) = match prefix {
            Some(prefix) => (prefix.to_string(), prefix == prev_prefix),
            None if prev_prefix.is_empty() => {
                return Err(Error::parse("unable to determine prefix"));
            }
            None => (prev_prefix.to_string(), true),
        };
        let predicates = if preds.is_empty() {
            Vec::new()
        } else {
            split_predicates(preds)?
                .into_iter()
                .map(|p| Predicate::parse(&prefix, p))
                .collect::<Result<_>>()?
        };
        Ok(NodeId {
            prefix,
            identifier: identifier.to_string(),
            prefix_inferred,
            predicates,
        })
    }

    /// Builds a path segment from a stored object key. Keys have already been
    /// normalized, so no grammar checks apply here.
    fn from_key(prev_prefix: &str, key: &str) -> NodeId {
        match key.split_once(':') {
            Some((prefix, local)) => NodeId {
                prefix: prefix.to_string(),
                identifier: local.to_string(),
                prefix_inferred: prefix == prev_prefix,
                predicates: Vec::new(),
            },
            None => NodeId {
                prefix: prev_prefix.to_string(),
                identifier: key.to_string(),
                prefix_inferred: true,
                predicates: Vec::new(),
            },
        }
    }

    pub(crate) fn qualified(&self) -> String {
        format!("{}:{}", self.prefix, self.identifier)
    }

    pub(crate) fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub(crate) fn find(&self, value: &Value) -> Option<Value> {
        let child = self.find_child(value)?;
        if self.predicates.is_empty() {
            return Some(child);
        }
        find_preds(&self.predicates, &child)
    }

    /// Looks up the segment's member without applying predicates.
    pub(crate) fn find_child(&self, value: &Value) -> Option<Value> {
        let Value::Object(obj) = value else {
            return None;
        };
        obj.at(&self.qualified()).cloned()
    }
}

impl Predicate {
    fn parse(prefix: &str, input: &str) -> Result<Predicate> {
        // input arrives bracketed from the splitter
        let body = trim_wsp(&input[1..input.len() - 1]);
        if let Ok(pos) = body.parse::<u64>() {
            return Ok(Predicate::Position(pos));
        }
        let Some((lhs, rhs)) = body.split_once('=') else {
            return Err(Error::parse(format!("invalid predicate expression {body}")));
        };
        let (lhs, rhs) = (trim_wsp(lhs), trim_wsp(rhs));
        let node = if lhs == "." {
            NodeId {
                prefix: prefix.to_string(),
                identifier: ".".to_string(),
                prefix_inferred: true,
                predicates: Vec::new(),
            }
        } else {
            NodeId::parse(prefix, lhs)?
        };
        match rhs.chars().next() {
            Some('\'') | Some('"') => {}
            _ => return Err(Error::parse("invalid predicate, expected ''' or '\"'")),
        }
        let value = match all_consuming(quoted_value)(rhs) {
            Ok((_, value)) => value.to_string(),
            Err(_) => return Err(Error::parse("unterminated expression value")),
        };
        Ok(Predicate::Expr { node, value })
    }

    fn find(&self, value: &Value) -> Option<Value> {
        let Value::Array(arr) = value else {
            return None;
        };
        match self {
            Predicate::Position(pos) => arr.at(*pos as usize).cloned(),
            Predicate::Expr { node, value } if node.identifier == "." => {
                // Only leaf-lists can be referenced this way.
                arr.detect(|v| v.rfc7951_string() == *value).cloned()
            }
            Predicate::Expr { node, value } => {
                // Only lists can be referenced this way.
                let selected = arr.select(|entry| {
                    node.find(entry)
                        .is_some_and(|v| v.rfc7951_string() == *value)
                });
                if selected.is_empty() {
                    None
                } else {
                    Some(Value::Array(selected))
                }
            }
        }
    }

    fn matched_indices(&self, arr: &Array) -> Vec<usize> {
        match self {
            Predicate::Position(pos) => vec![*pos as usize],
            Predicate::Expr { node, value } if node.identifier == "." => arr
                .iter()
                .enumerate()
                .filter(|(_, v)| v.rfc7951_string() == *value)
                .map(|(i, _)| i)
                .collect(),
            Predicate::Expr { node, value } => arr
                .iter()
                .enumerate()
                .filter(|(_, entry)| {
                    node.find(entry)
                        .is_some_and(|v| v.rfc7951_string() == *value)
                })
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

/// Applies a predicate chain to a looked-up member. Intermediate results must
/// stay arrays; the final selection resolves only when it is unambiguous.
fn find_preds(preds: &[Predicate], value: &Value) -> Option<Value> {
    let mut current = value.clone();
    for (i, pred) in preds.iter().enumerate() {
        let next = pred.find(&current)?;
        if !matches!(next, Value::Array(_)) && i != preds.len() - 1 {
            return None;
        }
        current = next;
    }
    match current {
        Value::Array(arr) if arr.len() == 1 => arr.iter().next().cloned(),
        Value::Array(_) => None,
        other => Some(other),
    }
}

impl Selector<'_> {
    /// The exact child identity the selector resolves to in `parent`, or
    /// `None` when nothing (or more than one thing) matches.
    pub(crate) fn compute_identifier(&self, parent: &Value) -> Option<Identity> {
        match self {
            Selector::Node(id) => {
                let Value::Object(obj) = parent else {
                    return None;
                };
                let key = id.qualified();
                obj.contains(&key).then_some(Identity::Key(key))
            }
            Selector::Preds(preds) => {
                let Value::Array(arr) = parent else {
                    return None;
                };
                let mut matched: Vec<usize> = (0..arr.len()).collect();
                for pred in *preds {
                    let got = pred.matched_indices(arr);
                    matched.retain(|i| got.contains(i));
                }
                match matched.as_slice() {
                    [index] => Some(Identity::Index(*index)),
                    _ => None,
                }
            }
        }
    }

    /// Falls back to an insertion identity when nothing matches: the
    /// qualified key for objects, the array length (append) for predicate
    /// selectors.
    pub(crate) fn compute_identifier_default(&self, parent: &Value) -> Identity {
        if let Some(identity) = self.compute_identifier(parent) {
            return identity;
        }
        match self {
            Selector::Node(id) => Identity::Key(id.qualified()),
            Selector::Preds(_) => match parent {
                Value::Array(arr) => Identity::Index(arr.len()),
                _ => Identity::Index(0),
            },
        }
    }

    /// The container a write creates when the addressed node is missing.
    pub(crate) fn create_node(&self) -> Value {
        match self {
            Selector::Node(_) => Value::Object(Object::new()),
            Selector::Preds(_) => Value::Array(Array::new()),
        }
    }

    /// Injects expression-predicate keys into a freshly created list entry so
    /// the entry satisfies its own selector. The `.` form has no key to
    /// synthesize and is skipped, as are non-object values.
    pub(crate) fn modify_match(&self, value: Value) -> Value {
        let Selector::Preds(preds) = self else {
            return value;
        };
        let mut value = value;
        for pred in *preds {
            if let Predicate::Expr { node, value: want } = pred {
                if node.identifier != "." {
                    if let Value::Object(obj) = &value {
                        value = Value::Object(obj.assoc(&node.identifier, want.as_str()));
                    }
                }
            }
        }
        value
    }
}

/// Splits the input on `/` outside quoted substrings, so predicate values may
/// contain slashes.
fn split_segments(input: &str) -> Result<Vec<&str>> {
    let (mut in_single, mut in_double) = (false, false);
    let mut out = Vec::new();
    let mut first = 0;
    for (i, c) in input.char_indices() {
        match c {
            '\'' => in_single = !in_single,
            '"' => in_double = !in_double,
            '/' if !in_single && !in_double => {
                out.push(&input[first..i]);
                first = i + 1;
            }
            _ => {}
        }
    }
    if first < input.len() {
        out.push(&input[first..]);
    }
    if in_single || in_double {
        return Err(Error::parse("unterminated quote"));
    }
    Ok(out)
}

/// Splits a predicate run `[..][..]` into individual bracketed predicates,
/// respecting quotes and rejecting nesting.
fn split_predicates(input: &str) -> Result<Vec<&str>> {
    let (mut in_single, mut in_double, mut in_predicate) = (false, false, false);
    let mut out = Vec::new();
    let mut first = 0;
    for (i, c) in input.char_indices() {
        match c {
            '[' if !in_single && !in_double => {
                if in_predicate {
                    return Err(Error::parse("nested predicates are not allowed"));
                }
                in_predicate = true;
            }
            ']' if !in_single && !in_double => {
                out.push(&input[first..=i]);
                first = i + 1;
                in_predicate = false;
            }
            '\'' => in_single = !in_single,
            '"' => in_double = !in_double,
            _ => {}
        }
    }
    if in_single || in_double {
        return Err(Error::parse("unterminated quote"));
    }
    if in_predicate {
        return Err(Error::parse("unterminated predicate"));
    }
    Ok(out)
}

fn check_not_xml(part: &str) -> Result<()> {
    if part.len() >= 3 && part[..3].eq_ignore_ascii_case("xml") {
        return Err(Error::parse(format!(
            "invalid identifier, not allowed to start with xml: {part}"
        )));
    }
    Ok(())
}

fn trim_wsp(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\t')
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while_m_n(1, 1, |c: char| c == '_' || c.is_alphabetic()),
        take_while(|c: char| c == '_' || c == '-' || c == '.' || c.is_alphanumeric()),
    ))(input)
}

fn node_identifier(input: &str) -> IResult<&str, (Option<&str>, &str)> {
    pair(opt(terminated(identifier, char(':'))), identifier)(input)
}

fn quoted_value(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        delimited(char('"'), take_while(|c| c != '"'), char('"')),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{array, object};

    fn parse(s: &str) -> InstanceId {
        s.parse().expect("path should parse")
    }

    #[test]
    fn parent_strips_predicates_first() {
        let id = parse("/m:list[key='a']/leaf");
        assert_eq!(id.parent().to_string(), "/m:list[key='a']");
        assert_eq!(id.parent().parent().to_string(), "/m:list");
        assert_eq!(id.parent().parent().parent().to_string(), "/");
    }

    #[test]
    fn push_inherits_the_previous_prefix() {
        let id = parse("/m:foo").push("m:bar").push("other:baz");
        assert_eq!(id.to_string(), "/m:foo/bar/other:baz");
    }

    #[test]
    fn pos_predicates_extend_the_last_segment() {
        let id = parse("/m:leaf-list").with_pos_predicate(3);
        assert_eq!(id.to_string(), "/m:leaf-list[3]");
    }

    #[test]
    fn match_modification_injects_keys() {
        let id = parse("/m:list[key='a'][other='b'][.='c']");
        let selector = id.selector().unwrap();
        let entry = selector.modify_match(Value::Object(Object::new()));
        let obj = entry.as_object();
        assert_eq!(obj.at("key"), Some(&Value::from("a")));
        assert_eq!(obj.at("other"), Some(&Value::from("b")));
        assert_eq!(obj.len(), 2);
    }

    #[test]
    fn selector_identities() {
        let root = Value::Object(object! {
            "m:list" => array![
                object! { "key" => "a", "value" => "b" },
                object! { "key" => "c", "value" => "d" },
            ],
            "m:leaf-list" => array!["quux", "foo"],
            "m:container" => object! { "leaf" => "x" },
        });
        let cases: &[(&str, Option<Identity>)] = &[
            ("/m:list[key='a']", Some(Identity::Index(0))),
            ("/m:list[key='c']", Some(Identity::Index(1))),
            ("/m:list[key='nope']", None),
            ("/m:list[0]", Some(Identity::Index(0))),
            ("/m:list[2]", None),
            ("/m:leaf-list[.='foo']", Some(Identity::Index(1))),
            ("/m:leaf-list[.='bar']", None),
            ("/m:container/leaf", Some(Identity::Key("m:leaf".into()))),
            ("/m:container/nope", None),
            ("/m:container", Some(Identity::Key("m:container".into()))),
        ];
        for (path, expected) in cases {
            let id = parse(path);
            let parent = id.parent().match_against(&root);
            let got = id.selector().unwrap().compute_identifier(&parent);
            assert_eq!(&got, expected, "path {path}");
        }
    }

    #[test]
    fn default_identity_appends_to_lists() {
        let root = Value::Object(object! {
            "m:list" => array![object! { "key" => "a" }],
        });
        let id = parse("/m:list[key='missing']");
        let parent = id.parent().match_against(&root);
        let got = id.selector().unwrap().compute_identifier_default(&parent);
        assert_eq!(got, Identity::Index(1));
    }
}
