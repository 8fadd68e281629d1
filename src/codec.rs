//! Integration with the JSON codec.
//!
//! Marshaling threads the current module through nested serializers so member
//! keys can drop redundant prefixes. Unmarshaling goes through
//! [`serde::de::DeserializeSeed`] to thread the module context and the
//! per-document interners; the serde data model keeps bare and quoted scalars
//! distinct, which is what the schema-less numeric inference relies on.

use std::fmt;

use serde::de::{DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::array::Array;
use crate::error::Result;
use crate::intern::Interners;
use crate::object::Object;
use crate::tree::Tree;
use crate::value::Value;

impl Value {
    /// Encodes the value as RFC 7951 data: 32-bit integers, booleans, and
    /// null as bare tokens; 64-bit integers, floats, and strings quoted; the
    /// empty leaf as `[null]`.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a value from RFC 7951 data.
    ///
    /// Bare integers are 32-bit; a leading `-` selects the signed form.
    /// Quoted scalars are inferred: digit-led content containing `.` parses
    /// as a float, other digit-led content as a 64-bit integer, and anything
    /// else stays a string. The literal `[null]` collapses to the empty leaf.
    pub fn unmarshal(bytes: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

struct Rfc7951Value<'a> {
    value: &'a Value,
    module: &'a str,
}

impl Serialize for Rfc7951Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.value {
            Value::Null => serializer.serialize_unit(),
            Value::Empty => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(&())?;
                seq.end()
            }
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::I64(_) | Value::U64(_) | Value::F64(_) => {
                serializer.serialize_str(&self.value.rfc7951_string())
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::InstanceId(id) => serializer.collect_str(id),
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (key, value) in obj.iter() {
                    let (module, local) = obj.parse_key(key);
                    let written = if module == self.module { local } else { key };
                    map.serialize_entry(written, &Rfc7951Value { value, module })?;
                }
                map.end()
            }
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for value in arr.iter() {
                    seq.serialize_element(&Rfc7951Value {
                        value,
                        module: arr.module(),
                    })?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Rfc7951Value {
            value: self,
            module: "",
        }
        .serialize(serializer)
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

struct ValueSeed<'a> {
    module: &'a str,
    interners: &'a mut Interners,
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an RFC 7951 encoded value")
    }

    fn visit_bool<E: serde::de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        match u32::try_from(v) {
            Ok(v) => Ok(Value::U32(v)),
            Err(_) => Err(E::custom("bare integers wider than 32 bits must be quoted")),
        }
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        if v >= 0 {
            return self.visit_u64(v as u64);
        }
        match i32::try_from(v) {
            Ok(v) => Ok(Value::I32(v)),
            Err(_) => Err(E::custom("bare integers wider than 32 bits must be quoted")),
        }
    }

    fn visit_f64<E: serde::de::Error>(self, _: f64) -> std::result::Result<Value, E> {
        Err(E::custom("floating point numbers must be quoted"))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(scalar_from_quoted(v, self.interners))
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(value) = seq.next_element_seed(ValueSeed {
            module: self.module,
            interners: &mut *self.interners,
        })? {
            items.push(value);
        }
        if items.len() == 1 && items[0] == Value::Null {
            return Ok(Value::Empty);
        }
        let store = items
            .into_iter()
            .map(|v| self.interners.values.intern(v))
            .collect();
        Ok(Value::Array(Array::from_parts(
            self.module.to_string(),
            store,
        )))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut store = im::HashMap::new();
        while let Some(key) = map.next_key::<String>()? {
            let (module, local) = match key.split_once(':') {
                Some((module, local)) => (module.to_string(), local.to_string()),
                None => (self.module.to_string(), key),
            };
            let value = map.next_value_seed(ValueSeed {
                module: module.as_str(),
                interners: &mut *self.interners,
            })?;
            let qualified = if module.is_empty() {
                local
            } else {
                format!("{module}:{local}")
            };
            store.insert(qualified, value);
        }
        Ok(Value::Object(Object::from_parts(
            self.module.to_string(),
            store,
        )))
    }
}

fn scalar_from_quoted(content: &str, interners: &mut Interners) -> Value {
    let keep_string = |interners: &mut Interners| Value::String(interners.strings.intern(content));
    let mut chars = content.chars();
    let (body, negative) = match (chars.next(), chars.next()) {
        (Some('-'), Some(d)) if d.is_ascii_digit() => (content, true),
        (Some('+'), Some(d)) if d.is_ascii_digit() => (&content[1..], false),
        (Some(d), _) if d.is_ascii_digit() => (content, false),
        _ => return keep_string(interners),
    };
    if body.contains('.') {
        return match body.parse::<f64>() {
            Ok(v) => Value::F64(v),
            Err(_) => keep_string(interners),
        };
    }
    if negative {
        match body.parse::<i64>() {
            Ok(v) if v < 0 => Value::I64(v),
            Ok(v) => Value::U64(v as u64),
            Err(_) => keep_string(interners),
        }
    } else {
        match body.parse::<u64>() {
            Ok(v) => Value::U64(v),
            Err(_) => keep_string(interners),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Value, D::Error> {
        let mut interners = Interners::default();
        ValueSeed {
            module: "",
            interners: &mut interners,
        }
        .deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Tree, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(root) => Ok(Tree::from_object(root)),
            other => Err(serde::de::Error::custom(format!(
                "document root must be an object, not a {}",
                other.kind()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(obj) => obj.fmt(f),
            Value::Array(arr) => arr.fmt(f),
            other => {
                let s = serde_json::to_string(other).map_err(|_| fmt::Error)?;
                f.write_str(&s)
            }
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrapped = Value::Object(self.clone());
        let s = serde_json::to_string(&Rfc7951Value {
            value: &wrapped,
            module: self.module(),
        })
        .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrapped = Value::Array(self.clone());
        let s = serde_json::to_string(&Rfc7951Value {
            value: &wrapped,
            module: self.module(),
        })
        .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
