//! Dynamic value tree for persisted game data
//!
//! Serializes untagged so the tree maps one-to-one onto the JSON document.

use crate::error::{Error, Result};
use crate::path::Path;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamic value that can represent any node of a save document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// No value / null
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (for counts, days, indices)
    Int(i64),
    /// Floating point value (for money, fame, prices)
    Float(f64),
    /// String value
    String(String),
    /// Sequence of values
    List(Vec<Value>),
    /// Map of string keys to values
    Map(ValueMap),
}

/// A map of string keys to dynamic values
///
/// Uses IndexMap to preserve insertion order (keeps the saved document stable)
pub type ValueMap = IndexMap<String, Value>;

impl Value {
    /// Create an empty map value
    pub fn map() -> Self {
        Value::Map(ValueMap::new())
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get this value as a map
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get this value as a mutable map
    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Resolve a dotted path against this value.
    ///
    /// Returns `None` as soon as a segment is absent. A stored `Null` comes
    /// back as `Some(&Value::Null)`, so callers can tell the two apart.
    pub fn get_path(&self, path: &Path) -> Option<&Value> {
        let mut node = self;
        for segment in path.segments() {
            node = match node {
                Value::Map(map) => map.get(segment.as_str())?,
                Value::List(list) => list.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Assign `value` at a dotted path, creating missing intermediate maps.
    ///
    /// Null intermediates are replaced by empty maps. Descending into a
    /// scalar or past the end of a list is an error.
    pub fn set_path(&mut self, path: &Path, value: Value) -> Result<()> {
        let (last, parents) = path
            .segments()
            .split_last()
            .ok_or_else(|| Error::invalid_path(path.to_string(), "empty path"))?;

        let mut node = self;
        for segment in parents {
            node = node.child_mut(segment, path)?;
        }
        node.assign(last, value, path)
    }

    fn child_mut(&mut self, segment: &str, path: &Path) -> Result<&mut Value> {
        if self.is_null() {
            *self = Value::map();
        }
        match self {
            Value::Map(map) => Ok(map
                .entry(segment.to_string())
                .or_insert_with(Value::map)),
            Value::List(list) => {
                let len = list.len();
                let index = parse_index(segment, path)?;
                list.get_mut(index).ok_or_else(|| {
                    Error::invalid_path(
                        path.to_string(),
                        format!("index {} out of bounds for list of length {}", index, len),
                    )
                })
            }
            other => Err(Error::invalid_path(
                path.to_string(),
                format!("cannot descend into {} at '{}'", other.type_name(), segment),
            )),
        }
    }

    fn assign(&mut self, segment: &str, value: Value, path: &Path) -> Result<()> {
        if self.is_null() {
            *self = Value::map();
        }
        match self {
            Value::Map(map) => {
                map.insert(segment.to_string(), value);
                Ok(())
            }
            Value::List(list) => {
                let index = parse_index(segment, path)?;
                if index < list.len() {
                    list[index] = value;
                } else if index == list.len() {
                    list.push(value);
                } else {
                    return Err(Error::invalid_path(
                        path.to_string(),
                        format!("index {} leaves a gap in list of length {}", index, list.len()),
                    ));
                }
                Ok(())
            }
            other => Err(Error::invalid_path(
                path.to_string(),
                format!("cannot assign '{}' inside {}", segment, other.type_name()),
            )),
        }
    }

    /// Convert any serializable type into a value tree
    pub fn from_typed<T: Serialize>(typed: &T) -> Result<Self> {
        let json = serde_json::to_value(typed).map_err(|e| Error::Conversion(e.to_string()))?;
        serde_json::from_value(json).map_err(|e| Error::Conversion(e.to_string()))
    }

    /// Convert this value tree into a typed structure
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        let json = serde_json::to_value(self).map_err(|e| Error::Conversion(e.to_string()))?;
        serde_json::from_value(json).map_err(|e| Error::Conversion(e.to_string()))
    }
}

fn parse_index(segment: &str, path: &Path) -> Result<usize> {
    segment.parse::<usize>().map_err(|_| {
        Error::invalid_path(
            path.to_string(),
            format!("'{}' is not a list index", segment),
        )
    })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vec: Vec<T>) -> Self {
        Value::List(vec.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        serde_json::from_str(
            r#"{"saves": {"1": {"day": 3, "inventory": {"flour": 2}}}, "tags": ["a", "b"], "gone": null}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_value_types() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(42).as_int(), Some(42));
        assert_eq!(Value::Float(3.5).as_float(), Some(3.5));
        assert_eq!(Value::Int(42).as_float(), Some(42.0));
        assert_eq!(Value::String("hello".into()).as_str(), Some("hello"));
    }

    #[test]
    fn test_untagged_json_shape() {
        let value = doc();
        assert_eq!(value.type_name(), "map");
        assert_eq!(
            serde_json::to_string(&Value::from(vec![1i64, 2])).unwrap(),
            "[1,2]"
        );
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    }

    #[test]
    fn test_get_path_resolves_maps_and_lists() {
        let value = doc();
        assert_eq!(
            value.get_path(&Path::parse("saves.1.inventory.flour")),
            Some(&Value::Int(2))
        );
        assert_eq!(
            value.get_path(&Path::parse("tags.1")),
            Some(&Value::String("b".into()))
        );
    }

    #[test]
    fn test_get_path_missing_is_distinct_from_null() {
        let value = doc();
        assert_eq!(value.get_path(&Path::parse("gone")), Some(&Value::Null));
        assert_eq!(value.get_path(&Path::parse("saves.2.day")), None);
        assert_eq!(value.get_path(&Path::parse("saves.1.day.deeper")), None);
        assert_eq!(value.get_path(&Path::parse("tags.9")), None);
        assert_eq!(value.get_path(&Path::parse("tags.x")), None);
    }

    #[test]
    fn test_set_path_creates_intermediate_maps() {
        let mut value = Value::map();
        let path = Path::parse("a.b.c.d");
        value.set_path(&path, Value::from(7i64)).unwrap();
        assert_eq!(value.get_path(&path), Some(&Value::Int(7)));
        assert!(value.get_path(&Path::parse("a.b")).unwrap().as_map().is_some());
    }

    #[test]
    fn test_set_path_replaces_null_intermediate() {
        let mut value = doc();
        let path = Path::parse("gone.now.here");
        value.set_path(&path, true.into()).unwrap();
        assert_eq!(value.get_path(&path), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_set_path_into_lists() {
        let mut value = doc();
        value.set_path(&Path::parse("tags.0"), "z".into()).unwrap();
        value.set_path(&Path::parse("tags.2"), "c".into()).unwrap();
        assert_eq!(
            value.get_path(&Path::parse("tags")).and_then(Value::as_list).map(|l| l.len()),
            Some(3)
        );
        assert!(value.set_path(&Path::parse("tags.7"), "x".into()).is_err());
        assert!(value.set_path(&Path::parse("tags.x.y"), "x".into()).is_err());
    }

    #[test]
    fn test_set_path_through_scalar_fails() {
        let mut value = doc();
        let err = value
            .set_path(&Path::parse("saves.1.day.hour"), 1i64.into())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_typed_conversion() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Sample {
            day: u32,
            name: String,
        }

        let sample = Sample { day: 4, name: "bagel".into() };
        let value = Value::from_typed(&sample).unwrap();
        assert_eq!(value.get_path(&Path::parse("day")), Some(&Value::Int(4)));
        assert_eq!(value.to_typed::<Sample>().unwrap(), sample);
        assert!(Value::from("x").to_typed::<Sample>().is_err());
    }
}
