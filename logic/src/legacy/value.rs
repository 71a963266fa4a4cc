use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter, Write};

/// Value produced by evaluating a legacy definition file.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<LegacyValue>),
    Tuple(Vec<LegacyValue>),
    Dict(Dict),
}

impl LegacyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            LegacyValue::None => "NoneType",
            LegacyValue::Bool(_) => "bool",
            LegacyValue::Int(_) => "int",
            LegacyValue::Float(_) => "float",
            LegacyValue::Str(_) => "str",
            LegacyValue::List(_) => "list",
            LegacyValue::Tuple(_) => "tuple",
            LegacyValue::Dict(_) => "dict",
        }
    }

    pub fn is_hashable(&self) -> bool {
        match self {
            LegacyValue::List(_) | LegacyValue::Dict(_) => false,
            LegacyValue::Tuple(items) => items.iter().all(LegacyValue::is_hashable),
            _ => true,
        }
    }

    /// Key equality as used by dicts: `1`, `1.0` and `True` all address the same entry.
    pub fn same_key(&self, other: &LegacyValue) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(left), Some(right)) => left.same_value(right),
            _ => match (self, other) {
                (LegacyValue::Tuple(left), LegacyValue::Tuple(right)) => {
                    left.len() == right.len()
                        && left.iter().zip(right).all(|(left, right)| left.same_key(right))
                }
                _ => self == other,
            },
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            LegacyValue::Bool(value) => Some(Number::Int(i64::from(*value))),
            LegacyValue::Int(value) => Some(Number::Int(*value)),
            LegacyValue::Float(value) => Some(Number::Float(*value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Exact comparison; an int equals a float only if the float is that integer.
    fn same_value(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(left), Number::Int(right)) => left == right,
            (Number::Float(left), Number::Float(right)) => left == right,
            (Number::Int(int), Number::Float(float)) | (Number::Float(float), Number::Int(int)) => {
                float.fract() == 0.0
                    && float >= i64::MIN as f64
                    && float < -(i64::MIN as f64)
                    && float as i64 == int
            }
        }
    }
}

fn write_str_repr(f: &mut Formatter<'_>, value: &str) -> std::fmt::Result {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };
    f.write_char(quote)?;
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if c.is_control() => match u32::from(c) {
                code @ 0..=0xff => write!(f, "\\x{code:02x}")?,
                code => write!(f, "\\u{code:04x}")?,
            },
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// Python-style representation, used in diagnostics.
impl Display for LegacyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn write_items(f: &mut Formatter<'_>, items: &[LegacyValue]) -> std::fmt::Result {
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }
        match self {
            LegacyValue::None => f.write_str("None"),
            LegacyValue::Bool(true) => f.write_str("True"),
            LegacyValue::Bool(false) => f.write_str("False"),
            LegacyValue::Int(value) => write!(f, "{value}"),
            LegacyValue::Float(value) => write!(f, "{value:?}"),
            LegacyValue::Str(value) => write_str_repr(f, value),
            LegacyValue::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            LegacyValue::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            LegacyValue::Dict(dict) => {
                f.write_str("{")?;
                for (index, (key, value)) in dict.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for LegacyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LegacyValue::None => serializer.serialize_unit(),
            LegacyValue::Bool(value) => serializer.serialize_bool(*value),
            LegacyValue::Int(value) => serializer.serialize_i64(*value),
            LegacyValue::Float(value) => serializer.serialize_f64(*value),
            LegacyValue::Str(value) => serializer.serialize_str(value),
            // tuples are written as plain sequences
            LegacyValue::List(items) | LegacyValue::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            LegacyValue::Dict(dict) => dict.serialize(serializer),
        }
    }
}

/// Insertion-ordered dict with hashable keys. Re-inserting an existing key
/// replaces the value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict<V = LegacyValue> {
    entries: Vec<(LegacyValue, V)>,
}

impl<V> Default for Dict<V> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<V> Dict<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: LegacyValue, value: V) {
        match self.entries.iter_mut().find(|(existing, _)| existing.same_key(&key)) {
            Some((_, existing_value)) => *existing_value = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &LegacyValue) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.same_key(key))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LegacyValue, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

impl<V> FromIterator<(LegacyValue, V)> for Dict<V> {
    fn from_iter<T: IntoIterator<Item = (LegacyValue, V)>>(iter: T) -> Self {
        let mut dict = Dict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

impl<V> IntoIterator for Dict<V> {
    type Item = (LegacyValue, V);
    type IntoIter = std::vec::IntoIter<(LegacyValue, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Dict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// The `vars` mapping: environment variable names to values, in definition order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnvironmentMapping {
    entries: Vec<(String, LegacyValue)>,
}

impl EnvironmentMapping {
    /// Converts a dict, returning the first key that is not a string as the error.
    pub fn try_from_dict(dict: Dict) -> Result<Self, LegacyValue> {
        let mut entries = Vec::with_capacity(dict.len());
        for (key, value) in dict {
            match key {
                LegacyValue::Str(key) => entries.push((key, value)),
                other => return Err(other),
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LegacyValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LegacyValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for EnvironmentMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
