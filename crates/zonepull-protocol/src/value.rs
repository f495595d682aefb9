//! The generic value model exchanged with the wire format.

use std::collections::BTreeMap;

/// A generic nested value: absent, a text scalar, an ordered sequence
/// or a key-ordered map.
///
/// Scalars travel as text on the wire, so numeric arguments are stored
/// as their decimal rendering (see [`Value::int`]) and coerced back
/// with [`Value::as_int`]. Map entries iterate in key order; inserting
/// an existing key overwrites the earlier entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Absent / null.
    #[default]
    Null,
    /// A text scalar.
    Text(String),
    /// An ordered sequence; order is significant.
    List(Vec<Value>),
    /// A key-ordered map with unique keys.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Creates a text scalar.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a text scalar holding the decimal rendering of `n`.
    pub fn int(n: i64) -> Self {
        Self::Text(n.to_string())
    }

    /// Creates a sequence from the given items.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Creates an empty map.
    pub fn map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text scalar, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Coerces a text scalar to an integer.
    pub fn as_int(&self) -> Option<i64> {
        self.as_text().and_then(|text| text.trim().parse().ok())
    }

    /// Coerces a text scalar to a boolean; `""`, `"0"` and `"false"`
    /// read as false, any other text as true.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_text()
            .map(|text| !matches!(text.trim(), "" | "0" | "false"))
    }

    /// Returns the sequence items, if this is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the map entries, if this is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a map entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    /// Inserts a map entry, overwriting an existing key. A non-map
    /// value is replaced by a fresh map holding just this entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if let Self::Map(entries) = self {
            entries.insert(key.into(), value.into());
        } else {
            let mut entries = BTreeMap::new();
            entries.insert(key.into(), value.into());
            *self = Self::Map(entries);
        }
    }

    /// Builder form of [`Value::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Text(n.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}
