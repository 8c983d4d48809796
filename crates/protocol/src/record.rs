//! Dynamic record model
//!
//! The embedding agent hands the plugin untyped mappings: keys and values
//! whose concrete types vary by source (journald fields arrive as byte
//! sequences, enrichment metadata as nested maps). `Value` is the tagged
//! variant for one such entry; `Record` is the top-level mapping, kept as
//! an ordered pair list so it preserves whatever iteration order the
//! producer exposes.
//!
//! Accessors are total. A value of the wrong variant for a recognized key
//! reads as absent, which is what lets the converter skip malformed fields
//! without surfacing an error.

/// A dynamically typed value inside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw byte sequence (the common case for agent-decoded fields)
    Bytes(Vec<u8>),

    /// UTF-8 string
    Str(String),

    /// Nested mapping of the same dynamic shape, in producer order
    Map(Vec<(Value, Value)>),

    /// A value type the plugin does not understand
    Other,
}

/// A top-level record: an ordered list of key/value entries.
pub type Record = Vec<(Value, Value)>;

impl Value {
    /// Read this value as a map key.
    ///
    /// Keys are strings; byte-sequence keys count when they hold valid
    /// UTF-8. Anything else is not a key.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Read this value as a byte sequence.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Str(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Read this value as text, replacing invalid UTF-8.
    pub fn as_text(&self) -> Option<String> {
        self.as_bytes()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Read this value as a nested mapping.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(entries: Vec<(Value, Value)>) -> Self {
        Value::Map(entries)
    }
}
