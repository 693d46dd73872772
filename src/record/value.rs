//! Record Values
//!
//! The dynamically-typed payload carried by every record. Each entry is a
//! tagged [`Value`]; typed reads check the tag and fall back to the caller's
//! default on a mismatch instead of failing.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

// == Value ==
/// One entry of a record's payload.
///
/// Serialized as `{"type": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Raw bytes, URL-safe base64 on the wire
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    /// Arbitrary structured data
    Json(serde_json::Value),
}

impl Value {
    /// Name of the variant, as written in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        URL_SAFE_NO_PAD.decode(text.as_bytes()).map_err(D::Error::custom)
    }
}

// == Values ==
/// Key-value payload of a record.
///
/// Mutations only touch memory; the owning store's `save` persists them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(HashMap<String, Value>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    // == Store ==
    /// Stores any [`Value`], replacing what was under `key`.
    pub fn store(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn store_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.store(key, Value::Text(value.into()));
    }

    pub fn store_int(&mut self, key: impl Into<String>, value: i64) {
        self.store(key, Value::Int(value));
    }

    pub fn store_float(&mut self, key: impl Into<String>, value: f64) {
        self.store(key, Value::Float(value));
    }

    pub fn store_bool(&mut self, key: impl Into<String>, value: bool) {
        self.store(key, Value::Bool(value));
    }

    pub fn store_bytes(&mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.store(key, Value::Bytes(value.into()));
    }

    /// Stores any serializable value as embedded JSON.
    pub fn store_any<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<()> {
        let json = serde_json::to_value(value)?;
        self.store(key, Value::Json(json));
        Ok(())
    }

    // == Typed reads ==
    // `None` means the key is missing or holds another kind of value.

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(Value::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(Value::Float(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn bytes(&self, key: &str) -> Option<&[u8]> {
        match self.0.get(key) {
            Some(Value::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    // == Reads with defaults ==

    pub fn get_text(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or(default).to_string()
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.int(key).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.float(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn get_bytes(&self, key: &str, default: &[u8]) -> Vec<u8> {
        self.bytes(key).unwrap_or(default).to_vec()
    }

    /// Decodes an entry stored with [`Values::store_any`].
    ///
    /// Returns `None` when the key is missing, is not JSON, or does not fit `T`.
    pub fn get_any<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.0.get(key) {
            Some(Value::Json(json)) => serde_json::from_value(json.clone()).ok(),
            _ => None,
        }
    }

    // == Housekeeping ==

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
