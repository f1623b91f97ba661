//! Ordered field storage owned by every record.

use serde_json::{Map, Value};

use crate::error::{FieldPath, ModelError};
use crate::field::FieldValue;
use crate::options::CodecOptions;

/// Ordered `name -> raw value` mapping backing one record.
///
/// Absence of a key and presence of an explicit `null` are different states
/// and are never conflated. Keys the owning record does not declare are kept
/// as-is and re-emitted on encode.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    fields: Map<String, Value>,
    options: CodecOptions,
}

impl PartialEq for FieldStore {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for FieldStore {}

impl FieldStore {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            fields: Map::new(),
            options,
        }
    }

    /// Adopts the pairs of a decoded object verbatim; nothing is validated.
    pub fn from_map(fields: Map<String, Value>, options: CodecOptions) -> Self {
        Self { fields, options }
    }

    /// Adopts a raw value, failing only if it is not an object.
    pub fn from_raw(raw: Value, options: CodecOptions) -> Result<Self, ModelError> {
        match raw {
            Value::Object(fields) => Ok(Self::from_map(fields, options)),
            other => Err(ModelError::decode("object", &other)),
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Required, non-nullable read.
    pub fn get<T: FieldValue>(&self, key: &str) -> Result<T, ModelError> {
        match self.fields.get(key) {
            None => Err(ModelError::Absent {
                path: FieldPath::key(key),
            }),
            Some(Value::Null) => Err(ModelError::NullNotAllowed {
                path: FieldPath::key(key),
            }),
            Some(raw) => T::decode(raw, &self.options).map_err(|e| e.within(key)),
        }
    }

    /// Required, nullable read: the key must exist, `null` reads as `None`.
    pub fn get_nullable<T: FieldValue>(&self, key: &str) -> Result<Option<T>, ModelError> {
        match self.fields.get(key) {
            None => Err(ModelError::Absent {
                path: FieldPath::key(key),
            }),
            Some(Value::Null) => Ok(None),
            Some(raw) => T::decode(raw, &self.options)
                .map(Some)
                .map_err(|e| e.within(key)),
        }
    }

    /// Optional read: absent and `null` both read as `None`.
    pub fn get_optional<T: FieldValue>(&self, key: &str) -> Result<Option<T>, ModelError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => T::decode(raw, &self.options)
                .map(Some)
                .map_err(|e| e.within(key)),
        }
    }

    /// Optional nullable read. Same result as [`get_optional`]; use
    /// [`contains_key`] to tell absent from explicit `null`.
    ///
    /// [`get_optional`]: FieldStore::get_optional
    /// [`contains_key`]: FieldStore::contains_key
    pub fn get_optional_nullable<T: FieldValue>(
        &self,
        key: &str,
    ) -> Result<Option<T>, ModelError> {
        self.get_optional(key)
    }

    /// Encodes and stores `value`. An existing key keeps its position;
    /// a new key is appended.
    pub fn set<T: FieldValue>(&mut self, key: &str, value: &T) {
        let raw = value.encode(&self.options);
        self.set_raw(key, raw);
    }

    pub fn set_raw(&mut self, key: &str, raw: Value) {
        if let Some(slot) = self.fields.get_mut(key) {
            *slot = raw;
        } else {
            self.fields.insert(key.to_string(), raw);
        }
    }

    /// Stores an explicit `null`, keeping the key present.
    pub fn set_null(&mut self, key: &str) {
        self.set_raw(key, Value::Null);
    }

    /// Removes a key, keeping the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn to_raw(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
