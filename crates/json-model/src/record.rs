//! Typed records: a declared field table over one [`FieldStore`].

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::field::FieldValue;
use crate::options::CodecOptions;
use crate::store::FieldStore;

/// The boundary every model type exposes to callers.
///
/// Decoding never validates; `validate` is the only strict check and is
/// always explicit.
pub trait Model: Clone + PartialEq + Eq + fmt::Debug + Sized {
    fn from_raw_unchecked_with(raw: Value, options: &CodecOptions) -> Result<Self, ModelError>;

    fn from_raw_unchecked(raw: Value) -> Result<Self, ModelError> {
        Self::from_raw_unchecked_with(raw, &CodecOptions::default())
    }

    /// Never fails, whatever unknown or extra content the value carries.
    fn to_raw(&self) -> Value;

    /// Recursive, fail-fast check of required fields and open-typed values.
    fn validate(&self) -> Result<(), ModelError>;
}

/// Whether a field must be present and whether it may hold `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Required,
    RequiredNullable,
    /// Writing `None` removes the key: `null` is never emitted.
    Optional,
    /// Writing `None` stores an explicit `null`.
    OptionalNullable,
}

impl Presence {
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required | Self::RequiredNullable)
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, Self::RequiredNullable | Self::OptionalNullable)
    }
}

type FieldCheck = fn(&FieldStore, &FieldDescriptor) -> Result<(), ModelError>;

/// One row of a record's field table.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub presence: Presence,
    check: FieldCheck,
}

impl FieldDescriptor {
    pub const fn new<T: FieldValue>(name: &'static str, presence: Presence) -> Self {
        Self {
            name,
            presence,
            check: check_field::<T>,
        }
    }

    /// Runs the typed accessor for this field and validates what it returns.
    pub fn check(&self, store: &FieldStore) -> Result<(), ModelError> {
        (self.check)(store, self)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("presence", &self.presence)
            .finish()
    }
}

fn check_field<T: FieldValue>(store: &FieldStore, field: &FieldDescriptor) -> Result<(), ModelError> {
    let presence = field.presence;
    let value = if !presence.is_required() {
        store.get_optional::<T>(field.name)?
    } else if presence.is_nullable() {
        store.get_nullable::<T>(field.name)?
    } else {
        Some(store.get::<T>(field.name)?)
    };
    match value {
        Some(value) => value.validate_value().map_err(|e| e.within(field.name)),
        None => Ok(()),
    }
}

/// A record type backed by exactly one [`FieldStore`].
///
/// Usually implemented through [`record!`](crate::record!).
pub trait Record: Sized {
    const NAME: &'static str;
    const FIELDS: &'static [FieldDescriptor];

    fn store(&self) -> &FieldStore;

    fn store_mut(&mut self) -> &mut FieldStore;

    fn from_store(store: FieldStore) -> Self;

    fn is_declared(key: &str) -> bool {
        Self::FIELDS.iter().any(|f| f.name == key)
    }

    /// Validates fields in declaration order, stopping at the first failure.
    fn validate_fields(&self) -> Result<(), ModelError> {
        let store = self.store();
        for field in Self::FIELDS {
            field.check(store)?;
        }
        Ok(())
    }

    /// Keys present in the document that this type does not declare.
    fn additional_properties(&self) -> Map<String, Value> {
        self.store()
            .iter()
            .filter(|(key, _)| !Self::is_declared(key))
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.store().contains_key(key)
    }
}

/// Shared decode path for records: adopts the object without validating.
pub fn decode_record<R: Record>(raw: Value, options: &CodecOptions) -> Result<R, ModelError> {
    FieldStore::from_raw(raw, *options).map(R::from_store)
}

/// Writes a required, non-nullable field.
///
/// A value that encodes to `null` (a non-finite float without named
/// literals) is still stored, so the getter reports `NullNotAllowed`; a
/// warning is logged at the write.
pub fn set_required<T: FieldValue>(store: &mut FieldStore, key: &str, value: &T) {
    let raw = value.encode(store.options());
    if raw.is_null() {
        tracing::warn!(field = key, "value encodes to null in a non-nullable field");
    }
    store.set_raw(key, raw);
}

/// Writes an optional, non-nullable field: `None` drops the key, and so
/// does a value that encodes to `null`.
pub fn set_optional<T: FieldValue>(store: &mut FieldStore, key: &str, value: Option<&T>) {
    let raw = value.map(|v| v.encode(store.options()));
    match raw {
        Some(raw) if !raw.is_null() => store.set_raw(key, raw),
        _ => {
            store.remove(key);
        }
    }
}

/// Writes a nullable field: `None` stores an explicit `null`.
pub fn set_nullable<T: FieldValue>(store: &mut FieldStore, key: &str, value: Option<&T>) {
    match value {
        Some(value) => store.set(key, value),
        None => store.set_null(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Sample {
        store: FieldStore,
    }

    impl Record for Sample {
        const NAME: &'static str = "Sample";
        const FIELDS: &'static [FieldDescriptor] = &[
            FieldDescriptor::new::<String>("name", Presence::Required),
            FieldDescriptor::new::<i64>("count", Presence::OptionalNullable),
            FieldDescriptor::new::<Vec<i64>>("sizes", Presence::Optional),
        ];

        fn store(&self) -> &FieldStore {
            &self.store
        }

        fn store_mut(&mut self) -> &mut FieldStore {
            &mut self.store
        }

        fn from_store(store: FieldStore) -> Self {
            Self { store }
        }
    }

    fn sample(raw: Value) -> Sample {
        decode_record(raw, &CodecOptions::default()).unwrap()
    }

    #[test]
    fn presence_flags() {
        assert!(Presence::Required.is_required());
        assert!(!Presence::Required.is_nullable());
        assert!(Presence::RequiredNullable.is_nullable());
        assert!(!Presence::Optional.is_required());
        assert!(Presence::OptionalNullable.is_nullable());
    }

    #[test]
    fn validate_walks_fields_in_declaration_order() {
        // Both `name` and `count` are bad; `name` is declared first.
        let s = sample(json!({"count": "x"}));
        let err = s.validate_fields().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Absent);
        assert_eq!(err.path().to_string(), "/name");
    }

    #[test]
    fn validate_skips_unset_optionals_and_checks_set_ones() {
        assert!(sample(json!({"name": "a"})).validate_fields().is_ok());
        assert!(sample(json!({"name": "a", "count": null})).validate_fields().is_ok());
        let err = sample(json!({"name": "a", "sizes": [1, "2"]}))
            .validate_fields()
            .unwrap_err();
        assert_eq!(err.path().to_string(), "/sizes/1");
    }

    #[test]
    fn additional_properties_keep_document_order() {
        let s = sample(json!({"z": 1, "name": "a", "b": 2}));
        let extra = s.additional_properties();
        let keys: Vec<&str> = extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "b"]);
        assert!(Sample::is_declared("count"));
        assert!(!Sample::is_declared("z"));
    }

    #[test]
    fn optional_and_nullable_setters_differ_on_none() {
        let mut s = sample(json!({"name": "a", "count": 1, "sizes": [1]}));
        set_optional::<Vec<i64>>(s.store_mut(), "sizes", None);
        set_nullable::<i64>(s.store_mut(), "count", None);
        assert!(!s.contains_key("sizes"));
        assert!(s.contains_key("count"));
        assert_eq!(s.store().get_raw("count"), Some(&Value::Null));
    }

    #[test]
    fn validate_follows_presence_of_each_field() {
        // `count` is optional: null and absent both pass.
        assert!(sample(json!({"name": "a", "count": null})).validate_fields().is_ok());
        // `name` is required and non-nullable.
        let err = sample(json!({"name": null})).validate_fields().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NullNotAllowed);
        // `sizes` is optional, so a null there is not reported.
        assert!(sample(json!({"name": "a", "sizes": null})).validate_fields().is_ok());
    }

    #[test]
    fn non_finite_float_writes() {
        let mut store = FieldStore::default();
        set_required(&mut store, "value", &f64::NAN);
        assert_eq!(store.get_raw("value"), Some(&Value::Null));
        assert_eq!(
            store.get::<f64>("value").unwrap_err().kind(),
            ErrorKind::NullNotAllowed
        );

        store.set("ratio", &1.5f64);
        set_optional(&mut store, "ratio", Some(&f64::INFINITY));
        assert!(!store.contains_key("ratio"));

        let mut lenient = FieldStore::new(CodecOptions::lenient());
        set_required(&mut lenient, "value", &f64::NAN);
        assert_eq!(lenient.get_raw("value"), Some(&json!("NaN")));
        assert!(lenient.get::<f64>("value").unwrap().is_nan());
    }

    #[test]
    fn descriptor_debug_omits_function_pointer() {
        let text = format!("{:?}", Sample::FIELDS[0]);
        assert_eq!(text, r#"FieldDescriptor { name: "name", presence: Required }"#);
    }
}
