//! Open enums: string enumerations that keep values this build does not know.

use std::fmt;

use serde_json::Value;

use crate::error::{FieldPath, ModelError};
use crate::field::FieldValue;
use crate::options::CodecOptions;
use crate::record::Model;

/// A closed Rust enum with a fixed wire-string table.
///
/// Usually implemented through [`wire_enum!`](crate::wire_enum!).
pub trait WireEnum: Copy + Eq + fmt::Debug + 'static {
    const NAME: &'static str;
    const VARIANTS: &'static [(&'static str, Self)];

    fn as_wire_str(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, v)| *v == self)
            .map(|(s, _)| *s)
            .unwrap_or_default()
    }

    fn lookup(s: &str, case_insensitive: bool) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(wire, _)| {
                if case_insensitive {
                    wire.eq_ignore_ascii_case(s)
                } else {
                    *wire == s
                }
            })
            .map(|(_, v)| *v)
    }
}

/// A raw scalar plus the known variant it matched, if any.
///
/// Encoding always re-emits the original scalar, never a value re-derived
/// from the known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenEnum<T: WireEnum> {
    raw: Value,
    known: Option<T>,
}

impl<T: WireEnum> OpenEnum<T> {
    pub fn from_known(known: T) -> Self {
        Self {
            raw: Value::String(known.as_wire_str().to_string()),
            known: Some(known),
        }
    }

    pub fn from_raw(raw: Value) -> Self {
        Self::from_raw_with(raw, &CodecOptions::default())
    }

    /// Never fails; an unrecognized value is kept unmatched.
    pub fn from_raw_with(raw: Value, options: &CodecOptions) -> Self {
        let known = match &raw {
            Value::String(s) => T::lookup(s, options.case_insensitive_enums),
            _ => None,
        };
        if known.is_none() {
            tracing::debug!(enum_type = T::NAME, value = %raw, "unrecognized enum value kept raw");
        }
        Self { raw, known }
    }

    pub fn try_get_known(&self) -> Option<T> {
        self.known
    }

    pub fn is_known(&self) -> bool {
        self.known.is_some()
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The raw scalar as a string, when it is one.
    pub fn as_str(&self) -> Option<&str> {
        self.raw.as_str()
    }

    pub fn to_raw(&self) -> Value {
        self.raw.clone()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.known.is_some() {
            return Ok(());
        }
        Err(ModelError::UnrecognizedEnumValue {
            path: FieldPath::root(),
            value: self.raw.clone(),
        })
    }
}

impl<T: WireEnum> From<T> for OpenEnum<T> {
    fn from(known: T) -> Self {
        Self::from_known(known)
    }
}

impl<T: WireEnum> PartialEq<T> for OpenEnum<T> {
    fn eq(&self, other: &T) -> bool {
        self.known == Some(*other)
    }
}

impl<T: WireEnum> fmt::Display for OpenEnum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl<T: WireEnum> Model for OpenEnum<T> {
    fn from_raw_unchecked_with(raw: Value, options: &CodecOptions) -> Result<Self, ModelError> {
        Ok(Self::from_raw_with(raw, options))
    }

    fn to_raw(&self) -> Value {
        OpenEnum::to_raw(self)
    }

    fn validate(&self) -> Result<(), ModelError> {
        OpenEnum::validate(self)
    }
}

impl<T: WireEnum> FieldValue for OpenEnum<T> {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        Ok(Self::from_raw_with(raw.clone(), options))
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        self.raw.clone()
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    crate::wire_enum! {
        enum Status {
            Active = "active",
            Archived = "archived",
        }
    }

    #[test]
    fn from_known_is_matched_with_canonical_string() {
        let e = OpenEnum::from_known(Status::Archived);
        assert!(e.is_known());
        assert_eq!(e.to_raw(), json!("archived"));
        assert!(e.validate().is_ok());
        assert_eq!(e, Status::Archived);
    }

    #[test]
    fn unknown_value_decodes_and_fails_validation() {
        let e: OpenEnum<Status> = OpenEnum::from_raw(json!("some_future_value"));
        assert_eq!(e.try_get_known(), None);
        assert_eq!(e.to_raw(), json!("some_future_value"));
        let err = e.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedEnumValue);
        assert_eq!(
            err,
            ModelError::UnrecognizedEnumValue {
                path: FieldPath::root(),
                value: json!("some_future_value"),
            }
        );
    }

    #[test]
    fn non_string_scalars_are_unmatched() {
        let e: OpenEnum<Status> = OpenEnum::from_raw(json!(1));
        assert!(!e.is_known());
        assert_eq!(e.to_string(), "1");
    }

    #[test]
    fn case_insensitive_lookup_keeps_original_spelling() {
        let opts = CodecOptions::new().case_insensitive_enums(true);
        let e: OpenEnum<Status> = OpenEnum::from_raw_with(json!("ACTIVE"), &opts);
        assert_eq!(e.try_get_known(), Some(Status::Active));
        assert_eq!(e.to_raw(), json!("ACTIVE"));
        let strict: OpenEnum<Status> = OpenEnum::from_raw(json!("ACTIVE"));
        assert!(!strict.is_known());
    }

    #[test]
    fn wire_table_round_trips() {
        assert_eq!(Status::Active.as_wire_str(), "active");
        assert_eq!(Status::lookup("archived", false), Some(Status::Archived));
        assert_eq!(Status::lookup("gone", false), None);
        assert_eq!(Status::Active.to_string(), "active");
    }
}
