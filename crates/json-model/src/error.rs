//! Error taxonomy shared by accessors, decoders and `validate()`.
//!
//! Every error carries a [`FieldPath`] relative to the value the failing
//! operation was called on. Nested failures are re-rooted with
//! [`ModelError::within`] / [`ModelError::within_index`] as they propagate
//! outward, so a missing name on the second element of a `counters` list
//! reports `/counters/1/name`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a failure inside a structured value.
///
/// Displays as an RFC 6901 JSON Pointer; the empty path is the value itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(key.into())],
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, "/{}", escape_component(key))?,
                PathSegment::Index(index) => write!(f, "/{index}")?,
            }
        }
        Ok(())
    }
}

/// Flat classification of a [`ModelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Absent,
    NullNotAllowed,
    Decode,
    UnrecognizedEnumValue,
    NoMatchingVariant,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A required field is missing from the store.
    #[error("required field is absent: {path}")]
    Absent { path: FieldPath },

    /// `null` where the declared type is non-nullable.
    #[error("null is not allowed: {path}")]
    NullNotAllowed { path: FieldPath },

    /// The stored value has the wrong runtime shape.
    #[error("expected {expected}, found {found}: {path}")]
    Decode {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    /// Raised by `validate()` only.
    #[error("unrecognized enum value {value}: {path}")]
    UnrecognizedEnumValue { path: FieldPath, value: Value },

    /// Raised by `validate()` and `matched()` only.
    #[error("no variant of {union} matched: {path}")]
    NoMatchingVariant { path: FieldPath, union: &'static str },
}

impl ModelError {
    pub fn decode(expected: &'static str, found: &Value) -> Self {
        Self::Decode {
            path: FieldPath::root(),
            expected,
            found: kind_of(found),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Absent { .. } => ErrorKind::Absent,
            Self::NullNotAllowed { .. } => ErrorKind::NullNotAllowed,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::UnrecognizedEnumValue { .. } => ErrorKind::UnrecognizedEnumValue,
            Self::NoMatchingVariant { .. } => ErrorKind::NoMatchingVariant,
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Absent { path }
            | Self::NullNotAllowed { path }
            | Self::Decode { path, .. }
            | Self::UnrecognizedEnumValue { path, .. }
            | Self::NoMatchingVariant { path, .. } => path,
        }
    }

    fn path_mut(&mut self) -> &mut FieldPath {
        match self {
            Self::Absent { path }
            | Self::NullNotAllowed { path }
            | Self::Decode { path, .. }
            | Self::UnrecognizedEnumValue { path, .. }
            | Self::NoMatchingVariant { path, .. } => path,
        }
    }

    /// Re-roots the error one object key further out.
    pub fn within(mut self, key: &str) -> Self {
        self.path_mut().prepend(PathSegment::Key(key.to_string()));
        self
    }

    /// Re-roots the error one array index further out.
    pub fn within_index(mut self, index: usize) -> Self {
        self.path_mut().prepend(PathSegment::Index(index));
        self
    }
}

/// Short name of a raw value's runtime shape, used in `Decode` errors.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Failure of the JSON text helpers in [`crate::json`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}
