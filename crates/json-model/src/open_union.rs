//! Open unions: a raw value plus at most one variant chosen by trial decoding.
//!
//! Candidates are tried in declared order. A candidate is accepted only if it
//! decodes *and* validates; structurally compatible shapes are common when
//! alternatives share optional fields, so decoding alone would misclassify.
//! Errors from rejected candidates are swallowed. When nothing matches, the
//! union keeps the raw value only and `validate()` reports it. A variant
//! accepted by trial decoding is not validated a second time, so nested
//! unions validate in one pass over the document.

use std::fmt;

use serde_json::Value;

use crate::error::{FieldPath, ModelError};
use crate::field::FieldValue;
use crate::options::CodecOptions;
use crate::record::Model;

/// One entry of a union's ordered candidate list.
pub struct Candidate<V> {
    pub name: &'static str,
    pub decode: fn(&Value, &CodecOptions) -> Result<V, ModelError>,
}

impl<V> Clone for Candidate<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for Candidate<V> {}

impl<V> fmt::Debug for Candidate<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("name", &self.name).finish()
    }
}

/// The closed set of shapes an [`OpenUnion`] may resolve to.
///
/// Implemented by a plain Rust enum, usually through
/// [`union_variants!`](crate::union_variants!). Variants may refer back to
/// records containing the same union as long as they are boxed.
pub trait UnionVariants: Sized + Clone + fmt::Debug + 'static {
    const NAME: &'static str;
    const CANDIDATES: &'static [Candidate<Self>];

    fn to_raw(&self, options: &CodecOptions) -> Value;

    fn validate(&self) -> Result<(), ModelError>;

    fn variant_name(&self) -> &'static str;
}

/// Per-variant probe used by [`OpenUnion::try_pick`].
pub trait Pick<T> {
    fn pick(&self) -> Option<&T>;
}

/// Decodes and validates one candidate type; the building block of a
/// candidate table.
pub fn try_candidate<T: FieldValue>(raw: &Value, options: &CodecOptions) -> Result<T, ModelError> {
    let value = T::decode(raw, options)?;
    value.validate_value()?;
    Ok(value)
}

#[derive(Debug, Clone)]
pub struct OpenUnion<V: UnionVariants> {
    raw: Value,
    matched: Option<V>,
    // Set when `matched` already passed validation during trial decoding.
    validated: bool,
}

impl<V: UnionVariants> OpenUnion<V> {
    pub fn from_raw(raw: Value) -> Self {
        Self::from_raw_with(raw, &CodecOptions::default())
    }

    /// Never fails; falls back to raw-only when no candidate is accepted.
    pub fn from_raw_with(raw: Value, options: &CodecOptions) -> Self {
        for candidate in V::CANDIDATES {
            match (candidate.decode)(&raw, options) {
                Ok(variant) => {
                    return Self {
                        raw,
                        matched: Some(variant),
                        validated: true,
                    };
                }
                Err(error) => {
                    tracing::debug!(
                        union = V::NAME,
                        candidate = candidate.name,
                        %error,
                        "union candidate rejected"
                    );
                }
            }
        }
        tracing::debug!(union = V::NAME, "no union candidate matched, keeping raw value");
        Self {
            raw,
            matched: None,
            validated: false,
        }
    }

    /// Wraps an already known variant, skipping candidate trials.
    pub fn from_variant(variant: impl Into<V>) -> Self {
        Self::from_variant_with(variant, &CodecOptions::default())
    }

    /// Like [`from_variant`](Self::from_variant), encoding scalar variants
    /// under `options`. Record variants always re-emit their own store.
    pub fn from_variant_with(variant: impl Into<V>, options: &CodecOptions) -> Self {
        let variant = variant.into();
        Self {
            raw: variant.to_raw(options),
            matched: Some(variant),
            validated: false,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }

    /// The matched variant, for exhaustive `match` dispatch.
    pub fn matched(&self) -> Result<&V, ModelError> {
        self.matched.as_ref().ok_or_else(no_match::<V>)
    }

    pub fn into_matched(self) -> Result<V, ModelError> {
        self.matched.ok_or_else(no_match::<V>)
    }

    /// Applies `f` to the matched variant.
    pub fn map_matched<R>(&self, f: impl FnOnce(&V) -> R) -> Result<R, ModelError> {
        self.matched().map(f)
    }

    pub fn try_pick<T>(&self) -> Option<&T>
    where
        V: Pick<T>,
    {
        self.matched.as_ref().and_then(|v| v.pick())
    }

    pub fn variant_name(&self) -> Option<&'static str> {
        self.matched.as_ref().map(V::variant_name)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Re-emits the original raw value, never a re-serialized variant.
    pub fn to_raw(&self) -> Value {
        self.raw.clone()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let matched = self.matched()?;
        if self.validated {
            return Ok(());
        }
        matched.validate()
    }
}

fn no_match<V: UnionVariants>() -> ModelError {
    ModelError::NoMatchingVariant {
        path: FieldPath::root(),
        union: V::NAME,
    }
}

impl<V: UnionVariants> From<V> for OpenUnion<V> {
    fn from(variant: V) -> Self {
        Self::from_variant(variant)
    }
}

impl<V: UnionVariants> PartialEq for OpenUnion<V> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<V: UnionVariants> Eq for OpenUnion<V> {}

impl<V: UnionVariants> fmt::Display for OpenUnion<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<V: UnionVariants> Model for OpenUnion<V> {
    fn from_raw_unchecked_with(raw: Value, options: &CodecOptions) -> Result<Self, ModelError> {
        Ok(Self::from_raw_with(raw, options))
    }

    fn to_raw(&self) -> Value {
        OpenUnion::to_raw(self)
    }

    fn validate(&self) -> Result<(), ModelError> {
        OpenUnion::validate(self)
    }
}

impl<V: UnionVariants> FieldValue for OpenUnion<V> {
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
