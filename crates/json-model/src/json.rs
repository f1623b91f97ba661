//! JSON text helpers around the raw-value boundary.

use serde_json::Value;

use crate::error::ParseError;
use crate::options::CodecOptions;
use crate::record::Model;

/// Parses JSON text and decodes it without validating.
pub fn from_json_str<M: Model>(text: &str, options: &CodecOptions) -> Result<M, ParseError> {
    let raw: Value = serde_json::from_str(text)?;
    Ok(M::from_raw_unchecked_with(raw, options)?)
}

/// Compact JSON text of a model's raw value.
pub fn to_json_string<M: Model>(model: &M) -> String {
    model.to_raw().to_string()
}
