//! Field value codecs: how one declared field type is read from and written
//! to a raw value.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::error::ModelError;
use crate::options::CodecOptions;

/// A type that can live in a record field.
///
/// `decode` never sees the top-level `null` of a field: the store handles
/// absence and nullability before calling it. Collections, however, must
/// reject `null` elements themselves.
pub trait FieldValue: Sized {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError>;

    fn encode(&self, options: &CodecOptions) -> Value;

    /// Recursive validation hook; scalars have nothing to check.
    fn validate_value(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

impl FieldValue for Value {
    fn decode(raw: &Value, _options: &CodecOptions) -> Result<Self, ModelError> {
        Ok(raw.clone())
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        self.clone()
    }
}

impl FieldValue for String {
    fn decode(raw: &Value, _options: &CodecOptions) -> Result<Self, ModelError> {
        match raw {
            Value::String(s) => Ok(s.clone()),
            other => Err(ModelError::decode("string", other)),
        }
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        Value::String(self.clone())
    }
}

impl FieldValue for bool {
    fn decode(raw: &Value, _options: &CodecOptions) -> Result<Self, ModelError> {
        match raw {
            Value::Bool(b) => Ok(*b),
            other => Err(ModelError::decode("boolean", other)),
        }
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        Value::Bool(*self)
    }
}

fn number_text<'a>(raw: &'a Value, options: &CodecOptions) -> Option<&'a str> {
    match raw {
        Value::String(s) if options.allow_reading_numbers_from_strings => Some(s.trim()),
        _ => None,
    }
}

fn decode_i64(raw: &Value, options: &CodecOptions, expected: &'static str) -> Result<i64, ModelError> {
    if let Value::Number(n) = raw {
        return n.as_i64().ok_or_else(|| ModelError::decode(expected, raw));
    }
    number_text(raw, options)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| ModelError::decode(expected, raw))
}

fn decode_u64(raw: &Value, options: &CodecOptions, expected: &'static str) -> Result<u64, ModelError> {
    if let Value::Number(n) = raw {
        return n.as_u64().ok_or_else(|| ModelError::decode(expected, raw));
    }
    number_text(raw, options)
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| ModelError::decode(expected, raw))
}

impl FieldValue for i64 {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        decode_i64(raw, options, "integer")
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        Value::Number((*self).into())
    }
}

impl FieldValue for i32 {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        let n = decode_i64(raw, options, "32-bit integer")?;
        i32::try_from(n).map_err(|_| ModelError::decode("32-bit integer", raw))
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        Value::Number((*self).into())
    }
}

impl FieldValue for u64 {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        decode_u64(raw, options, "unsigned integer")
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        Value::Number((*self).into())
    }
}

impl FieldValue for u32 {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        let n = decode_u64(raw, options, "32-bit unsigned integer")?;
        u32::try_from(n).map_err(|_| ModelError::decode("32-bit unsigned integer", raw))
    }

    fn encode(&self, _options: &CodecOptions) -> Value {
        Value::Number((*self).into())
    }
}

fn named_float(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

impl FieldValue for f64 {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        match raw {
            Value::Number(n) => n.as_f64().ok_or_else(|| ModelError::decode("number", raw)),
            Value::String(s) => {
                if options.allow_named_float_literals {
                    if let Some(f) = named_float(s) {
                        return Ok(f);
                    }
                }
                number_text(raw, options)
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|f| f.is_finite())
                    .ok_or_else(|| ModelError::decode("number", raw))
            }
            other => Err(ModelError::decode("number", other)),
        }
    }

    /// Non-finite values become the named literals when allowed, `null`
    /// otherwise.
    fn encode(&self, options: &CodecOptions) -> Value {
        if let Some(n) = Number::from_f64(*self) {
            return Value::Number(n);
        }
        if !options.allow_named_float_literals {
            return Value::Null;
        }
        let literal = if self.is_nan() {
            "NaN"
        } else if self.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        Value::String(literal.to_string())
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        T::decode(raw, options).map(Box::new)
    }

    fn encode(&self, options: &CodecOptions) -> Value {
        (**self).encode(options)
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        (**self).validate_value()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        let Value::Array(items) = raw else {
            return Err(ModelError::decode("array", raw));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_element(item, options).map_err(|e| e.within_index(i)))
            .collect()
    }

    fn encode(&self, options: &CodecOptions) -> Value {
        Value::Array(self.iter().map(|item| item.encode(options)).collect())
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        for (i, item) in self.iter().enumerate() {
            item.validate_value().map_err(|e| e.within_index(i))?;
        }
        Ok(())
    }
}

impl<T: FieldValue> FieldValue for IndexMap<String, T> {
    fn decode(raw: &Value, options: &CodecOptions) -> Result<Self, ModelError> {
        let Value::Object(entries) = raw else {
            return Err(ModelError::decode("object", raw));
        };
        entries
            .iter()
            .map(|(key, item)| {
                decode_element(item, options)
                    .map(|v| (key.clone(), v))
                    .map_err(|e| e.within(key))
            })
            .collect()
    }

    fn encode(&self, options: &CodecOptions) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(key, item)| (key.clone(), item.encode(options)))
            .collect();
        Value::Object(map)
    }

    fn validate_value(&self) -> Result<(), ModelError> {
        for (key, item) in self {
            item.validate_value().map_err(|e| e.within(key))?;
        }
        Ok(())
    }
}

fn decode_element<T: FieldValue>(raw: &Value, options: &CodecOptions) -> Result<T, ModelError> {
    if raw.is_null() {
        return Err(ModelError::NullNotAllowed {
            path: crate::error::FieldPath::root(),
        });
    }
    T::decode(raw, options)
}
