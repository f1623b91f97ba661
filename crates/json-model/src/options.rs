//! Codec configuration threaded through decode and encode.

use serde::{Deserialize, Serialize};

/// Options controlling how field values are read from and written to raw
/// values.
///
/// Immutable once built; a decoded record keeps a copy in its store so its
/// accessors see the same options it was decoded with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Numeric fields also accept a string holding a number, e.g. `"42"`.
    pub allow_reading_numbers_from_strings: bool,
    /// Floats read and write `"NaN"`, `"Infinity"` and `"-Infinity"`.
    pub allow_named_float_literals: bool,
    /// Open enum lookup ignores ASCII case.
    pub case_insensitive_enums: bool,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every relaxation switched on.
    pub fn lenient() -> Self {
        Self {
            allow_reading_numbers_from_strings: true,
            allow_named_float_literals: true,
            case_insensitive_enums: true,
        }
    }

    pub fn allow_reading_numbers_from_strings(mut self, v: bool) -> Self {
        self.allow_reading_numbers_from_strings = v;
        self
    }

    pub fn allow_named_float_literals(mut self, v: bool) -> Self {
        self.allow_named_float_literals = v;
        self
    }

    pub fn case_insensitive_enums(mut self, v: bool) -> Self {
        self.case_insensitive_enums = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_strict() {
        let opts = CodecOptions::default();
        assert!(!opts.allow_reading_numbers_from_strings);
        assert!(!opts.allow_named_float_literals);
        assert!(!opts.case_insensitive_enums);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let opts: CodecOptions =
            serde_json::from_value(json!({"case_insensitive_enums": true})).unwrap();
        assert_eq!(opts, CodecOptions::new().case_insensitive_enums(true));
    }

    #[test]
    fn builder_methods_set_flags() {
        let opts = CodecOptions::new()
            .allow_reading_numbers_from_strings(true)
            .allow_named_float_literals(true);
        assert!(opts.allow_reading_numbers_from_strings);
        assert!(opts.allow_named_float_literals);
        assert!(!opts.case_insensitive_enums);
    }
}
