//! json-model - typed records, open enums and open unions over
//! schema-evolving JSON documents.
//!
//! A record owns one ordered [`FieldStore`] and decodes fields lazily on
//! access, so keys this build does not declare survive a decode/encode
//! round trip untouched. [`OpenEnum`] keeps string values the server added
//! after the client was built. [`OpenUnion`] picks the first candidate shape
//! that both decodes and validates, and otherwise keeps the raw value.
//!
//! Decoding never validates. [`Model::validate`] is an explicit, recursive,
//! fail-fast check.

pub mod error;
pub mod field;
pub mod json;
mod macros;
pub mod open_enum;
pub mod open_union;
pub mod options;
pub mod record;
pub mod store;

/// The structured value every model reads from and writes to.
pub use serde_json::Value as RawValue;

pub use error::{ErrorKind, FieldPath, ModelError, ParseError, PathSegment};
pub use field::FieldValue;
pub use json::{from_json_str, to_json_string};
pub use open_enum::{OpenEnum, WireEnum};
pub use open_union::{Candidate, OpenUnion, Pick, UnionVariants};
pub use options::CodecOptions;
pub use record::{FieldDescriptor, Model, Presence, Record};
pub use store::FieldStore;
