//! Raw and coerced value representations.

use std::borrow::Cow;

/// One undecoded element of the input array, as a name → raw-value mapping.
///
/// Keys absent from the mapping (and JSON `null` values) are treated as
/// "missing" by the decoder.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A single raw value as parsed from the interchange format, kept opaque
/// until coerced against a field descriptor.
pub type RawValue = serde_json::Value;

/// The typed result of coercing one raw value.
///
/// One variant per supported destination kind. Container payloads keep their
/// entries in the deterministic iteration order of the parsed structure.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Bool(bool),
    Text(String),
    F32(f32),
    F64(f64),
    /// Map entries. Keys are always integers; other declared key kinds are
    /// diagnosed and their entries dropped before this value is built.
    Map(Vec<(i64, ElementValue)>),
    List(Vec<ElementValue>),
}

/// A coerced map value or list element.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementValue {
    Int(i64),
    Text(String),
}

/// Views a raw scalar as text, the way the source format renders it.
///
/// Strings pass through verbatim; numbers and booleans use their JSON
/// rendering, so a float literal `5.0` becomes the text "5.0".
pub(crate) fn raw_text(raw: &RawValue) -> Cow<'_, str> {
    match raw {
        RawValue::String(text) => Cow::Borrowed(text.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
