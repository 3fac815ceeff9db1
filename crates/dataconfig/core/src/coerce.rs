//! Type-directed coercion of raw values into typed field values.
//!
//! This is the heart of the decoder: one raw value plus one declared field
//! kind in, one [`FieldValue`] out, with every failure isolated to the single
//! field (or container entry) that produced it. Container coercion resolves
//! the declared key/element kinds and drops unsupported or unparsable
//! entries, one diagnostic per drop.

use std::borrow::Cow;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::CoerceError;
use crate::schema::{ElementKind, FieldDescriptor, FieldKind};
use crate::value::{ElementValue, FieldValue, RawValue, raw_text};

/// Strips a trailing fractional suffix from a numeric text token.
///
/// Source literals are sometimes serialized as `"3.0"` even when the
/// destination is an integer kind. The rule is truncation, never rounding:
/// `"3.7"` becomes `"3"`.
pub fn strip_fraction(text: &str) -> &str {
    match text.find('.') {
        Some(index) => &text[..index],
        None => text,
    }
}

/// Coerces one raw value against a field descriptor.
///
/// Container entry drops are recorded on `diagnostics` under `type_name` and
/// the descriptor's field name; the returned error covers failures of the
/// field as a whole.
pub fn coerce_field(
    type_name: &'static str,
    raw: &RawValue,
    descriptor: &FieldDescriptor,
    diagnostics: &mut Diagnostics,
) -> Result<FieldValue, CoerceError> {
    match descriptor.kind {
        FieldKind::I8 => Ok(FieldValue::I8(parse_int(&raw_text(raw))?)),
        FieldKind::I16 => Ok(FieldValue::I16(parse_int(&raw_text(raw))?)),
        FieldKind::I32 => Ok(FieldValue::I32(parse_int(&raw_text(raw))?)),
        FieldKind::I64 => Ok(FieldValue::I64(parse_int(&raw_text(raw))?)),
        FieldKind::Bool => Ok(FieldValue::Bool(parse_bool(&raw_text(raw))?)),
        FieldKind::Text => Ok(FieldValue::Text(raw_text(raw).into_owned())),
        FieldKind::F32 => Ok(FieldValue::F32(parse_float(&raw_text(raw))?)),
        FieldKind::F64 => Ok(FieldValue::F64(parse_float(&raw_text(raw))?)),
        FieldKind::Map { key, value } => {
            coerce_map(type_name, raw, descriptor, key, value, diagnostics)
        }
        FieldKind::List { element } => {
            coerce_list(type_name, raw, descriptor, element, diagnostics)
        }
        FieldKind::Other { type_name } => Err(CoerceError::Unsupported { type_name }),
    }
}

/// Empty text decodes integer kinds to 0.
fn parse_int<T>(text: &str) -> Result<T, CoerceError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError> + Default,
{
    if text.is_empty() {
        return Ok(T::default());
    }
    strip_fraction(text)
        .parse()
        .map_err(|source| CoerceError::InvalidInt {
            text: text.to_string(),
            source,
        })
}

/// Empty text decodes float kinds to 0.0.
fn parse_float<T>(text: &str) -> Result<T, CoerceError>
where
    T: std::str::FromStr<Err = std::num::ParseFloatError> + Default,
{
    if text.is_empty() {
        return Ok(T::default());
    }
    text.parse().map_err(|source| CoerceError::InvalidFloat {
        text: text.to_string(),
        source,
    })
}

/// Numeric path first (0 is false, any other byte is true), then the
/// case-insensitive `"true"` / `"false"` fallback.
fn parse_bool(text: &str) -> Result<bool, CoerceError> {
    if let Ok(byte) = text.parse::<i8>() {
        return Ok(byte != 0);
    }
    match text.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(CoerceError::InvalidBool {
            text: text.to_string(),
        }),
    }
}

/// An empty text token decodes any container kind to its empty value.
fn is_empty_text(raw: &RawValue) -> bool {
    matches!(raw, RawValue::String(text) if text.is_empty())
}

/// Views a raw container value as parsed JSON.
///
/// Tables conventionally store containers as embedded JSON text inside a
/// string field; an already-structured object or array is accepted as-is.
fn container_json(raw: &RawValue) -> Result<Cow<'_, RawValue>, CoerceError> {
    match raw {
        RawValue::String(text) => serde_json::from_str(text)
            .map(Cow::Owned)
            .map_err(|source| CoerceError::MalformedContainer { source }),
        other => Ok(Cow::Borrowed(other)),
    }
}

/// Why one container entry was dropped.
enum ElementDrop {
    Unsupported(ElementKind),
    Invalid { raw: String, detail: String },
}

/// Coerces one map value or list element to its declared kind.
fn coerce_element(kind: ElementKind, raw: &RawValue) -> Result<ElementValue, ElementDrop> {
    match kind {
        ElementKind::Int => {
            let text = raw_text(raw);
            strip_fraction(&text)
                .parse::<i64>()
                .map(ElementValue::Int)
                .map_err(|err| ElementDrop::Invalid {
                    raw: text.into_owned(),
                    detail: err.to_string(),
                })
        }
        ElementKind::Text => Ok(ElementValue::Text(raw_text(raw).into_owned())),
        other => Err(ElementDrop::Unsupported(other)),
    }
}

fn push_element_drop(
    diagnostics: &mut Diagnostics,
    type_name: &'static str,
    descriptor: &FieldDescriptor,
    unsupported_kind: DiagnosticKind,
    drop: ElementDrop,
) {
    let diagnostic = match drop {
        ElementDrop::Unsupported(kind) => Diagnostic::new(unsupported_kind, type_name)
            .field(descriptor.name)
            .detail(format!("unsupported declared container type `{kind}`")),
        ElementDrop::Invalid { raw, detail } => {
            Diagnostic::new(DiagnosticKind::InvalidEntry, type_name)
                .field(descriptor.name)
                .raw(raw)
                .detail(detail)
        }
    };
    diagnostics.push(diagnostic);
}

/// Map destination: reparse, coerce each key as the declared key kind and
/// each value as the declared value kind, drop entries that fail.
///
/// Only integer keys are supported; a schema declaring any other key kind
/// yields an empty map plus one diagnostic per dropped entry.
fn coerce_map(
    type_name: &'static str,
    raw: &RawValue,
    descriptor: &FieldDescriptor,
    key_kind: ElementKind,
    value_kind: ElementKind,
    diagnostics: &mut Diagnostics,
) -> Result<FieldValue, CoerceError> {
    if is_empty_text(raw) {
        return Ok(FieldValue::Map(Vec::new()));
    }
    let parsed = container_json(raw)?;
    let object = parsed
        .as_object()
        .ok_or(CoerceError::ContainerShape { expected: "object" })?;

    let mut entries = Vec::with_capacity(object.len());
    for (key_text, raw_value) in object {
        let key = match key_kind {
            ElementKind::Int => match key_text.parse::<i64>() {
                Ok(key) => key,
                Err(err) => {
                    diagnostics.push(
                        Diagnostic::new(DiagnosticKind::InvalidEntry, type_name)
                            .field(descriptor.name)
                            .raw(key_text.clone())
                            .detail(format!("map key does not parse as an integer: {err}")),
                    );
                    continue;
                }
            },
            other => {
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::UnsupportedKey, type_name)
                        .field(descriptor.name)
                        .raw(key_text.clone())
                        .detail(format!("unsupported declared map key type `{other}`")),
                );
                continue;
            }
        };
        match coerce_element(value_kind, raw_value) {
            Ok(value) => entries.push((key, value)),
            Err(drop) => push_element_drop(
                diagnostics,
                type_name,
                descriptor,
                DiagnosticKind::UnsupportedValue,
                drop,
            ),
        }
    }
    Ok(FieldValue::Map(entries))
}

/// List destination: reparse and coerce each element as the declared element
/// kind, dropping elements that fail.
fn coerce_list(
    type_name: &'static str,
    raw: &RawValue,
    descriptor: &FieldDescriptor,
    element_kind: ElementKind,
    diagnostics: &mut Diagnostics,
) -> Result<FieldValue, CoerceError> {
    if is_empty_text(raw) {
        return Ok(FieldValue::List(Vec::new()));
    }
    let parsed = container_json(raw)?;
    let array = parsed
        .as_array()
        .ok_or(CoerceError::ContainerShape { expected: "array" })?;

    let mut elements = Vec::with_capacity(array.len());
    for raw_value in array {
        match coerce_element(element_kind, raw_value) {
            Ok(element) => elements.push(element),
            Err(drop) => push_element_drop(
                diagnostics,
                type_name,
                descriptor,
                DiagnosticKind::UnsupportedElement,
                drop,
            ),
        }
    }
    Ok(FieldValue::List(elements))
}
