//! Batch record decoder.
//!
//! Drives one full batch against a prebuilt [`RecordSchema`]: construct a
//! default row per raw record, look up each selected field, coerce it, and
//! isolate every failure at the field or record level. Nothing at this layer
//! aborts the batch.

use crate::coerce::coerce_field;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::schema::RecordSchema;
use crate::value::{RawValue, raw_text};

/// The ordered decode output plus every non-fatal event that occurred.
#[derive(Debug)]
pub struct DecodedBatch<T> {
    /// Decoded rows in input order. Skipped records leave no placeholder, so
    /// this can be shorter than the input.
    pub rows: Vec<T>,
    pub diagnostics: Diagnostics,
}

impl<T> Default for DecodedBatch<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Decodes one batch of raw array elements against a schema.
///
/// Per record: a non-object element or a failed construction skips the
/// record with a diagnostic; a missing field or a coercion failure leaves
/// that one field at its default with a diagnostic and the record is still
/// emitted. Output order matches input order for every emitted record.
pub fn decode_batch<T>(elements: &[RawValue], schema: &RecordSchema<T>) -> DecodedBatch<T> {
    let mut batch = DecodedBatch::default();
    for (index, element) in elements.iter().enumerate() {
        batch.diagnostics.set_record(index);
        let Some(record) = element.as_object() else {
            batch.diagnostics.push(
                Diagnostic::new(DiagnosticKind::MalformedRecord, schema.type_name())
                    .raw(element.to_string())
                    .detail("array element is not a record object"),
            );
            continue;
        };
        let mut row = match schema.construct() {
            Ok(row) => row,
            Err(err) => {
                batch.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::ConstructFailed, schema.type_name())
                        .detail(err.to_string()),
                );
                continue;
            }
        };
        for binding in schema.fields() {
            let descriptor = binding.descriptor();
            let raw = match record.get(descriptor.name) {
                Some(raw) if !raw.is_null() => raw,
                _ => {
                    batch.diagnostics.push(
                        Diagnostic::new(DiagnosticKind::MissingField, schema.type_name())
                            .field(descriptor.name)
                            .detail("field not found in source record"),
                    );
                    continue;
                }
            };
            match coerce_field(schema.type_name(), raw, descriptor, &mut batch.diagnostics) {
                Ok(value) => binding.apply(&mut row, value),
                Err(err) => {
                    batch.diagnostics.push(
                        Diagnostic::new(err.diagnostic_kind(), schema.type_name())
                            .field(descriptor.name)
                            .raw(raw_text(raw).into_owned())
                            .detail(err.to_string()),
                    );
                }
            }
        }
        batch.rows.push(row);
    }
    batch.diagnostics.clear_record();
    batch
}
