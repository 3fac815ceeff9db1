//! Typed decoding of static game-configuration tables.
//!
//! `dataconfig-core` turns a batch of loosely-typed records (as parsed from a
//! textual interchange format) into an ordered sequence of strongly-typed row
//! instances. Each row type registers the fields that participate through a
//! [`RecordSchema`] built once per type; the type-directed coercion engine in
//! [`coerce`] converts each raw value to its declared destination kind and
//! isolates every failure to the single field (or container entry) that
//! produced it.
//!
//! Modules are organized by responsibility:
//! - [`schema`] declares field kinds and builds per-type record schemas
//! - [`value`] holds the raw and coerced value representations
//! - [`coerce`] is the type-directed coercion engine
//! - [`decode`] drives one full batch against a schema
//! - [`diagnostics`] collects every non-fatal event for the caller
//! - [`error`] defines the coercion and construction error types

pub mod coerce;
pub mod decode;
pub mod diagnostics;
pub mod error;
pub mod schema;
pub mod value;

pub use coerce::{coerce_field, strip_fraction};
pub use decode::{DecodedBatch, decode_batch};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{CoerceError, ConstructError};
pub use schema::{
    ConfigRecord, ElementKind, FieldBinding, FieldDescriptor, FieldKind, FieldRole, RecordSchema,
    SchemaBuilder,
};
pub use value::{ElementValue, FieldValue, RawRecord, RawValue};
