//! Diagnostics collector returned alongside every decoded batch.
//!
//! Non-fatal events (skipped records, defaulted fields, dropped container
//! entries) are never silently discarded: each one is pushed here and emitted
//! as a `tracing` event, so callers can log, aggregate, or fail the whole
//! load based on the counts.

/// Category of a non-fatal decoding event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticKind {
    /// Array element is not a record object; record skipped.
    MalformedRecord,
    /// Row construction failed; record skipped.
    ConstructFailed,
    /// Selected field absent (or null) in the raw record; field defaulted.
    MissingField,
    /// Raw value could not be coerced to the declared kind; field defaulted.
    InvalidValue,
    /// Declared destination kind is outside the supported set; field defaulted.
    UnsupportedKind,
    /// Declared map key kind is not integer; entry dropped.
    UnsupportedKey,
    /// Declared map value kind is unsupported; entry dropped.
    UnsupportedValue,
    /// Declared list element kind is unsupported; element dropped.
    UnsupportedElement,
    /// A container entry failed to parse; entry dropped.
    InvalidEntry,
}

impl DiagnosticKind {
    /// Missing fields are expected in sparse tables and log at warn level;
    /// everything else indicates bad source data and logs at error level.
    fn is_warning(&self) -> bool {
        matches!(self, DiagnosticKind::MissingField)
    }
}

/// One non-fatal decoding event, locating the bad source data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Target row type.
    pub type_name: &'static str,
    /// Field involved, when the event is field-scoped.
    pub field: Option<&'static str>,
    /// Offending raw value rendered as text, when one exists.
    pub raw: Option<String>,
    /// Index of the record in the input array, when known.
    pub record: Option<usize>,
    /// Failure detail (parse message, unsupported type name, ...).
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, type_name: &'static str) -> Self {
        Self {
            kind,
            type_name,
            field: None,
            raw: None,
            record: None,
            detail: String::new(),
        }
    }

    pub fn field(mut self, name: &'static str) -> Self {
        self.field = Some(name);
        self
    }

    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

/// Ordered collector of the non-fatal events of one decode call.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    current_record: Option<usize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes subsequent pushes to the record at `index`.
    pub(crate) fn set_record(&mut self, index: usize) {
        self.current_record = Some(index);
    }

    pub(crate) fn clear_record(&mut self) {
        self.current_record = None;
    }

    /// Records one event and emits the matching `tracing` event.
    pub fn push(&mut self, mut diagnostic: Diagnostic) {
        if diagnostic.record.is_none() {
            diagnostic.record = self.current_record;
        }
        if diagnostic.kind.is_warning() {
            tracing::warn!(
                kind = %diagnostic.kind,
                r#type = diagnostic.type_name,
                field = diagnostic.field,
                record = diagnostic.record,
                "{}",
                diagnostic.detail,
            );
        } else {
            tracing::error!(
                kind = %diagnostic.kind,
                r#type = diagnostic.type_name,
                field = diagnostic.field,
                raw = diagnostic.raw.as_deref(),
                record = diagnostic.record,
                "{}",
                diagnostic.detail,
            );
        }
        self.entries.push(diagnostic);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of collected events of one category.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}
