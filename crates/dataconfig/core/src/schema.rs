//! Schema model: declared field kinds and per-type record schemas.
//!
//! Runtime field reflection is replaced by explicit registration: each table
//! row type builds its [`RecordSchema`] once through [`SchemaBuilder`],
//! binding a declared destination kind and a typed setter closure per
//! participating field. Fields without a registration are invisible to the
//! decoder.

use std::collections::BTreeMap;

use crate::error::ConstructError;
use crate::value::{ElementValue, FieldValue};

/// Declared destination kind of a participating field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    Bool,
    Text,
    F32,
    F64,
    Map { key: ElementKind, value: ElementKind },
    List { element: ElementKind },
    /// A destination type the coercion engine does not handle.
    ///
    /// Kept representable so decoding reports the field with an
    /// unsupported-kind diagnostic instead of silently deselecting it.
    Other { type_name: &'static str },
}

impl FieldKind {
    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::Bool => "bool",
            FieldKind::Text => "text",
            FieldKind::F32 => "f32",
            FieldKind::F64 => "f64",
            FieldKind::Map { .. } => "map",
            FieldKind::List { .. } => "list",
            FieldKind::Other { type_name } => type_name,
        }
    }
}

/// Declared key, value, or element type of a container field.
///
/// Map keys support only `Int`; map values and list elements support `Int`
/// and `Text`. The remaining kinds exist so a schema can still declare them
/// and the decoder can diagnose the dropped entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ElementKind {
    Int,
    Text,
    Float,
    Bool,
}

/// Which selection marker put the field into the schema.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldRole {
    #[default]
    Field,
    PrimaryKey,
}

/// Declared name, role, and destination kind of one participating field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Lookup key into the raw record. Unique within a schema; with
    /// duplicate registrations the last one wins.
    pub name: &'static str,
    pub role: FieldRole,
    pub kind: FieldKind,
}

type ApplyFn<T> = Box<dyn Fn(&mut T, FieldValue) + Send + Sync>;
type ConstructFn<T> = Box<dyn Fn() -> Result<T, ConstructError> + Send + Sync>;

/// One participating field: its descriptor plus the pre-bound setter that
/// writes a coerced value into the row instance.
pub struct FieldBinding<T> {
    descriptor: FieldDescriptor,
    apply: ApplyFn<T>,
}

impl<T> FieldBinding<T> {
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub(crate) fn apply(&self, target: &mut T, value: FieldValue) {
        (self.apply)(target, value);
    }
}

impl<T> std::fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// The participating fields and constructor for one target row type.
///
/// Built once per type and read-only thereafter; `Send + Sync`, so a single
/// schema can be shared across threads decoding different batches.
pub struct RecordSchema<T> {
    type_name: &'static str,
    construct: ConstructFn<T>,
    fields: Vec<FieldBinding<T>>,
}

impl<T> RecordSchema<T> {
    /// Starts a builder using `T::default()` as the row constructor.
    pub fn builder(type_name: &'static str) -> SchemaBuilder<T>
    where
        T: Default,
    {
        SchemaBuilder::with_constructor(type_name, || Ok(T::default()))
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn construct(&self) -> Result<T, ConstructError> {
        (self.construct)()
    }

    /// The field bindings in registration order.
    pub fn fields(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    /// Looks up the descriptor registered under `name`.
    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .map(FieldBinding::descriptor)
            .find(|descriptor| descriptor.name == name)
    }
}

impl<T> std::fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Registration point for a table row type.
///
/// The schema is a pure function of the type: build it once and reuse it for
/// every batch (memoizing in a `std::sync::OnceLock` is safe).
pub trait ConfigRecord: Sized + 'static {
    /// Builds the record schema for this type.
    fn schema() -> RecordSchema<Self>;
}

/// Builder for [`RecordSchema`].
///
/// The typed convenience methods fuse a declared kind with a setter closure;
/// [`SchemaBuilder::field`] is the low-level escape hatch for kinds without a
/// convenience (including [`FieldKind::Other`]).
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    construct: ConstructFn<T>,
    fields: Vec<FieldBinding<T>>,
}

impl<T> SchemaBuilder<T> {
    /// Starts a builder with an explicit, fallible row constructor.
    pub fn with_constructor(
        type_name: &'static str,
        construct: impl Fn() -> Result<T, ConstructError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_name,
            construct: Box::new(construct),
            fields: Vec::new(),
        }
    }

    /// Registers a field with an explicit kind and raw apply closure.
    ///
    /// The closure receives the [`FieldValue`] variant matching `kind`; the
    /// typed convenience methods below are implemented on top of this.
    pub fn field(
        mut self,
        name: &'static str,
        kind: FieldKind,
        apply: impl Fn(&mut T, FieldValue) + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldBinding {
            descriptor: FieldDescriptor {
                name,
                role: FieldRole::Field,
                kind,
            },
            apply: Box::new(apply),
        });
        self
    }

    /// Marks the most recently registered field as the primary key.
    ///
    /// # Panics
    ///
    /// Panics if no field has been registered yet.
    pub fn primary_key(mut self) -> Self {
        let binding = self
            .fields
            .last_mut()
            .expect("primary_key() requires a preceding field registration");
        binding.descriptor.role = FieldRole::PrimaryKey;
        self
    }

    pub fn int8(self, name: &'static str, set: impl Fn(&mut T, i8) + Send + Sync + 'static) -> Self {
        self.field(name, FieldKind::I8, move |target, value| {
            if let FieldValue::I8(v) = value {
                set(target, v);
            }
        })
    }

    pub fn int16(
        self,
        name: &'static str,
        set: impl Fn(&mut T, i16) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::I16, move |target, value| {
            if let FieldValue::I16(v) = value {
                set(target, v);
            }
        })
    }

    pub fn int32(
        self,
        name: &'static str,
        set: impl Fn(&mut T, i32) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::I32, move |target, value| {
            if let FieldValue::I32(v) = value {
                set(target, v);
            }
        })
    }

    pub fn int64(
        self,
        name: &'static str,
        set: impl Fn(&mut T, i64) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::I64, move |target, value| {
            if let FieldValue::I64(v) = value {
                set(target, v);
            }
        })
    }

    pub fn boolean(
        self,
        name: &'static str,
        set: impl Fn(&mut T, bool) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::Bool, move |target, value| {
            if let FieldValue::Bool(v) = value {
                set(target, v);
            }
        })
    }

    pub fn text(
        self,
        name: &'static str,
        set: impl Fn(&mut T, String) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::Text, move |target, value| {
            if let FieldValue::Text(v) = value {
                set(target, v);
            }
        })
    }

    pub fn float32(
        self,
        name: &'static str,
        set: impl Fn(&mut T, f32) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::F32, move |target, value| {
            if let FieldValue::F32(v) = value {
                set(target, v);
            }
        })
    }

    pub fn float64(
        self,
        name: &'static str,
        set: impl Fn(&mut T, f64) + Send + Sync + 'static,
    ) -> Self {
        self.field(name, FieldKind::F64, move |target, value| {
            if let FieldValue::F64(v) = value {
                set(target, v);
            }
        })
    }

    /// Integer-keyed map with text values.
    pub fn map_int_text(
        self,
        name: &'static str,
        set: impl Fn(&mut T, BTreeMap<i64, String>) + Send + Sync + 'static,
    ) -> Self {
        let kind = FieldKind::Map {
            key: ElementKind::Int,
            value: ElementKind::Text,
        };
        self.field(name, kind, move |target, value| {
            if let FieldValue::Map(entries) = value {
                let map = entries
                    .into_iter()
                    .filter_map(|(key, element)| match element {
                        ElementValue::Text(text) => Some((key, text)),
                        ElementValue::Int(_) => None,
                    })
                    .collect();
                set(target, map);
            }
        })
    }

    /// Integer-keyed map with integer values.
    pub fn map_int_int(
        self,
        name: &'static str,
        set: impl Fn(&mut T, BTreeMap<i64, i64>) + Send + Sync + 'static,
    ) -> Self {
        let kind = FieldKind::Map {
            key: ElementKind::Int,
            value: ElementKind::Int,
        };
        self.field(name, kind, move |target, value| {
            if let FieldValue::Map(entries) = value {
                let map = entries
                    .into_iter()
                    .filter_map(|(key, element)| match element {
                        ElementValue::Int(v) => Some((key, v)),
                        ElementValue::Text(_) => None,
                    })
                    .collect();
                set(target, map);
            }
        })
    }

    pub fn list_int(
        self,
        name: &'static str,
        set: impl Fn(&mut T, Vec<i64>) + Send + Sync + 'static,
    ) -> Self {
        let kind = FieldKind::List {
            element: ElementKind::Int,
        };
        self.field(name, kind, move |target, value| {
            if let FieldValue::List(elements) = value {
                let list = elements
                    .into_iter()
                    .filter_map(|element| match element {
                        ElementValue::Int(v) => Some(v),
                        ElementValue::Text(_) => None,
                    })
                    .collect();
                set(target, list);
            }
        })
    }

    pub fn list_text(
        self,
        name: &'static str,
        set: impl Fn(&mut T, Vec<String>) + Send + Sync + 'static,
    ) -> Self {
        let kind = FieldKind::List {
            element: ElementKind::Text,
        };
        self.field(name, kind, move |target, value| {
            if let FieldValue::List(elements) = value {
                let list = elements
                    .into_iter()
                    .filter_map(|element| match element {
                        ElementValue::Text(text) => Some(text),
                        ElementValue::Int(_) => None,
                    })
                    .collect();
                set(target, list);
            }
        })
    }

    pub fn build(self) -> RecordSchema<T> {
        RecordSchema {
            type_name: self.type_name,
            construct: self.construct,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Row {
        id: i32,
        name: String,
    }

    fn schema() -> RecordSchema<Row> {
        RecordSchema::<Row>::builder("Row")
            .int32("id", |row, v| row.id = v)
            .primary_key()
            .text("name", |row, v| row.name = v)
            .build()
    }

    #[test]
    fn test_builder_records_descriptors_in_order() {
        let schema = schema();
        assert_eq!(schema.type_name(), "Row");
        assert_eq!(schema.fields().len(), 2);
        assert_eq!(schema.fields()[0].descriptor().name, "id");
        assert_eq!(schema.fields()[1].descriptor().name, "name");
    }

    #[test]
    fn test_primary_key_marks_last_field() {
        let schema = schema();
        let id = schema.descriptor("id").unwrap();
        assert_eq!(id.role, FieldRole::PrimaryKey);
        assert_eq!(id.kind, FieldKind::I32);

        let name = schema.descriptor("name").unwrap();
        assert_eq!(name.role, FieldRole::Field);
    }

    #[test]
    fn test_descriptor_lookup_misses_unregistered_fields() {
        assert!(schema().descriptor("comment").is_none());
    }

    #[test]
    fn test_apply_writes_through_setter() {
        let schema = schema();
        let mut row = Row::default();
        schema.fields()[0].apply(&mut row, FieldValue::I32(7));
        schema.fields()[1].apply(&mut row, FieldValue::Text("sword".to_string()));
        assert_eq!(
            row,
            Row {
                id: 7,
                name: "sword".to_string()
            }
        );
    }

    #[test]
    fn test_schema_is_shareable_across_threads() {
        fn assert_send_sync<V: Send + Sync>(_: &V) {}
        assert_send_sync(&schema());
    }
}
