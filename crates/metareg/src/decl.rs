// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent declarations of record types.
//!
//! A [`RecordDecl`] is what a record's [`Reflect::describe`] returns: the
//! record-level description followed by one [`FieldDecl`] per field, in
//! declaration order. The registry turns it into schemas.

use crate::access::FieldAccess;
use crate::annotation::{AnnotationKey, AnnotationStore};
use crate::ident::TypeTag;
use crate::schema::FieldSchema;
use std::marker::PhantomData;

/// Record types that can describe themselves to a registry.
///
/// Usually derived with `#[derive(Reflect)]` from `metareg-codegen`.
pub trait Reflect: TypeTag + Sized {
    fn describe() -> RecordDecl<Self>;
}

/// Declaration of a record type `R`.
#[derive(Debug)]
pub struct RecordDecl<R> {
    pub(crate) name: String,
    pub(crate) title: Option<String>,
    pub(crate) annotations: AnnotationStore,
    pub(crate) fields: Vec<FieldDecl<R>>,
}

impl<R: TypeTag> RecordDecl<R> {
    /// Start a declaration. The title defaults to one derived from `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            annotations: AnnotationStore::new(),
            fields: Vec::new(),
        }
    }

    /// Override the display title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach an annotation to the record.
    #[must_use]
    pub fn annotate(mut self, key: impl Into<AnnotationKey>, value: impl Into<String>) -> Self {
        self.annotations.set(key, value);
        self
    }

    /// Append a field; its index is its position in the declaration.
    #[must_use]
    pub fn field(mut self, field: FieldDecl<R>) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared field names, in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Declaration of one field of record `R`.
pub struct FieldDecl<R> {
    pub(crate) name: String,
    pub(crate) title: Option<String>,
    pub(crate) offset: usize,
    pub(crate) annotations: AnnotationStore,
    pub(crate) access: FieldAccess,
    _record: PhantomData<fn() -> R>,
}

impl<R: TypeTag> FieldDecl<R> {
    /// Declare field `name` of type `V` at `offset` (from `offset_of!`),
    /// read and written through the given accessors.
    pub fn new<V: TypeTag>(
        name: &str,
        offset: usize,
        get: fn(&R) -> &V,
        get_mut: fn(&mut R) -> &mut V,
    ) -> Self {
        Self {
            name: name.to_string(),
            title: None,
            offset,
            annotations: AnnotationStore::new(),
            access: FieldAccess::new(get, get_mut),
            _record: PhantomData,
        }
    }

    /// Override the display title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach an annotation to the field.
    #[must_use]
    pub fn annotate(mut self, key: impl Into<AnnotationKey>, value: impl Into<String>) -> Self {
        self.annotations.set(key, value);
        self
    }

    pub(crate) fn into_schema(self, index: usize, default_title: impl FnOnce(&str) -> String) -> FieldSchema {
        let title = self.title.unwrap_or_else(|| default_title(&self.name));
        let mut schema = FieldSchema::new(self.name, index, self.offset, self.access).with_title(title);
        schema.annotations = self.annotations;
        schema
    }
}

impl<R> std::fmt::Debug for FieldDecl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDecl")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("type", &self.access.value_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::MetaKey;
    use crate::ident::TypeIdent;
    use std::mem::offset_of;

    struct Gauge {
        value: f32,
        unit: String,
    }
    crate::type_tag!(Gauge => "Gauge");

    fn gauge_decl() -> RecordDecl<Gauge> {
        RecordDecl::<Gauge>::new("Gauge")
            .annotate(MetaKey::Description, "A dial.")
            .field(
                FieldDecl::<Gauge>::new::<f32>("value", offset_of!(Gauge, value), |g| &g.value, |g| {
                    &mut g.value
                })
                .annotate(MetaKey::Tooltip, "Current reading"),
            )
            .field(
                FieldDecl::<Gauge>::new::<String>("unit", offset_of!(Gauge, unit), |g| &g.unit, |g| {
                    &mut g.unit
                })
                .title("Unit Of Measure"),
            )
    }

    #[test]
    fn test_decl_keeps_declaration_order() {
        let decl = gauge_decl();
        assert_eq!(decl.name(), "Gauge");
        assert_eq!(decl.field_names().collect::<Vec<_>>(), vec!["value", "unit"]);
        assert_eq!(decl.annotations.get(MetaKey::Description), "A dial.");
    }

    #[test]
    fn test_field_into_schema() {
        let mut decl = gauge_decl();
        let unit = decl.fields.pop().expect("unit");
        let value = decl.fields.pop().expect("value");

        let value = value.into_schema(0, |n| n.to_uppercase());
        assert_eq!(value.title, "VALUE");
        assert_eq!(value.index, 0);
        assert_eq!(value.type_ident, TypeIdent::from_name("f32"));
        assert_eq!(value.size, 4);
        assert_eq!(value.annotation(MetaKey::Tooltip), "Current reading");

        let unit = unit.into_schema(1, |n| n.to_uppercase());
        assert_eq!(unit.title, "Unit Of Measure");
        assert_eq!(unit.type_name, "String");
    }
}
