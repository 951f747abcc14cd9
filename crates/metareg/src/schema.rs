// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record and field schemas.

use crate::access::FieldAccess;
use crate::annotation::{AnnotationKey, AnnotationStore, MetaKey};
use crate::ident::TypeIdent;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Name carried by the lookup-miss sentinels.
pub const UNKNOWN_NAME: &str = "unknown";

/// Declaration index carried by the field sentinel.
pub const UNKNOWN_INDEX: usize = usize::MAX;

/// Description of one registered record type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RecordSchema {
    /// Declared type name.
    pub name: String,
    /// Display name.
    pub title: String,
    pub type_ident: TypeIdent,
    /// Number of fields currently registered, maintained by the registry.
    pub(crate) field_count: usize,
    pub annotations: AnnotationStore,
}

impl RecordSchema {
    /// New schema titled with its own name and no fields.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ident: TypeIdent) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            type_ident,
            field_count: 0,
            annotations: AnnotationStore::new(),
        }
    }

    /// The lookup-miss sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_NAME, TypeIdent::NONE)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.type_ident.is_none()
    }

    #[must_use]
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Annotation value, `""` when absent or when `self` is the sentinel.
    #[must_use]
    pub fn annotation(&self, key: impl Into<AnnotationKey>) -> &str {
        if self.is_unknown() {
            return "";
        }
        self.annotations.get(key)
    }

    /// Set an annotation; ignored on the sentinel.
    pub fn set_annotation(&mut self, key: impl Into<AnnotationKey>, value: impl Into<String>) {
        if !self.is_unknown() {
            self.annotations.set(key, value);
        }
    }
}

/// Description of one field of a record type.
///
/// Equality compares metadata only; the captured accessor is ignored.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FieldSchema {
    /// Declared field name.
    pub name: String,
    /// Display name.
    pub title: String,
    /// Position in the record declaration, starting at 0.
    pub index: usize,
    /// Identifier of the field's value type.
    pub type_ident: TypeIdent,
    /// Declared name of the field's value type.
    pub type_name: String,
    /// Byte offset inside the owning record, as reported by `offset_of!`.
    pub offset: usize,
    /// Storage size of the value type.
    pub size: usize,
    pub annotations: AnnotationStore,
    #[cfg_attr(feature = "serde", serde(skip))]
    access: Option<FieldAccess>,
}

impl FieldSchema {
    /// New schema for a field read and written through `access`.
    ///
    /// Type identifier, type name and size are taken from the accessor's
    /// value type, so they cannot disagree with it.
    #[must_use]
    pub fn new(name: impl Into<String>, index: usize, offset: usize, access: FieldAccess) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            index,
            type_ident: access.value_ident(),
            type_name: access.value_name().to_string(),
            offset,
            size: access.value_size(),
            annotations: AnnotationStore::new(),
            access: Some(access),
        }
    }

    /// The lookup-miss sentinel.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            title: UNKNOWN_NAME.to_string(),
            index: UNKNOWN_INDEX,
            type_ident: TypeIdent::NONE,
            type_name: String::new(),
            offset: 0,
            size: 0,
            annotations: AnnotationStore::new(),
            access: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.type_ident.is_none()
    }

    /// True when the `Hidden` annotation is set to `true`, `yes` or `1`.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(
            self.annotation(MetaKey::Hidden).to_ascii_lowercase().as_str(),
            "true" | "yes" | "1"
        )
    }

    pub(crate) fn access(&self) -> Option<&FieldAccess> {
        self.access.as_ref()
    }

    /// Annotation value, `""` when absent or when `self` is the sentinel.
    #[must_use]
    pub fn annotation(&self, key: impl Into<AnnotationKey>) -> &str {
        if self.is_unknown() {
            return "";
        }
        self.annotations.get(key)
    }

    /// Set an annotation; ignored on the sentinel.
    pub fn set_annotation(&mut self, key: impl Into<AnnotationKey>, value: impl Into<String>) {
        if !self.is_unknown() {
            self.annotations.set(key, value);
        }
    }
}

impl PartialEq for FieldSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.title == other.title
            && self.index == other.index
            && self.type_ident == other.type_ident
            && self.type_name == other.type_name
            && self.offset == other.offset
            && self.size == other.size
            && self.annotations == other.annotations
    }
}

impl Eq for FieldSchema {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sentinel() {
        let unknown = RecordSchema::unknown();
        assert!(unknown.is_unknown());
        assert_eq!(unknown.name, "unknown");
        assert_eq!(unknown.field_count(), 0);
    }

    #[test]
    fn test_sentinel_ignores_annotations() {
        let mut unknown = RecordSchema::unknown();
        unknown.set_annotation(MetaKey::Description, "ignored");
        assert_eq!(unknown.annotation(MetaKey::Description), "");
        assert!(unknown.annotations.is_empty());

        let mut field = FieldSchema::unknown();
        field.set_annotation("icon", "ignored");
        assert_eq!(field.annotation("icon"), "");
        assert_eq!(field.index, UNKNOWN_INDEX);
    }

    #[test]
    fn test_record_annotations() {
        let mut record = RecordSchema::new("Transform2D", TypeIdent::from_name("Transform2D"))
            .with_title("Transform 2D");
        record.set_annotation(MetaKey::Description, "Describes object in 2D space.");
        record.set_annotation("icon", "assets/transform.png");

        assert_eq!(record.title, "Transform 2D");
        assert_eq!(
            record.annotation(MetaKey::Description),
            "Describes object in 2D space."
        );
        assert_eq!(record.annotation("icon"), "assets/transform.png");
        assert_eq!(record.annotation(MetaKey::Tooltip), "");
    }

    #[test]
    fn test_detached_copy_is_independent() {
        let original = RecordSchema::new("Widget", TypeIdent::from_name("Widget"));
        let mut copy = original.clone();
        copy.set_annotation(MetaKey::Color, "red");
        assert_eq!(original.annotation(MetaKey::Color), "");
        assert_ne!(original, copy);
    }
}
