// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-checked field access through an opaque record handle.
//!
//! Records are handed around as `&dyn Any` / `&mut dyn Any`. Each registered
//! field carries a [`FieldAccess`]: the getter pair captured when the field
//! was declared, erased behind a trait object. Reads and writes go through
//! that pair, so no byte offsets are ever dereferenced.
//!
//! Every accessor checks, in order:
//! 1. the field schema is not the "unknown" sentinel,
//! 2. the requested type's identifier equals the field's declared identifier,
//! 3. the instance is of the record type the field was declared on.
//!
//! # Example
//!
//! ```
//! use metareg::{access, FieldDecl, RecordDecl, Reflect, TypeRegistry};
//! use std::mem::offset_of;
//!
//! #[derive(Default)]
//! struct Widget {
//!     count: i32,
//! }
//! metareg::type_tag!(Widget => "Widget");
//!
//! impl Reflect for Widget {
//!     fn describe() -> RecordDecl<Self> {
//!         RecordDecl::<Self>::new("Widget").field(FieldDecl::<Self>::new::<i32>(
//!             "count",
//!             offset_of!(Widget, count),
//!             |w| &w.count,
//!             |w| &mut w.count,
//!         ))
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Widget>().unwrap();
//!
//! let field = registry.lookup_field("Widget", "count").clone();
//! let mut widget = Widget::default();
//! access::set(&mut widget, &field, 42i32).unwrap();
//! assert_eq!(access::get::<i32>(&widget, &field).unwrap(), 42);
//! assert!(access::get::<f64>(&widget, &field).is_err());
//! ```

use crate::error::AccessError;
use crate::ident::{TypeIdent, TypeTag};
use crate::schema::FieldSchema;
use std::any::{Any, TypeId};
use std::fmt;
use std::mem::size_of;
use std::sync::Arc;

trait ErasedField: Send + Sync {
    fn record_name(&self) -> &'static str;
    fn record_type_id(&self) -> TypeId;
    fn value_name(&self) -> &'static str;
    fn value_ident(&self) -> TypeIdent;
    fn value_size(&self) -> usize;
    fn field_ref<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any>;
    fn field_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct TypedField<R, V> {
    get: fn(&R) -> &V,
    get_mut: fn(&mut R) -> &mut V,
}

impl<R: TypeTag, V: TypeTag> ErasedField for TypedField<R, V> {
    fn record_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn record_type_id(&self) -> TypeId {
        TypeId::of::<R>()
    }

    fn value_name(&self) -> &'static str {
        V::TYPE_NAME
    }

    fn value_ident(&self) -> TypeIdent {
        V::TYPE_IDENT
    }

    fn value_size(&self) -> usize {
        size_of::<V>()
    }

    fn field_ref<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        let record = record.downcast_ref::<R>()?;
        let value: &dyn Any = (self.get)(record);
        Some(value)
    }

    fn field_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let record = record.downcast_mut::<R>()?;
        let value: &mut dyn Any = (self.get_mut)(record);
        Some(value)
    }
}

/// Type-erased getter pair bound to one field of one record type.
#[derive(Clone)]
pub struct FieldAccess(Arc<dyn ErasedField>);

impl FieldAccess {
    /// Capture the accessors of field `V` inside record `R`.
    pub fn new<R: TypeTag, V: TypeTag>(get: fn(&R) -> &V, get_mut: fn(&mut R) -> &mut V) -> Self {
        FieldAccess(Arc::new(TypedField { get, get_mut }))
    }

    /// Declared name of the record type this accessor reads from.
    #[must_use]
    pub fn record_name(&self) -> &'static str {
        self.0.record_name()
    }

    /// Rust type of the record this accessor reads from.
    #[must_use]
    pub fn record_type_id(&self) -> TypeId {
        self.0.record_type_id()
    }

    /// Declared name of the field's value type.
    #[must_use]
    pub fn value_name(&self) -> &'static str {
        self.0.value_name()
    }

    #[must_use]
    pub fn value_ident(&self) -> TypeIdent {
        self.0.value_ident()
    }

    #[must_use]
    pub fn value_size(&self) -> usize {
        self.0.value_size()
    }
}

impl fmt::Debug for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldAccess").field(&self.record_name()).finish()
    }
}

fn checked<'f, T: TypeTag>(field: &'f FieldSchema) -> Result<&'f FieldAccess, AccessError> {
    let access = match field.access() {
        Some(access) if !field.is_unknown() => access,
        _ => return Err(AccessError::FieldNotFound(field.name.clone())),
    };
    if field.type_ident != T::TYPE_IDENT {
        return Err(type_mismatch::<T>(field));
    }
    Ok(access)
}

fn type_mismatch<T: TypeTag>(field: &FieldSchema) -> AccessError {
    AccessError::TypeMismatch {
        field: field.name.clone(),
        declared: field.type_name.clone(),
        requested: T::TYPE_NAME,
    }
}

fn record_mismatch(field: &FieldSchema, access: &FieldAccess) -> AccessError {
    AccessError::RecordMismatch {
        field: field.name.clone(),
        record: access.record_name().to_string(),
    }
}

/// Live reference to the field inside `record`.
pub fn get_ref<'a, T: TypeTag>(record: &'a dyn Any, field: &FieldSchema) -> Result<&'a T, AccessError> {
    let access = checked::<T>(field)?;
    let value = access
        .0
        .field_ref(record)
        .ok_or_else(|| record_mismatch(field, access))?;
    value.downcast_ref::<T>().ok_or_else(|| type_mismatch::<T>(field))
}

/// Live mutable reference to the field inside `record`.
pub fn get_mut<'a, T: TypeTag>(
    record: &'a mut dyn Any,
    field: &FieldSchema,
) -> Result<&'a mut T, AccessError> {
    let access = checked::<T>(field)?;
    let value = access
        .0
        .field_mut(record)
        .ok_or_else(|| record_mismatch(field, access))?;
    value.downcast_mut::<T>().ok_or_else(|| type_mismatch::<T>(field))
}

/// Copy of the field's current value.
pub fn get<T: TypeTag + Clone>(record: &dyn Any, field: &FieldSchema) -> Result<T, AccessError> {
    get_ref::<T>(record, field).cloned()
}

/// Overwrite the field with `value`, dropping the previous value.
pub fn set<T: TypeTag>(record: &mut dyn Any, field: &FieldSchema, value: T) -> Result<(), AccessError> {
    let slot = get_mut::<T>(record, field)?;
    *slot = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Probe {
        level: i32,
        samples: Vec<f64>,
    }
    crate::type_tag!(Probe => "Probe");

    struct Other;
    crate::type_tag!(Other => "Other");

    fn level_field() -> FieldSchema {
        FieldSchema::new(
            "level",
            0,
            offset_of!(Probe, level),
            FieldAccess::new::<Probe, i32>(|p| &p.level, |p| &mut p.level),
        )
    }

    fn samples_field() -> FieldSchema {
        FieldSchema::new(
            "samples",
            1,
            offset_of!(Probe, samples),
            FieldAccess::new::<Probe, Vec<f64>>(|p| &p.samples, |p| &mut p.samples),
        )
    }

    #[test]
    fn test_get_set_roundtrip() {
        let field = level_field();
        let mut probe = Probe::default();

        assert_eq!(get::<i32>(&probe, &field).expect("get"), 0);
        set(&mut probe, &field, 7i32).expect("set");
        assert_eq!(get::<i32>(&probe, &field).expect("get"), 7);
        assert_eq!(probe.level, 7);
    }

    #[test]
    fn test_set_replaces_sequence_buffer() {
        let field = samples_field();
        let mut probe = Probe {
            level: 1,
            samples: vec![1.0, 2.0],
        };

        set(&mut probe, &field, vec![56.0, 58.5, 60.2]).expect("set");
        assert_eq!(probe.samples, vec![56.0, 58.5, 60.2]);
        assert_eq!(probe.level, 1);
    }

    #[test]
    fn test_reference_aliases_record() {
        let field = samples_field();
        let mut probe = Probe::default();

        get_mut::<Vec<f64>>(&mut probe, &field)
            .expect("get_mut")
            .push(3.5);
        let samples = get_ref::<Vec<f64>>(&probe, &field).expect("get_ref");
        assert_eq!(samples.as_slice(), &[3.5]);
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let field = level_field();
        let mut probe = Probe::default();

        let err = get::<f64>(&probe, &field).unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                field: "level".into(),
                declared: "i32".into(),
                requested: "f64",
            }
        );
        assert!(set(&mut probe, &field, 1u32).is_err());
        assert_eq!(probe.level, 0);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let probe = Probe::default();
        let err = get::<i32>(&probe, &FieldSchema::unknown()).unwrap_err();
        assert_eq!(err, AccessError::FieldNotFound("unknown".into()));
    }

    #[test]
    fn test_wrong_record_is_rejected() {
        let field = level_field();
        let other = Other;
        let err = get::<i32>(&other, &field).unwrap_err();
        assert_eq!(
            err,
            AccessError::RecordMismatch {
                field: "level".into(),
                record: "Probe".into(),
            }
        );
    }

    #[test]
    fn test_declared_metadata() {
        let field = level_field();
        assert_eq!(field.type_ident, TypeIdent::from_name("i32"));
        assert_eq!(field.size, size_of::<i32>());
        assert_eq!(format!("{:?}", field.access().expect("access")), "FieldAccess(\"Probe\")");
    }
}
