// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema store.
//!
//! [`TypeRegistry`] maps a [`TypeIdent`] to its [`RecordSchema`] and to the
//! record's fields, keyed by byte offset. Lookups never fail: a miss yields
//! the "unknown" sentinel schema, which the accessors then refuse.

use crate::access;
use crate::annotation::{AnnotationStore, MetaKey};
use crate::config::{FieldOverride, RecordOverride, RegistryConfig};
use crate::decl::{RecordDecl, Reflect};
use crate::error::{AccessError, RegistryError};
use crate::ident::{TypeIdent, TypeTag};
use crate::ledger::RegistrationLedger;
use crate::schema::{FieldSchema, RecordSchema};
use crate::title::create_title_with;
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Lookup keys
// ---------------------------------------------------------------------------

/// Ways to designate a registered record.
#[derive(Clone, Copy)]
pub enum RecordKey<'a> {
    Ident(TypeIdent),
    /// Declared name; resolved by linear scan.
    Name(&'a str),
    /// A live instance; resolved through its Rust type.
    Instance(&'a dyn Any),
}

impl From<TypeIdent> for RecordKey<'_> {
    fn from(ident: TypeIdent) -> Self {
        RecordKey::Ident(ident)
    }
}

impl<'a> From<&'a str> for RecordKey<'a> {
    fn from(name: &'a str) -> Self {
        RecordKey::Name(name)
    }
}

impl<'a> From<&'a String> for RecordKey<'a> {
    fn from(name: &'a String) -> Self {
        RecordKey::Name(name.as_str())
    }
}

impl<'a> From<&'a RecordSchema> for RecordKey<'a> {
    fn from(schema: &'a RecordSchema) -> Self {
        RecordKey::Ident(schema.type_ident)
    }
}

impl std::fmt::Debug for RecordKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::Ident(ident) => write!(f, "Ident({})", ident),
            RecordKey::Name(name) => write!(f, "Name({:?})", name),
            RecordKey::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// Ways to designate a field inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey<'a> {
    /// Position in the record declaration.
    Index(usize),
    /// Declared name; resolved by linear scan.
    Name(&'a str),
}

impl From<usize> for FieldKey<'_> {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

/// Negative indices never match a field.
impl From<i32> for FieldKey<'_> {
    fn from(index: i32) -> Self {
        FieldKey::Index(usize::try_from(index).unwrap_or(crate::schema::UNKNOWN_INDEX))
    }
}

impl<'a> From<&'a str> for FieldKey<'a> {
    fn from(name: &'a str) -> Self {
        FieldKey::Name(name)
    }
}

impl<'a> From<&'a String> for FieldKey<'a> {
    fn from(name: &'a String) -> Self {
        FieldKey::Name(name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Override report
// ---------------------------------------------------------------------------

/// Outcome of [`TypeRegistry::apply_overrides`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideReport {
    /// Records and fields that received at least one override.
    pub applied: usize,
    /// Targets that matched nothing, as `Record` or `Record.field`.
    pub unmatched: Vec<String>,
}

impl OverrideReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// True when `ident` is already bound to a Rust type other than `type_id`.
fn bound_elsewhere(
    rust_types: &HashMap<TypeId, TypeIdent>,
    type_id: TypeId,
    ident: TypeIdent,
) -> bool {
    rust_types
        .iter()
        .any(|(other, bound)| *bound == ident && *other != type_id)
}

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

/// Runtime store of record and field schemas.
///
/// Built once by the application (see [`TypeRegistry::bootstrap`]) and shared
/// by reference afterwards. Registered metadata is only mutated through
/// [`record_mut`](Self::record_mut) and [`field_mut`](Self::field_mut).
#[derive(Debug)]
pub struct TypeRegistry {
    config: RegistryConfig,
    records: HashMap<TypeIdent, RecordSchema>,
    members: HashMap<TypeIdent, BTreeMap<usize, FieldSchema>>,
    rust_types: HashMap<TypeId, TypeIdent>,
    unknown_record: RecordSchema,
    unknown_field: FieldSchema,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl TypeRegistry {
    /// Empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            members: HashMap::new(),
            rust_types: HashMap::new(),
            unknown_record: RecordSchema::unknown(),
            unknown_field: FieldSchema::unknown(),
        }
    }

    /// Build a registry, run every pending registration of `ledger`, then
    /// apply the overrides carried by `config`.
    pub fn bootstrap(
        config: RegistryConfig,
        ledger: &mut RegistrationLedger,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::with_config(config);
        let count = ledger.initialize(&mut registry)?;

        let overrides = registry.config.clone();
        let report = registry.apply_overrides(&overrides);
        log::debug!(
            "[registry] bootstrap: {} registrations, {} records, {} overrides applied",
            count,
            registry.record_count(),
            report.applied
        );
        Ok(registry)
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Insert or replace a record schema.
    ///
    /// The stored `field_count` is recomputed from the fields already
    /// registered for the type, whatever the submitted value.
    pub fn register_record(&mut self, mut schema: RecordSchema) -> Result<(), RegistryError> {
        if schema.type_ident.is_none() {
            return Err(RegistryError::NullTypeIdent { name: schema.name });
        }

        schema.field_count = self.members.get(&schema.type_ident).map_or(0, BTreeMap::len);
        log::debug!(
            "[registry] register record '{}' ({})",
            schema.name,
            schema.type_ident
        );
        if let Some(previous) = self.records.insert(schema.type_ident, schema) {
            log::debug!("[registry] replaced record '{}'", previous.name);
        }
        Ok(())
    }

    /// Insert a field into an already-registered record.
    ///
    /// Fields are keyed by offset: a field registered at an occupied offset
    /// replaces the previous one.
    pub fn register_field(
        &mut self,
        record: &RecordSchema,
        field: FieldSchema,
    ) -> Result<(), RegistryError> {
        let ident = record.type_ident;
        let Some(stored) = self.records.get_mut(&ident) else {
            return Err(RegistryError::RecordNotRegistered {
                record: ident,
                field: field.name,
            });
        };

        if let Some(type_id) = field.access().map(|a| a.record_type_id()) {
            Self::claim_type(&mut self.rust_types, type_id, ident, &stored.name)?;
        }

        let fields = self.members.entry(ident).or_default();
        let name = field.name.clone();
        if let Some(previous) = fields.insert(field.offset, field) {
            log::debug!(
                "[registry] {}: field '{}' overwrites '{}' at offset {}",
                stored.name,
                name,
                previous.name,
                previous.offset
            );
        }
        stored.field_count = fields.len();
        Ok(())
    }

    /// Register a record and all its declared fields.
    pub fn register_decl<R: TypeTag>(&mut self, decl: RecordDecl<R>) -> Result<TypeIdent, RegistryError> {
        log::debug!(
            "[registry] declare '{}' with fields [{}]",
            decl.name(),
            decl.field_names().collect::<Vec<_>>().join(", ")
        );
        let RecordDecl {
            name,
            title,
            annotations,
            fields,
        } = decl;

        if bound_elsewhere(&self.rust_types, TypeId::of::<R>(), R::TYPE_IDENT) {
            return Err(RegistryError::DuplicateTypeName {
                name,
                ident: R::TYPE_IDENT,
            });
        }

        let title = title.unwrap_or_else(|| self.title_for(&name));
        let mut schema = RecordSchema::new(name, R::TYPE_IDENT).with_title(title);
        schema.annotations = annotations;
        self.register_record(schema.clone())?;

        for (index, field) in fields.into_iter().enumerate() {
            let field = field.into_schema(index, |name| self.title_for(name));
            self.register_field(&schema, field)?;
        }
        Self::claim_type(&mut self.rust_types, TypeId::of::<R>(), R::TYPE_IDENT, &schema.name)?;
        Ok(R::TYPE_IDENT)
    }

    /// Bind a Rust type to a record identifier, once.
    fn claim_type(
        rust_types: &mut HashMap<TypeId, TypeIdent>,
        type_id: TypeId,
        ident: TypeIdent,
        name: &str,
    ) -> Result<(), RegistryError> {
        if bound_elsewhere(rust_types, type_id, ident) {
            log::warn!("[registry] '{}' ({}) claimed by a second Rust type", name, ident);
            return Err(RegistryError::DuplicateTypeName {
                name: name.to_string(),
                ident,
            });
        }
        rust_types.insert(type_id, ident);
        Ok(())
    }

    /// Register `R` from its own description.
    pub fn register<R: Reflect>(&mut self) -> Result<TypeIdent, RegistryError> {
        self.register_decl(R::describe())
    }

    fn title_for(&self, name: &str) -> String {
        if self.config.auto_titles {
            create_title_with(name, &self.config.title_separators)
        } else {
            name.to_string()
        }
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    fn resolve(&self, key: RecordKey<'_>) -> Option<TypeIdent> {
        match key {
            RecordKey::Ident(ident) => self.records.contains_key(&ident).then_some(ident),
            RecordKey::Name(name) => self
                .records
                .values()
                .find(|r| r.name == name)
                .map(|r| r.type_ident),
            RecordKey::Instance(instance) => self.rust_types.get(&Any::type_id(instance)).copied(),
        }
    }

    fn find_field(&self, ident: TypeIdent, key: FieldKey<'_>) -> Option<&FieldSchema> {
        let fields = self.members.get(&ident)?;
        match key {
            FieldKey::Index(index) => fields.values().find(|f| f.index == index),
            FieldKey::Name(name) => fields.values().find(|f| f.name == name),
        }
    }

    /// Record schema for `key`, or the sentinel when nothing matches.
    #[must_use]
    pub fn lookup_record<'k>(&self, key: impl Into<RecordKey<'k>>) -> &RecordSchema {
        self.resolve(key.into())
            .and_then(|ident| self.records.get(&ident))
            .unwrap_or(&self.unknown_record)
    }

    /// Record schema registered for type `R`.
    #[must_use]
    pub fn record_of<R: TypeTag>(&self) -> &RecordSchema {
        self.lookup_record(R::TYPE_IDENT)
    }

    /// Record schema of `record`'s type.
    #[must_use]
    pub fn record_of_val<R: TypeTag>(&self, _record: &R) -> &RecordSchema {
        self.lookup_record(R::TYPE_IDENT)
    }

    /// Field schema, or the sentinel when the record or field is unknown.
    #[must_use]
    pub fn lookup_field<'k, 'f>(
        &self,
        record: impl Into<RecordKey<'k>>,
        field: impl Into<FieldKey<'f>>,
    ) -> &FieldSchema {
        self.resolve(record.into())
            .and_then(|ident| self.find_field(ident, field.into()))
            .unwrap_or(&self.unknown_field)
    }

    /// Fields of a record in declaration order; empty when unknown.
    #[must_use]
    pub fn fields<'k>(&self, record: impl Into<RecordKey<'k>>) -> Vec<&FieldSchema> {
        let mut fields = self.fields_by_offset(record);
        fields.sort_by_key(|f| f.index);
        fields
    }

    /// Fields of a record in ascending offset order; empty when unknown.
    #[must_use]
    pub fn fields_by_offset<'k>(&self, record: impl Into<RecordKey<'k>>) -> Vec<&FieldSchema> {
        self.resolve(record.into())
            .and_then(|ident| self.members.get(&ident))
            .map(|fields| fields.values().collect())
            .unwrap_or_default()
    }

    /// Mutable access to a registered record schema.
    pub fn record_mut<'k>(&mut self, key: impl Into<RecordKey<'k>>) -> Option<&mut RecordSchema> {
        let ident = self.resolve(key.into())?;
        self.records.get_mut(&ident)
    }

    /// Mutable access to a registered field schema.
    pub fn field_mut<'k, 'f>(
        &mut self,
        record: impl Into<RecordKey<'k>>,
        field: impl Into<FieldKey<'f>>,
    ) -> Option<&mut FieldSchema> {
        let ident = self.resolve(record.into())?;
        let offset = self.find_field(ident, field.into())?.offset;
        self.members.get_mut(&ident)?.get_mut(&offset)
    }

    #[must_use]
    pub fn contains<'k>(&self, key: impl Into<RecordKey<'k>>) -> bool {
        self.resolve(key.into()).is_some()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All registered records, sorted by name.
    #[must_use]
    pub fn records(&self) -> Vec<&RecordSchema> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    // -----------------------------------------------------------------------
    // Value access
    // -----------------------------------------------------------------------

    /// Copy of a field's value inside `instance`.
    pub fn value<'k, 'f, T: TypeTag + Clone>(
        &self,
        instance: &dyn Any,
        record: impl Into<RecordKey<'k>>,
        field: impl Into<FieldKey<'f>>,
    ) -> Result<T, AccessError> {
        access::get(instance, self.lookup_field(record, field))
    }

    /// Overwrite a field's value inside `instance`.
    pub fn set_value<'k, 'f, T: TypeTag>(
        &self,
        instance: &mut dyn Any,
        record: impl Into<RecordKey<'k>>,
        field: impl Into<FieldKey<'f>>,
        value: T,
    ) -> Result<(), AccessError> {
        access::set(instance, self.lookup_field(record, field), value)
    }

    /// Copy of a field's value inside a typed record.
    pub fn value_of<'f, T: TypeTag + Clone, R: TypeTag>(
        &self,
        record: &R,
        field: impl Into<FieldKey<'f>>,
    ) -> Result<T, AccessError> {
        self.value(record, R::TYPE_IDENT, field)
    }

    /// Overwrite a field's value inside a typed record.
    pub fn set_value_of<'f, T: TypeTag, R: TypeTag>(
        &self,
        record: &mut R,
        field: impl Into<FieldKey<'f>>,
        value: T,
    ) -> Result<(), AccessError> {
        self.set_value(record, R::TYPE_IDENT, field, value)
    }

    // -----------------------------------------------------------------------
    // Configuration overrides
    // -----------------------------------------------------------------------

    /// Apply title and annotation overlays to registered records and fields.
    ///
    /// Targets that match nothing are logged and listed in the report.
    pub fn apply_overrides(&mut self, config: &RegistryConfig) -> OverrideReport {
        let mut report = OverrideReport::default();

        for overlay in &config.records {
            let Some(ident) = self.resolve(RecordKey::Name(&overlay.record)) else {
                log::warn!("[registry] override for unknown record '{}'", overlay.record);
                report.unmatched.push(overlay.record.clone());
                continue;
            };

            if let Some(record) = self.records.get_mut(&ident) {
                apply_record_overlay(record, overlay);
                report.applied += 1;
            }

            for field_overlay in &overlay.fields {
                match self.field_mut(ident, field_overlay.field.as_str()) {
                    Some(field) => {
                        apply_field_overlay(field, field_overlay);
                        report.applied += 1;
                    }
                    None => {
                        let target = format!("{}.{}", overlay.record, field_overlay.field);
                        log::warn!("[registry] override for unknown field '{}'", target);
                        report.unmatched.push(target);
                    }
                }
            }
        }
        report
    }
}

fn parse_meta(target: &str, key: &str) -> Option<MetaKey> {
    match key.parse::<MetaKey>() {
        Ok(meta) => Some(meta),
        Err(e) => {
            log::warn!("[registry] {}: {}", target, e);
            None
        }
    }
}

/// Annotations carried by one overlay entry; unknown meta keys are dropped.
fn overlay_annotations(
    target: &str,
    meta: &BTreeMap<String, String>,
    named: &BTreeMap<String, String>,
) -> AnnotationStore {
    let mut store = AnnotationStore::new();
    for (key, value) in meta {
        if let Some(meta) = parse_meta(target, key) {
            store.set(meta, value.as_str());
        }
    }
    for (key, value) in named {
        store.set(key.as_str(), value.as_str());
    }
    store
}

fn apply_record_overlay(record: &mut RecordSchema, overlay: &RecordOverride) {
    if let Some(title) = &overlay.title {
        record.title.clone_from(title);
    }
    let extra = overlay_annotations(&overlay.record, &overlay.meta, &overlay.annotations);
    record.annotations.merge(&extra);
}

fn apply_field_overlay(field: &mut FieldSchema, overlay: &FieldOverride) {
    if let Some(title) = &overlay.title {
        field.title.clone_from(title);
    }
    let extra = overlay_annotations(&overlay.field, &overlay.meta, &overlay.annotations);
    field.annotations.merge(&extra);
}
