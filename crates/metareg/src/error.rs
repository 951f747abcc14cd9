// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for registration and field access.

use crate::ident::TypeIdent;
use thiserror::Error;

/// Errors raised while populating or configuring a [`TypeRegistry`](crate::TypeRegistry).
///
/// Every variant denotes a programming or deployment mistake in the
/// registration declarations; none of them is produced by a lookup miss.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A record was submitted with the "no type" identifier.
    #[error("record '{name}' has type identifier 0, error in registration?")]
    NullTypeIdent { name: String },

    /// A field was registered against a record that was never registered.
    #[error("field '{field}' registered for unknown record {record} (register the record first)")]
    RecordNotRegistered { record: TypeIdent, field: String },

    /// Another Rust type already holds the identifier derived from this name.
    #[error("record '{name}' ({ident}) is already registered for a different Rust type (record names must be unique)")]
    DuplicateTypeName { name: String, ident: TypeIdent },

    /// The registration ledger was already drained.
    #[error("registration ledger already initialized")]
    AlreadyInitialized,

    /// Invalid registry configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the type-checked field accessors.
///
/// A failed access never hands back a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The field schema is the "unknown" sentinel (lookup miss upstream).
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Requested value type differs from the field's declared type.
    #[error("type mismatch on field '{field}': declared {declared}, requested {requested}")]
    TypeMismatch {
        field: String,
        declared: String,
        requested: &'static str,
    },

    /// The instance is not of the record type the field belongs to.
    #[error("field '{field}' belongs to record '{record}', instance is of another type")]
    RecordMismatch { field: String, record: String },
}
