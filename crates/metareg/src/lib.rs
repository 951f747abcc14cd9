// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # metareg - runtime metadata registry for plain Rust records
//!
//! Programs describe the shape of their records (field names, field types,
//! display and documentation metadata) once, then inspect or mutate
//! instances held behind `&dyn Any` through type-checked accessors.
//!
//! ## Quick Start
//!
//! ```rust
//! use metareg::{MetaKey, Reflect, RegistrationLedger, RegistryConfig, TypeRegistry};
//!
//! #[derive(Default, Reflect)]
//! #[reflect(meta(description = "A counter with a label."))]
//! struct Widget {
//!     count: i32,
//!     #[reflect(title = "Caption")]
//!     label: String,
//! }
//!
//! let mut ledger = RegistrationLedger::new();
//! ledger.enqueue::<Widget>().unwrap();
//! let registry = TypeRegistry::bootstrap(RegistryConfig::default(), &mut ledger).unwrap();
//!
//! let record = registry.record_of::<Widget>();
//! assert_eq!(record.field_count(), 2);
//! assert_eq!(record.annotation(MetaKey::Description), "A counter with a label.");
//!
//! let mut widget = Widget::default();
//! registry.set_value_of(&mut widget, "count", 42i32).unwrap();
//! assert_eq!(registry.value_of::<i32, _>(&widget, 0).unwrap(), 42);
//! assert!(registry.value_of::<f64, _>(&widget, "count").is_err());
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   #[derive(Reflect)] / RecordDecl
//!            |
//!            v
//!   RegistrationLedger --initialize--> TypeRegistry <-- RegistryConfig overrides
//!                                           |
//!                              lookup_record / lookup_field
//!                                           |
//!                                           v
//!                          access::get / get_ref / get_mut / set
//! ```
//!
//! ## Modules Overview
//!
//! - [`registry`] - schema store and multi-key lookups
//! - [`access`] - type-checked reads and writes through `&dyn Any`
//! - [`decl`] - fluent record declarations and the [`Reflect`](trait@Reflect) trait
//! - [`ledger`] - deferred registrations replayed once at start-up
//! - [`annotation`] - integer- and string-keyed metadata
//! - [`title`] - display titles derived from identifiers
//! - [`config`] - YAML/JSON configuration and metadata overlays

// Allow the derive macro to work inside this crate's tests
extern crate self as metareg;

pub mod access;
pub mod annotation;
pub mod config;
pub mod decl;
pub mod error;
pub mod ident;
pub mod ledger;
pub mod registry;
pub mod schema;
pub mod title;

pub use access::FieldAccess;
pub use annotation::{AnnotationKey, AnnotationStore, MetaKey};
pub use config::{FieldOverride, RecordOverride, RegistryConfig};
pub use decl::{FieldDecl, RecordDecl, Reflect};
pub use error::{AccessError, RegistryError};
pub use ident::{tags, TypeIdent, TypeTag};
pub use ledger::RegistrationLedger;
pub use metareg_codegen::Reflect; // Derive macro (for #[derive(metareg::Reflect)])
pub use registry::{FieldKey, OverrideReport, RecordKey, TypeRegistry};
pub use schema::{FieldSchema, RecordSchema, UNKNOWN_INDEX, UNKNOWN_NAME};
