// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deferred registrations.
//!
//! Modules enqueue their records on a [`RegistrationLedger`] while the
//! application starts; [`RegistrationLedger::initialize`] then replays them
//! once, in order, against a [`TypeRegistry`].
//!
//! ```
//! use metareg::{RegistrationLedger, RecordSchema, TypeIdent, TypeRegistry};
//!
//! let mut ledger = RegistrationLedger::new();
//! ledger
//!     .enqueue_fn("Marker", |registry| {
//!         registry.register_record(RecordSchema::new("Marker", TypeIdent::from_name("Marker")))
//!     })
//!     .unwrap();
//!
//! let mut registry = TypeRegistry::new();
//! assert_eq!(ledger.initialize(&mut registry).unwrap(), 1);
//! assert!(registry.contains("Marker"));
//! assert!(ledger.initialize(&mut registry).is_err());
//! ```

use crate::decl::Reflect;
use crate::error::RegistryError;
use crate::registry::TypeRegistry;
use std::fmt;

type Registration = Box<dyn FnOnce(&mut TypeRegistry) -> Result<(), RegistryError> + Send>;

/// Ordered list of registrations waiting for a registry.
#[derive(Default)]
pub struct RegistrationLedger {
    pending: Vec<(String, Registration)>,
    initialized: bool,
}

impl RegistrationLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue registration of `R` from its own description.
    pub fn enqueue<R: Reflect>(&mut self) -> Result<&mut Self, RegistryError> {
        self.enqueue_fn(R::TYPE_NAME, |registry| registry.register::<R>().map(|_| ()))
    }

    /// Queue an arbitrary registration step.
    pub fn enqueue_fn<F>(&mut self, label: impl Into<String>, f: F) -> Result<&mut Self, RegistryError>
    where
        F: FnOnce(&mut TypeRegistry) -> Result<(), RegistryError> + Send + 'static,
    {
        if self.initialized {
            return Err(RegistryError::AlreadyInitialized);
        }
        self.pending.push((label.into(), Box::new(f)));
        Ok(self)
    }

    /// Number of pending registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run every pending registration in enqueue order.
    ///
    /// Returns how many ran. The first failure aborts the run and is
    /// returned; the ledger is spent either way, and any later call fails
    /// with [`RegistryError::AlreadyInitialized`].
    pub fn initialize(&mut self, registry: &mut TypeRegistry) -> Result<usize, RegistryError> {
        if self.initialized {
            log::warn!("[ledger] initialize called twice");
            return Err(RegistryError::AlreadyInitialized);
        }
        self.initialized = true;

        let pending = std::mem::take(&mut self.pending);
        let total = pending.len();
        for (done, (label, register)) in pending.into_iter().enumerate() {
            log::debug!("[ledger] {}/{}: {}", done + 1, total, label);
            if let Err(e) = register(registry) {
                log::warn!("[ledger] registration of '{}' failed: {}", label, e);
                return Err(e);
            }
        }
        Ok(total)
    }
}

impl fmt::Debug for RegistrationLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationLedger")
            .field("pending", &self.pending.iter().map(|(l, _)| l).collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .finish()
    }
}
