// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! User metadata attached to record and field schemas.
//!
//! An [`AnnotationStore`] holds two independent maps: one keyed by integers
//! (usually a [`MetaKey`]) and one keyed by free-form strings. A key may be
//! present in both maps at once.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Well-known integer annotation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum MetaKey {
    Description = 0,
    Hidden = 1,
    Type = 2,
    Color = 3,
    Icon = 4,
    Tooltip = 5,
}

impl MetaKey {
    pub const ALL: [MetaKey; 6] = [
        MetaKey::Description,
        MetaKey::Hidden,
        MetaKey::Type,
        MetaKey::Color,
        MetaKey::Icon,
        MetaKey::Tooltip,
    ];

    /// Lowercase name used in configuration files and derive attributes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetaKey::Description => "description",
            MetaKey::Hidden => "hidden",
            MetaKey::Type => "type",
            MetaKey::Color => "color",
            MetaKey::Icon => "icon",
            MetaKey::Tooltip => "tooltip",
        }
    }
}

impl fmt::Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetaKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown meta key: {}", s))
    }
}

/// Key into an [`AnnotationStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationKey {
    Int(i32),
    Name(String),
}

impl From<i32> for AnnotationKey {
    fn from(key: i32) -> Self {
        AnnotationKey::Int(key)
    }
}

impl From<MetaKey> for AnnotationKey {
    fn from(key: MetaKey) -> Self {
        AnnotationKey::Int(key as i32)
    }
}

impl From<&str> for AnnotationKey {
    fn from(key: &str) -> Self {
        AnnotationKey::Name(key.to_string())
    }
}

impl From<String> for AnnotationKey {
    fn from(key: String) -> Self {
        AnnotationKey::Name(key)
    }
}

/// Pair of annotation maps owned by a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AnnotationStore {
    by_int: HashMap<i32, String>,
    by_name: BTreeMap<String, String>,
}

impl AnnotationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an annotation.
    pub fn set(&mut self, key: impl Into<AnnotationKey>, value: impl Into<String>) {
        match key.into() {
            AnnotationKey::Int(k) => {
                self.by_int.insert(k, value.into());
            }
            AnnotationKey::Name(k) => {
                self.by_name.insert(k, value.into());
            }
        }
    }

    /// Stored value, or `""` when the key is absent.
    #[must_use]
    pub fn get(&self, key: impl Into<AnnotationKey>) -> &str {
        let value = match key.into() {
            AnnotationKey::Int(k) => self.by_int.get(&k),
            AnnotationKey::Name(k) => self.by_name.get(&k),
        };
        value.map_or("", String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: impl Into<AnnotationKey>) -> bool {
        match key.into() {
            AnnotationKey::Int(k) => self.by_int.contains_key(&k),
            AnnotationKey::Name(k) => self.by_name.contains_key(&k),
        }
    }

    /// Total number of entries across both maps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_int.len() + self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_int.is_empty() && self.by_name.is_empty()
    }

    /// Integer-keyed entries sorted by key.
    pub fn int_entries(&self) -> impl Iterator<Item = (i32, &str)> {
        let mut entries: Vec<_> = self.by_int.iter().map(|(k, v)| (*k, v.as_str())).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries.into_iter()
    }

    /// String-keyed entries in key order.
    pub fn named_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` into `self`, replacing existing keys.
    pub fn merge(&mut self, other: &AnnotationStore) {
        for (k, v) in &other.by_int {
            self.by_int.insert(*k, v.clone());
        }
        for (k, v) in &other.by_name {
            self.by_name.insert(k.clone(), v.clone());
        }
    }
}
