// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry configuration.
//!
//! Controls how titles are generated at registration and carries metadata
//! overlays applied to already-registered records (localized descriptions,
//! editor hints, ...).
//!
//! # Example YAML
//!
//! ```yaml
//! auto_titles: true
//! title_separators: "_-"
//! records:
//!   - record: Transform2D
//!     title: Transform
//!     meta:
//!       description: Describes object in 2D space.
//!     annotations:
//!       icon: assets/transform.png
//!     fields:
//!       - field: position
//!         meta:
//!           tooltip: World position (x, y, z)
//! ```

use crate::annotation::MetaKey;
use crate::error::RegistryError;
use crate::title::DEFAULT_SEPARATORS;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Registry-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default, deny_unknown_fields))]
pub struct RegistryConfig {
    /// Derive titles from declared names; when off, titles equal names.
    pub auto_titles: bool,
    /// Characters treated as word separators when deriving titles.
    pub title_separators: String,
    /// Metadata overlays applied after registration.
    pub records: Vec<RecordOverride>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            auto_titles: true,
            title_separators: DEFAULT_SEPARATORS.to_string(),
            records: Vec::new(),
        }
    }
}

/// Overlay for one record, addressed by declared name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(deny_unknown_fields))]
pub struct RecordOverride {
    pub record: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    /// Well-known keys by name (`description`, `tooltip`, ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: BTreeMap<String, String>,
    /// Free-form string-keyed annotations.
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Vec<FieldOverride>,
}

/// Overlay for one field, addressed by declared name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(deny_unknown_fields))]
pub struct FieldOverride {
    pub field: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meta: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: BTreeMap<String, String>,
}

impl RegistryConfig {
    /// Reject empty targets and unknown meta key names.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for record in &self.records {
            if record.record.is_empty() {
                return Err(RegistryError::Config("record override without a name".into()));
            }
            check_meta(&record.record, &record.meta)?;
            for field in &record.fields {
                if field.field.is_empty() {
                    return Err(RegistryError::Config(format!(
                        "field override without a name in record '{}'",
                        record.record
                    )));
                }
                check_meta(&format!("{}.{}", record.record, field.field), &field.meta)?;
            }
        }
        Ok(())
    }
}

fn check_meta(target: &str, meta: &BTreeMap<String, String>) -> Result<(), RegistryError> {
    for key in meta.keys() {
        key.parse::<MetaKey>()
            .map_err(|e| RegistryError::Config(format!("{} (in '{}')", e, target)))?;
    }
    Ok(())
}

#[cfg(feature = "config-loaders")]
mod loaders {
    use super::RegistryConfig;
    use crate::error::RegistryError;
    use std::fs;
    use std::path::Path;

    impl RegistryConfig {
        /// Load from a `.yaml`/`.yml` or `.json` file, chosen by extension.
        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
            let path = path.as_ref();
            let content = fs::read_to_string(path)?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml" | "yml") => Self::from_yaml_str(&content),
                Some("json") => Self::from_json_str(&content),
                other => Err(RegistryError::Config(format!(
                    "unsupported configuration format: {}",
                    other.unwrap_or("<none>")
                ))),
            }
        }

        pub fn from_yaml_str(content: &str) -> Result<Self, RegistryError> {
            let config: Self = serde_yaml::from_str(content)
                .map_err(|e| RegistryError::Config(format!("YAML parse error: {}", e)))?;
            config.validate()?;
            Ok(config)
        }

        pub fn from_json_str(content: &str) -> Result<Self, RegistryError> {
            let config: Self = serde_json::from_str(content)
                .map_err(|e| RegistryError::Config(format!("JSON parse error: {}", e)))?;
            config.validate()?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert!(config.auto_titles);
        assert_eq!(config.title_separators, "_");
        assert!(config.records.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_meta() {
        let mut meta = BTreeMap::new();
        meta.insert("colour".to_string(), "red".to_string());
        let config = RegistryConfig {
            records: vec![RecordOverride {
                record: "Widget".into(),
                meta,
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_validate_rejects_unnamed_field() {
        let config = RegistryConfig {
            records: vec![RecordOverride {
                record: "Widget".into(),
                fields: vec![FieldOverride::default()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RegistryError::Config(_))));
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
title_separators: "_-"
records:
  - record: Transform2D
    title: Transform
    meta:
      description: Describes object in 2D space.
    annotations:
      icon: assets/transform.png
    fields:
      - field: position
        meta:
          tooltip: World position
"#;
        let config = RegistryConfig::from_yaml_str(yaml).expect("parse");
        assert!(config.auto_titles);
        assert_eq!(config.title_separators, "_-");
        let record = &config.records[0];
        assert_eq!(record.title.as_deref(), Some("Transform"));
        assert_eq!(record.annotations["icon"], "assets/transform.png");
        assert_eq!(record.fields[0].meta["tooltip"], "World position");
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_parse_json_rejects_unknown_keys() {
        assert!(RegistryConfig::from_json_str(r#"{"auto_titles": false}"#).is_ok());
        assert!(RegistryConfig::from_json_str(r#"{"autotitles": false}"#).is_err());
    }

    #[cfg(feature = "config-loaders")]
    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("registry.yaml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "auto_titles: false").expect("write");

        let config = RegistryConfig::load(&path).expect("load");
        assert!(!config.auto_titles);

        let bad = dir.path().join("registry.toml");
        std::fs::write(&bad, "auto_titles = false").expect("write");
        assert!(matches!(
            RegistryConfig::load(&bad),
            Err(RegistryError::Config(_))
        ));
        assert!(matches!(
            RegistryConfig::load(dir.path().join("missing.yaml")),
            Err(RegistryError::Io(_))
        ));
    }
}
