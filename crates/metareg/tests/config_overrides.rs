// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configuration file and catalog export tests

#![cfg(feature = "config-loaders")]

use metareg::{MetaKey, Reflect, RegistrationLedger, RegistryConfig, TypeRegistry};
use std::fs;

#[derive(Default, Reflect)]
struct Transform2D {
    width: i32,
    height: i32,
    position: Vec<f64>,
}

const OVERRIDES: &str = r##"
title_separators: "_-"
records:
  - record: Transform2D
    title: Transform
    meta:
      description: Describes object in 2D space.
      color: "#ff8800"
    annotations:
      category: geometry
    fields:
      - field: position
        title: World Position
        meta:
          tooltip: x, y, z
      - field: depth
"##;

fn bootstrap(config: RegistryConfig) -> TypeRegistry {
    let mut ledger = RegistrationLedger::new();
    ledger.enqueue::<Transform2D>().expect("enqueue");
    TypeRegistry::bootstrap(config, &mut ledger).expect("bootstrap")
}

#[test]
fn test_yaml_overrides_applied_at_bootstrap() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("metareg.yaml");
    fs::write(&path, OVERRIDES).expect("write");

    let config = RegistryConfig::load(&path).expect("load");
    let registry = bootstrap(config);

    let record = registry.lookup_record("Transform2D");
    assert_eq!(record.title, "Transform");
    assert_eq!(record.annotation(MetaKey::Description), "Describes object in 2D space.");
    assert_eq!(record.annotation(MetaKey::Color), "#ff8800");
    assert_eq!(record.annotation("category"), "geometry");

    let position = registry.lookup_field("Transform2D", "position");
    assert_eq!(position.title, "World Position");
    assert_eq!(position.annotation(MetaKey::Tooltip), "x, y, z");
    assert_eq!(registry.lookup_field("Transform2D", "width").title, "Width");
}

#[test]
fn test_unmatched_overrides_are_reported() {
    let config = RegistryConfig::from_yaml_str(OVERRIDES).expect("parse");
    let mut registry = bootstrap(RegistryConfig::default());

    let report = registry.apply_overrides(&config);
    assert_eq!(report.applied, 2);
    assert_eq!(report.unmatched, vec!["Transform2D.depth"]);
}

#[test]
fn test_json_config_disables_titles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("metareg.json");
    fs::write(&path, r#"{ "auto_titles": false }"#).expect("write");

    let registry = bootstrap(RegistryConfig::load(&path).expect("load"));
    assert_eq!(registry.lookup_record("Transform2D").title, "Transform2D");
    assert_eq!(registry.lookup_field("Transform2D", 2).title, "position");
}

#[test]
fn test_catalog_serializes_metadata_only() {
    let registry = bootstrap(RegistryConfig::from_yaml_str(OVERRIDES).expect("parse"));

    let json = serde_json::to_value(registry.fields("Transform2D")).expect("serialize");
    let fields = json.as_array().expect("array");
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[2]["name"], "position");
    assert_eq!(fields[2]["type_name"], "Vec<f64>");
    assert!(fields[2].get("access").is_none());

    let records = serde_json::to_value(registry.records()).expect("serialize");
    assert_eq!(records[0]["name"], "Transform2D");
    assert_eq!(records[0]["field_count"], 3);
}
