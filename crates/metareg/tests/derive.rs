// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants

//! `#[derive(Reflect)]` integration tests
//!
//! Validates the declarations generated by the derive macro once they have
//! gone through a registry.

use metareg::{tags, MetaKey, Reflect, RegistrationLedger, RegistryConfig, TypeIdent, TypeRegistry, TypeTag};
use std::mem::offset_of;

#[derive(Debug, Default, Clone, PartialEq, Reflect)]
#[reflect(meta(description = "Describes object in 2D space."))]
#[reflect(meta("icon" = "assets/transform.png"))]
struct Transform2D {
    width: i32,
    height: i32,
    #[reflect(meta(tooltip = "World position (x, y, z)"))]
    position: Vec<f64>,
    rotation: f64,
    scale: f64,
    #[reflect(title = "Label Text", meta(hidden = "true"))]
    text: String,
}

#[derive(Default, Reflect)]
#[reflect(title = "Settings Panel")]
struct PanelSettings {
    max_items: u32,
    #[reflect(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
    r#type: String,
    theme_color: String,
}

fn registry() -> TypeRegistry {
    let mut ledger = RegistrationLedger::new();
    ledger
        .enqueue::<Transform2D>()
        .expect("enqueue")
        .enqueue::<PanelSettings>()
        .expect("enqueue");
    TypeRegistry::bootstrap(RegistryConfig::default(), &mut ledger).expect("bootstrap")
}

// ============================================================================
// Generated identity
// ============================================================================

#[test]
fn test_type_tag_matches_declared_name() {
    assert_eq!(Transform2D::TYPE_NAME, "Transform2D");
    assert_eq!(Transform2D::TYPE_IDENT, TypeIdent::from_name("Transform2D"));
    assert_eq!(PanelSettings::TYPE_IDENT, TypeIdent::from_name("PanelSettings"));
}

#[test]
fn test_describe_lists_fields_in_order() {
    let decl = Transform2D::describe();
    assert_eq!(decl.name(), "Transform2D");
    assert_eq!(
        decl.field_names().collect::<Vec<_>>(),
        vec!["width", "height", "position", "rotation", "scale", "text"]
    );
}

// ============================================================================
// Registered schemas
// ============================================================================

#[test]
fn test_record_schema_from_derive() {
    let registry = registry();
    let record = registry.record_of::<Transform2D>();

    assert_eq!(record.name, "Transform2D");
    assert_eq!(record.title, "Transform 2D");
    assert_eq!(record.field_count(), 6);
    assert_eq!(
        record.annotation(MetaKey::Description),
        "Describes object in 2D space."
    );
    assert_eq!(record.annotation("icon"), "assets/transform.png");
}

#[test]
fn test_field_schemas_from_derive() {
    let registry = registry();

    let position = registry.lookup_field("Transform2D", "position");
    assert_eq!(position.index, 2);
    assert_eq!(position.type_ident, tags::VEC_DOUBLE);
    assert_eq!(position.offset, offset_of!(Transform2D, position));
    assert_eq!(position.size, std::mem::size_of::<Vec<f64>>());
    assert_eq!(position.annotation(MetaKey::Tooltip), "World position (x, y, z)");

    let text = registry.lookup_field("Transform2D", 5);
    assert_eq!(text.name, "text");
    assert_eq!(text.title, "Label Text");
    assert!(text.is_hidden());
    assert!(!position.is_hidden());
}

#[test]
fn test_skip_and_raw_identifiers() {
    let registry = registry();
    let record = registry.lookup_record("PanelSettings");
    assert_eq!(record.title, "Settings Panel");
    assert_eq!(record.field_count(), 3);
    assert!(registry.lookup_field("PanelSettings", "scratch").is_unknown());

    let kind = registry.lookup_field("PanelSettings", 1);
    assert_eq!(kind.name, "type");
    assert_eq!(kind.type_ident, tags::STRING);
    assert_eq!(registry.lookup_field("PanelSettings", 2).title, "Theme Color");
}

// ============================================================================
// Value access on derived records
// ============================================================================

#[test]
fn test_access_on_derived_record() {
    let registry = registry();
    let mut transform = Transform2D::default();

    registry
        .set_value_of(&mut transform, "position", vec![56.0, 58.5, 60.2])
        .expect("set position");
    registry
        .set_value_of(&mut transform, "text", String::from("Hello"))
        .expect("set text");
    registry
        .set_value_of(&mut transform, 3, 90.0f64)
        .expect("set rotation");

    assert_eq!(transform.position, vec![56.0, 58.5, 60.2]);
    assert_eq!(transform.text, "Hello");
    assert_eq!(
        registry.value_of::<f64, _>(&transform, "rotation").expect("rotation"),
        90.0
    );
    assert!(registry.value_of::<i64, _>(&transform, "width").is_err());
}

#[test]
fn test_instance_resolves_record() {
    let registry = registry();
    let settings = PanelSettings::default();
    let any: &dyn std::any::Any = &settings;

    assert_eq!(registry.lookup_record(metareg::RecordKey::Instance(any)).name, "PanelSettings");
    assert_eq!(
        registry.value::<u32>(any, metareg::RecordKey::Instance(any), "max_items"),
        Ok(0)
    );
}

// ============================================================================
// Name collisions
// ============================================================================

mod server {
    #[derive(Default, metareg::Reflect)]
    pub struct Config {
        pub port: u16,
        pub host: String,
    }
}

mod client {
    #[derive(Default, metareg::Reflect)]
    pub struct Config {
        pub retries: u32,
        pub verbose: bool,
    }
}

#[test]
fn test_same_record_name_is_rejected() {
    let mut registry = TypeRegistry::new();
    registry.register::<server::Config>().expect("first Config");

    let err = registry.register::<client::Config>().unwrap_err();
    assert!(matches!(
        err,
        metareg::RegistryError::DuplicateTypeName { ref name, .. } if name == "Config"
    ));

    // The first registration is left untouched
    let names: Vec<_> = registry.fields("Config").iter().map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["port", "host"]);
    let config = server::Config {
        host: "localhost".to_string(),
        ..Default::default()
    };
    assert_eq!(
        registry.value_of::<String, _>(&config, "host"),
        Ok("localhost".to_string())
    );
    let other = client::Config::default();
    assert!(registry.lookup_record(metareg::RecordKey::Instance(&other)).is_unknown());

    // Registering the same type again is still allowed
    registry.register::<server::Config>().expect("re-register");
}
