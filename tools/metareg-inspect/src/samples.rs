// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in sample records and the instances the CLI operates on.

use metareg::{Reflect, RegistrationLedger, RegistryError};
use std::any::Any;

/// Sample component describing the location of an object.
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(meta(description = "Describes the location and positioning of an object."))]
pub struct Transform2D {
    pub width: i32,
    pub height: i32,
    #[reflect(
        title = "Object Position",
        meta(description = "Location of an object in space.")
    )]
    pub position: Vec<f64>,
    pub rotation: Vec<f64>,
    pub scale: Vec<f64>,
    pub text: String,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            position: vec![1.0, 2.0, 3.0],
            rotation: vec![4.0, 5.0, 6.0],
            scale: vec![7.0, 8.0, 9.0],
            text: "hello world!".to_string(),
        }
    }
}

/// Small UI element with one field of each scalar kind.
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(meta(description = "A labelled counter.", icon = "widget.png"))]
pub struct Widget {
    #[reflect(meta(tooltip = "Number of clicks"))]
    pub count: i32,
    pub label: String,
    pub visible: bool,
    #[reflect(meta(hidden = "true"))]
    pub ratio: f32,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            count: 3,
            label: "Start".to_string(),
            visible: true,
            ratio: 0.75,
        }
    }
}

/// Queue every sample record for registration.
pub fn ledger() -> Result<RegistrationLedger, RegistryError> {
    let mut ledger = RegistrationLedger::new();
    ledger.enqueue::<Transform2D>()?.enqueue::<Widget>()?;
    Ok(ledger)
}

/// One live instance per sample record.
#[derive(Debug, Default)]
pub struct Samples {
    pub transform: Transform2D,
    pub widget: Widget,
}

impl Samples {
    /// Instance of the record declared as `name`.
    pub fn instance(&self, name: &str) -> Option<&dyn Any> {
        match name {
            "Transform2D" => Some(&self.transform),
            "Widget" => Some(&self.widget),
            _ => None,
        }
    }

    pub fn instance_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        match name {
            "Transform2D" => Some(&mut self.transform),
            "Widget" => Some(&mut self.widget),
            _ => None,
        }
    }
}
