// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Text rendering and parsing of field values, dispatched on type tags.

use anyhow::{anyhow, bail, Context};
use metareg::{access, tags, AccessError, FieldSchema, TypeTag};
use std::any::Any;
use std::fmt::Display;
use std::str::FromStr;

fn scalar<T: TypeTag + Display>(instance: &dyn Any, field: &FieldSchema) -> Result<String, AccessError> {
    access::get_ref::<T>(instance, field).map(ToString::to_string)
}

fn list<T: Display>(instance: &dyn Any, field: &FieldSchema) -> Result<String, AccessError>
where
    Vec<T>: TypeTag,
{
    let items = access::get_ref::<Vec<T>>(instance, field)?;
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    Ok(format!("[{}]", items.join(", ")))
}

/// Current value of `field` inside `instance`, as display text.
///
/// Fields of a type without a predefined tag render as `<TypeName>`.
pub fn render(instance: &dyn Any, field: &FieldSchema) -> Result<String, AccessError> {
    match field.type_ident {
        tags::BOOL => scalar::<bool>(instance, field),
        tags::CHAR => scalar::<char>(instance, field),
        tags::INT => scalar::<i32>(instance, field),
        tags::UINT => scalar::<u32>(instance, field),
        tags::LONG => scalar::<i64>(instance, field),
        tags::ULONG => scalar::<u64>(instance, field),
        tags::FLOAT => scalar::<f32>(instance, field),
        tags::DOUBLE => scalar::<f64>(instance, field),
        tags::STRING => access::get_ref::<String>(instance, field).map(|s| format!("{:?}", s)),
        tags::VEC_BOOL => list::<bool>(instance, field),
        tags::VEC_CHAR => list::<char>(instance, field),
        tags::VEC_INT => list::<i32>(instance, field),
        tags::VEC_UINT => list::<u32>(instance, field),
        tags::VEC_LONG => list::<i64>(instance, field),
        tags::VEC_FLOAT => list::<f32>(instance, field),
        tags::VEC_DOUBLE => list::<f64>(instance, field),
        tags::VEC_STRING => access::get_ref::<Vec<String>>(instance, field)
            .map(|v| serde_json::to_string(v).unwrap_or_else(|_| format!("{:?}", v))),
        tags::UNKNOWN => Err(AccessError::FieldNotFound(field.name.clone())),
        _ => Ok(format!("<{}>", field.type_name)),
    }
}

fn parse_one<T>(field: &FieldSchema, text: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("'{}' is not a valid {} for field '{}': {}", text, field.type_name, field.name, e))
}

fn set_scalar<T>(instance: &mut dyn Any, field: &FieldSchema, text: &str) -> anyhow::Result<()>
where
    T: TypeTag + FromStr,
    T::Err: Display,
{
    let value = parse_one::<T>(field, text)?;
    access::set(instance, field, value).with_context(|| format!("setting '{}'", field.name))
}

fn set_list<T>(instance: &mut dyn Any, field: &FieldSchema, text: &str) -> anyhow::Result<()>
where
    T: FromStr,
    T::Err: Display,
    Vec<T>: TypeTag,
{
    let text = text.trim();
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(text);
    let values = inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_one::<T>(field, item))
        .collect::<anyhow::Result<Vec<T>>>()?;
    access::set(instance, field, values).with_context(|| format!("setting '{}'", field.name))
}

/// String sequences: a JSON array keeps items containing commas or
/// brackets intact, anything else is split on commas.
fn set_strings(instance: &mut dyn Any, field: &FieldSchema, text: &str) -> anyhow::Result<()> {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') {
        return set_list::<String>(instance, field, trimmed);
    }
    let values: Vec<String> = serde_json::from_str(trimmed)
        .with_context(|| format!("'{}' is not a JSON string array for field '{}'", text, field.name))?;
    access::set(instance, field, values).with_context(|| format!("setting '{}'", field.name))
}

/// Parse `text` as the type of `field` and store it inside `instance`.
///
/// Sequences are written as comma-separated items, optionally bracketed.
/// String sequences also accept (and render as) a JSON array, so items
/// holding commas or brackets survive a render/assign round trip.
pub fn assign(instance: &mut dyn Any, field: &FieldSchema, text: &str) -> anyhow::Result<()> {
    match field.type_ident {
        tags::BOOL => set_scalar::<bool>(instance, field, text),
        tags::CHAR => set_scalar::<char>(instance, field, text),
        tags::INT => set_scalar::<i32>(instance, field, text),
        tags::UINT => set_scalar::<u32>(instance, field, text),
        tags::LONG => set_scalar::<i64>(instance, field, text),
        tags::ULONG => set_scalar::<u64>(instance, field, text),
        tags::FLOAT => set_scalar::<f32>(instance, field, text),
        tags::DOUBLE => set_scalar::<f64>(instance, field, text),
        tags::STRING => access::set(instance, field, text.to_string())
            .with_context(|| format!("setting '{}'", field.name)),
        tags::VEC_BOOL => set_list::<bool>(instance, field, text),
        tags::VEC_CHAR => set_list::<char>(instance, field, text),
        tags::VEC_INT => set_list::<i32>(instance, field, text),
        tags::VEC_UINT => set_list::<u32>(instance, field, text),
        tags::VEC_LONG => set_list::<i64>(instance, field, text),
        tags::VEC_FLOAT => set_list::<f32>(instance, field, text),
        tags::VEC_DOUBLE => set_list::<f64>(instance, field, text),
        tags::VEC_STRING => set_strings(instance, field, text),
        tags::UNKNOWN => bail!("unknown field '{}'", field.name),
        _ => bail!(
            "field '{}' has type {}, which cannot be set from text",
            field.name,
            field.type_name
        ),
    }
}
