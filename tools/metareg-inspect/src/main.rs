// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! metareg inspector CLI
//!
//! Bootstraps a registry with the built-in sample records, then lists their
//! schemas or reads and writes fields of the sample instances.
//!
//! # Usage
//!
//! ```bash
//! # List registered records
//! metareg-inspect catalog
//!
//! # Fields of one record, as JSON
//! metareg-inspect fields Transform2D --json
//!
//! # Current values of the sample instance
//! metareg-inspect show Widget
//!
//! # Update a field and print the result
//! metareg-inspect set Transform2D position "56.0, 58.5, 60.2"
//!
//! # Apply title/annotation overrides from a file
//! metareg-inspect --config overrides.yaml catalog
//! ```

mod samples;
mod values;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use metareg::{AnnotationStore, FieldSchema, MetaKey, RecordSchema, RegistryConfig, TypeRegistry};
use samples::Samples;
use std::any::Any;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// metareg inspector CLI
#[derive(Parser, Debug)]
#[command(name = "metareg-inspect")]
#[command(about = "Inspect and edit records through a metareg registry")]
#[command(version)]
struct Args {
    /// Registry configuration file (.yaml, .yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered records
    Catalog {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the fields of a record in declaration order
    Fields {
        /// Record name
        record: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the field values of the sample instance of a record
    Show {
        /// Record name
        record: String,

        /// Include fields annotated as hidden
        #[arg(short, long)]
        all: bool,
    },

    /// Set a field of the sample instance and print the updated values
    Set {
        /// Record name
        record: String,

        /// Field name or declaration index
        field: String,

        /// New value; sequences are comma-separated
        value: String,
    },
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Ident")]
    ident: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Offset")]
    offset: usize,
    #[tabled(rename = "Size")]
    size: usize,
}

#[derive(Tabled)]
struct ValueRow {
    #[tabled(rename = "Field")]
    title: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    let mut ledger = samples::ledger()?;
    let registry = TypeRegistry::bootstrap(config, &mut ledger)?;
    log::debug!("[inspect] {} records registered", registry.record_count());

    let mut samples = Samples::default();
    match args.command {
        Commands::Catalog { json } => cmd_catalog(&registry, json),
        Commands::Fields { record, json } => cmd_fields(&registry, &record, json),
        Commands::Show { record, all } => cmd_show(&registry, &samples, &record, all),
        Commands::Set {
            record,
            field,
            value,
        } => cmd_set(&registry, &mut samples, &record, &field, &value),
    }
}

fn find_record<'r>(registry: &'r TypeRegistry, name: &str) -> anyhow::Result<&'r RecordSchema> {
    let record = registry.lookup_record(name);
    if record.is_unknown() {
        let known: Vec<_> = registry.records().iter().map(|r| r.name.clone()).collect();
        bail!("unknown record '{}' (registered: {})", name, known.join(", "));
    }
    Ok(record)
}

fn cmd_catalog(registry: &TypeRegistry, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&registry.records())?);
        return Ok(());
    }

    println!("{}", "Registered Records".cyan().bold());
    println!("  Count: {}", registry.record_count());
    println!();

    if registry.is_empty() {
        println!("  {}", "No records registered".yellow());
        return Ok(());
    }

    let rows: Vec<RecordRow> = registry
        .records()
        .into_iter()
        .map(|r| RecordRow {
            name: r.name.clone(),
            title: r.title.clone(),
            ident: r.type_ident.to_string(),
            fields: r.field_count(),
            description: r.annotation(MetaKey::Description).to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

fn cmd_fields(registry: &TypeRegistry, name: &str, json: bool) -> anyhow::Result<()> {
    let record = find_record(registry, name)?;
    let fields = registry.fields(record);

    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    println!("{} {}", record.title.cyan().bold(), format!("({})", record.name).dimmed());
    print_annotations(&record.annotations);
    println!();

    let rows: Vec<FieldRow> = fields
        .iter()
        .map(|f| FieldRow {
            index: f.index,
            name: f.name.clone(),
            title: f.title.clone(),
            type_name: f.type_name.clone(),
            offset: f.offset,
            size: f.size,
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

fn print_annotations(annotations: &AnnotationStore) {
    for (key, value) in annotations.int_entries() {
        let label = MetaKey::ALL
            .into_iter()
            .find(|k| *k as i32 == key)
            .map_or_else(|| key.to_string(), |k| k.to_string());
        println!("  {}: {}", label.bold(), value);
    }
    for (key, value) in annotations.named_entries() {
        println!("  {}: {}", key.bold(), value);
    }
}

fn print_values(
    registry: &TypeRegistry,
    record: &RecordSchema,
    instance: &dyn Any,
    all: bool,
) -> anyhow::Result<()> {
    println!("{}", record.title.cyan().bold());

    let mut rows = Vec::new();
    for field in registry.fields(record) {
        if field.is_hidden() && !all {
            continue;
        }
        rows.push(ValueRow {
            title: field.title.clone(),
            type_name: field.type_name.clone(),
            value: values::render(instance, field)
                .with_context(|| format!("reading '{}'", field.name))?,
        });
    }
    println!("{}", Table::new(rows));
    Ok(())
}

fn cmd_show(registry: &TypeRegistry, samples: &Samples, name: &str, all: bool) -> anyhow::Result<()> {
    let record = find_record(registry, name)?;
    let instance = samples
        .instance(&record.name)
        .with_context(|| format!("no sample instance for '{}'", record.name))?;
    print_values(registry, record, instance, all)
}

fn lookup_field<'r>(
    registry: &'r TypeRegistry,
    record: &RecordSchema,
    field: &str,
) -> anyhow::Result<&'r FieldSchema> {
    let schema = match field.parse::<usize>() {
        Ok(index) => registry.lookup_field(record, index),
        Err(_) => registry.lookup_field(record, field),
    };
    if schema.is_unknown() {
        bail!("record '{}' has no field '{}'", record.name, field);
    }
    Ok(schema)
}

fn cmd_set(
    registry: &TypeRegistry,
    samples: &mut Samples,
    name: &str,
    field: &str,
    value: &str,
) -> anyhow::Result<()> {
    let record = find_record(registry, name)?;
    let field = lookup_field(registry, record, field)?;
    let instance = samples
        .instance_mut(&record.name)
        .with_context(|| format!("no sample instance for '{}'", record.name))?;

    values::assign(instance, field, value)?;
    println!("{} {} = {}", "Updated".green().bold(), field.name, value);
    println!();
    print_values(registry, record, instance, true)
}
