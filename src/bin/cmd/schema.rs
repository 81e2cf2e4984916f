// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema command - inspect IEC 61131-3 struct declarations.

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use adscodec::encoding::FieldLayout;
use adscodec::{InheritanceOrder, ReflectiveSizeCalculator};

use crate::common::{load_registry, output_json_or, Result};

/// Field order for types with a base type.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OrderArg {
    /// Own fields before inherited ones
    DerivedFirst,
    /// Inherited fields first
    BaseFirst,
}

impl From<OrderArg> for InheritanceOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::DerivedFirst => InheritanceOrder::DerivedFirst,
            OrderArg::BaseFirst => InheritanceOrder::BaseFirst,
        }
    }
}

/// Schema operations.
#[derive(Subcommand, Clone, Debug)]
pub enum SchemaCmd {
    /// List struct types declared in a file
    List {
        /// Declaration file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the field layout of a type with byte offsets
    Show {
        /// Declaration file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Struct type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Inheritance field order
        #[arg(long, value_enum, default_value_t = OrderArg::DerivedFirst)]
        order: OrderArg,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the wire footprint of a type in bytes
    Size {
        /// Declaration file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Struct type name
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Inheritance field order
        #[arg(long, value_enum, default_value_t = OrderArg::DerivedFirst)]
        order: OrderArg,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl SchemaCmd {
    pub fn run(self) -> Result<()> {
        match self {
            SchemaCmd::List { input, json } => cmd_list(input, json),
            SchemaCmd::Show {
                input,
                type_name,
                order,
                json,
            } => cmd_show(input, &type_name, order, json),
            SchemaCmd::Size {
                input,
                type_name,
                order,
                json,
            } => cmd_size(input, &type_name, order, json),
        }
    }
}

fn cmd_list(input: PathBuf, json: bool) -> Result<()> {
    let registry = load_registry(&input)?;
    let mut items: Vec<TypeItem> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|ty| TypeItem {
            name: ty.name.clone(),
            base: ty.base.clone(),
            fields: ty.fields.len(),
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    output_json_or(json, &items, || {
        for item in &items {
            match &item.base {
                Some(base) => println!("{} EXTENDS {} ({} fields)", item.name, base, item.fields),
                None => println!("{} ({} fields)", item.name, item.fields),
            }
        }
        Ok(())
    })
}

fn cmd_show(input: PathBuf, type_name: &str, order: OrderArg, json: bool) -> Result<()> {
    let registry = load_registry(&input)?;
    let layout = ReflectiveSizeCalculator::new(&registry, type_name)
        .with_order(order.into())
        .declared_layout()?;
    let size: usize = layout.iter().map(|f| f.size).sum();
    let report = LayoutReport {
        type_name: type_name.to_string(),
        size,
        fields: layout,
    };

    output_json_or(json, &report, || {
        println!("=== {} ({} bytes) ===", report.type_name, report.size);
        for field in &report.fields {
            if field.mapped {
                println!(
                    "{:>6}  {:>4}  {}: {}",
                    field.offset, field.size, field.name, field.type_name
                );
            } else {
                println!("     -     -  {}: {} (skipped)", field.name, field.type_name);
            }
        }
        Ok(())
    })
}

fn cmd_size(input: PathBuf, type_name: &str, order: OrderArg, json: bool) -> Result<()> {
    let registry = load_registry(&input)?;
    let size = ReflectiveSizeCalculator::new(&registry, type_name)
        .with_order(order.into())
        .declared_size()?;
    let report = SizeReport {
        type_name: type_name.to_string(),
        size,
    };

    output_json_or(json, &report, || {
        println!("{}", report.size);
        Ok(())
    })
}

// Output types

#[derive(Serialize)]
struct TypeItem {
    name: String,
    base: Option<String>,
    fields: usize,
}

#[derive(Serialize)]
struct LayoutReport {
    #[serde(rename = "type")]
    type_name: String,
    size: usize,
    fields: Vec<FieldLayout>,
}

#[derive(Serialize)]
struct SizeReport {
    #[serde(rename = "type")]
    type_name: String,
    size: usize,
}
