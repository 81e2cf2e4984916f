// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Status command - translate result codes to messages.

use clap::Args;
use serde::Serialize;

use adscodec::core::status::STATUS_MESSAGES;
use adscodec::{describe, StatusCode};

use crate::common::{output_json_or, parse_status_code, Result};

/// Status code lookup.
#[derive(Args, Clone, Debug)]
pub struct StatusCmd {
    /// Status code, decimal or 0x-prefixed hex
    #[arg(value_name = "CODE", required_unless_present = "all")]
    code: Option<String>,

    /// List every documented code
    #[arg(long, conflicts_with = "code")]
    all: bool,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

impl StatusCmd {
    pub fn run(self) -> Result<()> {
        match self.code {
            Some(code) if !self.all => cmd_lookup(&code, self.json),
            _ => cmd_table(self.json),
        }
    }
}

fn cmd_lookup(text: &str, json: bool) -> Result<()> {
    let code = parse_status_code(text)?;
    let entry = StatusEntry::new(code);
    output_json_or(json, &entry, || {
        println!("{} ({}): {}", entry.code, entry.hex, entry.message);
        Ok(())
    })
}

fn cmd_table(json: bool) -> Result<()> {
    let entries: Vec<StatusEntry> = STATUS_MESSAGES
        .iter()
        .map(|(code, _)| StatusEntry::new(*code))
        .collect();
    output_json_or(json, &entries, || {
        for entry in &entries {
            println!("{:>6}  {:<6}  {}", entry.code, entry.hex, entry.message);
        }
        Ok(())
    })
}

#[derive(Serialize)]
struct StatusEntry {
    code: u32,
    hex: String,
    message: &'static str,
}

impl StatusEntry {
    fn new(code: StatusCode) -> Self {
        Self {
            code: code.value(),
            hex: format!("0x{:X}", code.value()),
            message: describe(code),
        }
    }
}
