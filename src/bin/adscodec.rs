// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # adscodec CLI
//!
//! Offline tooling around the PLC wire format.
//!
//! ## Usage
//!
//! ```sh
//! # Explain a status code
//! adscodec status 0x722
//!
//! # Wire bytes of a literal
//! adscodec value encode DINT 122234534
//!
//! # Value of wire bytes
//! adscodec value decode LREAL 000000000000f03f
//!
//! # Footprint of a declared struct
//! adscodec schema size types.st ST_Part
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{SchemaCmd, StatusCmd, ValueCmd};
use common::Result;

/// adscodec - PLC variable marshalling toolkit
///
/// Inspect status codes, encode and decode scalar wire values, and lay out
/// IEC 61131-3 struct declarations without a device.
#[derive(Parser, Clone)]
#[command(name = "adscodec")]
#[command(about = "PLC variable marshalling toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Explain a status code or list the status table
    Status(StatusCmd),

    /// Encode or decode scalar wire values
    #[command(subcommand)]
    Value(ValueCmd),

    /// Struct declarations (list, show, size)
    #[command(subcommand)]
    Schema(SchemaCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    common::init_tracing();

    match cli.command {
        Commands::Status(cmd) => cmd.run(),
        Commands::Value(cmd) => cmd.run(),
        Commands::Schema(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
