// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use adscodec::{schema::parse_into, StatusCode, TypeRegistry};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` overrides the default of warnings from this crate only.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("adscodec=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse a status code given in decimal or `0x` hex.
pub fn parse_status_code(text: &str) -> Result<StatusCode> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse::<u32>(),
    };
    let code = parsed.with_context(|| format!("invalid status code '{text}'"))?;
    Ok(StatusCode(code))
}

/// Parse hex bytes, tolerating a `0x` prefix and whitespace.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        bail!("no bytes given");
    }
    hex::decode(&digits).with_context(|| format!("invalid hex '{digits}'"))
}

/// Load every struct declared in `path` into a fresh registry.
pub fn load_registry(path: &Path) -> Result<TypeRegistry> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let mut registry = TypeRegistry::new();
    let count = parse_into(&mut registry, &source)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    tracing::debug!(file = %path.display(), types = count, "loaded declarations");
    Ok(registry)
}

/// Print `value` as pretty JSON, or run the human-readable printer.
pub fn output_json_or<T>(json: bool, value: &T, human_fn: impl FnOnce() -> Result<()>) -> Result<()>
where
    T: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    } else {
        human_fn()
    }
}
