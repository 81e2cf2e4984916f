// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Value command - scalar wire encodings.

use clap::Subcommand;
use serde::Serialize;

use adscodec::{encoding, PlcValue, ScalarType};

use crate::common::{output_json_or, parse_hex, Result};

/// Scalar encode/decode.
#[derive(Subcommand, Clone, Debug)]
pub enum ValueCmd {
    /// Print the little-endian wire bytes of a literal
    Encode {
        /// Scalar type (LREAL, REAL, LINT, ULINT, DINT, UDINT, INT, UINT, SINT, USINT, STRING)
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Literal value
        #[arg(value_name = "VALUE", allow_negative_numbers = true)]
        value: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Decode wire bytes given in hex
    Decode {
        /// Scalar type
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Hex bytes, exactly the type's width for fixed-width types
        #[arg(value_name = "HEX")]
        hex: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl ValueCmd {
    pub fn run(self) -> Result<()> {
        match self {
            ValueCmd::Encode {
                type_name,
                value,
                json,
            } => cmd_encode(&type_name, &value, json),
            ValueCmd::Decode {
                type_name,
                hex,
                json,
            } => cmd_decode(&type_name, &hex, json),
        }
    }
}

fn cmd_encode(type_name: &str, text: &str, json: bool) -> Result<()> {
    let ty: ScalarType = type_name.parse()?;
    let value = encoding::parse_scalar(ty, text)?;
    let bytes = encoding::encode_scalar(&value)?;
    let report = ValueReport {
        type_name: ty.name(),
        hex: hex::encode(&bytes),
        size: bytes.len(),
        value,
    };
    output_json_or(json, &report, || {
        println!("{}", report.hex);
        Ok(())
    })
}

fn cmd_decode(type_name: &str, text: &str, json: bool) -> Result<()> {
    let ty: ScalarType = type_name.parse()?;
    let bytes = parse_hex(text)?;
    if let Some(width) = ty.width() {
        if bytes.len() != width {
            anyhow::bail!("{} takes {} bytes, got {}", ty, width, bytes.len());
        }
    }
    let value = encoding::decode_scalar(ty, &bytes)?;
    let report = ValueReport {
        type_name: ty.name(),
        hex: hex::encode(&bytes),
        size: bytes.len(),
        value,
    };
    output_json_or(json, &report, || {
        println!("{}", report.value);
        Ok(())
    })
}

#[derive(Serialize)]
struct ValueReport {
    #[serde(rename = "type")]
    type_name: &'static str,
    value: PlcValue,
    hex: String,
    size: usize,
}
