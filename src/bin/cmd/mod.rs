// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod schema;
mod status;
mod value;

pub use schema::SchemaCmd;
pub use status::StatusCmd;
pub use value::ValueCmd;
