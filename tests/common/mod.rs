// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use adscodec::{AdsSession, FieldMap, MemoryTransport, PlcValue};

/// Device address used across the session scenarios.
pub const DEVICE_ADDRESS: &str = "169.254.214.106.1.1";

/// Runtime port used across the session scenarios.
pub const DEVICE_PORT: u16 = 851;

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Read a fixture as text.
pub fn fixture_text(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {path:?}: {e}"))
}

/// Session over `device`, already open.
pub fn open_session(device: MemoryTransport) -> AdsSession<MemoryTransport> {
    let mut session = AdsSession::with_address(device, DEVICE_ADDRESS, DEVICE_PORT);
    session.open().expect("open session");
    session
}

/// Build a struct value from `(field, value)` pairs.
pub fn struct_value<const N: usize>(fields: [(&str, PlcValue); N]) -> PlcValue {
    PlcValue::Struct(
        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect::<FieldMap>(),
    )
}
