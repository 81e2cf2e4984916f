// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI integration tests.
//!
//! These tests run the actual adscodec binary and verify its behavior.

mod common;

use std::process::{Command, Output};

use common::fixture_path;

/// Run adscodec with arguments
fn run(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_adscodec");
    Command::new(bin)
        .args(args)
        .output()
        .unwrap_or_else(|_| panic!("Failed to run {:?}", bin))
}

/// Run adscodec and assert success
fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "Command failed: {:?}\nstdout: {}\nstderr: {}",
        args,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run adscodec and assert failure
fn run_err(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        !output.status.success(),
        "Command should have failed but succeeded: {:?}",
        args
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn machine_file() -> String {
    fixture_path("machine.st").to_string_lossy().to_string()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    let output = run_ok(&["--help"]);
    assert!(output.contains("PLC variable marshalling toolkit"));
    assert!(output.contains("status"));
    assert!(output.contains("value"));
    assert!(output.contains("schema"));
}

#[test]
fn test_cli_version() {
    let output = run_ok(&["--version"]);
    assert!(output.contains("adscodec"));
}

#[test]
fn test_cli_invalid_subcommand() {
    let stderr = run_err(&["nonexistent"]);
    assert!(stderr.contains("unrecognized") || stderr.contains("unknown"));
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn test_status_hex() {
    let output = run_ok(&["status", "0x722"]);
    assert_eq!(
        output.trim(),
        "1826 (0x722): symbol not active -> release handle and try again"
    );
}

#[test]
fn test_status_without_class_base() {
    let output = run_ok(&["status", "16"]);
    assert!(output.contains("symbol not found"));
}

#[test]
fn test_status_unknown() {
    let output = run_ok(&["status", "0x1234"]);
    assert!(output.contains("unknown/undocumented"));
}

#[test]
fn test_status_json() {
    let output = run_ok(&["status", "1808", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["code"], 1808);
    assert_eq!(parsed["hex"], "0x710");
    assert_eq!(parsed["message"], "symbol not found");
}

#[test]
fn test_status_table() {
    let output = run_ok(&["status", "--all"]);
    assert_eq!(output.lines().count(), 64);
}

#[test]
fn test_status_invalid_code() {
    let stderr = run_err(&["status", "0xZZ"]);
    assert!(stderr.contains("invalid status code"));
}

// ============================================================================
// Value
// ============================================================================

#[test]
fn test_value_encode() {
    assert_eq!(run_ok(&["value", "encode", "DINT", "122234534"]).trim(), "a6264907");
    assert_eq!(run_ok(&["value", "encode", "int", "-2"]).trim(), "feff");
    assert_eq!(run_ok(&["value", "encode", "STRING", "ok"]).trim(), "6f6b00");
    assert_eq!(
        run_ok(&["value", "encode", "ULINT", "18446744073709551615"]).trim(),
        "ffffffffffffffff"
    );
}

#[test]
fn test_value_encode_out_of_range() {
    run_err(&["value", "encode", "USINT", "256"]);
    run_err(&["value", "encode", "BOOL", "1"]);
}

#[test]
fn test_value_decode() {
    assert_eq!(run_ok(&["value", "decode", "LREAL", "000000000000f03f"]).trim(), "1");
    assert_eq!(run_ok(&["value", "decode", "REAL", "0x0000c03f"]).trim(), "1.5");
    assert_eq!(run_ok(&["value", "decode", "WORD", "ffff"]).trim(), "65535");
}

#[test]
fn test_value_decode_wrong_width() {
    let stderr = run_err(&["value", "decode", "DINT", "a62649"]);
    assert!(stderr.contains("DINT takes 4 bytes"));
}

#[test]
fn test_value_json() {
    let output = run_ok(&["value", "encode", "UDINT", "4096", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["type"], "UDINT");
    assert_eq!(parsed["hex"], "00100000");
    assert_eq!(parsed["size"], 4);
}

// ============================================================================
// Schema
// ============================================================================

#[test]
fn test_schema_list() {
    let output = run_ok(&["schema", "list", &machine_file()]);
    assert!(output.contains("ST_Machine EXTENDS ST_Axis (3 fields)"));
    assert!(output.contains("ST_Point (2 fields)"));
}

#[test]
fn test_schema_size() {
    let file = machine_file();
    assert_eq!(run_ok(&["schema", "size", &file, "ST_Machine"]).trim(), "62");
    assert_eq!(
        run_ok(&["schema", "size", &file, "ST_Machine", "--order", "base-first"]).trim(),
        "62"
    );
    assert_eq!(run_ok(&["schema", "size", &file, "ST_Point"]).trim(), "8");
}

#[test]
fn test_schema_show_json() {
    let output = run_ok(&[
        "schema",
        "show",
        &machine_file(),
        "ST_Machine",
        "--order",
        "base-first",
        "--json",
    ]);
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["size"], 62);
    let fields = parsed["fields"].as_array().unwrap();
    assert_eq!(fields[0]["name"], "sName");
    assert_eq!(fields[0]["size"], 16);
    let serial = fields.iter().find(|f| f["name"] == "nSerial").unwrap();
    assert_eq!(serial["offset"], 42);
    let enabled = fields.iter().find(|f| f["name"] == "bEnabled").unwrap();
    assert_eq!(enabled["mapped"], false);
}

#[test]
fn test_schema_unknown_type() {
    run_err(&["schema", "size", &machine_file(), "ST_Missing"]);
}

#[test]
fn test_schema_missing_file() {
    let stderr = run_err(&["schema", "list", "does/not/exist.st"]);
    assert!(stderr.contains("cannot read"));
}
