// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout adscodec.
//!
//! This module provides the foundational types for the library:
//! - [`AdsError`] - Error handling for protocol and marshalling failures
//! - [`StatusCode`] - Request status codes and their message table
//! - [`PlcValue`] - Dynamic value representation

pub mod error;
pub mod status;
pub mod value;

pub use error::{AdsError, Result};
pub use status::{check_status, describe, StatusCode};
pub use value::{FieldMap, PlcValue};
