// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Session configuration and builder.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{AdsError, Result};
use crate::encoding::scalar::STRING_READ_SIZE;
use crate::schema::InheritanceOrder;
use crate::transport::AdsTransport;

use super::address::{DeviceAddress, DEFAULT_PORT};
use super::AdsSession;

/// Configuration for one device session.
///
/// Loadable from TOML; every key is optional:
///
/// ```toml
/// address = "169.254.214.106.1.1"
/// port = 851
/// string_read_size = 1024
/// release_handles_on_close = false
/// evict_on_symbol_not_active = true
/// inheritance = "derived_first"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Dotted six-octet device identifier
    pub address: String,
    /// Runtime port
    pub port: u16,
    /// Buffer size for string reads by name
    pub string_read_size: usize,
    /// Release every cached handle before closing the port
    pub release_handles_on_close: bool,
    /// Drop a cached handle when the device reports "symbol not active"
    pub evict_on_symbol_not_active: bool,
    /// Field order of inherited struct types on the reflective path
    pub inheritance: InheritanceOrder,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1.1.1".to_string(),
            port: DEFAULT_PORT,
            string_read_size: STRING_READ_SIZE,
            release_handles_on_close: false,
            evict_on_symbol_not_active: true,
            inheritance: InheritanceOrder::DerivedFirst,
        }
    }
}

impl SessionConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SessionConfig =
            toml::from_str(text).map_err(|e| AdsError::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AdsError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| AdsError::Config(format!("serialize: {e}")))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.string_read_size == 0 {
            return Err(AdsError::Config(
                "string_read_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Device address built from `address` and `port`.
    pub fn device_address(&self) -> DeviceAddress {
        DeviceAddress::parse(&self.address, self.port)
    }
}

/// Builder for device sessions.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use adscodec::session::{SessionBuilder, SessionState};
/// use adscodec::transport::MemoryTransport;
///
/// let session = SessionBuilder::new()
///     .address("169.254.214.106.1.1")
///     .port(851)
///     .release_handles_on_close(true)
///     .build(MemoryTransport::new())?;
/// assert_eq!(session.state(), SessionState::Created);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Set the dotted device identifier.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Set the runtime port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the buffer size for string reads.
    pub fn string_read_size(mut self, size: usize) -> Self {
        self.config.string_read_size = size;
        self
    }

    /// Release cached handles when closing.
    pub fn release_handles_on_close(mut self, release: bool) -> Self {
        self.config.release_handles_on_close = release;
        self
    }

    /// Evict cached handles on "symbol not active".
    pub fn evict_on_symbol_not_active(mut self, evict: bool) -> Self {
        self.config.evict_on_symbol_not_active = evict;
        self
    }

    /// Set the inherited field order for the reflective path.
    pub fn inheritance(mut self, order: InheritanceOrder) -> Self {
        self.config.inheritance = order;
        self
    }

    /// Configuration built so far.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Build a session in the CREATED state over `transport`.
    pub fn build<T: AdsTransport>(self, transport: T) -> Result<AdsSession<T>> {
        self.config.validate()?;
        Ok(AdsSession::new(transport, self.config))
    }
}
