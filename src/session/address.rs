// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Device addressing.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::core::{AdsError, Result};

/// Number of octets in a device identifier.
pub const NET_ID_LEN: usize = 6;

/// Default runtime port of the first PLC runtime.
pub const DEFAULT_PORT: u16 = 851;

/// Six-byte device identifier plus a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceAddress {
    net_id: [u8; NET_ID_LEN],
    port: u16,
}

impl DeviceAddress {
    /// Build from raw octets.
    pub const fn new(net_id: [u8; NET_ID_LEN], port: u16) -> Self {
        Self { net_id, port }
    }

    /// Build from a dotted identifier such as `"169.254.214.106.1.1"`.
    ///
    /// Never fails. Each octet is parsed as a 16-bit integer and truncated
    /// to its low byte. Unparsable octets become 0 with a warning, missing
    /// octets are 0 and octets past the sixth are ignored.
    pub fn parse(net_id: &str, port: u16) -> Self {
        let mut octets = [0u8; NET_ID_LEN];
        for (i, part) in net_id.split('.').enumerate() {
            if i >= NET_ID_LEN {
                warn!(address = net_id, "ignoring octets past the sixth");
                break;
            }
            octets[i] = match part.trim().parse::<i16>() {
                Ok(v) => v as u8,
                Err(e) => {
                    warn!(address = net_id, octet = part, error = %e, "unparsable octet, using 0");
                    0
                }
            };
        }
        Self::new(octets, port)
    }

    /// Device identifier octets.
    pub const fn net_id(&self) -> [u8; NET_ID_LEN] {
        self.net_id
    }

    /// Port.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Device identifier in dotted form.
    pub fn net_id_string(&self) -> String {
        self.net_id
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.net_id_string(), self.port)
    }
}

/// Parses `"<net id>:<port>"`. The port is required to be a valid u16;
/// the identifier is parsed leniently as in [`DeviceAddress::parse`].
impl FromStr for DeviceAddress {
    type Err = AdsError;

    fn from_str(s: &str) -> Result<Self> {
        let (net_id, port) = s
            .rsplit_once(':')
            .ok_or_else(|| AdsError::invalid_address(s, "expected <net id>:<port>"))?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| AdsError::invalid_address(s, format!("port: {e}")))?;
        Ok(Self::parse(net_id, port))
    }
}
