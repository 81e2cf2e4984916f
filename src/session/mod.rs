// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Device sessions.
//!
//! An [`AdsSession`] owns one transport, one logical port and one handle
//! cache. It moves through `CREATED -> OPEN -> CLOSED`; every request is
//! only valid while OPEN. Request failures are reported and never change
//! the state.
//!
//! Named scalar access resolves the symbol's handle (cached for the rest of
//! the session), sizes a buffer to the scalar's width and issues one value
//! request by handle. Composite access lives in [`marshal`].
//!
//! A session takes `&mut self` for every request and has no internal
//! locking. Use [`SharedSession`] to share one across threads.

pub mod address;
pub mod config;
pub mod handles;
pub mod marshal;
pub mod shared;

pub use address::{DeviceAddress, DEFAULT_PORT, NET_ID_LEN};
pub use config::{SessionBuilder, SessionConfig};
pub use handles::{HandleCache, SymbolHandle};
pub use shared::SharedSession;

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, info, warn};

use crate::core::{check_status, AdsError, PlcValue, Result};
use crate::encoding::scalar::{read_scalar, wire_size, write_scalar};
use crate::encoding::{AdsScalar, MemoryBuffer, ScalarType};
use crate::transport::index_group::{SYM_HNDBYNAME, SYM_RELEASEHND, SYM_VALBYHND};
use crate::transport::AdsTransport;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Built, port not yet open
    Created,
    /// Port open, requests allowed
    Open,
    /// Port closed; terminal
    Closed,
}

impl SessionState {
    /// State name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Created => "CREATED",
            SessionState::Open => "OPEN",
            SessionState::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical channel to one device.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use adscodec::session::AdsSession;
/// use adscodec::transport::MemoryTransport;
///
/// let device = MemoryTransport::new().with_symbol("GVL.diTest", 4);
/// let mut session = AdsSession::with_address(device, "169.254.214.106.1.1", 851);
///
/// session.open()?;
/// session.write_dint("GVL.diTest", 122234534)?;
/// assert_eq!(session.read_dint("GVL.diTest")?, 122234534);
/// session.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AdsSession<T: AdsTransport> {
    transport: T,
    config: SessionConfig,
    address: Option<DeviceAddress>,
    port: Option<u32>,
    state: SessionState,
    handles: HandleCache,
}

/// Generates a read/write accessor pair per scalar type.
macro_rules! scalar_accessors {
    ($($read:ident, $write:ident, $ty:ty, $iec:literal;)*) => {
        $(
            #[doc = concat!("Read a `", $iec, "` variable by name.")]
            pub fn $read(&mut self, name: &str) -> Result<$ty> {
                self.read::<$ty>(name)
            }

            #[doc = concat!("Write a `", $iec, "` variable by name.")]
            pub fn $write(&mut self, name: &str, value: $ty) -> Result<()> {
                self.write::<$ty>(name, value)
            }
        )*
    };
}

impl<T: AdsTransport> AdsSession<T> {
    /// Create a session in the CREATED state.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            address: None,
            port: None,
            state: SessionState::Created,
            handles: HandleCache::new(),
        }
    }

    /// Create a session for a dotted device identifier and port.
    pub fn with_address(transport: T, address: &str, port: u16) -> Self {
        let config = SessionConfig {
            address: address.to_string(),
            port,
            ..SessionConfig::default()
        };
        Self::new(transport, config)
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Device address, set once the session is open.
    pub fn address(&self) -> Option<DeviceAddress> {
        self.address
    }

    /// Logical port number while open.
    pub fn port(&self) -> Option<u32> {
        self.port
    }

    /// Resolved handles.
    pub fn handles(&self) -> &HandleCache {
        &self.handles
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Underlying transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the logical port. CREATED -> OPEN.
    ///
    /// On failure the session stays CREATED and may be opened again.
    pub fn open(&mut self) -> Result<()> {
        if self.state != SessionState::Created {
            return Err(AdsError::invalid_state("open", self.state.as_str()));
        }
        let address = self.config.device_address();
        let port = self.transport.open_port().map_err(AdsError::protocol)?;

        self.address = Some(address);
        self.port = Some(port);
        self.state = SessionState::Open;
        info!(%address, port, "session opened");
        Ok(())
    }

    /// Close the logical port. OPEN -> CLOSED.
    ///
    /// The session is CLOSED afterwards even if the device reports a
    /// failure, which is still returned. With `release_handles_on_close`
    /// every cached handle is released first; release failures are logged
    /// and do not stop the close.
    pub fn close(&mut self) -> Result<()> {
        let (port, _) = self.ensure_open("close")?;

        if self.config.release_handles_on_close {
            for (name, handle) in self.handles.drain() {
                if let Err(e) = self.release(handle) {
                    warn!(symbol = %name, handle = handle.value(), error = %e, "handle release failed");
                }
            }
        }

        let status = self.transport.close_port(port);
        self.handles = HandleCache::new();
        self.port = None;
        self.state = SessionState::Closed;
        info!(port, status = %status, "session closed");
        check_status(status)
    }

    // ========================================================================
    // Handles
    // ========================================================================

    /// Resolve `name` to a handle.
    ///
    /// A cached handle is returned without a request. Otherwise one
    /// resolution request is issued and its result cached; on failure the
    /// cache is left untouched.
    pub fn resolve(&mut self, name: &str) -> Result<SymbolHandle> {
        self.ensure_open("resolve")?;
        if let Some(handle) = self.handles.get(name) {
            debug!(symbol = name, handle = handle.value(), "handle cache hit");
            return Ok(handle);
        }

        let mut payload = Vec::with_capacity(name.len() + 1);
        payload.extend_from_slice(name.as_bytes());
        payload.push(0);
        let mut out = [0u8; 4];
        self.request_read_write("resolve", SYM_HNDBYNAME, 0, &mut out, &payload)?;

        let handle = SymbolHandle(LittleEndian::read_u32(&out));
        self.handles.insert(name, handle);
        debug!(symbol = name, handle = handle.value(), "handle resolved");
        Ok(handle)
    }

    /// Release the cached handle of `name` on the device.
    ///
    /// Returns `false` if the name was not cached.
    pub fn release_handle(&mut self, name: &str) -> Result<bool> {
        self.ensure_open("release_handle")?;
        match self.handles.evict(name) {
            Some(handle) => {
                self.release(handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn release(&mut self, handle: SymbolHandle) -> Result<()> {
        self.request_write("release", SYM_RELEASEHND, 0, &handle.value().to_le_bytes())
    }

    // ========================================================================
    // Raw value access by name
    // ========================================================================

    /// Fill `data` from the variable `name`.
    pub fn read_bytes_into(&mut self, name: &str, data: &mut [u8]) -> Result<()> {
        let handle = self.resolve(name)?;
        let result = self.request_read("read", SYM_VALBYHND, handle.value(), data);
        self.after_value_access(name, result)
    }

    /// Read `len` bytes of the variable `name`.
    pub fn read_bytes(&mut self, name: &str, len: usize) -> Result<Vec<u8>> {
        let mut data = vec![0u8; len];
        self.read_bytes_into(name, &mut data)?;
        Ok(data)
    }

    /// Write `data` to the variable `name`.
    pub fn write_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let handle = self.resolve(name)?;
        let result = self.request_write("write", SYM_VALBYHND, handle.value(), data);
        self.after_value_access(name, result)
    }

    /// Evict a handle the device no longer recognises.
    ///
    /// The stale handle is released best effort; the original error is
    /// always returned and nothing is retried.
    fn after_value_access(&mut self, name: &str, result: Result<()>) -> Result<()> {
        if let Err(e) = &result {
            if e.is_symbol_not_active() && self.config.evict_on_symbol_not_active {
                if let Some(handle) = self.handles.evict(name) {
                    warn!(symbol = name, handle = handle.value(), "symbol not active, handle evicted");
                    if let Err(release_err) = self.release(handle) {
                        warn!(symbol = name, error = %release_err, "stale handle release failed");
                    }
                }
            }
        }
        result
    }

    // ========================================================================
    // Scalar access by name
    // ========================================================================

    /// Read a fixed-width scalar by name.
    pub fn read<E: AdsScalar>(&mut self, name: &str) -> Result<E> {
        let mut mem = MemoryBuffer::new(E::WIDTH);
        self.read_bytes_into(name, mem.as_bytes_mut())?;
        E::get(&mut mem)
    }

    /// Write a fixed-width scalar by name.
    pub fn write<E: AdsScalar>(&mut self, name: &str, value: E) -> Result<()> {
        let mut mem = MemoryBuffer::new(E::WIDTH);
        value.set(&mut mem)?;
        self.write_bytes(name, mem.as_bytes())
    }

    scalar_accessors! {
        read_lreal, write_lreal, f64, "LREAL";
        read_real, write_real, f32, "REAL";
        read_lint, write_lint, i64, "LINT";
        read_ulint, write_ulint, u64, "ULINT";
        read_dint, write_dint, i32, "DINT";
        read_udint, write_udint, u32, "UDINT";
        read_int, write_int, i16, "INT";
        read_uint, write_uint, u16, "UINT";
        read_sint, write_sint, i8, "SINT";
        read_usint, write_usint, u8, "USINT";
    }

    /// Read a `STRING` variable by name.
    ///
    /// Reads `string_read_size` bytes and stops at the first zero byte.
    pub fn read_string(&mut self, name: &str) -> Result<String> {
        let size = self.config.string_read_size;
        let mut mem = MemoryBuffer::new(size);
        self.read_bytes_into(name, mem.as_bytes_mut())?;
        mem.get_string(size)
    }

    /// Write a `STRING` variable by name: the bytes plus one terminator.
    ///
    /// The declared capacity of the variable is not checked here. A value
    /// holding a zero byte is rejected before any request is sent.
    pub fn write_string(&mut self, name: &str, value: &str) -> Result<()> {
        let size = value.len() + 1;
        let mut mem = MemoryBuffer::new(size);
        mem.set_string(value, size)?;
        self.write_bytes(name, mem.as_bytes())
    }

    /// Read a scalar of a type chosen at runtime.
    pub fn read_value(&mut self, name: &str, ty: ScalarType) -> Result<PlcValue> {
        let size = ty.width().unwrap_or(self.config.string_read_size);
        let mut mem = MemoryBuffer::new(size);
        self.read_bytes_into(name, mem.as_bytes_mut())?;
        read_scalar(ty, &mut mem)
    }

    /// Write a scalar value of any type.
    pub fn write_value(&mut self, name: &str, value: &PlcValue) -> Result<()> {
        let size =
            wire_size(value).ok_or_else(|| AdsError::type_mismatch("scalar", value.type_name()))?;
        let mut mem = MemoryBuffer::new(size);
        write_scalar(value, &mut mem)?;
        self.write_bytes(name, mem.as_bytes())
    }

    // ========================================================================
    // Requests
    // ========================================================================

    fn ensure_open(&self, operation: &str) -> Result<(u32, DeviceAddress)> {
        match (self.state, self.port, self.address) {
            (SessionState::Open, Some(port), Some(address)) => Ok((port, address)),
            _ => Err(AdsError::invalid_state(operation, self.state.as_str())),
        }
    }

    fn request_read(&mut self, operation: &str, group: u32, offset: u32, data: &mut [u8]) -> Result<()> {
        let (port, addr) = self.ensure_open(operation)?;
        debug!(operation, group, offset, len = data.len(), "read request");
        let status = self.transport.read(port, &addr, group, offset, data);
        check_status(status)
    }

    fn request_write(&mut self, operation: &str, group: u32, offset: u32, data: &[u8]) -> Result<()> {
        let (port, addr) = self.ensure_open(operation)?;
        debug!(operation, group, offset, len = data.len(), "write request");
        let status = self.transport.write(port, &addr, group, offset, data);
        check_status(status)
    }

    fn request_read_write(
        &mut self,
        operation: &str,
        group: u32,
        offset: u32,
        read_data: &mut [u8],
        write_data: &[u8],
    ) -> Result<()> {
        let (port, addr) = self.ensure_open(operation)?;
        debug!(
            operation,
            group,
            offset,
            read_len = read_data.len(),
            write_len = write_data.len(),
            "read-write request"
        );
        let status = self
            .transport
            .read_write(port, &addr, group, offset, read_data, write_data);
        check_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::{ADSERR_CLIENT_SYNCTIMEOUT, ADSERR_DEVICE_SYMBOLNOTFOUND};
    use crate::core::StatusCode;
    use crate::transport::{MemoryTransport, TransportCall};

    fn open_session(device: MemoryTransport) -> AdsSession<MemoryTransport> {
        let mut session = AdsSession::with_address(device, "169.254.214.106.1.1", 851);
        session.open().expect("open");
        session
    }

    #[test]
    fn test_state_transitions() {
        let mut session = AdsSession::with_address(MemoryTransport::new(), "1.2.3.4.5.6", 851);
        assert_eq!(session.state(), SessionState::Created);
        assert!(session.address().is_none());

        session.open().unwrap();
        assert_eq!(session.state(), SessionState::Open);
        assert_eq!(
            session.address(),
            Some(DeviceAddress::new([1, 2, 3, 4, 5, 6], 851))
        );

        session.close().unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(matches!(session.open(), Err(AdsError::InvalidState { .. })));
    }

    #[test]
    fn test_open_failure_stays_created() {
        let mut device = MemoryTransport::new();
        device.fail_next(StatusCode(0x748));
        let mut session = AdsSession::with_address(device, "1.2.3.4.5.6", 851);
        let err = session.open().unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode(0x748)));
        assert_eq!(session.state(), SessionState::Created);
        session.open().unwrap();
    }

    #[test]
    fn test_request_before_open() {
        let mut session = AdsSession::with_address(
            MemoryTransport::new().with_symbol("GVL.n", 4),
            "1.2.3.4.5.6",
            851,
        );
        assert!(matches!(
            session.read_dint("GVL.n"),
            Err(AdsError::InvalidState { .. })
        ));
        assert!(session.transport().calls().is_empty());
    }

    #[test]
    fn test_close_failure_still_closes() {
        let mut session = open_session(MemoryTransport::new());
        session.transport_mut().fail_next(ADSERR_CLIENT_SYNCTIMEOUT);
        let err = session.close().unwrap_err();
        assert_eq!(err.status_code(), Some(ADSERR_CLIENT_SYNCTIMEOUT));
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_resolve_failure_leaves_cache() {
        let mut session = open_session(MemoryTransport::new());
        let err = session.resolve("GVL.missing").unwrap_err();
        assert_eq!(err.status_code(), Some(ADSERR_DEVICE_SYMBOLNOTFOUND));
        assert!(session.handles().is_empty());
    }

    #[test]
    fn test_resolve_payload_is_zero_terminated() {
        let mut session = open_session(MemoryTransport::new().with_symbol("GVL.n", 4));
        session.resolve("GVL.n").unwrap();
        assert_eq!(
            session.transport().calls()[1],
            TransportCall::ReadWrite {
                group: SYM_HNDBYNAME,
                offset: 0,
                read_len: 4,
                write_len: 6,
            }
        );
    }

    #[test]
    fn test_scalar_request_sizes() {
        let mut session = open_session(
            MemoryTransport::new()
                .with_symbol("GVL.f", 8)
                .with_symbol("GVL.u", 2),
        );
        session.write_lreal("GVL.f", 1.0).unwrap();
        session.write_uint("GVL.u", 65535).unwrap();
        let lens: Vec<usize> = session
            .transport()
            .calls()
            .iter()
            .filter_map(|c| match c {
                TransportCall::Write { len, .. } => Some(*len),
                _ => None,
            })
            .collect();
        assert_eq!(lens, vec![8, 2]);
        assert_eq!(session.read_uint("GVL.u").unwrap(), 65535);
    }

    #[test]
    fn test_string_access() {
        let mut session = open_session(MemoryTransport::new().with_symbol("GVL.s", 81));
        session.write_string("GVL.s", "hello").unwrap();
        assert_eq!(session.read_string("GVL.s").unwrap(), "hello");
        assert_eq!(
            &session.transport().symbol_bytes("GVL.s").unwrap()[..6],
            b"hello\0"
        );
    }

    #[test]
    fn test_dynamic_value_access() {
        let mut session = open_session(MemoryTransport::new().with_symbol("GVL.q", 8));
        session
            .write_value("GVL.q", &PlcValue::ULInt(u64::MAX))
            .unwrap();
        assert_eq!(
            session.read_value("GVL.q", ScalarType::ULInt).unwrap(),
            PlcValue::ULInt(u64::MAX)
        );
        assert!(session
            .write_value("GVL.q", &PlcValue::Array(vec![]))
            .is_err());
    }

    #[test]
    fn test_release_handle() {
        let mut session = open_session(MemoryTransport::new().with_symbol("GVL.n", 4));
        session.resolve("GVL.n").unwrap();
        assert_eq!(session.transport().live_handles(), 1);
        assert!(session.release_handle("GVL.n").unwrap());
        assert!(!session.release_handle("GVL.n").unwrap());
        assert_eq!(session.transport().live_handles(), 0);
    }
}
