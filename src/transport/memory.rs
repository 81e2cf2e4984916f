// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! In-process simulated device.
//!
//! [`MemoryTransport`] serves the symbol services from a table of named
//! byte regions and records every call. Status failures can be injected
//! for the next call, and handles can be invalidated to simulate an
//! online change on the device.

use std::collections::{HashMap, HashSet};

use byteorder::{ByteOrder, LittleEndian};

use crate::core::status::{
    ADSERR_CLIENT_PORTNOTOPEN, ADSERR_DEVICE_INVALIDGRP, ADSERR_DEVICE_INVALIDOFFSET,
    ADSERR_DEVICE_INVALIDSIZE, ADSERR_DEVICE_SYMBOLNOTACTIVE, ADSERR_DEVICE_SYMBOLNOTFOUND,
    ADSERR_NOERR,
};
use crate::core::StatusCode;
use crate::session::DeviceAddress;

use super::index_group::{SYM_HNDBYNAME, SYM_RELEASEHND, SYM_VALBYHND, SYM_VALBYNAME};
use super::AdsTransport;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// Port opened
    OpenPort,
    /// Port closed
    ClosePort {
        /// Port number
        port: u32,
    },
    /// Read request
    Read {
        /// Index group
        group: u32,
        /// Index offset
        offset: u32,
        /// Requested bytes
        len: usize,
    },
    /// Write request
    Write {
        /// Index group
        group: u32,
        /// Index offset
        offset: u32,
        /// Written bytes
        len: usize,
    },
    /// Read-write request
    ReadWrite {
        /// Index group
        group: u32,
        /// Index offset
        offset: u32,
        /// Requested bytes
        read_len: usize,
        /// Written bytes
        write_len: usize,
    },
}

impl TransportCall {
    /// Check if this call resolves a handle by name.
    pub fn is_resolve(&self) -> bool {
        matches!(
            self,
            TransportCall::ReadWrite {
                group: SYM_HNDBYNAME,
                ..
            }
        )
    }

    /// Check if this call releases a handle.
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            TransportCall::Write {
                group: SYM_RELEASEHND,
                ..
            }
        )
    }
}

/// Simulated device with a symbol table and a call trace.
///
/// # Example
///
/// ```
/// use adscodec::transport::MemoryTransport;
///
/// let device = MemoryTransport::new()
///     .with_symbol("GVL.nCounter", 4)
///     .with_symbol("GVL.sName", 81);
/// assert_eq!(device.symbol_bytes("GVL.nCounter"), Some(&[0u8; 4][..]));
/// ```
#[derive(Debug, Default)]
pub struct MemoryTransport {
    symbols: HashMap<String, Vec<u8>>,
    handles: HashMap<u32, String>,
    stale: HashSet<u32>,
    next_handle: u32,
    next_port: u32,
    open_ports: HashSet<u32>,
    fail_next: Option<StatusCode>,
    calls: Vec<TransportCall>,
}

impl MemoryTransport {
    /// Create a device with no symbols.
    pub fn new() -> Self {
        Self {
            next_handle: 0x1000_0001,
            next_port: 30000,
            ..Self::default()
        }
    }

    /// Declare a zeroed symbol of `size` bytes.
    pub fn with_symbol(mut self, name: impl Into<String>, size: usize) -> Self {
        self.add_symbol(name, vec![0u8; size]);
        self
    }

    /// Declare a symbol with initial contents.
    pub fn add_symbol(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.symbols.insert(name.into(), bytes);
    }

    /// Current contents of a symbol.
    pub fn symbol_bytes(&self, name: &str) -> Option<&[u8]> {
        self.symbols.get(name).map(Vec::as_slice)
    }

    /// Fail the next call of any kind with `status`.
    pub fn fail_next(&mut self, status: StatusCode) {
        self.fail_next = Some(status);
    }

    /// Mark every handle issued so far as stale.
    ///
    /// Value access through a stale handle fails with "symbol not active"
    /// until the name is resolved again.
    pub fn invalidate_handles(&mut self) {
        self.stale.extend(self.handles.keys().copied());
    }

    /// Number of handles currently issued.
    pub fn live_handles(&self) -> usize {
        self.handles.len()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> &[TransportCall] {
        &self.calls
    }

    /// Number of handle resolutions issued.
    pub fn resolve_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_resolve()).count()
    }

    /// Number of value reads by handle.
    pub fn read_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Read { group: SYM_VALBYHND, .. }))
            .count()
    }

    /// Number of value writes by handle.
    pub fn write_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Write { group: SYM_VALBYHND, .. }))
            .count()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn take_failure(&mut self) -> Option<StatusCode> {
        self.fail_next.take()
    }

    fn check_port(&self, port: u32) -> StatusCode {
        if self.open_ports.contains(&port) {
            ADSERR_NOERR
        } else {
            ADSERR_CLIENT_PORTNOTOPEN
        }
    }

    fn symbol_for_handle(&self, handle: u32) -> Result<&str, StatusCode> {
        if self.stale.contains(&handle) {
            return Err(ADSERR_DEVICE_SYMBOLNOTACTIVE);
        }
        self.handles
            .get(&handle)
            .map(String::as_str)
            .ok_or(ADSERR_DEVICE_INVALIDOFFSET)
    }

    fn resolve(&mut self, read_data: &mut [u8], write_data: &[u8]) -> StatusCode {
        let name = symbol_name(write_data);
        if !self.symbols.contains_key(&name) {
            return ADSERR_DEVICE_SYMBOLNOTFOUND;
        }
        if read_data.len() < 4 {
            return ADSERR_DEVICE_INVALIDSIZE;
        }
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1);
        self.handles.insert(handle, name);
        LittleEndian::write_u32(&mut read_data[..4], handle);
        ADSERR_NOERR
    }

    fn read_symbol(&self, name: &str, data: &mut [u8]) -> StatusCode {
        let Some(bytes) = self.symbols.get(name) else {
            return ADSERR_DEVICE_SYMBOLNOTFOUND;
        };
        let n = bytes.len().min(data.len());
        data[..n].copy_from_slice(&bytes[..n]);
        data[n..].fill(0);
        ADSERR_NOERR
    }

    fn write_symbol(&mut self, name: &str, data: &[u8]) -> StatusCode {
        let Some(bytes) = self.symbols.get_mut(name) else {
            return ADSERR_DEVICE_SYMBOLNOTFOUND;
        };
        if data.len() > bytes.len() {
            return ADSERR_DEVICE_INVALIDSIZE;
        }
        bytes[..data.len()].copy_from_slice(data);
        ADSERR_NOERR
    }
}

impl AdsTransport for MemoryTransport {
    fn open_port(&mut self) -> Result<u32, StatusCode> {
        self.calls.push(TransportCall::OpenPort);
        if let Some(status) = self.take_failure() {
            return Err(status);
        }
        let port = self.next_port;
        self.next_port += 1;
        self.open_ports.insert(port);
        Ok(port)
    }

    fn close_port(&mut self, port: u32) -> StatusCode {
        self.calls.push(TransportCall::ClosePort { port });
        if let Some(status) = self.take_failure() {
            return status;
        }
        if self.open_ports.remove(&port) {
            ADSERR_NOERR
        } else {
            ADSERR_CLIENT_PORTNOTOPEN
        }
    }

    fn read(
        &mut self,
        port: u32,
        _addr: &DeviceAddress,
        group: u32,
        offset: u32,
        data: &mut [u8],
    ) -> StatusCode {
        self.calls.push(TransportCall::Read {
            group,
            offset,
            len: data.len(),
        });
        if let Some(status) = self.take_failure() {
            return status;
        }
        let status = self.check_port(port);
        if !status.is_ok() {
            return status;
        }
        match group {
            SYM_VALBYHND => match self.symbol_for_handle(offset) {
                Ok(name) => self.read_symbol(name, data),
                Err(status) => status,
            },
            _ => ADSERR_DEVICE_INVALIDGRP,
        }
    }

    fn write(
        &mut self,
        port: u32,
        _addr: &DeviceAddress,
        group: u32,
        offset: u32,
        data: &[u8],
    ) -> StatusCode {
        self.calls.push(TransportCall::Write {
            group,
            offset,
            len: data.len(),
        });
        if let Some(status) = self.take_failure() {
            return status;
        }
        let status = self.check_port(port);
        if !status.is_ok() {
            return status;
        }
        match group {
            SYM_VALBYHND => match self.symbol_for_handle(offset) {
                Ok(name) => {
                    let name = name.to_string();
                    self.write_symbol(&name, data)
                }
                Err(status) => status,
            },
            SYM_RELEASEHND => {
                if data.len() < 4 {
                    return ADSERR_DEVICE_INVALIDSIZE;
                }
                let handle = LittleEndian::read_u32(&data[..4]);
                self.stale.remove(&handle);
                match self.handles.remove(&handle) {
                    Some(_) => ADSERR_NOERR,
                    None => ADSERR_DEVICE_INVALIDOFFSET,
                }
            }
            _ => ADSERR_DEVICE_INVALIDGRP,
        }
    }

    fn read_write(
        &mut self,
        port: u32,
        _addr: &DeviceAddress,
        group: u32,
        offset: u32,
        read_data: &mut [u8],
        write_data: &[u8],
    ) -> StatusCode {
        self.calls.push(TransportCall::ReadWrite {
            group,
            offset,
            read_len: read_data.len(),
            write_len: write_data.len(),
        });
        if let Some(status) = self.take_failure() {
            return status;
        }
        let status = self.check_port(port);
        if !status.is_ok() {
            return status;
        }
        match group {
            SYM_HNDBYNAME => self.resolve(read_data, write_data),
            SYM_VALBYNAME => {
                let name = symbol_name(write_data);
                self.read_symbol(&name, read_data)
            }
            _ => ADSERR_DEVICE_INVALIDGRP,
        }
    }
}

/// Symbol name from a zero-terminated request payload.
fn symbol_name(payload: &[u8]) -> String {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    String::from_utf8_lossy(&payload[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: DeviceAddress = DeviceAddress::new([127, 0, 0, 1, 1, 1], 851);

    fn resolve(device: &mut MemoryTransport, port: u32, name: &str) -> (StatusCode, u32) {
        let mut out = [0u8; 4];
        let mut payload = name.as_bytes().to_vec();
        payload.push(0);
        let status = device.read_write(port, &ADDR, SYM_HNDBYNAME, 0, &mut out, &payload);
        (status, LittleEndian::read_u32(&out))
    }

    #[test]
    fn test_resolve_read_write() {
        let mut device = MemoryTransport::new().with_symbol("GVL.n", 4);
        let port = device.open_port().unwrap();

        let (status, handle) = resolve(&mut device, port, "GVL.n");
        assert!(status.is_ok());

        let status = device.write(port, &ADDR, SYM_VALBYHND, handle, &[1, 2, 3, 4]);
        assert!(status.is_ok());

        let mut out = [0u8; 4];
        let status = device.read(port, &ADDR, SYM_VALBYHND, handle, &mut out);
        assert!(status.is_ok());
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(device.resolve_count(), 1);
        assert_eq!(device.read_count(), 1);
        assert_eq!(device.write_count(), 1);
    }

    #[test]
    fn test_unknown_symbol() {
        let mut device = MemoryTransport::new();
        let port = device.open_port().unwrap();
        let (status, _) = resolve(&mut device, port, "GVL.missing");
        assert_eq!(status, ADSERR_DEVICE_SYMBOLNOTFOUND);
    }

    #[test]
    fn test_oversized_write_rejected() {
        let mut device = MemoryTransport::new().with_symbol("GVL.n", 2);
        let port = device.open_port().unwrap();
        let (_, handle) = resolve(&mut device, port, "GVL.n");
        let status = device.write(port, &ADDR, SYM_VALBYHND, handle, &[0; 4]);
        assert_eq!(status, ADSERR_DEVICE_INVALIDSIZE);
    }

    #[test]
    fn test_oversized_read_zero_fills() {
        let mut device = MemoryTransport::new();
        device.add_symbol("GVL.s", b"hi\0".to_vec());
        let port = device.open_port().unwrap();
        let (_, handle) = resolve(&mut device, port, "GVL.s");
        let mut out = [0xAAu8; 8];
        assert!(device.read(port, &ADDR, SYM_VALBYHND, handle, &mut out).is_ok());
        assert_eq!(out, *b"hi\0\0\0\0\0\0");
    }

    #[test]
    fn test_stale_handle() {
        let mut device = MemoryTransport::new().with_symbol("GVL.n", 4);
        let port = device.open_port().unwrap();
        let (_, handle) = resolve(&mut device, port, "GVL.n");
        device.invalidate_handles();

        let mut out = [0u8; 4];
        let status = device.read(port, &ADDR, SYM_VALBYHND, handle, &mut out);
        assert_eq!(status, ADSERR_DEVICE_SYMBOLNOTACTIVE);

        let (_, fresh) = resolve(&mut device, port, "GVL.n");
        assert_ne!(fresh, handle);
        assert!(device.read(port, &ADDR, SYM_VALBYHND, fresh, &mut out).is_ok());
    }

    #[test]
    fn test_release_handle() {
        let mut device = MemoryTransport::new().with_symbol("GVL.n", 4);
        let port = device.open_port().unwrap();
        let (_, handle) = resolve(&mut device, port, "GVL.n");
        assert_eq!(device.live_handles(), 1);

        let status = device.write(port, &ADDR, SYM_RELEASEHND, 0, &handle.to_le_bytes());
        assert!(status.is_ok());
        assert_eq!(device.live_handles(), 0);
        assert!(device.calls().last().unwrap().is_release());
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let mut device = MemoryTransport::new().with_symbol("GVL.n", 4);
        let port = device.open_port().unwrap();
        device.fail_next(StatusCode(0x745));
        let (status, _) = resolve(&mut device, port, "GVL.n");
        assert_eq!(status, StatusCode(0x745));
        let (status, _) = resolve(&mut device, port, "GVL.n");
        assert!(status.is_ok());
    }

    #[test]
    fn test_closed_port() {
        let mut device = MemoryTransport::new().with_symbol("GVL.n", 4);
        let port = device.open_port().unwrap();
        assert!(device.close_port(port).is_ok());
        let (status, _) = resolve(&mut device, port, "GVL.n");
        assert_eq!(status, ADSERR_CLIENT_PORTNOTOPEN);
        assert_eq!(device.close_port(port), ADSERR_CLIENT_PORTNOTOPEN);
    }
}
