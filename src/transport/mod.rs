// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Transport substrate boundary.
//!
//! The transport moves bytes to and from the device. Every request is a
//! blocking call that returns a [`StatusCode`]; reads fill a caller-owned
//! buffer. Framing and router connection are the transport's concern.

pub mod memory;

pub use memory::{MemoryTransport, TransportCall};

use crate::core::StatusCode;
use crate::session::DeviceAddress;

/// Index groups of the symbol services.
pub mod index_group {
    /// Resolve a handle by symbol name (read-write, name in, handle out).
    pub const SYM_HNDBYNAME: u32 = 0xF003;
    /// Access a value by symbol name.
    pub const SYM_VALBYNAME: u32 = 0xF004;
    /// Access a value by handle (offset = handle).
    pub const SYM_VALBYHND: u32 = 0xF005;
    /// Release a handle (handle written as payload).
    pub const SYM_RELEASEHND: u32 = 0xF006;
}

/// Synchronous request/response transport to one router.
///
/// Implementations block until the device replies or the transport's own
/// timeout elapses.
pub trait AdsTransport {
    /// Open a logical port, returning its number.
    fn open_port(&mut self) -> Result<u32, StatusCode>;

    /// Close a logical port.
    fn close_port(&mut self, port: u32) -> StatusCode;

    /// Read `data.len()` bytes at `(group, offset)`.
    fn read(
        &mut self,
        port: u32,
        addr: &DeviceAddress,
        group: u32,
        offset: u32,
        data: &mut [u8],
    ) -> StatusCode;

    /// Write `data` at `(group, offset)`.
    fn write(
        &mut self,
        port: u32,
        addr: &DeviceAddress,
        group: u32,
        offset: u32,
        data: &[u8],
    ) -> StatusCode;

    /// Send `write_data` and receive `read_data.len()` bytes back.
    fn read_write(
        &mut self,
        port: u32,
        addr: &DeviceAddress,
        group: u32,
        offset: u32,
        read_data: &mut [u8],
        write_data: &[u8],
    ) -> StatusCode;
}

impl<T: AdsTransport + ?Sized> AdsTransport for Box<T> {
    fn open_port(&mut self) -> Result<u32, StatusCode> {
        (**self).open_port()
    }

    fn close_port(&mut self, port: u32) -> StatusCode {
        (**self).close_port(port)
    }

    fn read(
        &mut self,
        port: u32,
        addr: &DeviceAddress,
        group: u32,
        offset: u32,
        data: &mut [u8],
    ) -> StatusCode {
        (**self).read(port, addr, group, offset, data)
    }

    fn write(
        &mut self,
        port: u32,
        addr: &DeviceAddress,
        group: u32,
        offset: u32,
        data: &[u8],
    ) -> StatusCode {
        (**self).write(port, addr, group, offset, data)
    }

    fn read_write(
        &mut self,
        port: u32,
        addr: &DeviceAddress,
        group: u32,
        offset: u32,
        read_data: &mut [u8],
        write_data: &[u8],
    ) -> StatusCode {
        (**self).read_write(port, addr, group, offset, read_data, write_data)
    }
}
