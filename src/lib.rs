// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # adscodec
//!
//! Symbolic process-memory access to PLC runtimes over a synchronous
//! request/response transport.
//!
//! The library turns named, typed PLC variables into exact wire bytes and
//! back, resolves symbol names to device handles, and moves composite values
//! in a single request:
//! - **Scalars** with bit-exact, width-exact little-endian encodings in
//!   [`encoding::scalar`] and [`encoding::buffer`]
//! - **Composites** through calculator/visitor pairs in [`encoding`], either
//!   hand-declared ([`PlcStruct`]) or driven by a declared layout
//!   ([`ReflectiveStructVisitor`])
//! - **Sessions** with a handle cache and a `CREATED -> OPEN -> CLOSED`
//!   lifecycle in [`session`]
//! - **Status codes** and their messages in [`core::status`]
//!
//! ## Architecture
//!
//! - `core/` - Errors, status table, dynamic values
//! - `encoding/` - Scalar codecs, memory buffer, size calculators, visitors
//! - `schema/` - Struct layouts and the IEC 61131-3 declaration parser
//! - `transport/` - Transport boundary and an in-process simulated device
//! - `session/` - Addressing, handle cache, session state machine, marshalling
//!
//! ## Example: Named scalar access
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use adscodec::{AdsSession, MemoryTransport};
//!
//! let device = MemoryTransport::new().with_symbol("GVL.diTest", 4);
//! let mut session = AdsSession::with_address(device, "169.254.214.106.1.1", 851);
//! session.open()?;
//! session.write_dint("GVL.diTest", 122234534)?;
//! assert_eq!(session.read_dint("GVL.diTest")?, 122234534);
//! session.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Array in one request
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use adscodec::{AdsSession, ArrayCodec, MemoryTransport};
//!
//! let device = MemoryTransport::new().with_symbol("GVL.aValues", 24);
//! let mut session = AdsSession::with_address(device, "169.254.214.106.1.1", 851);
//! session.open()?;
//!
//! let codec = ArrayCodec::<f64>::new();
//! let values = vec![0.0, 1234215343.343, 75474564234.3245];
//! session.write_struct_by_name("GVL.aValues", &values, &codec, &codec)?;
//!
//! let mut out = vec![0.0; 3];
//! session.read_struct_by_name("GVL.aValues", &mut out, &codec, &codec)?;
//! assert_eq!(out, values);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{check_status, describe, AdsError, FieldMap, PlcValue, Result, StatusCode};

// Wire encoding
pub mod encoding;

pub use encoding::{
    AdsScalar, ArrayCodec, MemoryBuffer, MemorySizeCalculator, PlcStruct, ReadVisitor,
    ReflectiveSizeCalculator, ReflectiveStructVisitor, ScalarType, SizeCalculator, StructCodec,
    WriteVisitor,
};

// Struct layouts
pub mod schema;

pub use schema::{Field, FieldType, InheritanceOrder, StructType, TypeRegistry};

// Transport boundary
pub mod transport;

pub use transport::{AdsTransport, MemoryTransport, TransportCall};

// Sessions
pub mod session;

pub use session::{
    AdsSession, DeviceAddress, HandleCache, SessionBuilder, SessionConfig, SessionState,
    SharedSession, SymbolHandle,
};
