// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Status codes returned by every request and their fixed message table.
//!
//! The table covers the device error class (`0x700..=0x72F`) and the client
//! error class (`0x740..=0x755`). It is built once on first use and shared
//! immutably afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use super::error::{AdsError, Result};

/// 32-bit result of a request. Zero is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// Check if this code signals success.
    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 == ADSERR_NOERR.0
    }

    /// Raw numeric value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Message for this code, see [`describe`].
    pub fn message(self) -> &'static str {
        describe(self)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

/// Success.
pub const ADSERR_NOERR: StatusCode = StatusCode(0x00);
/// Base offset of the device error class.
pub const ERR_ADSERRS: u32 = 0x0700;

const fn ads(offset: u32) -> StatusCode {
    StatusCode(ERR_ADSERRS + offset)
}

pub const ADSERR_DEVICE_ERROR: StatusCode = ads(0x00);
pub const ADSERR_DEVICE_SRVNOTSUPP: StatusCode = ads(0x01);
pub const ADSERR_DEVICE_INVALIDGRP: StatusCode = ads(0x02);
pub const ADSERR_DEVICE_INVALIDOFFSET: StatusCode = ads(0x03);
pub const ADSERR_DEVICE_INVALIDACCESS: StatusCode = ads(0x04);
pub const ADSERR_DEVICE_INVALIDSIZE: StatusCode = ads(0x05);
pub const ADSERR_DEVICE_INVALIDDATA: StatusCode = ads(0x06);
pub const ADSERR_DEVICE_NOTREADY: StatusCode = ads(0x07);
pub const ADSERR_DEVICE_BUSY: StatusCode = ads(0x08);
pub const ADSERR_DEVICE_INVALIDCONTEXT: StatusCode = ads(0x09);
pub const ADSERR_DEVICE_NOMEMORY: StatusCode = ads(0x0A);
pub const ADSERR_DEVICE_INVALIDPARM: StatusCode = ads(0x0B);
pub const ADSERR_DEVICE_NOTFOUND: StatusCode = ads(0x0C);
pub const ADSERR_DEVICE_SYNTAX: StatusCode = ads(0x0D);
pub const ADSERR_DEVICE_INCOMPATIBLE: StatusCode = ads(0x0E);
pub const ADSERR_DEVICE_EXISTS: StatusCode = ads(0x0F);
pub const ADSERR_DEVICE_SYMBOLNOTFOUND: StatusCode = ads(0x10);
pub const ADSERR_DEVICE_SYMBOLVERSIONINVALID: StatusCode = ads(0x11);
pub const ADSERR_DEVICE_INVALIDSTATE: StatusCode = ads(0x12);
pub const ADSERR_DEVICE_TRANSMODENOTSUPP: StatusCode = ads(0x13);
pub const ADSERR_DEVICE_NOTIFYHNDINVALID: StatusCode = ads(0x14);
pub const ADSERR_DEVICE_CLIENTUNKNOWN: StatusCode = ads(0x15);
pub const ADSERR_DEVICE_NOMOREHDLS: StatusCode = ads(0x16);
pub const ADSERR_DEVICE_INVALIDWATCHSIZE: StatusCode = ads(0x17);
pub const ADSERR_DEVICE_NOTINIT: StatusCode = ads(0x18);
pub const ADSERR_DEVICE_TIMEOUT: StatusCode = ads(0x19);
pub const ADSERR_DEVICE_NOINTERFACE: StatusCode = ads(0x1A);
pub const ADSERR_DEVICE_INVALIDINTERFACE: StatusCode = ads(0x1B);
pub const ADSERR_DEVICE_INVALIDCLSID: StatusCode = ads(0x1C);
pub const ADSERR_DEVICE_INVALIDOBJID: StatusCode = ads(0x1D);
pub const ADSERR_DEVICE_PENDING: StatusCode = ads(0x1E);
pub const ADSERR_DEVICE_ABORTED: StatusCode = ads(0x1F);
pub const ADSERR_DEVICE_WARNING: StatusCode = ads(0x20);
pub const ADSERR_DEVICE_INVALIDARRAYIDX: StatusCode = ads(0x21);
pub const ADSERR_DEVICE_SYMBOLNOTACTIVE: StatusCode = ads(0x22);
pub const ADSERR_DEVICE_ACCESSDENIED: StatusCode = ads(0x23);
pub const ADSERR_DEVICE_LICENSENOTFOUND: StatusCode = ads(0x24);
pub const ADSERR_DEVICE_LICENSEEXPIRED: StatusCode = ads(0x25);
pub const ADSERR_DEVICE_LICENSEEXCEEDED: StatusCode = ads(0x26);
pub const ADSERR_DEVICE_LICENSEINVALID: StatusCode = ads(0x27);
pub const ADSERR_DEVICE_LICENSESYSTEMID: StatusCode = ads(0x28);
pub const ADSERR_DEVICE_LICENSENOTIMELIMIT: StatusCode = ads(0x29);
pub const ADSERR_DEVICE_LICENSEFUTUREISSUE: StatusCode = ads(0x2A);
pub const ADSERR_DEVICE_LICENSETIMETOLONG: StatusCode = ads(0x2B);
pub const ADSERR_DEVICE_EXCEPTION: StatusCode = ads(0x2C);
pub const ADSERR_DEVICE_LICENSEDUPLICATED: StatusCode = ads(0x2D);
pub const ADSERR_DEVICE_SIGNATUREINVALID: StatusCode = ads(0x2E);
pub const ADSERR_DEVICE_CERTIFICATEINVALID: StatusCode = ads(0x2F);

pub const ADSERR_CLIENT_ERROR: StatusCode = ads(0x40);
pub const ADSERR_CLIENT_INVALIDPARM: StatusCode = ads(0x41);
pub const ADSERR_CLIENT_LISTEMPTY: StatusCode = ads(0x42);
pub const ADSERR_CLIENT_VARUSED: StatusCode = ads(0x43);
pub const ADSERR_CLIENT_DUPLINVOKEID: StatusCode = ads(0x44);
pub const ADSERR_CLIENT_SYNCTIMEOUT: StatusCode = ads(0x45);
pub const ADSERR_CLIENT_W32ERROR: StatusCode = ads(0x46);
pub const ADSERR_CLIENT_TIMEOUTINVALID: StatusCode = ads(0x47);
pub const ADSERR_CLIENT_PORTNOTOPEN: StatusCode = ads(0x48);
pub const ADSERR_CLIENT_NOAMSADDR: StatusCode = ads(0x49);
pub const ADSERR_CLIENT_SYNCINTERNAL: StatusCode = ads(0x50);
pub const ADSERR_CLIENT_ADDHASH: StatusCode = ads(0x51);
pub const ADSERR_CLIENT_REMOVEHASH: StatusCode = ads(0x52);
pub const ADSERR_CLIENT_NOMORESYM: StatusCode = ads(0x53);
pub const ADSERR_CLIENT_SYNCRESINVALID: StatusCode = ads(0x54);
pub const ADSERR_CLIENT_SYNCPORTLOCKED: StatusCode = ads(0x55);

/// Message for codes without a table entry.
pub const UNKNOWN_MESSAGE: &str = "unknown/undocumented";

/// Every documented code with its message.
///
/// Texts are reproduced verbatim from the vendor error table, typos included.
pub const STATUS_MESSAGES: &[(StatusCode, &str)] = &[
    (ADSERR_DEVICE_ERROR, "Error class < device error >"),
    (ADSERR_DEVICE_SRVNOTSUPP, "Service is not supported by server"),
    (ADSERR_DEVICE_INVALIDGRP, "invalid indexGroup"),
    (ADSERR_DEVICE_INVALIDOFFSET, "invalid indexOffset"),
    (ADSERR_DEVICE_INVALIDACCESS, "reading/writing not permitted"),
    (ADSERR_DEVICE_INVALIDSIZE, "parameter size not correct"),
    (ADSERR_DEVICE_INVALIDDATA, "invalid parameter value(s)"),
    (ADSERR_DEVICE_NOTREADY, "device is not in a ready state"),
    (ADSERR_DEVICE_BUSY, "device is busy"),
    (ADSERR_DEVICE_INVALIDCONTEXT, "invalid context (must be InWindows)"),
    (ADSERR_DEVICE_NOMEMORY, "out of memory"),
    (ADSERR_DEVICE_INVALIDPARM, "invalid parameter value(s)"),
    (ADSERR_DEVICE_NOTFOUND, "not found (files, ...)"),
    (ADSERR_DEVICE_SYNTAX, "syntax error in comamnd or file"),
    (ADSERR_DEVICE_INCOMPATIBLE, "objects do not match"),
    (ADSERR_DEVICE_EXISTS, "object already exists"),
    (ADSERR_DEVICE_SYMBOLNOTFOUND, "symbol not found"),
    (ADSERR_DEVICE_SYMBOLVERSIONINVALID, "symbol version invalid"),
    (ADSERR_DEVICE_INVALIDSTATE, "server is in invalid state"),
    (ADSERR_DEVICE_TRANSMODENOTSUPP, "AdsTransMode not supported"),
    (ADSERR_DEVICE_NOTIFYHNDINVALID, "Notification handle is invalid"),
    (ADSERR_DEVICE_CLIENTUNKNOWN, "Notification client not registered"),
    (ADSERR_DEVICE_NOMOREHDLS, "no more notification handles"),
    (ADSERR_DEVICE_INVALIDWATCHSIZE, "size for watch to big"),
    (ADSERR_DEVICE_NOTINIT, "device not initialized"),
    (ADSERR_DEVICE_TIMEOUT, "device has a timeout"),
    (ADSERR_DEVICE_NOINTERFACE, "query interface failed"),
    (ADSERR_DEVICE_INVALIDINTERFACE, "wrong interface required"),
    (ADSERR_DEVICE_INVALIDCLSID, "class ID is invalid"),
    (ADSERR_DEVICE_INVALIDOBJID, "object ID is invalid"),
    (ADSERR_DEVICE_PENDING, "request is pending"),
    (ADSERR_DEVICE_ABORTED, "request is aborted"),
    (ADSERR_DEVICE_WARNING, "signal warning"),
    (ADSERR_DEVICE_INVALIDARRAYIDX, "invalid array index"),
    (
        ADSERR_DEVICE_SYMBOLNOTACTIVE,
        "symbol not active -> release handle and try again",
    ),
    (ADSERR_DEVICE_ACCESSDENIED, "access denied"),
    (ADSERR_DEVICE_LICENSENOTFOUND, "no license found"),
    (ADSERR_DEVICE_LICENSEEXPIRED, "license expired"),
    (ADSERR_DEVICE_LICENSEEXCEEDED, "license exceeded"),
    (ADSERR_DEVICE_LICENSEINVALID, "license invalid"),
    (ADSERR_DEVICE_LICENSESYSTEMID, "license invalid system id"),
    (ADSERR_DEVICE_LICENSENOTIMELIMIT, "license not time limited"),
    (
        ADSERR_DEVICE_LICENSEFUTUREISSUE,
        "license issue time in the future",
    ),
    (ADSERR_DEVICE_LICENSETIMETOLONG, "license time period to long"),
    (ADSERR_DEVICE_EXCEPTION, "exception in device specific code"),
    (ADSERR_DEVICE_LICENSEDUPLICATED, "license file read twice"),
    (ADSERR_DEVICE_SIGNATUREINVALID, "invalid signature"),
    (ADSERR_DEVICE_CERTIFICATEINVALID, "public key certificate"),
    (ADSERR_CLIENT_ERROR, "Error class < client error >"),
    (ADSERR_CLIENT_INVALIDPARM, "invalid parameter at service call"),
    (ADSERR_CLIENT_LISTEMPTY, "polling list  is empty"),
    (ADSERR_CLIENT_VARUSED, "var connection already in use"),
    (ADSERR_CLIENT_DUPLINVOKEID, "invoke id in use"),
    (ADSERR_CLIENT_SYNCTIMEOUT, "timeout elapsed"),
    (ADSERR_CLIENT_W32ERROR, "error in win32 subsystem"),
    (ADSERR_CLIENT_TIMEOUTINVALID, "?"),
    (ADSERR_CLIENT_PORTNOTOPEN, "ads dll"),
    (ADSERR_CLIENT_NOAMSADDR, "ads dll"),
    (ADSERR_CLIENT_SYNCINTERNAL, "internal error in ads sync"),
    (ADSERR_CLIENT_ADDHASH, "hash table overflow"),
    (ADSERR_CLIENT_REMOVEHASH, "key not found in hash table"),
    (ADSERR_CLIENT_NOMORESYM, "no more symbols in cache"),
    (ADSERR_CLIENT_SYNCRESINVALID, "invalid response received"),
    (ADSERR_CLIENT_SYNCPORTLOCKED, "sync port is locked"),
];

/// The status table, built on first use.
pub fn status_table() -> &'static HashMap<StatusCode, &'static str> {
    static TABLE: OnceLock<HashMap<StatusCode, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| STATUS_MESSAGES.iter().copied().collect())
}

/// Resolve a status code to its message.
///
/// Codes reported without the device class base (`0x10` instead of `0x710`)
/// are retried with the base added. Anything else is "unknown/undocumented".
pub fn describe(code: StatusCode) -> &'static str {
    if code.is_ok() {
        return "no error";
    }
    let table = status_table();
    if let Some(text) = table.get(&code) {
        return *text;
    }
    code.0
        .checked_add(ERR_ADSERRS)
        .and_then(|shifted| table.get(&StatusCode(shifted)))
        .copied()
        .unwrap_or(UNKNOWN_MESSAGE)
}

/// Turn a status code into a `Result`, failing on every nonzero value.
pub fn check_status(code: StatusCode) -> Result<()> {
    if code.is_ok() {
        Ok(())
    } else {
        Err(AdsError::protocol(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_every_entry() {
        assert_eq!(status_table().len(), STATUS_MESSAGES.len());
        assert_eq!(STATUS_MESSAGES.len(), 64);
    }

    #[test]
    fn test_every_code_maps_to_its_message() {
        for (code, message) in STATUS_MESSAGES {
            assert_eq!(describe(*code), *message, "code {code}");
        }
    }

    #[test]
    fn test_vendor_texts_are_verbatim() {
        assert_eq!(describe(ADSERR_DEVICE_SYNTAX), "syntax error in comamnd or file");
        assert_eq!(describe(ADSERR_DEVICE_INVALIDWATCHSIZE), "size for watch to big");
        assert_eq!(describe(ADSERR_DEVICE_LICENSETIMETOLONG), "license time period to long");
        assert_eq!(describe(ADSERR_CLIENT_LISTEMPTY), "polling list  is empty");
        assert_eq!(describe(ADSERR_CLIENT_TIMEOUTINVALID), "?");
        assert_eq!(describe(ADSERR_CLIENT_PORTNOTOPEN), "ads dll");
        assert_eq!(describe(ADSERR_CLIENT_NOAMSADDR), "ads dll");
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(describe(StatusCode(0x1234)), UNKNOWN_MESSAGE);
        assert_eq!(describe(StatusCode(0x730)), UNKNOWN_MESSAGE);
        assert_eq!(describe(StatusCode(u32::MAX)), UNKNOWN_MESSAGE);
    }

    #[test]
    fn test_describe_without_class_base() {
        assert_eq!(describe(StatusCode(0x10)), "symbol not found");
        assert_eq!(describe(StatusCode(0x45)), "timeout elapsed");
    }

    #[test]
    fn test_success_code() {
        assert!(ADSERR_NOERR.is_ok());
        assert!(check_status(ADSERR_NOERR).is_ok());
        assert_eq!(describe(ADSERR_NOERR), "no error");
    }

    #[test]
    fn test_check_status_failure() {
        let err = check_status(ADSERR_CLIENT_PORTNOTOPEN).unwrap_err();
        assert_eq!(err.status_code(), Some(ADSERR_CLIENT_PORTNOTOPEN));
        assert!(matches!(err, AdsError::Protocol { ref message, .. } if message == "ads dll"));
    }

    #[test]
    fn test_constants() {
        assert_eq!(ADSERR_DEVICE_SYMBOLNOTFOUND.value(), 0x710);
        assert_eq!(ADSERR_DEVICE_SYMBOLNOTACTIVE.value(), 0x722);
        assert_eq!(ADSERR_CLIENT_SYNCTIMEOUT.value(), 0x745);
        assert_eq!(ADSERR_CLIENT_SYNCPORTLOCKED.value(), 0x755);
    }
}
