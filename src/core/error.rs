// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for adscodec.
//!
//! Covers the three failure families of a symbolic access client:
//! - Protocol failures reported by the transport or the device (nonzero status)
//! - Client-side marshalling failures (bounds, size and type mismatches)
//! - Usage errors (session state, configuration, schema)

use thiserror::Error;

use super::status::{self, StatusCode};

/// Errors that can occur while marshalling or transferring PLC values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdsError {
    /// A request returned a nonzero status code.
    #[error("ADS communication failed: {message} (code: {code})")]
    Protocol {
        /// Raw status code
        code: StatusCode,
        /// Message resolved from the status table
        message: String,
    },

    /// A typed access would run past the end of a memory buffer.
    #[error(
        "Buffer overflow: requested {requested} bytes at position {position}, but only {available} bytes available"
    )]
    BufferOverflow {
        /// Requested bytes
        requested: usize,
        /// Bytes left after the cursor
        available: usize,
        /// Cursor position when the access was attempted
        position: usize,
    },

    /// A visitor walk did not consume exactly the calculated footprint.
    #[error("Size mismatch: calculated {expected} bytes, visitor consumed {actual}")]
    SizeMismatch {
        /// Footprint computed by the size calculator
        expected: usize,
        /// Bytes actually consumed by the visitor
        actual: usize,
    },

    /// A request was issued outside the OPEN session state.
    #[error("Invalid session state for {operation}: session is {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: String,
        /// Current state name
        state: String,
    },

    /// Device address could not be built.
    #[error("Invalid device address '{address}': {reason}")]
    InvalidAddress {
        /// Address as given
        address: String,
        /// Why it was rejected
        reason: String,
    },

    /// A value does not match the declared wire type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Actual value type
        actual: String,
    },

    /// Invalid struct declaration.
    #[error("Invalid schema '{schema_name}': {reason}")]
    InvalidSchema {
        /// Type name
        schema_name: String,
        /// Validation error message
        reason: String,
    },

    /// Type not found in a registry.
    #[error("Type not found: '{type_name}'")]
    TypeNotFound {
        /// Type name that was not found
        type_name: String,
    },

    /// Parse error in a declaration, value or configuration.
    #[error("Parse error in {context}: {message}")]
    Parse {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported type or feature.
    #[error("Unsupported feature: '{feature}'")]
    Unsupported {
        /// What is not supported
        feature: String,
    },

    /// Other error.
    #[error("Other error: {0}")]
    Other(String),
}

impl AdsError {
    /// Create a protocol failure for a status code, resolving its message.
    pub fn protocol(code: StatusCode) -> Self {
        AdsError::Protocol {
            code,
            message: status::describe(code).to_string(),
        }
    }

    /// Create a buffer overflow error.
    pub fn buffer_overflow(requested: usize, available: usize, position: usize) -> Self {
        AdsError::BufferOverflow {
            requested,
            available,
            position,
        }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        AdsError::SizeMismatch { expected, actual }
    }

    /// Create an invalid state error.
    pub fn invalid_state(operation: impl Into<String>, state: impl Into<String>) -> Self {
        AdsError::InvalidState {
            operation: operation.into(),
            state: state.into(),
        }
    }

    /// Create an invalid address error.
    pub fn invalid_address(address: impl Into<String>, reason: impl Into<String>) -> Self {
        AdsError::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        AdsError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid schema error.
    pub fn invalid_schema(schema_name: impl Into<String>, reason: impl Into<String>) -> Self {
        AdsError::InvalidSchema {
            schema_name: schema_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        AdsError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        AdsError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported feature error.
    pub fn unsupported(feature: impl Into<String>) -> Self {
        AdsError::Unsupported {
            feature: feature.into(),
        }
    }

    /// Status code carried by a protocol failure.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            AdsError::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for the device error "symbol not active".
    ///
    /// The documented remedy is to release the handle and resolve again.
    pub fn is_symbol_not_active(&self) -> bool {
        self.status_code() == Some(status::ADSERR_DEVICE_SYMBOLNOTACTIVE)
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            AdsError::Protocol { code, message } => {
                vec![("code", code.to_string()), ("message", message.clone())]
            }
            AdsError::BufferOverflow {
                requested,
                available,
                position,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("position", position.to_string()),
            ],
            AdsError::SizeMismatch { expected, actual } => vec![
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            AdsError::InvalidState { operation, state } => {
                vec![("operation", operation.clone()), ("state", state.clone())]
            }
            AdsError::InvalidAddress { address, reason } => {
                vec![("address", address.clone()), ("reason", reason.clone())]
            }
            AdsError::TypeMismatch { expected, actual } => {
                vec![("expected", expected.clone()), ("actual", actual.clone())]
            }
            AdsError::InvalidSchema {
                schema_name,
                reason,
            } => vec![("schema", schema_name.clone()), ("reason", reason.clone())],
            AdsError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            AdsError::Parse { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            AdsError::Config(msg) => vec![("message", msg.clone())],
            AdsError::Unsupported { feature } => vec![("feature", feature.clone())],
            AdsError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

impl From<std::io::Error> for AdsError {
    fn from(err: std::io::Error) -> Self {
        AdsError::Other(format!("IO: {err}"))
    }
}

/// Result type for adscodec operations.
pub type Result<T> = std::result::Result<T, AdsError>;
