//! # Command Errors
//!
//! Every failed command is reported on stderr as a single JSON object,
//! `{"code": <u16>, "message": "<text>"}`, and mapped to an exit code by
//! category: validation errors exit with 2, execution errors with 1.

use serde::Serialize;
use sdjwt_core::error::HOLDER_ERROR_BASE;
use sdjwt_core::{ErrorCategory, SdJwtError};
use thiserror::Error;

/// Code for invalid command-line usage not caught by argument parsing.
pub const USAGE_ERROR_CODE: u16 = HOLDER_ERROR_BASE + 50;

/// Code for failures outside the holder taxonomy (I/O and the like).
pub const INTERNAL_ERROR_CODE: u16 = HOLDER_ERROR_BASE + 99;

/// A command was invoked with arguments that cannot work together.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct UsageError(pub String);

/// The structured form of a failed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandError {
    /// Stable numeric code.
    pub code: u16,
    /// Human-readable message including the error chain.
    pub message: String,
    /// Category; drives the exit code.
    #[serde(skip)]
    pub category: ErrorCategory,
}

impl CommandError {
    /// Classify an error returned by a command handler.
    pub fn from_error(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<SdJwtError>() {
                return Self {
                    code: e.code(),
                    message,
                    category: e.category(),
                };
            }
            if cause.downcast_ref::<UsageError>().is_some() {
                return Self {
                    code: USAGE_ERROR_CODE,
                    message,
                    category: ErrorCategory::Validation,
                };
            }
        }
        Self {
            code: INTERNAL_ERROR_CODE,
            message,
            category: ErrorCategory::Execute,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self.category {
            ErrorCategory::Validation => 2,
            ErrorCategory::Execute => 1,
        }
    }

    /// Render as a single-line JSON object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"message":"unrenderable error"}}"#, self.code)
        })
    }
}
