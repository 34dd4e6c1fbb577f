//! # sdjwt-cli: SD-JWT Holder Command-Line Interface
//!
//! Thin clap front end over `sdjwt-holder`. Each subcommand module owns its
//! argument struct and a `run_*` handler returning the process exit code.
//!
//! ## Subcommands
//!
//! - `parse`: verify a combined format and print its claims as JSON
//! - `present`: select claims and optionally bind the presentation
//! - `bind`: build a standalone holder binding JWT
//! - `keygen`: generate an Ed25519 key pair as hex files
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; SD-JWT semantics live in `sdjwt-holder`.
//! - Handlers write to the supplied writer, never directly to stdout.
//! - Failures are returned as `anyhow::Error` and rendered by
//!   [`error::CommandError`].

pub mod bind;
pub mod config;
pub mod error;
pub mod keygen;
pub mod parse;
pub mod present;

#[cfg(test)]
pub(crate) mod fixtures;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::CliConfig;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Loaded `--config` file.
    pub config: CliConfig,
    /// Value of [`config::SIGNING_KEY_ENV`], if set.
    pub env_signing_key: Option<String>,
}

/// Read a combined format from `path`, or from stdin when `path` is `-`.
///
/// Surrounding whitespace is stripped.
pub fn read_input(path: &Path) -> Result<String> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input: {}", path.display()))?
    };
    Ok(content.trim().to_string())
}
