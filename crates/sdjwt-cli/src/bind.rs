//! # Bind Subcommand
//!
//! Builds a holder binding JWT on its own. [`BindingArgs`] is shared with
//! `present`, which signs the same binding inline.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use sdjwt_crypto::Ed25519Signer;
use sdjwt_holder::{create_holder_binding, BindingInfo};

use crate::config::{resolve_signing_key, SIGNING_KEY_ENV};
use crate::error::UsageError;
use crate::CommandContext;

/// Holder binding claims and key.
#[derive(Args, Debug, Clone, Default)]
pub struct BindingArgs {
    /// Intended verifier. Defaults to `audience` from the config file.
    #[arg(long)]
    pub aud: Option<String>,

    /// Nonce supplied by the verifier.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Holder private key file (hex Ed25519 seed).
    #[arg(long, value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Extra binding claims as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub extra: Option<String>,
}

impl BindingArgs {
    /// Whether any binding flag was given.
    pub fn is_requested(&self) -> bool {
        self.aud.is_some() || self.nonce.is_some() || self.key.is_some() || self.extra.is_some()
    }

    /// Resolve claims and holder key, filling gaps from the context.
    pub fn resolve(&self, ctx: &CommandContext) -> Result<(BindingInfo, Ed25519Signer)> {
        let audience = self
            .aud
            .clone()
            .or_else(|| ctx.config.audience.clone())
            .ok_or_else(|| {
                UsageError("holder binding requires --aud or `audience` in the config".into())
            })?;
        let nonce = self
            .nonce
            .clone()
            .ok_or_else(|| UsageError("holder binding requires --nonce".into()))?;
        let keypair = resolve_signing_key(
            self.key.as_deref(),
            ctx.env_signing_key.clone(),
            &ctx.config,
        )?
        .ok_or_else(|| {
            UsageError(format!(
                "holder binding requires --key, {SIGNING_KEY_ENV} or `signing_key` in the config"
            ))
        })?;

        let info = parse_extra(self.extra.as_deref())?
            .into_iter()
            .fold(BindingInfo::new(audience, nonce), |info, (name, value)| {
                info.with_claim(name, value)
            });
        Ok((info, Ed25519Signer::new(keypair)))
    }
}

/// Parse `--extra` as a JSON object.
pub fn parse_extra(extra: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = extra else {
        return Ok(Map::new());
    };
    match serde_json::from_str(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(UsageError("--extra must be a JSON object".into()).into()),
        Err(e) => Err(UsageError(format!("--extra is not valid JSON: {e}")).into()),
    }
}

/// Print a signed holder binding JWT.
pub fn run_bind(args: &BindingArgs, ctx: &CommandContext, out: &mut dyn Write) -> Result<u8> {
    let (info, signer) = args.resolve(ctx)?;
    let jwt = create_holder_binding(&info, &signer).context("creating holder binding")?;
    writeln!(out, "{jwt}")?;
    Ok(0)
}
