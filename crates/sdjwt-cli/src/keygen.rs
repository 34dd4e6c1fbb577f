//! # Keygen Subcommand
//!
//! Generates an Ed25519 key pair for issuer or holder use. The private key
//! file holds the hex seed, the public key file the hex public key; both are
//! the formats the other subcommands read.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use sdjwt_crypto::Ed25519KeyPair;

/// Arguments for `sdjwt keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,

    /// File name prefix; writes `<prefix>.key` and `<prefix>.pub`.
    #[arg(long, default_value = "holder")]
    pub prefix: String,
}

/// Generate a key pair and report the written paths.
pub fn run_keygen(args: &KeygenArgs, out: &mut dyn Write) -> Result<u8> {
    std::fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output.display()
        )
    })?;

    let keypair = Ed25519KeyPair::generate();
    let public_hex = keypair.public_key().to_hex();

    let key_path = args.output.join(format!("{}.key", args.prefix));
    let pub_path = args.output.join(format!("{}.pub", args.prefix));

    std::fs::write(&key_path, keypair.seed_hex())
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;
    std::fs::write(&pub_path, &public_hex)
        .with_context(|| format!("failed to write public key: {}", pub_path.display()))?;
    tracing::info!(path = %pub_path.display(), "wrote Ed25519 key pair");

    writeln!(out, "OK: generated Ed25519 keypair")?;
    writeln!(out, "  Private key: {}", key_path.display())?;
    writeln!(out, "  Public key:  {}", pub_path.display())?;
    writeln!(out, "  Public key (hex): {public_hex}")?;
    Ok(0)
}
