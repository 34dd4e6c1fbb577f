//! # Present Subcommand
//!
//! Selects claims from a combined format for issuance and prints the
//! presentation. A binding is either passed in ready-made (`--binding-jwt`)
//! or signed here from the [`BindingArgs`] flags.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use sdjwt_holder::{create_presentation_with, PresentationOptions};

use crate::bind::BindingArgs;
use crate::{read_input, CommandContext};

/// Arguments for `sdjwt present`.
#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Combined format for issuance; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Claim name to disclose. Repeat for several.
    #[arg(long = "claim", value_name = "NAME")]
    pub claims: Vec<String>,

    /// Append this holder binding JWT as-is.
    #[arg(long, value_name = "JWT", conflicts_with_all = ["aud", "nonce", "key", "extra"])]
    pub binding_jwt: Option<String>,

    #[command(flatten)]
    pub binding: BindingArgs,
}

/// Print a presentation disclosing the selected claims.
pub fn run_present(args: &PresentArgs, ctx: &CommandContext, out: &mut dyn Write) -> Result<u8> {
    let combined = read_input(&args.input)?;

    let options = if let Some(jwt) = &args.binding_jwt {
        PresentationOptions::default().with_binding_jwt(jwt.clone())
    } else if args.binding.is_requested() {
        let (info, signer) = args.binding.resolve(ctx)?;
        PresentationOptions::default().with_holder_binding(info, Arc::new(signer))
    } else {
        PresentationOptions::default()
    };

    let presentation = create_presentation_with(&combined, &args.claims, &options)?;
    writeln!(out, "{presentation}")?;
    Ok(0)
}
