//! # sdjwt CLI entry point
//!
//! Parses command-line arguments, loads the optional config file and
//! dispatches to the subcommand handlers. Failures are printed to stderr as
//! a JSON object and mapped to exit code 2 (bad input) or 1 (execution).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sdjwt_cli::bind::{run_bind, BindingArgs};
use sdjwt_cli::config::{CliConfig, SIGNING_KEY_ENV};
use sdjwt_cli::error::CommandError;
use sdjwt_cli::keygen::{run_keygen, KeygenArgs};
use sdjwt_cli::parse::{run_parse, ParseArgs};
use sdjwt_cli::present::{run_present, PresentArgs};
use sdjwt_cli::CommandContext;

/// SD-JWT holder toolkit.
///
/// Verifies selective disclosure JWTs received from an issuer, builds
/// presentations that reveal only chosen claims and signs holder bindings.
#[derive(Parser, Debug)]
#[command(name = "sdjwt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify a combined format and print its disclosed claims.
    Parse(ParseArgs),

    /// Build a presentation disclosing selected claims.
    Present(PresentArgs),

    /// Sign a standalone holder binding JWT.
    Bind(BindingArgs),

    /// Generate an Ed25519 key pair.
    Keygen(KeygenArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("sdjwt CLI starting");

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| {
        let ctx = CommandContext {
            config,
            env_signing_key: std::env::var(SIGNING_KEY_ENV).ok(),
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match &cli.command {
            Commands::Parse(args) => run_parse(args, &ctx, &mut out),
            Commands::Present(args) => run_present(args, &ctx, &mut out),
            Commands::Bind(args) => run_bind(args, &ctx, &mut out),
            Commands::Keygen(args) => run_keygen(args, &mut out),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::debug!("{e:?}");
            let report = CommandError::from_error(&e);
            eprintln!("{}", report.to_json());
            ExitCode::from(report.exit_code())
        }
    }
}
