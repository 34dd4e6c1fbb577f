//! # Parse Subcommand
//!
//! Verifies a combined format and prints what the holder received: the
//! digest algorithm, one entry per disclosure and, with `--tree`, the fully
//! expanded claim set.
//!
//! Without an issuer key only the token structure is checked; a warning is
//! logged.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use sdjwt_core::SdJwtError;
use sdjwt_crypto::Ed25519Verifier;
use sdjwt_holder::{parse_sd_jwt, Claim, ParseOptions};

use crate::config::resolve_issuer_key;
use crate::{read_input, CommandContext};

/// Arguments for `sdjwt parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Combined format; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Issuer public key file (hex Ed25519).
    #[arg(long, value_name = "FILE")]
    pub issuer_key: Option<PathBuf>,

    /// File holding the payload of a detached-payload token.
    #[arg(long, value_name = "FILE")]
    pub detached_payload: Option<PathBuf>,

    /// Also print the expanded claim tree.
    #[arg(long)]
    pub tree: bool,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    algorithm: &'a str,
    claims: &'a [Claim],
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    holder_binding: Option<&'a str>,
}

/// Print the claims of a combined format as JSON.
pub fn run_parse(args: &ParseArgs, ctx: &CommandContext, out: &mut dyn Write) -> Result<u8> {
    let combined = read_input(&args.input)?;

    let mut options = ParseOptions::default();
    match resolve_issuer_key(args.issuer_key.as_deref(), &ctx.config)? {
        Some(key) => {
            let verifier = Ed25519Verifier::new(&key).context("invalid issuer public key")?;
            options = options.with_signature_verifier(verifier);
        }
        None => tracing::warn!("no issuer public key given; signature is not verified"),
    }
    if let Some(path) = &args.detached_payload {
        let payload = std::fs::read(path)
            .with_context(|| format!("failed to read detached payload: {}", path.display()))?;
        options = options.with_detached_payload(payload);
    }

    let parsed = parse_sd_jwt(&combined, &options)?;
    if !ctx.config.accepts(parsed.algorithm) {
        return Err(SdJwtError::UnsupportedDigestAlgorithm(format!(
            "{} is not in the configured digest_algorithms",
            parsed.algorithm
        ))
        .into());
    }

    let report = ParseReport {
        algorithm: parsed.algorithm.as_str(),
        claims: &parsed.claims,
        tree: args.tree.then_some(&parsed.tree),
        holder_binding: parsed.holder_binding.as_deref(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::error::CommandError;
    use crate::fixtures::{capture, Fixture};
    use sdjwt_core::DigestAlgorithm;
    use sdjwt_crypto::{detach_payload, Ed25519KeyPair};
    use sdjwt_holder::split;
    use serde_json::json;

    fn args(fixture: &Fixture) -> ParseArgs {
        ParseArgs {
            input: fixture.credential.clone(),
            issuer_key: Some(fixture.issuer_public_key.clone()),
            detached_payload: None,
            tree: false,
        }
    }

    fn run(args: &ParseArgs, ctx: &CommandContext) -> Result<Value> {
        let out = capture(|out| run_parse(args, ctx, out))?;
        Ok(serde_json::from_str(&out)?)
    }

    #[test]
    fn prints_claims_in_disclosure_order() {
        let fixture = Fixture::new();
        let report = run(&args(&fixture), &CommandContext::default()).unwrap();

        assert_eq!(report["algorithm"], "sha-256");
        assert_eq!(report["claims"][0]["name"], "given_name");
        assert_eq!(report["claims"][1]["value"], "johndoe@example.com");
        assert_eq!(
            report["claims"][1]["disclosure"],
            fixture.disclosures[1].encoded()
        );
        assert!(report.get("tree").is_none());
    }

    #[test]
    fn tree_flag_adds_expanded_claims() {
        let fixture = Fixture::new();
        let mut parse = args(&fixture);
        parse.tree = true;
        let report = run(&parse, &CommandContext::default()).unwrap();
        assert_eq!(
            report["tree"],
            json!({
                "iss": "https://example.com/issuer",
                "given_name": "John",
                "email": "johndoe@example.com"
            })
        );
    }

    #[test]
    fn issuer_key_from_config() {
        let fixture = Fixture::new();
        let mut parse = args(&fixture);
        parse.issuer_key = None;
        let ctx = CommandContext {
            config: CliConfig {
                issuer_public_key: Some(fixture.issuer_public_key.clone()),
                ..CliConfig::default()
            },
            env_signing_key: None,
        };
        assert!(run(&parse, &ctx).is_ok());
    }

    #[test]
    fn wrong_issuer_key_is_unverified() {
        let fixture = Fixture::new();
        let other = fixture.dir.path().join("other.pub");
        std::fs::write(&other, Ed25519KeyPair::generate().public_key().to_hex()).unwrap();
        let mut parse = args(&fixture);
        parse.issuer_key = Some(other);

        let err = run(&parse, &CommandContext::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SdJwtError>(),
            Some(SdJwtError::UnverifiedToken(_))
        ));
        assert_eq!(CommandError::from_error(&err).exit_code(), 2);
    }

    #[test]
    fn detached_payload_file() {
        let fixture = Fixture::new();
        let parts = split(&fixture.combined).unwrap();
        let detached = detach_payload(&parts.token).unwrap();
        let payload_segment = parts.token.split('.').nth(1).unwrap();
        let payload = sdjwt_core::b64url_decode(payload_segment).unwrap();

        let input = fixture.dir.path().join("detached.sdjwt");
        std::fs::write(&input, fixture.combined.replacen(&parts.token, &detached, 1)).unwrap();
        let payload_path = fixture.dir.path().join("payload.json");
        std::fs::write(&payload_path, payload).unwrap();

        let mut parse = args(&fixture);
        parse.input = input;
        parse.detached_payload = Some(payload_path);
        let report = run(&parse, &CommandContext::default()).unwrap();
        assert_eq!(report["claims"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn disallowed_digest_algorithm_rejected() {
        let fixture = Fixture::new();
        let ctx = CommandContext {
            config: CliConfig {
                digest_algorithms: vec![DigestAlgorithm::Sha384],
                ..CliConfig::default()
            },
            env_signing_key: None,
        };
        let err = run(&args(&fixture), &ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SdJwtError>(),
            Some(SdJwtError::UnsupportedDigestAlgorithm(_))
        ));
    }

    #[test]
    fn missing_input_is_internal_error() {
        let fixture = Fixture::new();
        let mut parse = args(&fixture);
        parse.input = fixture.dir.path().join("missing.sdjwt");
        let err = run(&parse, &CommandContext::default()).unwrap_err();
        assert_eq!(
            CommandError::from_error(&err).code,
            crate::error::INTERNAL_ERROR_CODE
        );
    }
}
