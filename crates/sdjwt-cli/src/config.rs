//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every field may also be given
//! on the command line; the signing key may additionally come from the
//! `SDJWT_SIGNING_KEY` environment variable.
//!
//! Precedence: command-line flag, then environment, then config file.
//!
//! ```yaml
//! signing_key: keys/holder.key        # hex Ed25519 seed file
//! issuer_public_key: keys/issuer.pub  # hex Ed25519 public key file
//! audience: https://verifier.example
//! digest_algorithms: [sha-256, sha-384]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sdjwt_core::DigestAlgorithm;
use sdjwt_crypto::{Ed25519KeyPair, Ed25519PublicKey};

/// Environment variable holding a hex Ed25519 seed for holder binding.
pub const SIGNING_KEY_ENV: &str = "SDJWT_SIGNING_KEY";

/// Contents of the `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Holder signing key file.
    pub signing_key: Option<PathBuf>,
    /// Issuer public key file used to verify tokens.
    pub issuer_public_key: Option<PathBuf>,
    /// Default holder binding audience.
    pub audience: Option<String>,
    /// Digest algorithms accepted by `parse`. Empty accepts all supported.
    pub digest_algorithms: Vec<DigestAlgorithm>,
}

impl CliConfig {
    /// Load the config file, or defaults when no path is given.
    ///
    /// Relative key paths in the file are resolved against the file's
    /// directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for key in [&mut config.signing_key, &mut config.issuer_public_key]
            .into_iter()
            .flatten()
        {
            if key.is_relative() {
                *key = base.join(&*key);
            }
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Whether `parse` accepts tokens using `algorithm`.
    pub fn accepts(&self, algorithm: DigestAlgorithm) -> bool {
        self.digest_algorithms.is_empty() || self.digest_algorithms.contains(&algorithm)
    }
}

/// Resolve the holder signing key.
///
/// `env_seed` is the value of [`SIGNING_KEY_ENV`], passed in by the caller.
pub fn resolve_signing_key(
    flag: Option<&Path>,
    env_seed: Option<String>,
    config: &CliConfig,
) -> Result<Option<Ed25519KeyPair>> {
    if let Some(path) = flag {
        return read_signing_key(path).map(Some);
    }
    if let Some(seed) = env_seed {
        let key = Ed25519KeyPair::from_seed_hex(&seed)
            .with_context(|| format!("invalid key in {SIGNING_KEY_ENV}"))?;
        return Ok(Some(key));
    }
    config
        .signing_key
        .as_deref()
        .map(read_signing_key)
        .transpose()
}

/// Resolve the issuer public key: flag, then config file.
pub fn resolve_issuer_key(
    flag: Option<&Path>,
    config: &CliConfig,
) -> Result<Option<Ed25519PublicKey>> {
    flag.or(config.issuer_public_key.as_deref())
        .map(read_public_key)
        .transpose()
}

/// Read a hex Ed25519 seed file, as written by `keygen`.
pub fn read_signing_key(path: &Path) -> Result<Ed25519KeyPair> {
    let hex = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read private key: {}", path.display()))?;
    Ed25519KeyPair::from_seed_hex(&hex)
        .with_context(|| format!("invalid private key: {}", path.display()))
}

/// Read a hex Ed25519 public key file, as written by `keygen`.
pub fn read_public_key(path: &Path) -> Result<Ed25519PublicKey> {
    let hex = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read public key: {}", path.display()))?;
    Ed25519PublicKey::from_hex(&hex)
        .with_context(|| format!("invalid public key: {}", path.display()))
}
