//! # Disclosure Digests
//!
//! Defines [`DigestAlgorithm`] (the token-wide hash named by `_sd_alg`) and
//! [`DisclosureDigest`] (the base64url digest string that appears in `_sd`
//! arrays and array element wrappers).
//!
//! ## Security Invariant
//!
//! A digest is always computed over the exact wire bytes of a disclosure as
//! the issuer produced them. [`DigestAlgorithm::digest`] takes the encoded
//! string, never a decoded structure, so re-encoding cannot silently change
//! a disclosure's identity.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::encoding::b64url_encode;
use crate::error::SdJwtError;

/// The hash algorithm used to produce disclosure digests.
///
/// Names follow the IANA "Named Information Hash Algorithm" registry, which
/// is what `_sd_alg` carries on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-256, the default when `_sd_alg` is absent.
    #[default]
    #[serde(rename = "sha-256")]
    Sha256,
    /// SHA-384.
    #[serde(rename = "sha-384")]
    Sha384,
    /// SHA-512.
    #[serde(rename = "sha-512")]
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the `_sd_alg` identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha-256",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
        }
    }

    /// Resolve an `_sd_alg` value. Matching is exact; `SHA-256` is not
    /// `sha-256`.
    pub fn from_sd_alg(name: &str) -> Result<Self, SdJwtError> {
        match name {
            "sha-256" => Ok(Self::Sha256),
            "sha-384" => Ok(Self::Sha384),
            "sha-512" => Ok(Self::Sha512),
            other => Err(SdJwtError::UnsupportedDigestAlgorithm(other.to_string())),
        }
    }

    /// Hash raw bytes.
    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// Compute the digest of a disclosure from its wire encoding.
    pub fn digest(&self, encoded_disclosure: &str) -> DisclosureDigest {
        DisclosureDigest(b64url_encode(self.hash(encoded_disclosure.as_bytes())))
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = SdJwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_sd_alg(s)
    }
}

/// A base64url-encoded disclosure digest.
///
/// Comparison is exact and case-sensitive; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisclosureDigest(String);

impl DisclosureDigest {
    /// Wrap a digest string taken from a claim tree.
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The digest as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the digest string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DisclosureDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DisclosureDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
