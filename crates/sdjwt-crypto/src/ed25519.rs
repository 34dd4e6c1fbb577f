//! # Ed25519 Signing and Verification
//!
//! Ed25519 (`EdDSA`) keys for JWS signatures: issuer fixtures, holder
//! binding assertions, and verification of issuer tokens.
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&SigningInput`. You cannot sign raw bytes.
//! - Private keys are never serialized or logged. `Ed25519KeyPair` does
//!   not implement `Serialize` or expose the private key bytes except
//!   through [`Ed25519KeyPair::seed_hex`] for key files.
//!
//! ## Serde
//!
//! Public keys serialize/deserialize as hex-encoded strings.

use ed25519_dalek::{Signer as _, Verifier as _};
use sdjwt_core::CryptoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::jws::{JwsHeader, SignatureVerifier, Signer, SigningInput};

/// JWS `alg` value for Ed25519.
pub const EDDSA: &str = "EdDSA";

/// An Ed25519 public key (32 bytes) for signature verification.
///
/// Serializes as a hex-encoded string for JSON interoperability.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

/// An Ed25519 key pair for signing operations.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey impls
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse a public key from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        Ok(Self(hex_to_array(hex, "public key")?))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", bytes_to_hex(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair impls
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Create a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create a key pair from a 64-character hex seed.
    pub fn from_seed_hex(hex: &str) -> Result<Self, CryptoError> {
        Ok(Self::from_seed(&hex_to_array(hex, "private key seed")?))
    }

    /// Load the seed from an environment variable holding 64 hex chars.
    pub fn from_env(var_name: &str) -> Result<Self, CryptoError> {
        let hex = std::env::var(var_name)
            .map_err(|_| CryptoError::KeyError(format!("environment variable {var_name} not set")))?;
        Self::from_seed_hex(&hex)
            .map_err(|e| CryptoError::KeyError(format!("{var_name}: {e}")))
    }

    /// The seed as lowercase hex, for writing key files.
    pub fn seed_hex(&self) -> String {
        bytes_to_hex(self.signing_key.as_bytes())
    }

    /// Get the public key from this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a JWS signing input.
    pub fn sign(&self, input: &SigningInput) -> [u8; 64] {
        self.signing_key.sign(input.as_bytes()).to_bytes()
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// JWS capabilities
// ---------------------------------------------------------------------------

/// [`Signer`] producing `EdDSA` JWS signatures.
#[derive(Debug)]
pub struct Ed25519Signer {
    keypair: Ed25519KeyPair,
    key_id: Option<String>,
}

impl Ed25519Signer {
    /// Sign with `keypair`, omitting `kid`.
    pub fn new(keypair: Ed25519KeyPair) -> Self {
        Self {
            keypair,
            key_id: None,
        }
    }

    /// Set the `kid` header value.
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// The public half of the signing key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}

impl Signer for Ed25519Signer {
    fn algorithm(&self) -> &str {
        EDDSA
    }

    fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }

    fn sign(&self, input: &SigningInput) -> Result<Vec<u8>, CryptoError> {
        Ok(self.keypair.sign(input).to_vec())
    }
}

/// [`SignatureVerifier`] accepting `EdDSA` signatures from one public key.
#[derive(Debug, Clone)]
pub struct Ed25519Verifier {
    key: ed25519_dalek::VerifyingKey,
}

impl Ed25519Verifier {
    /// Verify against `public_key`.
    pub fn new(public_key: &Ed25519PublicKey) -> Result<Self, CryptoError> {
        Ok(Self {
            key: public_key.to_verifying_key()?,
        })
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(
        &self,
        header: &JwsHeader,
        input: &SigningInput,
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        if header.alg != EDDSA {
            return Err(CryptoError::UnsupportedAlgorithm(header.alg.clone()));
        }
        let bytes: [u8; 64] = signature.try_into().map_err(|_| {
            CryptoError::VerificationFailed(format!(
                "Ed25519 signature must be 64 bytes, got {}",
                signature.len()
            ))
        })?;
        let sig = ed25519_dalek::Signature::from_bytes(&bytes);
        self.key
            .verify(input.as_bytes(), &sig)
            .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Hex utilities (no external hex crate dependency)
// ---------------------------------------------------------------------------

fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_to_array(hex: &str, what: &str) -> Result<[u8; 32], CryptoError> {
    let hex = hex.trim().to_lowercase();
    if hex.len() != 64 {
        return Err(CryptoError::KeyError(format!(
            "{what} hex must be 64 chars, got {}",
            hex.len()
        )));
    }
    let mut arr = [0u8; 32];
    for (i, byte) in arr.iter_mut().enumerate() {
        let pair = hex
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| CryptoError::KeyError(format!("{what}: non-ASCII hex")))?;
        *byte = u8::from_str_radix(pair, 16)
            .map_err(|e| CryptoError::KeyError(format!("{what}: invalid hex at position {}: {e}", i * 2)))?;
    }
    Ok(arr)
}
