//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout the SD-JWT holder toolkit. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every error is terminal for the call that raised it. No partial results
//!   are returned alongside an error.
//! - Integrity failures (`UnusedDisclosure`, `SdClaimMismatch`,
//!   `DuplicateDigest`) carry the offending digest so the caller can report
//!   which disclosure was rejected.
//! - Each error belongs to an [`ErrorCategory`] and has a stable numeric
//!   [`code`](SdJwtError::code) for command-style callers.

use thiserror::Error;

/// Top-level error type for the SD-JWT holder pipeline.
#[derive(Error, Debug)]
pub enum SdJwtError {
    /// The combined format could not be split (empty input, empty token
    /// segment, invalid base64url segment, misplaced binding).
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A disclosure decoded to the wrong arity, an empty salt, or a
    /// reserved claim name.
    #[error("malformed disclosure: {0}")]
    MalformedDisclosure(String),

    /// Reconciliation was attempted without a verified claim set, or the
    /// token signature did not verify.
    #[error("unverified token: {0}")]
    UnverifiedToken(String),

    /// A supplied disclosure's digest never appears in the token.
    #[error("disclosure digest '{digest}' not found in SD-JWT disclosure digests")]
    UnusedDisclosure {
        /// Digest of the orphan disclosure.
        digest: String,
    },

    /// A digest reference and its matched disclosure disagree on kind.
    #[error("disclosure '{digest}' is {found} but is referenced as {expected}")]
    SdClaimMismatch {
        /// Digest at which the mismatch occurred.
        digest: String,
        /// The kind required by the position of the reference.
        expected: DisclosureKind,
        /// The kind of the disclosure actually supplied.
        found: DisclosureKind,
    },

    /// The same digest is referenced more than once, or two identical
    /// disclosures were supplied.
    #[error("digest '{digest}' appears more than once")]
    DuplicateDigest {
        /// The repeated digest.
        digest: String,
    },

    /// A disclosed claim name already exists in its enclosing object.
    #[error("disclosed claim '{name}' already exists in its object")]
    ClaimNameCollision {
        /// The colliding claim name.
        name: String,
    },

    /// The token's claim tree carries a malformed `_sd` array or array
    /// element wrapper.
    #[error("invalid claim tree: {0}")]
    InvalidClaimTree(String),

    /// `_sd_alg` names a hash algorithm this holder does not support.
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedDigestAlgorithm(String),

    /// A claim requested for disclosure has no matching disclosure.
    #[error("disclosure for claim '{0}' not found in SD-JWT")]
    UnknownClaim(String),

    /// Holder binding extra claims override a required binding claim.
    #[error("invalid holder binding claims: {0}")]
    InvalidBindingClaims(String),

    /// Holder binding signing failed.
    #[error("signing error: {0}")]
    Signing(#[source] CryptoError),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Whether a disclosure names its claim or occupies an array slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisclosureKind {
    /// `[salt, name, value]`, referenced from an object's `_sd` array.
    Named,
    /// `[salt, value]`, referenced from an array element wrapper.
    ArrayElement,
}

impl std::fmt::Display for DisclosureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named => f.write_str("a named claim disclosure"),
            Self::ArrayElement => f.write_str("an array element disclosure"),
        }
    }
}

/// How a command-style caller should classify an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The caller supplied input that can never succeed.
    Validation,
    /// The operation failed while executing.
    Execute,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => f.write_str("validation"),
            Self::Execute => f.write_str("execute"),
        }
    }
}

/// First code of the holder error range.
pub const HOLDER_ERROR_BASE: u16 = 7000;

impl SdJwtError {
    /// Classify this error for command-style callers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Signing(_) | Self::Serialization(_) => ErrorCategory::Execute,
            _ => ErrorCategory::Validation,
        }
    }

    /// Stable numeric code, unique per variant.
    pub fn code(&self) -> u16 {
        let offset = match self {
            Self::MalformedInput(_) => 1,
            Self::MalformedDisclosure(_) => 2,
            Self::UnverifiedToken(_) => 3,
            Self::UnusedDisclosure { .. } => 4,
            Self::SdClaimMismatch { .. } => 5,
            Self::DuplicateDigest { .. } => 6,
            Self::ClaimNameCollision { .. } => 7,
            Self::InvalidClaimTree(_) => 8,
            Self::UnsupportedDigestAlgorithm(_) => 9,
            Self::UnknownClaim(_) => 10,
            Self::InvalidBindingClaims(_) => 11,
            Self::Signing(_) => 12,
            Self::Serialization(_) => 13,
        };
        HOLDER_ERROR_BASE + offset
    }
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key parsing or loading failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// The signer could not produce a signature.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The compact token is structurally invalid.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The JWS `alg` is not supported by the capability in use.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

impl From<CryptoError> for SdJwtError {
    /// Maps a token-verification failure into the holder taxonomy.
    ///
    /// Structural problems are input errors; everything else means the token
    /// could not be verified. Signing paths map explicitly to
    /// [`SdJwtError::Signing`] instead of using this conversion.
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MalformedToken(msg) => Self::MalformedInput(msg),
            other => Self::UnverifiedToken(other.to_string()),
        }
    }
}
