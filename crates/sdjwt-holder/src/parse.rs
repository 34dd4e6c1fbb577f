//! # Parse
//!
//! Receives a combined format from an issuer: splits it, verifies the
//! token signature through the injected verifier, decodes every disclosure
//! and reconciles them against the token. Any disclosure that cannot be
//! matched rejects the whole input.

use std::sync::Arc;

use serde_json::Value;
use sdjwt_core::{DigestAlgorithm, SdJwtError};
use sdjwt_crypto::{decode_compact, JwsHeader, NoopSignatureVerifier, SignatureVerifier};

use crate::combined::split;
use crate::disclosure::Disclosure;
use crate::reconcile::{reconcile, Claim};

/// Options for [`parse`] and [`parse_sd_jwt`].
#[derive(Clone)]
pub struct ParseOptions {
    verifier: Arc<dyn SignatureVerifier>,
    detached_payload: Option<Vec<u8>>,
}

impl Default for ParseOptions {
    /// Structure-only verification and an attached payload.
    fn default() -> Self {
        Self {
            verifier: Arc::new(NoopSignatureVerifier),
            detached_payload: None,
        }
    }
}

impl std::fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseOptions")
            .field("detached_payload", &self.detached_payload.as_ref().map(Vec::len))
            .finish_non_exhaustive()
    }
}

impl ParseOptions {
    /// Verify the token signature with `verifier`.
    pub fn with_signature_verifier(mut self, verifier: impl SignatureVerifier + 'static) -> Self {
        self.verifier = Arc::new(verifier);
        self
    }

    /// Verify with a shared verifier.
    pub fn with_shared_verifier(mut self, verifier: Arc<dyn SignatureVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// The token uses a detached payload; verify `payload` in its place.
    pub fn with_detached_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.detached_payload = Some(payload.into());
        self
    }
}

/// Everything learned from a combined format.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSdJwt {
    /// One claim per disclosure, in disclosure order.
    pub claims: Vec<Claim>,
    /// The fully expanded claim tree.
    pub tree: Value,
    /// The token's digest algorithm.
    pub algorithm: DigestAlgorithm,
    /// The token's protected header.
    pub header: JwsHeader,
    /// Holder binding segment, if the input was a bound presentation. It is
    /// reported as-is and not verified.
    pub holder_binding: Option<String>,
}

/// Parse a combined format and return the selectable claims.
pub fn parse(combined: &str, options: &ParseOptions) -> Result<Vec<Claim>, SdJwtError> {
    parse_sd_jwt(combined, options).map(|parsed| parsed.claims)
}

/// Parse a combined format and return claims, expanded tree and metadata.
///
/// # Errors
///
/// - [`SdJwtError::MalformedInput`] for an unsplittable input or a
///   structurally broken token.
/// - [`SdJwtError::UnverifiedToken`] if the signature does not verify.
/// - [`SdJwtError::MalformedDisclosure`] for an undecodable disclosure.
/// - Any reconciliation error.
pub fn parse_sd_jwt(combined: &str, options: &ParseOptions) -> Result<ParsedSdJwt, SdJwtError> {
    let parts = split(combined)?;
    let token = decode_compact(
        &parts.token,
        options.detached_payload.as_deref(),
        options.verifier.as_ref(),
    )?;

    let disclosures = parts
        .disclosures
        .iter()
        .map(|wire| Disclosure::decode(wire))
        .collect::<Result<Vec<_>, _>>()?;

    let reconciled = reconcile(&token, &disclosures)?;
    tracing::debug!(
        disclosures = disclosures.len(),
        bound = parts.binding.is_some(),
        "parsed combined format"
    );

    Ok(ParsedSdJwt {
        claims: reconciled.claims,
        tree: reconciled.tree,
        algorithm: reconciled.algorithm,
        header: token.header().clone(),
        holder_binding: parts.binding,
    })
}
