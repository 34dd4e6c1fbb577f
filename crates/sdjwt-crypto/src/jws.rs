//! # Compact JWS
//!
//! Encoding and decoding of compact JWS tokens (`header.payload.signature`),
//! including detached payloads (RFC 7515 Appendix F) where the payload
//! segment is empty and the caller supplies the bytes out of band.
//!
//! ## Security Invariant
//!
//! - Signing and verification accept only [`SigningInput`], which can be
//!   built solely from the two encoded segments. A signer never sees
//!   arbitrary bytes, and a verifier always checks exactly what was on the
//!   wire.
//! - A [`VerifiedToken`] can only be obtained from [`decode_compact`] after
//!   the injected [`SignatureVerifier`] has accepted the signature.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sdjwt_core::{b64url_decode, b64url_encode, is_b64url_alphabet, CryptoError};

/// Protected header of a compact JWS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signature algorithm (`EdDSA`, `ES256`, ...).
    pub alg: String,
    /// Media type of the complete token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Identifier of the signing key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Any other header parameters, preserved as given.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl JwsHeader {
    /// Header with only `alg` set.
    pub fn new(alg: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            typ: None,
            kid: None,
            other: Map::new(),
        }
    }
}

/// The bytes a JWS signature covers: `ASCII(b64(header) || '.' || b64(payload))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput(Vec<u8>);

impl SigningInput {
    pub(crate) fn from_segments(header_b64: &str, payload_b64: &str) -> Self {
        let mut bytes = Vec::with_capacity(header_b64.len() + payload_b64.len() + 1);
        bytes.extend_from_slice(header_b64.as_bytes());
        bytes.push(b'.');
        bytes.extend_from_slice(payload_b64.as_bytes());
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A capability that produces JWS signatures.
///
/// Implementations must be `Send + Sync` so that signing options can be
/// shared across threads.
pub trait Signer: Send + Sync {
    /// The JWS `alg` value this signer produces.
    fn algorithm(&self) -> &str;

    /// Optional `kid` to place in the protected header.
    fn key_id(&self) -> Option<&str> {
        None
    }

    /// Sign the JWS signing input, returning raw signature bytes.
    fn sign(&self, input: &SigningInput) -> Result<Vec<u8>, CryptoError>;
}

/// A capability that checks JWS signatures.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `input` for a token with `header`.
    fn verify(
        &self,
        header: &JwsHeader,
        input: &SigningInput,
        signature: &[u8],
    ) -> Result<(), CryptoError>;
}

/// Accepts every signature.
///
/// Decoding with this verifier still checks the token's structure (three
/// segments, valid base64url, JSON header with `alg`, JSON payload). It is
/// the default for holders that trust the channel the token arrived on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSignatureVerifier;

impl SignatureVerifier for NoopSignatureVerifier {
    fn verify(&self, _: &JwsHeader, _: &SigningInput, _: &[u8]) -> Result<(), CryptoError> {
        Ok(())
    }
}

/// A token whose signature has been accepted by a [`SignatureVerifier`].
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    header: JwsHeader,
    claims: Value,
}

impl VerifiedToken {
    /// The protected header.
    pub fn header(&self) -> &JwsHeader {
        &self.header
    }

    /// The decoded payload.
    pub fn claims(&self) -> &Value {
        &self.claims
    }

    /// Consume and return the decoded payload.
    pub fn into_claims(self) -> Value {
        self.claims
    }
}

/// Serialize `claims` and sign them into a compact JWS.
///
/// `alg` and `kid` come from the signer; `typ` is set when given.
pub fn sign_compact(
    claims: &Value,
    typ: Option<&str>,
    signer: &dyn Signer,
) -> Result<String, CryptoError> {
    let header = JwsHeader {
        alg: signer.algorithm().to_string(),
        typ: typ.map(str::to_string),
        kid: signer.key_id().map(str::to_string),
        other: Map::new(),
    };
    let header_json = serde_json::to_vec(&header)
        .map_err(|e| CryptoError::SigningFailed(format!("header serialization: {e}")))?;
    let payload_json = serde_json::to_vec(claims)
        .map_err(|e| CryptoError::SigningFailed(format!("payload serialization: {e}")))?;

    let header_b64 = b64url_encode(header_json);
    let payload_b64 = b64url_encode(payload_json);
    let input = SigningInput::from_segments(&header_b64, &payload_b64);
    let signature = signer.sign(&input)?;

    Ok(format!("{header_b64}.{payload_b64}.{}", b64url_encode(signature)))
}

/// Decode a compact JWS and verify its signature.
///
/// When `detached_payload` is given the payload segment must be empty and
/// the supplied bytes are verified in its place. An empty payload segment
/// without a detached payload is rejected.
pub fn decode_compact(
    token: &str,
    detached_payload: Option<&[u8]>,
    verifier: &dyn SignatureVerifier,
) -> Result<VerifiedToken, CryptoError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [header_b64, payload_b64, signature_b64] = segments.as_slice() else {
        return Err(CryptoError::MalformedToken(format!(
            "compact JWS must have 3 segments, got {}",
            segments.len()
        )));
    };

    for (name, segment) in [
        ("header", header_b64),
        ("payload", payload_b64),
        ("signature", signature_b64),
    ] {
        if !is_b64url_alphabet(segment) {
            return Err(CryptoError::MalformedToken(format!(
                "{name} segment is not base64url"
            )));
        }
    }

    let header_bytes = b64url_decode(header_b64)
        .map_err(|e| CryptoError::MalformedToken(format!("header: {e}")))?;
    let header: JwsHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| CryptoError::MalformedToken(format!("header: {e}")))?;
    if header.alg.is_empty() {
        return Err(CryptoError::MalformedToken("header has empty alg".into()));
    }

    let (payload_b64, payload_bytes) = match (payload_b64.is_empty(), detached_payload) {
        (true, Some(detached)) => (b64url_encode(detached), detached.to_vec()),
        (true, None) => {
            return Err(CryptoError::MalformedToken(
                "payload segment is empty and no detached payload was supplied".into(),
            ))
        }
        (false, Some(_)) => {
            return Err(CryptoError::MalformedToken(
                "detached payload supplied but the token carries its own payload".into(),
            ))
        }
        (false, None) => {
            let bytes = b64url_decode(payload_b64)
                .map_err(|e| CryptoError::MalformedToken(format!("payload: {e}")))?;
            (payload_b64.to_string(), bytes)
        }
    };

    let signature = b64url_decode(signature_b64)
        .map_err(|e| CryptoError::MalformedToken(format!("signature: {e}")))?;

    let input = SigningInput::from_segments(header_b64, &payload_b64);
    verifier.verify(&header, &input, &signature)?;

    let claims: Value = serde_json::from_slice(&payload_bytes)
        .map_err(|e| CryptoError::MalformedToken(format!("payload is not JSON: {e}")))?;

    tracing::trace!(alg = %header.alg, "compact JWS verified");
    Ok(VerifiedToken { header, claims })
}

/// Remove the payload segment of a compact JWS, producing its detached form.
pub fn detach_payload(token: &str) -> Result<String, CryptoError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(_), Some(s), None) => Ok(format!("{h}..{s}")),
        _ => Err(CryptoError::MalformedToken(
            "compact JWS must have 3 segments".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn algorithm(&self) -> &str {
            "TEST"
        }
        fn key_id(&self) -> Option<&str> {
            Some("k1")
        }
        fn sign(&self, input: &SigningInput) -> Result<Vec<u8>, CryptoError> {
            Ok(input.as_bytes().iter().rev().copied().collect())
        }
    }

    struct ReverseVerifier;

    impl SignatureVerifier for ReverseVerifier {
        fn verify(
            &self,
            _: &JwsHeader,
            input: &SigningInput,
            signature: &[u8],
        ) -> Result<(), CryptoError> {
            let expected: Vec<u8> = input.as_bytes().iter().rev().copied().collect();
            if expected == signature {
                Ok(())
            } else {
                Err(CryptoError::VerificationFailed("mismatch".into()))
            }
        }
    }

    #[test]
    fn sign_then_decode() {
        let claims = json!({"iss": "https://issuer.example", "n": 1});
        let token = sign_compact(&claims, Some("JWT"), &FixedSigner).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let verified = decode_compact(&token, None, &ReverseVerifier).unwrap();
        assert_eq!(verified.claims(), &claims);
        assert_eq!(verified.header().alg, "TEST");
        assert_eq!(verified.header().kid.as_deref(), Some("k1"));
        assert_eq!(verified.header().typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let token = sign_compact(&json!({"a": 1}), None, &FixedSigner).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = b64url_encode(br#"{"a":2}"#);
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);
        let err = decode_compact(&forged, None, &ReverseVerifier).unwrap_err();
        assert!(matches!(err, CryptoError::VerificationFailed(_)));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for token in ["", "a.b", "a.b.c.d"] {
            let err = decode_compact(token, None, &NoopSignatureVerifier).unwrap_err();
            assert!(matches!(err, CryptoError::MalformedToken(_)), "{token}");
        }
    }

    #[test]
    fn header_without_alg_is_malformed() {
        let header = b64url_encode(br#"{"typ":"JWT"}"#);
        let payload = b64url_encode(br#"{}"#);
        let token = format!("{header}.{payload}.");
        let err = decode_compact(&token, None, &NoopSignatureVerifier).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedToken(_)));
    }

    #[test]
    fn noop_verifier_still_requires_json_payload() {
        let header = b64url_encode(br#"{"alg":"none"}"#);
        let payload = b64url_encode(b"not json");
        let token = format!("{header}.{payload}.");
        let err = decode_compact(&token, None, &NoopSignatureVerifier).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedToken(_)));
    }

    #[test]
    fn detached_payload_verifies_only_with_payload() {
        let claims = json!({"sub": "alice"});
        let token = sign_compact(&claims, None, &FixedSigner).unwrap();
        let detached = detach_payload(&token).unwrap();
        assert!(detached.contains(".."));

        let payload = serde_json::to_vec(&claims).unwrap();
        let verified = decode_compact(&detached, Some(payload.as_slice()), &ReverseVerifier).unwrap();
        assert_eq!(verified.claims(), &claims);

        let err = decode_compact(&detached, None, &ReverseVerifier).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedToken(_)));

        let err = decode_compact(&detached, Some(&br#"{"sub":"mallory"}"#[..]), &ReverseVerifier)
            .unwrap_err();
        assert!(matches!(err, CryptoError::VerificationFailed(_)));
    }

    #[test]
    fn detached_payload_rejected_for_attached_token() {
        let token = sign_compact(&json!({}), None, &FixedSigner).unwrap();
        let err = decode_compact(&token, Some(&b"{}"[..]), &ReverseVerifier).unwrap_err();
        assert!(matches!(err, CryptoError::MalformedToken(_)));
    }

    #[test]
    fn unknown_header_parameters_are_preserved() {
        let header = b64url_encode(br#"{"alg":"EdDSA","x5t":"abc"}"#);
        let payload = b64url_encode(br#"{}"#);
        let token = format!("{header}.{payload}.");
        let verified = decode_compact(&token, None, &NoopSignatureVerifier).unwrap();
        assert_eq!(verified.header().other.get("x5t"), Some(&json!("abc")));
    }
}
