//! # Holder Binding
//!
//! A holder binding is a compact JWS, signed with the holder's key, whose
//! claims tie a presentation to one verifier (`aud`), one request (`nonce`)
//! and one moment (`iat`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sdjwt_core::{SdJwtError, Timestamp};
use sdjwt_crypto::{sign_compact, Signer};

/// Claims the builder always sets; extra claims may not override them.
pub const REQUIRED_BINDING_CLAIMS: [&str; 3] = ["nonce", "aud", "iat"];

/// `typ` header of a holder binding JWT.
pub const BINDING_TYP: &str = "JWT";

/// The required claim set of a holder binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingPayload {
    /// Verifier-supplied nonce.
    pub nonce: String,
    /// Intended verifier.
    #[serde(rename = "aud")]
    pub audience: String,
    /// Issued-at time.
    #[serde(rename = "iat")]
    pub issued_at: Timestamp,
}

/// Everything needed to build a holder binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingInfo {
    /// Required claims.
    pub payload: BindingPayload,
    /// Additional claims merged into the payload.
    pub extra_claims: Map<String, Value>,
}

impl BindingInfo {
    /// Binding for `audience` and `nonce`, issued now.
    pub fn new(audience: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            payload: BindingPayload {
                nonce: nonce.into(),
                audience: audience.into(),
                issued_at: Timestamp::now(),
            },
            extra_claims: Map::new(),
        }
    }

    /// Override the issued-at time.
    pub fn issued_at(mut self, issued_at: Timestamp) -> Self {
        self.payload.issued_at = issued_at;
        self
    }

    /// Add an extra claim.
    pub fn with_claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra_claims.insert(name.into(), value);
        self
    }

    /// The full claim set: extra claims plus the required ones.
    ///
    /// # Errors
    ///
    /// [`SdJwtError::InvalidBindingClaims`] if an extra claim uses a
    /// required claim name.
    pub fn claims(&self) -> Result<Value, SdJwtError> {
        if let Some(name) = REQUIRED_BINDING_CLAIMS
            .iter()
            .find(|name| self.extra_claims.contains_key(**name))
        {
            return Err(SdJwtError::InvalidBindingClaims(format!(
                "extra claim '{name}' would override a required claim"
            )));
        }
        let mut claims = self.extra_claims.clone();
        let Value::Object(required) = serde_json::to_value(&self.payload)? else {
            return Err(SdJwtError::InvalidBindingClaims(
                "binding payload did not serialize to an object".into(),
            ));
        };
        claims.extend(required);
        Ok(Value::Object(claims))
    }
}

/// Build and sign a holder binding JWT.
///
/// # Errors
///
/// [`SdJwtError::InvalidBindingClaims`] for conflicting extra claims and
/// [`SdJwtError::Signing`] if the signer fails. The signer is called once.
pub fn create_holder_binding(info: &BindingInfo, signer: &dyn Signer) -> Result<String, SdJwtError> {
    let claims = info.claims()?;
    let jwt = sign_compact(&claims, Some(BINDING_TYP), signer).map_err(SdJwtError::Signing)?;
    tracing::debug!(alg = signer.algorithm(), extra = info.extra_claims.len(), "holder binding signed");
    Ok(jwt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdjwt_core::CryptoError;
    use sdjwt_crypto::{decode_compact, Ed25519KeyPair, Ed25519Signer, Ed25519Verifier, SigningInput};
    use serde_json::json;

    fn info() -> BindingInfo {
        BindingInfo::new("https://verifier.example", "n-0S6_WzA2Mj")
            .issued_at(Timestamp::from_unix(1_700_000_000).unwrap())
    }

    #[test]
    fn binding_verifies_with_holder_key() {
        let signer = Ed25519Signer::new(Ed25519KeyPair::generate()).with_key_id("holder-key");
        let verifier = Ed25519Verifier::new(&signer.public_key()).unwrap();

        let jwt = create_holder_binding(&info().with_claim("purpose", json!("age check")), &signer)
            .unwrap();
        let verified = decode_compact(&jwt, None, &verifier).unwrap();

        assert_eq!(verified.header().typ.as_deref(), Some("JWT"));
        assert_eq!(verified.header().kid.as_deref(), Some("holder-key"));
        assert_eq!(
            verified.claims(),
            &json!({
                "aud": "https://verifier.example",
                "nonce": "n-0S6_WzA2Mj",
                "iat": 1_700_000_000,
                "purpose": "age check"
            })
        );
    }

    #[test]
    fn extra_claims_cannot_override_required() {
        let signer = Ed25519Signer::new(Ed25519KeyPair::generate());
        for name in REQUIRED_BINDING_CLAIMS {
            let err = create_holder_binding(&info().with_claim(name, json!("x")), &signer)
                .unwrap_err();
            assert!(matches!(err, SdJwtError::InvalidBindingClaims(_)), "{name}");
        }
    }

    struct FailingSigner;

    impl Signer for FailingSigner {
        fn algorithm(&self) -> &str {
            "EdDSA"
        }
        fn sign(&self, _: &SigningInput) -> Result<Vec<u8>, CryptoError> {
            Err(CryptoError::SigningFailed("key unavailable".into()))
        }
    }

    #[test]
    fn signer_failure_is_signing_error() {
        let err = create_holder_binding(&info(), &FailingSigner).unwrap_err();
        assert!(matches!(err, SdJwtError::Signing(CryptoError::SigningFailed(_))));
        assert_eq!(err.category(), sdjwt_core::ErrorCategory::Execute);
    }

    #[test]
    fn payload_roundtrips_through_json() {
        let payload = info().payload;
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["iat"], json!(1_700_000_000));
        let back: BindingPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
