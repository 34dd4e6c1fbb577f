//! # Disclosure Codec
//!
//! A disclosure is the base64url (unpadded) encoding of a JSON array:
//!
//! - `[salt, claim_name, claim_value]` for a named claim, referenced from an
//!   object's `_sd` array;
//! - `[salt, claim_value]` for an array element, referenced from a
//!   `{"...": digest}` wrapper.
//!
//! A [`Disclosure`] keeps its wire encoding alongside the decoded parts.
//! Its identity is the digest of that encoding, so the encoding is never
//! regenerated from the decoded parts.

use serde_json::Value;
use sdjwt_core::{
    b64url_decode, b64url_encode, is_b64url_alphabet, DigestAlgorithm, DisclosureDigest,
    DisclosureKind, ReservedKey, SdJwtError,
};

/// A decoded disclosure together with its original wire encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Disclosure {
    encoded: String,
    salt: String,
    claim_name: Option<String>,
    claim_value: Value,
}

impl Disclosure {
    /// Decode a disclosure from its wire form.
    ///
    /// # Errors
    ///
    /// [`SdJwtError::MalformedDisclosure`] if the segment is not base64url,
    /// does not decode to a JSON array of 2 or 3 elements, has an empty or
    /// non-string salt, or names a reserved key.
    pub fn decode(encoded: &str) -> Result<Self, SdJwtError> {
        if encoded.is_empty() || !is_b64url_alphabet(encoded) {
            return Err(malformed("segment is not base64url"));
        }
        let bytes = b64url_decode(encoded).map_err(|e| malformed(format!("base64url: {e}")))?;
        let parts: Vec<Value> = match serde_json::from_slice(&bytes) {
            Ok(Value::Array(parts)) => parts,
            Ok(_) => return Err(malformed("not a JSON array")),
            Err(e) => return Err(malformed(format!("invalid JSON: {e}"))),
        };

        let (salt, claim_name, claim_value) = match <[Value; 3]>::try_from(parts) {
            Ok([salt, name, value]) => {
                let Value::String(name) = name else {
                    return Err(malformed("claim name is not a string"));
                };
                (salt, Some(name), value)
            }
            Err(parts) => match <[Value; 2]>::try_from(parts) {
                Ok([salt, value]) => (salt, None, value),
                Err(parts) => {
                    return Err(malformed(format!(
                        "expected 2 or 3 elements, got {}",
                        parts.len()
                    )))
                }
            },
        };

        let Value::String(salt) = salt else {
            return Err(malformed("salt is not a string"));
        };
        validate_parts(&salt, claim_name.as_deref())?;

        Ok(Self {
            encoded: encoded.to_string(),
            salt,
            claim_name,
            claim_value,
        })
    }

    /// Encode a new disclosure.
    ///
    /// This is the inverse of [`decode`](Self::decode), subject to the same
    /// salt and reserved-name rules.
    pub fn new(salt: &str, claim_name: Option<&str>, claim_value: Value) -> Result<Self, SdJwtError> {
        validate_parts(salt, claim_name)?;
        let array = match claim_name {
            Some(name) => Value::Array(vec![salt.into(), name.into(), claim_value.clone()]),
            None => Value::Array(vec![salt.into(), claim_value.clone()]),
        };
        let encoded = b64url_encode(serde_json::to_vec(&array)?);
        Ok(Self {
            encoded,
            salt: salt.to_string(),
            claim_name: claim_name.map(str::to_string),
            claim_value,
        })
    }

    /// The wire encoding exactly as received or produced.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The claim name, absent for array element disclosures.
    pub fn claim_name(&self) -> Option<&str> {
        self.claim_name.as_deref()
    }

    /// The disclosed value, before any nested digests are resolved.
    pub fn claim_value(&self) -> &Value {
        &self.claim_value
    }

    /// Whether this disclosure names a claim or fills an array slot.
    pub fn kind(&self) -> DisclosureKind {
        match self.claim_name {
            Some(_) => DisclosureKind::Named,
            None => DisclosureKind::ArrayElement,
        }
    }

    /// Returns `true` for `[salt, value]` disclosures.
    pub fn is_array_element(&self) -> bool {
        self.claim_name.is_none()
    }

    /// Digest of the wire encoding under `algorithm`.
    pub fn digest(&self, algorithm: DigestAlgorithm) -> DisclosureDigest {
        algorithm.digest(&self.encoded)
    }
}

impl std::fmt::Display for Disclosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encoded)
    }
}

fn validate_parts(salt: &str, claim_name: Option<&str>) -> Result<(), SdJwtError> {
    if salt.is_empty() {
        return Err(malformed("salt is empty"));
    }
    if let Some(name) = claim_name.filter(|name| ReservedKey::is_reserved(name)) {
        return Err(malformed(format!("claim name '{name}' is reserved")));
    }
    Ok(())
}

fn malformed(msg: impl Into<String>) -> SdJwtError {
    SdJwtError::MalformedDisclosure(msg.into())
}
