//! Fixture issuer for holder integration tests.
//!
//! Builds disclosures with the encoder, places their digests in a claim
//! tree, and signs the tree with a real Ed25519 key.

#![allow(dead_code)]

use serde_json::{json, Value};
use sdjwt_core::DigestAlgorithm;
use sdjwt_crypto::{sign_compact, Ed25519KeyPair, Ed25519Signer, Ed25519Verifier};
use sdjwt_holder::{CombinedFormatForIssuance, Disclosure};

pub struct Issuer {
    signer: Ed25519Signer,
}

impl Issuer {
    pub fn new() -> Self {
        Self {
            signer: Ed25519Signer::new(Ed25519KeyPair::generate()).with_key_id("issuer-key-1"),
        }
    }

    pub fn verifier(&self) -> Ed25519Verifier {
        Ed25519Verifier::new(&self.signer.public_key()).expect("valid issuer key")
    }

    /// Sign `claims` as-is.
    pub fn sign(&self, claims: &Value) -> String {
        sign_compact(claims, Some("vc+sd-jwt"), &self.signer).expect("fixture signing")
    }

    /// Sign `claims` and append `disclosures` in the given order.
    pub fn issue(&self, claims: &Value, disclosures: &[&Disclosure]) -> String {
        CombinedFormatForIssuance {
            sd_jwt: self.sign(claims),
            disclosures: disclosures.iter().map(|d| d.encoded().to_string()).collect(),
        }
        .serialize()
    }
}

pub fn named(salt: &str, name: &str, value: Value) -> Disclosure {
    Disclosure::new(salt, Some(name), value).expect("fixture disclosure")
}

pub fn element(salt: &str, value: Value) -> Disclosure {
    Disclosure::new(salt, None, value).expect("fixture disclosure")
}

pub fn digest(d: &Disclosure) -> String {
    d.digest(DigestAlgorithm::Sha256).into_string()
}

/// A credential with only top-level named disclosures.
pub struct FlatCredential {
    pub issuer: Issuer,
    pub claims: Value,
    pub disclosures: Vec<Disclosure>,
    pub combined: String,
}

impl FlatCredential {
    pub fn new() -> Self {
        let issuer = Issuer::new();
        let disclosures = vec![
            named("2GLC42sKQveCfGfryNRN9w", "given_name", json!("John")),
            named("eluV5Og3gSNII8EYnsxA_A", "family_name", json!("Doe")),
            named("6Ij7tM-a5iVPGboS5tmvVA", "email", json!("johndoe@example.com")),
            named("eI8ZWm9QnKPpNPeNenHdhQ", "birthdate", json!("1940-01-01")),
        ];
        let claims = json!({
            "iss": "https://example.com/issuer",
            "iat": 1683000000,
            "_sd_alg": "sha-256",
            "_sd": disclosures.iter().map(digest).collect::<Vec<_>>(),
        });
        let combined = issuer.issue(&claims, &disclosures.iter().collect::<Vec<_>>());
        Self {
            issuer,
            claims,
            disclosures,
            combined,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.disclosures.iter().filter_map(Disclosure::claim_name).collect()
    }
}

/// A credential with nested and array element disclosures.
pub struct StructuredCredential {
    pub issuer: Issuer,
    pub street: Disclosure,
    pub address: Disclosure,
    pub de: Disclosure,
    pub fr: Disclosure,
    pub given_name: Disclosure,
    pub combined: String,
}

impl StructuredCredential {
    pub fn new() -> Self {
        let issuer = Issuer::new();
        let street = named("5bPs1IquZNa0hkaFzzzZNw", "street_address", json!("123 Main St"));
        let address = named(
            "Qg_O64zqAxe412a108iroA",
            "address",
            json!({"locality": "Anytown", "country": "US", "_sd": [digest(&street)]}),
        );
        let de = element("lklxF5jMYlGTPUovMNIvCA", json!("DE"));
        let fr = element("nPuoQnkRFq3BIeAm7AnXFA", json!("FR"));
        let given_name = named("G02NSrQfjFXQ7Io09syajA", "given_name", json!("Erika"));

        let claims = json!({
            "iss": "https://example.com/issuer",
            "_sd": [digest(&given_name), digest(&address)],
            "nationalities": [{"...": digest(&de)}, {"...": digest(&fr)}, "US"],
        });
        let combined = issuer.issue(&claims, &[&given_name, &address, &street, &de, &fr]);
        Self {
            issuer,
            street,
            address,
            de,
            fr,
            given_name,
            combined,
        }
    }
}
