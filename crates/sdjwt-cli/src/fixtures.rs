//! Signed credentials written to a temporary directory.

use std::path::PathBuf;

use serde_json::json;
use sdjwt_core::DigestAlgorithm;
use sdjwt_crypto::{sign_compact, Ed25519KeyPair, Ed25519Signer};
use sdjwt_holder::{CombinedFormatForIssuance, Disclosure};
use tempfile::TempDir;

pub(crate) struct Fixture {
    pub dir: TempDir,
    pub combined: String,
    pub credential: PathBuf,
    pub issuer_public_key: PathBuf,
    pub disclosures: Vec<Disclosure>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let issuer = Ed25519KeyPair::from_seed(&[7u8; 32]);
        let issuer_public = issuer.public_key();

        let disclosures = vec![
            Disclosure::new("2GLC42sKQveCfGfryNRN9w", Some("given_name"), json!("John")).unwrap(),
            Disclosure::new("eluV5Og3gSNII8EYnsxA_A", Some("email"), json!("johndoe@example.com"))
                .unwrap(),
        ];
        let digests: Vec<String> = disclosures
            .iter()
            .map(|d| d.digest(DigestAlgorithm::Sha256).into_string())
            .collect();
        let claims = json!({"iss": "https://example.com/issuer", "_sd": digests});
        let token = sign_compact(&claims, Some("vc+sd-jwt"), &Ed25519Signer::new(issuer)).unwrap();
        let combined = CombinedFormatForIssuance {
            sd_jwt: token,
            disclosures: disclosures.iter().map(|d| d.encoded().to_string()).collect(),
        }
        .serialize();

        let credential = dir.path().join("credential.sdjwt");
        std::fs::write(&credential, format!("{combined}\n")).unwrap();
        let issuer_public_key = dir.path().join("issuer.pub");
        std::fs::write(&issuer_public_key, issuer_public.to_hex()).unwrap();

        Self {
            dir,
            combined,
            credential,
            issuer_public_key,
            disclosures,
        }
    }

    /// Write a holder key and return its path and key pair.
    pub fn holder_key(&self) -> (PathBuf, Ed25519KeyPair) {
        let key = Ed25519KeyPair::from_seed(&[9u8; 32]);
        let path = self.dir.path().join("holder.key");
        std::fs::write(&path, key.seed_hex()).unwrap();
        (path, key)
    }
}

/// Run a handler and capture what it writes.
pub(crate) fn capture(
    run: impl FnOnce(&mut dyn std::io::Write) -> anyhow::Result<u8>,
) -> anyhow::Result<String> {
    let mut out = Vec::new();
    let code = run(&mut out)?;
    assert_eq!(code, 0);
    Ok(String::from_utf8(out).unwrap())
}
