//! # sdjwt-crypto: Cryptographic Capabilities
//!
//! Provides the signing and verification building blocks consumed by the
//! holder pipeline:
//!
//! - **Compact JWS** encoding and decoding, including detached payloads.
//! - **`Signer` / `SignatureVerifier`** capability traits. The holder only
//!   ever calls cryptography through these.
//! - **Ed25519** key pairs, an `EdDSA` signer and a single-key verifier.
//! - **`NoopSignatureVerifier`**, which checks structure only.
//!
//! ## Crate Policy
//!
//! - Depends only on `sdjwt-core` internally.
//! - Ed25519 tests use real keys.
//! - `unsafe` prohibited.

pub mod ed25519;
pub mod jws;

pub use ed25519::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signer, Ed25519Verifier, EDDSA};
pub use jws::{
    decode_compact, detach_payload, sign_compact, JwsHeader, NoopSignatureVerifier,
    SignatureVerifier, Signer, SigningInput, VerifiedToken,
};
