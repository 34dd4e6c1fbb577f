//! # sdjwt-core: Foundational Types for the SD-JWT Holder
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! that every other crate shares, so that a digest, a reserved key, or an
//! error kind means exactly one thing everywhere.
//!
//! ## Key Design Principles
//!
//! 1. **One error taxonomy.** [`SdJwtError`] carries every failure the holder
//!    pipeline can report. Each variant has a stable code and a category for
//!    command-style callers.
//!
//! 2. **Digests over wire bytes.** [`DigestAlgorithm::digest`] accepts the
//!    encoded disclosure string, never a decoded value.
//!
//! 3. **One reserved-key table.** `_sd`, `_sd_alg` and `...` are defined once
//!    in [`reserved`] and consulted by both the encoder and the decoder.
//!
//! 4. **Tagged claim tree.** [`ClaimNode`] is the variant type the reconciler
//!    recurses over.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sdjwt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod claims;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod reserved;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use claims::ClaimNode;
pub use digest::{DigestAlgorithm, DisclosureDigest};
pub use encoding::{b64url_decode, b64url_encode, is_b64url_alphabet};
pub use error::{CryptoError, DisclosureKind, ErrorCategory, SdJwtError};
pub use reserved::ReservedKey;
pub use temporal::Timestamp;
