//! # sdjwt-holder: SD-JWT Holder Pipeline
//!
//! Implements the Holder role of SD-JWT selective disclosure:
//!
//! - **Disclosure** (`disclosure.rs`): decode and encode single
//!   disclosures and compute their digests.
//!
//! - **Combined format** (`combined.rs`): split `token~d1~...~[binding]`
//!   and serialize issuance and presentation forms.
//!
//! - **Reconcile** (`reconcile.rs`): match disclosures to the digests in
//!   a verified token's claim tree, at any depth, and rebuild the claims.
//!
//! - **Binding** (`binding.rs`): build and sign holder binding JWTs.
//!
//! - **Presentation** (`presentation.rs`): select disclosures by claim name
//!   and assemble a presentation.
//!
//! - **Parse** (`parse.rs`): the receive path, from combined format to
//!   verified claims.
//!
//! ## Security Invariant
//!
//! Digests are computed over disclosure wire bytes exactly as received.
//! A disclosure that matches no digest rejects the whole input; a digest
//! that matches no disclosure is simply a withheld claim.
//!
//! ## Crate Policy
//!
//! - Depends on `sdjwt-core` and `sdjwt-crypto` internally.
//! - Cryptography is reached only through the `Signer` and
//!   `SignatureVerifier` traits.
//! - Every operation is a pure transform of its inputs. Errors are returned,
//!   never logged.

pub mod binding;
pub mod combined;
pub mod disclosure;
pub mod parse;
pub mod presentation;
pub mod reconcile;

pub use binding::{create_holder_binding, BindingInfo, BindingPayload};
pub use combined::{split, CombinedFormatForIssuance, CombinedFormatForPresentation, SplitCombined};
pub use disclosure::Disclosure;
pub use parse::{parse, parse_sd_jwt, ParseOptions, ParsedSdJwt};
pub use presentation::{create_presentation, create_presentation_with, HolderBinding, PresentationOptions};
pub use reconcile::{reconcile, Claim, Reconciled};
