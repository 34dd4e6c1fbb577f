//! # Presentation Assembler
//!
//! Builds a combined format for presentation from a combined format for
//! issuance, keeping only the disclosures whose claim names the holder
//! selected and appending an optional holder binding.
//!
//! The input is assumed to have been checked with [`parse`](crate::parse)
//! already. Disclosures are filtered by decoded claim name, so array
//! element disclosures (which have no name) are never selected.

use std::collections::HashSet;
use std::sync::Arc;

use sdjwt_core::SdJwtError;
use sdjwt_crypto::Signer;

use crate::binding::{create_holder_binding, BindingInfo};
use crate::combined::{is_jws_segment, split, CombinedFormatForPresentation, SEPARATOR};
use crate::disclosure::Disclosure;

/// Where the holder binding segment comes from.
#[derive(Clone, Default)]
pub enum HolderBinding {
    /// No binding; the presentation ends in `~`.
    #[default]
    Omitted,
    /// A binding JWT built elsewhere, appended verbatim.
    Jwt(String),
    /// Build and sign a binding with the given signer.
    Sign {
        /// Binding claims.
        info: BindingInfo,
        /// Holder key.
        signer: Arc<dyn Signer>,
    },
}

impl std::fmt::Debug for HolderBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Omitted => f.write_str("Omitted"),
            Self::Jwt(_) => f.write_str("Jwt(..)"),
            Self::Sign { info, signer } => f
                .debug_struct("Sign")
                .field("info", info)
                .field("alg", &signer.algorithm())
                .finish(),
        }
    }
}

/// Options for [`create_presentation_with`].
#[derive(Debug, Clone, Default)]
pub struct PresentationOptions {
    /// Holder binding source.
    pub holder_binding: HolderBinding,
}

impl PresentationOptions {
    /// Append a ready-made holder binding JWT.
    pub fn with_binding_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.holder_binding = HolderBinding::Jwt(jwt.into());
        self
    }

    /// Build a holder binding from `info`, signed by `signer`.
    pub fn with_holder_binding(mut self, info: BindingInfo, signer: Arc<dyn Signer>) -> Self {
        self.holder_binding = HolderBinding::Sign { info, signer };
        self
    }
}

/// Assemble a presentation disclosing `claims_to_disclose`.
///
/// Equivalent to [`create_presentation_with`] with a ready binding JWT, or
/// none.
pub fn create_presentation<S: AsRef<str>>(
    combined: &str,
    claims_to_disclose: &[S],
    binding_jwt: Option<&str>,
) -> Result<String, SdJwtError> {
    let options = match binding_jwt {
        Some(jwt) => PresentationOptions::default().with_binding_jwt(jwt),
        None => PresentationOptions::default(),
    };
    create_presentation_with(combined, claims_to_disclose, &options)
}

/// Assemble a presentation disclosing `claims_to_disclose`.
///
/// Selected disclosures keep their original order and wire bytes.
///
/// # Errors
///
/// - [`SdJwtError::MalformedInput`] if the input cannot be split, has no
///   disclosures, already carries a holder binding, or the binding JWT is
///   not a dotted base64url token.
/// - [`SdJwtError::MalformedDisclosure`] if a disclosure cannot be decoded.
/// - [`SdJwtError::UnknownClaim`] if a requested name matches no
///   disclosure.
/// - Any binding error when the options ask for a signed binding.
pub fn create_presentation_with<S: AsRef<str>>(
    combined: &str,
    claims_to_disclose: &[S],
    options: &PresentationOptions,
) -> Result<String, SdJwtError> {
    let parts = split(combined)?;
    if parts.binding.is_some() {
        return Err(SdJwtError::MalformedInput(
            "input already carries a holder binding".into(),
        ));
    }
    if parts.disclosures.is_empty() {
        return Err(SdJwtError::MalformedInput(
            "no disclosures found in SD-JWT".into(),
        ));
    }

    let disclosures = parts
        .disclosures
        .iter()
        .map(|wire| Disclosure::decode(wire))
        .collect::<Result<Vec<_>, _>>()?;

    let requested: HashSet<&str> = claims_to_disclose.iter().map(AsRef::as_ref).collect();
    for name in claims_to_disclose.iter().map(AsRef::as_ref) {
        if !disclosures.iter().any(|d| d.claim_name() == Some(name)) {
            return Err(SdJwtError::UnknownClaim(name.to_string()));
        }
    }

    let selected: Vec<String> = disclosures
        .iter()
        .filter(|d| d.claim_name().is_some_and(|name| requested.contains(name)))
        .map(|d| d.encoded().to_string())
        .collect();

    let holder_binding = match &options.holder_binding {
        HolderBinding::Omitted => String::new(),
        HolderBinding::Jwt(jwt) => {
            // Must be recognisable as the binding when the result is split.
            if jwt.contains(SEPARATOR) || !jwt.contains('.') || !is_jws_segment(jwt) {
                return Err(SdJwtError::MalformedInput(
                    "holder binding JWT is not a compact JWS".into(),
                ));
            }
            jwt.clone()
        }
        HolderBinding::Sign { info, signer } => create_holder_binding(info, signer.as_ref())?,
    };

    tracing::debug!(
        available = disclosures.len(),
        selected = selected.len(),
        bound = !holder_binding.is_empty(),
        "presentation assembled"
    );

    Ok(CombinedFormatForPresentation {
        sd_jwt: parts.token,
        disclosures: selected,
        holder_binding,
    }
    .serialize())
}
