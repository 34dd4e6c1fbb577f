//! # Combined Format
//!
//! The combined format joins a compact JWS, its disclosures, and an
//! optional holder binding JWT with `~`:
//!
//! ```text
//! issuance:      <token>~<d1>~...~<dn>
//! presentation:  <token>~<d1>~...~<dn>~<binding-jwt or empty>
//! ```
//!
//! [`split`] decomposes either form. [`CombinedFormatForIssuance`] and
//! [`CombinedFormatForPresentation`] serialize them.

use sdjwt_core::{is_b64url_alphabet, SdJwtError};

/// Segment separator.
pub const SEPARATOR: char = '~';

/// The parts of a combined format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCombined {
    /// The signed token (compact JWS).
    pub token: String,
    /// Disclosure segments in wire order.
    pub disclosures: Vec<String>,
    /// Holder binding JWT, when the final segment is one.
    pub binding: Option<String>,
    /// The input ended with an empty segment: presentation-style with the
    /// holder binding omitted.
    pub trailing_empty: bool,
}

impl SplitCombined {
    /// Returns `true` if the input was in presentation form.
    pub fn is_presentation(&self) -> bool {
        self.trailing_empty || self.binding.is_some()
    }
}

/// Split a combined format string into its parts.
///
/// The final segment is a holder binding JWT if it contains `.`, and is
/// recorded as `trailing_empty` if it is empty. Every other segment after
/// the token must be a non-empty base64url disclosure.
///
/// # Errors
///
/// [`SdJwtError::MalformedInput`] for empty input, an empty or invalid
/// token segment, an empty disclosure segment, or a segment outside the
/// base64url alphabet.
pub fn split(combined: &str) -> Result<SplitCombined, SdJwtError> {
    if combined.is_empty() {
        return Err(SdJwtError::MalformedInput("combined format is empty".into()));
    }

    let mut segments: Vec<&str> = combined.split(SEPARATOR).collect();
    let token = segments.remove(0);
    if token.is_empty() {
        return Err(SdJwtError::MalformedInput("token segment is empty".into()));
    }
    if !is_jws_segment(token) {
        return Err(SdJwtError::MalformedInput(
            "token segment is not a compact JWS".into(),
        ));
    }

    let mut trailing_empty = false;
    let mut binding = None;
    match segments.last() {
        Some(last) if last.is_empty() => {
            trailing_empty = true;
            segments.pop();
        }
        Some(last) if last.contains('.') => {
            if !is_jws_segment(last) {
                return Err(SdJwtError::MalformedInput(
                    "holder binding segment is not a compact JWS".into(),
                ));
            }
            binding = Some(last.to_string());
            segments.pop();
        }
        _ => {}
    }

    for (index, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            return Err(SdJwtError::MalformedInput(format!(
                "disclosure segment {index} is empty"
            )));
        }
        if segment.contains('.') {
            return Err(SdJwtError::MalformedInput(format!(
                "holder binding must be the last segment (found at disclosure {index})"
            )));
        }
        if !is_b64url_alphabet(segment) {
            return Err(SdJwtError::MalformedInput(format!(
                "disclosure segment {index} is not base64url"
            )));
        }
    }

    Ok(SplitCombined {
        token: token.to_string(),
        disclosures: segments.into_iter().map(str::to_string).collect(),
        binding,
        trailing_empty,
    })
}

/// A dotted run of base64url parts, as a token or binding JWT must be.
pub(crate) fn is_jws_segment(segment: &str) -> bool {
    segment
        .split('.')
        .all(is_b64url_alphabet)
}

/// Combined format as delivered by an issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedFormatForIssuance {
    /// The signed token.
    pub sd_jwt: String,
    /// Disclosure segments.
    pub disclosures: Vec<String>,
}

impl CombinedFormatForIssuance {
    /// `token~d1~...~dn`
    pub fn serialize(&self) -> String {
        let mut out = self.sd_jwt.clone();
        for disclosure in &self.disclosures {
            out.push(SEPARATOR);
            out.push_str(disclosure);
        }
        out
    }
}

/// Combined format as sent to a verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedFormatForPresentation {
    /// The signed token.
    pub sd_jwt: String,
    /// Selected disclosure segments.
    pub disclosures: Vec<String>,
    /// Holder binding JWT; empty when omitted.
    pub holder_binding: String,
}

impl CombinedFormatForPresentation {
    /// `token~d1~...~dn~binding`. With no binding the result ends in `~`.
    pub fn serialize(&self) -> String {
        let mut out = self.sd_jwt.clone();
        for disclosure in &self.disclosures {
            out.push(SEPARATOR);
            out.push_str(disclosure);
        }
        out.push(SEPARATOR);
        out.push_str(&self.holder_binding);
        out
    }
}
