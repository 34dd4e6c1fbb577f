//! # Digest Reconciler
//!
//! Expands a verified token's claim tree by resolving every digest
//! reference against the supplied disclosures.
//!
//! ## Rules
//!
//! - The digest algorithm is read once from the top-level `_sd_alg`
//!   (default `sha-256`).
//! - An object's `_sd` digests resolve to named disclosures, inserted as
//!   `name: value`. `_sd` is removed, as is `_sd_alg` at the root.
//! - An array's `{"...": digest}` wrappers resolve to array element
//!   disclosures, replaced in place by their value. Unmatched wrappers are
//!   dropped.
//! - A digest with no disclosure is a withheld claim, never an error.
//! - Disclosed values are reconciled recursively, so disclosures may hide
//!   further disclosures.
//! - Every supplied disclosure is consumed exactly once. A digest referenced
//!   twice is rejected, which also rules out reference cycles.
//! - Chained disclosures nest the tree one level per link; expansion stops
//!   with an error past `MAX_CLAIM_DEPTH` levels.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};
use sdjwt_core::reserved::{ARRAY_ELEMENT_DIGEST, MAX_CLAIM_DEPTH, SD, SD_ALG};
use sdjwt_core::{ClaimNode, DigestAlgorithm, DisclosureDigest, DisclosureKind, SdJwtError};
use sdjwt_crypto::VerifiedToken;

use crate::disclosure::Disclosure;

/// A disclosure resolved against the token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    /// The disclosure wire encoding.
    pub disclosure: String,
    /// Claim name; absent for array elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The disclosed value with nested digests resolved.
    pub value: Value,
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// The expanded claim tree, free of `_sd`, `_sd_alg` and wrappers.
    pub tree: Value,
    /// One claim per disclosure, in disclosure order.
    pub claims: Vec<Claim>,
    /// Algorithm used to match digests.
    pub algorithm: DigestAlgorithm,
}

/// Reconcile `disclosures` against the claims of a verified token.
///
/// # Errors
///
/// - [`SdJwtError::UnverifiedToken`] if the payload is not a JSON object.
/// - [`SdJwtError::UnsupportedDigestAlgorithm`] for an unknown `_sd_alg`.
/// - [`SdJwtError::UnusedDisclosure`] if a disclosure is never referenced.
/// - [`SdJwtError::SdClaimMismatch`] if a named disclosure fills an array
///   slot or an array element disclosure is listed in `_sd`.
/// - [`SdJwtError::DuplicateDigest`], [`SdJwtError::ClaimNameCollision`]
///   and [`SdJwtError::InvalidClaimTree`] for structural conflicts.
pub fn reconcile(
    token: &VerifiedToken,
    disclosures: &[Disclosure],
) -> Result<Reconciled, SdJwtError> {
    let Value::Object(root) = token.claims() else {
        return Err(SdJwtError::UnverifiedToken(
            "token payload is not a JSON object".into(),
        ));
    };

    let algorithm = match root.get(SD_ALG) {
        None => DigestAlgorithm::default(),
        Some(Value::String(name)) => DigestAlgorithm::from_sd_alg(name)?,
        Some(_) => {
            return Err(SdJwtError::InvalidClaimTree(format!(
                "{SD_ALG} must be a string"
            )))
        }
    };

    let mut by_digest = HashMap::with_capacity(disclosures.len());
    for (index, disclosure) in disclosures.iter().enumerate() {
        let digest = disclosure.digest(algorithm);
        if by_digest.insert(digest.clone(), index).is_some() {
            return Err(SdJwtError::DuplicateDigest {
                digest: digest.into_string(),
            });
        }
    }

    let mut reconciler = Reconciler {
        disclosures,
        by_digest,
        referenced: HashSet::new(),
        resolved: vec![None; disclosures.len()],
        withheld: 0,
    };

    let root = root
        .iter()
        .map(|(name, value)| (name.clone(), ClaimNode::from(value.clone())))
        .collect();
    let tree = reconciler.expand_object(root, 0)?;

    let mut claims = Vec::with_capacity(disclosures.len());
    for (disclosure, resolved) in disclosures.iter().zip(reconciler.resolved) {
        let Some(value) = resolved else {
            return Err(SdJwtError::UnusedDisclosure {
                digest: disclosure.digest(algorithm).into_string(),
            });
        };
        claims.push(Claim {
            disclosure: disclosure.encoded().to_string(),
            name: disclosure.claim_name().map(str::to_string),
            value,
        });
    }

    tracing::debug!(
        algorithm = %algorithm,
        disclosed = claims.len(),
        withheld = reconciler.withheld,
        "reconciled disclosures"
    );

    Ok(Reconciled {
        tree,
        claims,
        algorithm,
    })
}

struct Reconciler<'a> {
    disclosures: &'a [Disclosure],
    by_digest: HashMap<DisclosureDigest, usize>,
    referenced: HashSet<DisclosureDigest>,
    resolved: Vec<Option<Value>>,
    withheld: usize,
}

impl<'a> Reconciler<'a> {
    fn expand(&mut self, node: ClaimNode, depth: usize) -> Result<Value, SdJwtError> {
        if depth > MAX_CLAIM_DEPTH {
            return Err(SdJwtError::InvalidClaimTree(format!(
                "claim tree nests deeper than {MAX_CLAIM_DEPTH} levels"
            )));
        }
        match node {
            ClaimNode::Object(map) => self.expand_object(map, depth),
            ClaimNode::Array(items) => self.expand_array(items, depth),
            ClaimNode::Scalar(value) => Ok(value),
        }
    }

    fn expand_object(
        &mut self,
        mut map: BTreeMap<String, ClaimNode>,
        depth: usize,
    ) -> Result<Value, SdJwtError> {
        let digests = match map.remove(SD) {
            Some(node) => sd_digests(node)?,
            None => Vec::new(),
        };
        if depth == 0 {
            map.remove(SD_ALG);
        } else if map.contains_key(SD_ALG) {
            return Err(SdJwtError::InvalidClaimTree(format!(
                "{SD_ALG} is only allowed at the top level"
            )));
        }
        if map.contains_key(ARRAY_ELEMENT_DIGEST) {
            return Err(SdJwtError::InvalidClaimTree(format!(
                "'{ARRAY_ELEMENT_DIGEST}' is only allowed in an array element wrapper"
            )));
        }

        let mut out = Map::new();
        for (name, child) in map {
            let value = self.expand(child, depth + 1)?;
            out.insert(name, value);
        }

        let disclosures = self.disclosures;
        for digest in digests {
            let Some(index) = self.lookup(&digest)? else {
                continue;
            };
            let disclosure = &disclosures[index];
            let Some(name) = disclosure.claim_name() else {
                return Err(mismatch(&digest, disclosure, DisclosureKind::Named));
            };
            if out.contains_key(name) {
                return Err(SdJwtError::ClaimNameCollision {
                    name: name.to_string(),
                });
            }
            let value = self.expand(ClaimNode::from(disclosure.claim_value().clone()), depth + 1)?;
            self.resolved[index] = Some(value.clone());
            out.insert(name.to_string(), value);
        }

        Ok(Value::Object(out))
    }

    fn expand_array(&mut self, items: Vec<ClaimNode>, depth: usize) -> Result<Value, SdJwtError> {
        let disclosures = self.disclosures;
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let Some(wrapped) = item.as_array_element_wrapper() else {
                out.push(self.expand(item, depth + 1)?);
                continue;
            };
            let Some(digest) = wrapped.as_str() else {
                return Err(SdJwtError::InvalidClaimTree(format!(
                    "array element wrapper '{ARRAY_ELEMENT_DIGEST}' must hold a string digest"
                )));
            };
            let digest = DisclosureDigest::new(digest);
            let Some(index) = self.lookup(&digest)? else {
                continue;
            };
            let disclosure = &disclosures[index];
            if !disclosure.is_array_element() {
                return Err(mismatch(&digest, disclosure, DisclosureKind::ArrayElement));
            }
            let value = self.expand(ClaimNode::from(disclosure.claim_value().clone()), depth + 1)?;
            self.resolved[index] = Some(value.clone());
            out.push(value);
        }
        Ok(Value::Array(out))
    }

    /// Record a reference to `digest` and find its disclosure.
    fn lookup(&mut self, digest: &DisclosureDigest) -> Result<Option<usize>, SdJwtError> {
        let index = self.by_digest.get(digest).copied();
        if !self.referenced.insert(digest.clone()) {
            return Err(SdJwtError::DuplicateDigest {
                digest: digest.to_string(),
            });
        }
        if index.is_none() {
            self.withheld += 1;
        }
        Ok(index)
    }
}

fn sd_digests(node: ClaimNode) -> Result<Vec<DisclosureDigest>, SdJwtError> {
    let ClaimNode::Array(items) = node else {
        return Err(SdJwtError::InvalidClaimTree(format!("{SD} must be an array")));
    };
    items
        .into_iter()
        .map(|item| match item {
            ClaimNode::Scalar(Value::String(digest)) => Ok(DisclosureDigest::new(digest)),
            _ => Err(SdJwtError::InvalidClaimTree(format!(
                "{SD} must contain only string digests"
            ))),
        })
        .collect()
}

fn mismatch(digest: &DisclosureDigest, disclosure: &Disclosure, expected: DisclosureKind) -> SdJwtError {
    SdJwtError::SdClaimMismatch {
        digest: digest.to_string(),
        expected,
        found: disclosure.kind(),
    }
}
