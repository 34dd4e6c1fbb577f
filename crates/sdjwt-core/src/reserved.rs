//! # Reserved Claim Keys
//!
//! The single table of keys with SD-JWT meaning inside a claim tree. The
//! disclosure encoder, the disclosure decoder and the reconciler all consult
//! [`ReservedKey::lookup`], so the set cannot drift between paths.

/// Object-level array of disclosure digests.
pub const SD: &str = "_sd";

/// Top-level name of the digest hash algorithm.
pub const SD_ALG: &str = "_sd_alg";

/// Key of a single-key object standing in for a withheld array element.
pub const ARRAY_ELEMENT_DIGEST: &str = "...";

/// Deepest nesting the reconciler expands. Each chained disclosure adds one
/// level, so this also bounds disclosure chains.
pub const MAX_CLAIM_DEPTH: usize = 128;

/// A key with SD-JWT meaning in the claim tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedKey {
    /// `_sd`
    Sd,
    /// `_sd_alg`
    SdAlg,
    /// `...`
    ArrayElementDigest,
}

impl ReservedKey {
    /// All reserved keys.
    pub const ALL: [ReservedKey; 3] = [Self::Sd, Self::SdAlg, Self::ArrayElementDigest];

    /// Returns the wire spelling of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sd => SD,
            Self::SdAlg => SD_ALG,
            Self::ArrayElementDigest => ARRAY_ELEMENT_DIGEST,
        }
    }

    /// Find the reserved key spelled `key`, if any.
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// Returns `true` if `key` may not be used as a disclosed claim name.
    pub fn is_reserved(key: &str) -> bool {
        Self::lookup(key).is_some()
    }
}

impl std::fmt::Display for ReservedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_every_key() {
        for key in ReservedKey::ALL {
            assert_eq!(ReservedKey::lookup(key.as_str()), Some(key));
        }
    }

    #[test]
    fn ordinary_names_are_not_reserved() {
        assert!(!ReservedKey::is_reserved("given_name"));
        assert!(!ReservedKey::is_reserved("sd"));
        assert!(!ReservedKey::is_reserved(".."));
    }

    #[test]
    fn wire_spelling() {
        assert_eq!(ReservedKey::Sd.to_string(), "_sd");
        assert_eq!(ReservedKey::SdAlg.to_string(), "_sd_alg");
        assert_eq!(ReservedKey::ArrayElementDigest.to_string(), "...");
    }
}
