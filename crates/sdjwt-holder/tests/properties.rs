//! # Holder Property Tests
//!
//! Randomized checks of the parse / present contract over generated claim
//! sets, using unsigned tokens and the structure-only verifier.

use proptest::prelude::*;
use serde_json::{json, Value};
use sdjwt_core::{b64url_encode, DigestAlgorithm, SdJwtError};
use sdjwt_holder::{create_presentation, parse, CombinedFormatForIssuance, Disclosure, ParseOptions};

fn unsigned_token(claims: &Value) -> String {
    let header = b64url_encode(br#"{"alg":"none"}"#);
    let payload = b64url_encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{payload}.")
}

fn issue(entries: &[(String, String, i64)]) -> (String, Vec<Disclosure>) {
    let disclosures: Vec<Disclosure> = entries
        .iter()
        .map(|(salt, name, value)| Disclosure::new(salt, Some(name), json!(value)).unwrap())
        .collect();
    let digests: Vec<String> = disclosures
        .iter()
        .map(|d| d.digest(DigestAlgorithm::Sha256).into_string())
        .collect();
    let combined = CombinedFormatForIssuance {
        sd_jwt: unsigned_token(&json!({"iss": "issuer", "_sd": digests})),
        disclosures: disclosures.iter().map(|d| d.encoded().to_string()).collect(),
    }
    .serialize();
    (combined, disclosures)
}

/// Distinct claim names, each with a salt and an integer value.
fn claim_set() -> impl Strategy<Value = Vec<(String, String, i64)>> {
    prop::collection::btree_map("[a-z][a-z_]{0,11}", ("[A-Za-z0-9_-]{8,22}", any::<i64>()), 1..8)
        .prop_map(|m| {
            m.into_iter()
                .map(|(name, (salt, value))| (salt, name, value))
                .collect()
        })
}

proptest! {
    /// Presenting every parsed name reproduces the disclosures in order.
    #[test]
    fn present_all_reproduces_disclosures((combined, disclosures) in claim_set().prop_map(|c| issue(&c))) {
        let claims = parse(&combined, &ParseOptions::default()).unwrap();
        let names: Vec<String> = claims.iter().filter_map(|c| c.name.clone()).collect();
        let presentation = create_presentation(&combined, &names, None).unwrap();

        let expected: Vec<&str> = disclosures.iter().map(Disclosure::encoded).collect();
        prop_assert_eq!(presentation, format!("{}~{}~", combined.split('~').next().unwrap(), expected.join("~")));
    }

    /// Re-parsing a presentation yields exactly the selected claims.
    #[test]
    fn selected_subset_survives_reparse(
        entries in claim_set(),
        mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let (combined, disclosures) = issue(&entries);
        let selected: Vec<&str> = disclosures
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .filter_map(|(d, _)| d.claim_name())
            .collect();

        let presentation = create_presentation(&combined, &selected, None).unwrap();
        let claims = parse(&presentation, &ParseOptions::default()).unwrap();
        let names: Vec<&str> = claims.iter().filter_map(|c| c.name.as_deref()).collect();
        prop_assert_eq!(names, selected);
    }

    /// Changing any single salt character makes the disclosure unmatched.
    #[test]
    fn altered_salt_is_unused(entries in claim_set(), pick in any::<prop::sample::Index>(), pos in any::<prop::sample::Index>()) {
        let (combined, disclosures) = issue(&entries);
        let original = &disclosures[pick.index(disclosures.len())];
        let mut salt: Vec<char> = original.salt().chars().collect();
        let at = pos.index(salt.len());
        salt[at] = if salt[at] == 'x' { 'y' } else { 'x' };
        let salt: String = salt.into_iter().collect();
        let forged = Disclosure::new(&salt, original.claim_name(), original.claim_value().clone()).unwrap();

        let tampered = combined.replace(original.encoded(), forged.encoded());
        let err = parse(&tampered, &ParseOptions::default()).unwrap_err();
        prop_assert!(matches!(err, SdJwtError::UnusedDisclosure { .. }), "{err}");
    }
}
