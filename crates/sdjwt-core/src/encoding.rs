//! # base64url Encoding
//!
//! Unpadded base64url (RFC 4648 §5) is the only encoding used on the SD-JWT
//! wire: JWS segments, disclosures, and digests. Every codec in the
//! workspace goes through these helpers so that alphabet validation is
//! identical everywhere.

use base64ct::{Base64UrlUnpadded, Encoding};

/// Encode bytes as unpadded base64url.
pub fn b64url_encode(data: impl AsRef<[u8]>) -> String {
    Base64UrlUnpadded::encode_string(data.as_ref())
}

/// Decode unpadded base64url.
///
/// Rejects padding, characters outside the URL-safe alphabet, and
/// non-canonical trailing bits.
pub fn b64url_decode(encoded: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64UrlUnpadded::decode_vec(encoded)
}

/// Returns `true` if every character is in the base64url alphabet.
pub fn is_b64url_alphabet(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Encoder output is always accepted by the alphabet check and decodes back.
        #[test]
        fn encoded_output_stays_in_alphabet(data in prop::collection::vec(any::<u8>(), 0..256)) {
            let encoded = b64url_encode(&data);
            prop_assert!(is_b64url_alphabet(&encoded));
            prop_assert_eq!(b64url_decode(&encoded).unwrap(), data);
        }
    }
}
