//! Sharable account id codec.
//!
//! A sharable id lets a user hand out a reference to one of their bank
//! accounts without exposing the institution account identifier in clear
//! form. The encoded form is URL-safe base64 (no padding) of
//!
//! ```text
//! account_id bytes || first 12 bytes of HMAC-SHA256(secret, account_id)
//! ```
//!
//! so only ids produced by `encode` under the same secret decode again.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TAG_LEN: usize = 12;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("too short to hold an account id")]
    TooShort,

    #[error("signature does not match")]
    Signature,

    #[error("account id is not UTF-8")]
    Utf8,
}

#[derive(Clone)]
pub struct SharableIdCodec {
    key: Arc<[u8]>,
}

impl std::fmt::Debug for SharableIdCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharableIdCodec").finish_non_exhaustive()
    }
}

impl SharableIdCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: Arc::from(secret.as_ref()),
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        HmacSha256::new_from_slice(&self.key).expect("HMAC key length is valid")
    }

    /// Turn an account id into its sharable form.
    pub fn encode(&self, account_id: &str) -> String {
        let mut mac = self.mac();
        mac.update(account_id.as_bytes());
        let tag = mac.finalize().into_bytes();

        let mut raw = Vec::with_capacity(account_id.len() + TAG_LEN);
        raw.extend_from_slice(account_id.as_bytes());
        raw.extend_from_slice(&tag[..TAG_LEN]);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Recover the account id from a sharable id.
    pub fn decode(&self, sharable_id: &str) -> Result<String, DecodeError> {
        let raw = URL_SAFE_NO_PAD.decode(sharable_id.trim())?;
        if raw.len() <= TAG_LEN {
            return Err(DecodeError::TooShort);
        }

        let (payload, tag) = raw.split_at(raw.len() - TAG_LEN);
        let mut mac = self.mac();
        mac.update(payload);
        mac.verify_truncated_left(tag)
            .map_err(|_| DecodeError::Signature)?;

        String::from_utf8(payload.to_vec()).map_err(|_| DecodeError::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode() {
        let codec = SharableIdCodec::new("codec-secret");

        for account_id in ["a", "bank_456", "vzeNDwK7KQIm4yEog683uElbp9GRLEFXGK98D", "ünïcødé"] {
            let sharable = codec.encode(account_id);
            assert!(sharable.len() >= 8);
            assert_eq!(codec.decode(&sharable).unwrap(), account_id);
        }
    }

    #[test]
    fn encoded_form_is_url_safe() {
        let codec = SharableIdCodec::new("codec-secret");
        let sharable = codec.encode("acc/with+symbols?");

        assert!(
            sharable
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn ids_from_another_secret_are_rejected() {
        let ours = SharableIdCodec::new("codec-secret");
        let theirs = SharableIdCodec::new("other-secret");

        assert_eq!(
            ours.decode(&theirs.encode("bank_456")),
            Err(DecodeError::Signature)
        );
    }

    #[test]
    fn tampered_ids_are_rejected() {
        let codec = SharableIdCodec::new("codec-secret");
        let mut raw = URL_SAFE_NO_PAD.decode(codec.encode("bank_456")).unwrap();
        raw[0] ^= 0x01;

        assert_eq!(
            codec.decode(&URL_SAFE_NO_PAD.encode(raw)),
            Err(DecodeError::Signature)
        );
    }

    #[test]
    fn malformed_input_is_a_decode_error() {
        let codec = SharableIdCodec::new("codec-secret");

        assert!(matches!(
            codec.decode("not base64!!"),
            Err(DecodeError::Encoding(_))
        ));
        assert_eq!(codec.decode("ABCDEFGH"), Err(DecodeError::TooShort));
    }
}
