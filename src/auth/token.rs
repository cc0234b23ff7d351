//! Timestamped, HMAC-SHA256 signed session tokens.
//!
//! A token has three dot-separated, unpadded base64url segments:
//!
//! ```text
//! base64url(user_id) . base64url(issued_at_unix_secs) . base64url(hmac)
//! ```
//!
//! The MAC covers the first two segments exactly as they appear in the
//! token. Tokens are not stored server-side; verification only needs the
//! shared secret and the configured maximum age.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The signing key could not be used to initialise the MAC.
    ///
    /// HMAC accepts keys of any length, so [`TokenSigner::new`] never
    /// produces this today; it is kept so that construction stays fallible
    /// if the MAC is ever swapped for one with key-size limits.
    #[error("invalid signing key")]
    InvalidKey,

    /// Wrong number of segments or undecodable content.
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the payload.
    #[error("bad token signature")]
    BadSignature,

    /// Older than the maximum age, or issued in the future.
    #[error("token expired")]
    Expired,
}

/// Issues and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    max_age_secs: i64,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("max_age_secs", &self.max_age_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Creates a signer for `secret` whose tokens expire after
    /// `max_age_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidKey`] if the MAC rejects the key, which
    /// HMAC-SHA256 never does.
    pub fn new(secret: &[u8], max_age_secs: u64) -> Result<Self, TokenError> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::InvalidKey)?;
        Ok(Self {
            mac,
            max_age_secs: i64::try_from(max_age_secs).unwrap_or(i64::MAX),
        })
    }

    /// Issues a token for `user_id` stamped with the current time.
    #[must_use]
    pub fn issue(&self, user_id: UserId) -> String {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    /// Verifies `token` and returns the user id it carries.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing why the token was rejected.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: UserId, issued_at: i64) -> String {
        let body = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(user_id.get().to_string()),
            URL_SAFE_NO_PAD.encode(issued_at.to_string())
        );
        let signature = self.sign(&body);
        format!("{body}.{}", URL_SAFE_NO_PAD.encode(signature))
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<UserId, TokenError> {
        let mut segments = token.split('.');
        let (Some(id_part), Some(ts_part), Some(sig_part), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac.clone();
        mac.update(id_part.as_bytes());
        mac.update(b".");
        mac.update(ts_part.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let issued_at: i64 = decode_segment(ts_part)?;
        let age = now.saturating_sub(issued_at);
        if age < 0 || age > self.max_age_secs {
            return Err(TokenError::Expired);
        }

        decode_segment::<i64>(id_part).map(UserId::new)
    }

    fn sign(&self, body: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(body.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

fn decode_segment<T: FromStr>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| TokenError::Malformed)?;
    text.parse().map_err(|_| TokenError::Malformed)
}
