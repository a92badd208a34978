//! Magic-link token codec.
//!
//! Tokens are stateless HS256 JWTs carrying the member's email, a purpose
//! tag, and an absolute expiry. Nothing is stored server-side: a token is
//! valid for any number of uses until it expires (accepted tradeoff — the
//! TTL is short). Rotating the secret invalidates all outstanding tokens.
//!
//! Purpose scoping is the load-bearing part: a registration token must not
//! be replayable against the profile-update flow even though both carry
//! the same subject and are signed with the same secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// What a magic-link token authorizes. One token, one workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Registration,
    ProfileUpdate,
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenPurpose::Registration => write!(f, "registration"),
            TokenPurpose::ProfileUpdate => write!(f, "profile_update"),
        }
    }
}

/// Why a token was rejected. Callers collapse all of these into one
/// user-facing "invalid token" error but log the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    Malformed,
    BadSignature,
    Expired,
    PurposeMismatch,
}

impl std::fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::BadSignature => "bad_signature",
            TokenRejection::Expired => "expired",
            TokenRejection::PurposeMismatch => "purpose_mismatch",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the member's email
    sub: String,
    purpose: TokenPurpose,
    /// Expiration timestamp (seconds)
    exp: i64,
    /// Issued at timestamp
    iat: i64,
}

/// Mints and verifies magic-link tokens.
#[derive(Clone)]
pub struct MagicLinkService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl MagicLinkService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a token for `email`, scoped to `purpose`, expiring after the
    /// configured TTL. Pure function of inputs + current time + secret.
    pub fn issue(&self, email: &str, purpose: TokenPurpose) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            purpose,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify signature, expiry and purpose; return the subject email.
    ///
    /// Never panics on malformed input. Expiry is checked here rather than
    /// by the jwt library so that `now >= exp` counts as expired with no
    /// leeway.
    pub fn verify(
        &self,
        token: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<String, TokenRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            }
        })?;

        if Utc::now().timestamp() >= data.claims.exp {
            return Err(TokenRejection::Expired);
        }

        if data.claims.purpose != expected_purpose {
            return Err(TokenRejection::PurposeMismatch);
        }

        Ok(data.claims.sub)
    }
}

/// Build the URL embedded in a magic-link email. The token travels as an
/// opaque query parameter.
pub fn magic_link_url(base_url: &str, path: &str, token: &str) -> String {
    format!(
        "{}{}?token={}",
        base_url.trim_end_matches('/'),
        path,
        urlencoding::encode(token)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MagicLinkService {
        MagicLinkService::new("test_secret_key", Duration::minutes(30))
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let svc = service();
        let token = svc.issue("a@x.com", TokenPurpose::Registration).unwrap();

        let subject = svc.verify(&token, TokenPurpose::Registration).unwrap();
        assert_eq!(subject, "a@x.com");
    }

    #[test]
    fn test_purpose_mismatch_rejected() {
        let svc = service();
        let token = svc.issue("a@x.com", TokenPurpose::Registration).unwrap();

        let err = svc.verify(&token, TokenPurpose::ProfileUpdate).unwrap_err();
        assert_eq!(err, TokenRejection::PurposeMismatch);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL puts exp in the past at issue time
        let svc = MagicLinkService::new("test_secret_key", Duration::minutes(-5));
        let token = svc.issue("a@x.com", TokenPurpose::ProfileUpdate).unwrap();

        let err = svc.verify(&token, TokenPurpose::ProfileUpdate).unwrap_err();
        assert_eq!(err, TokenRejection::Expired);
    }

    #[test]
    fn test_token_expired_at_exact_expiry_instant() {
        // Zero TTL: exp == iat == now, and now >= exp counts as expired
        let svc = MagicLinkService::new("test_secret_key", Duration::zero());
        let token = svc.issue("a@x.com", TokenPurpose::Registration).unwrap();

        let err = svc.verify(&token, TokenPurpose::Registration).unwrap_err();
        assert_eq!(err, TokenRejection::Expired);
    }

    #[test]
    fn test_expiry_checked_before_purpose() {
        let svc = MagicLinkService::new("test_secret_key", Duration::minutes(-5));
        let token = svc.issue("a@x.com", TokenPurpose::Registration).unwrap();

        // Expired AND wrong purpose: expiry wins
        let err = svc.verify(&token, TokenPurpose::ProfileUpdate).unwrap_err();
        assert_eq!(err, TokenRejection::Expired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let other = MagicLinkService::new("other_secret", Duration::minutes(30));
        let token = svc.issue("a@x.com", TokenPurpose::Registration).unwrap();

        let err = other.verify(&token, TokenPurpose::Registration).unwrap_err();
        assert_eq!(err, TokenRejection::BadSignature);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let svc = service();
        let token = svc.issue("a@x.com", TokenPurpose::Registration).unwrap();

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        let tampered = parts.join(".");

        assert!(svc.verify(&tampered, TokenPurpose::Registration).is_err());
    }

    #[test]
    fn test_garbage_input_is_malformed_not_panic() {
        let svc = service();
        assert_eq!(
            svc.verify("not-a-jwt", TokenPurpose::Registration),
            Err(TokenRejection::Malformed)
        );
        assert_eq!(
            svc.verify("", TokenPurpose::Registration),
            Err(TokenRejection::Malformed)
        );
    }

    #[test]
    fn test_magic_link_url_encodes_token() {
        let url = magic_link_url("http://localhost:8000/", "/auth/verify", "a.b+c");
        assert_eq!(url, "http://localhost:8000/auth/verify?token=a.b%2Bc");
    }
}
