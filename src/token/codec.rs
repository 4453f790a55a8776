use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::error::Error;
use crate::token::{Claims, TokenPurpose};
use crate::types::Identity;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum TokenError {
    #[error("Invalid signature or malformed token")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
}

/// Signs and verifies HS256 tokens with a secret fixed for the process
/// lifetime.
#[derive(Clone)]
pub(crate) struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .finish()
    }
}

impl TokenCodec {
    pub(crate) fn new(secret: &str, access_lifetime: Duration, refresh_lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against our own clock in `decode_at`, without leeway
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_lifetime,
            refresh_lifetime,
        }
    }

    pub(crate) fn lifetime(&self, purpose: TokenPurpose) -> Duration {
        match purpose {
            TokenPurpose::Access => self.access_lifetime,
            TokenPurpose::Refresh => self.refresh_lifetime,
        }
    }

    /// Mints a token for `identity` that expires one configured lifetime
    /// from now.
    pub(crate) fn issue(
        &self,
        identity: &Identity,
        purpose: TokenPurpose,
    ) -> Result<String, Error> {
        self.issue_at(identity, purpose, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        identity: &Identity,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let claims = Claims::new(identity, purpose, now, self.lifetime(purpose));

        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, Error> {
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }

    pub(crate) fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_at(token, Utc::now())
    }

    /// Verifies the signature first, then rejects tokens whose expiry is at
    /// or before `now`.
    pub(crate) fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let token_data =
            match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
                Ok(token_data) => token_data,
                Err(e) => {
                    tracing::debug!("token rejected: {:?}", e.kind());
                    return Err(TokenError::InvalidSignature);
                }
            };

        if now.timestamp() >= token_data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", Duration::hours(24), Duration::days(7))
    }

    fn admin() -> Identity {
        Identity::new("3", "Admin", "123456", &["admin"], &["btn1", "btn2"])
    }

    #[test]
    fn test_round_trip_before_expiry() {
        let codec = codec();
        let now = Utc::now();
        let claims = Claims::new(&admin(), TokenPurpose::Access, now, Duration::hours(24));

        let token = codec.encode(&claims).unwrap();

        assert_eq!(codec.decode_at(&token, now).unwrap(), claims);
        assert_eq!(
            codec
                .decode_at(&token, now + Duration::hours(24) - Duration::seconds(1))
                .unwrap(),
            claims
        );
    }

    #[test]
    fn test_expired_at_and_after_exp() {
        let codec = codec();
        let now = Utc::now();
        let token = codec.issue_at(&admin(), TokenPurpose::Access, now).unwrap();

        assert_eq!(
            codec.decode_at(&token, now + Duration::hours(24)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            codec.decode_at(&token, now + Duration::days(30)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_lifetimes_per_purpose() {
        let codec = codec();
        let now = Utc::now();

        let refresh = codec.issue_at(&admin(), TokenPurpose::Refresh, now).unwrap();
        let claims = codec.decode_at(&refresh, now + Duration::days(6)).unwrap();

        assert_eq!(claims.purpose, TokenPurpose::Refresh);
        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
        assert_eq!(
            codec.decode_at(&refresh, now + Duration::days(7)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let other = TokenCodec::new("other-secret", Duration::hours(24), Duration::days(7));
        let token = other.issue(&admin(), TokenPurpose::Access).unwrap();

        assert_eq!(codec().decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_rejects_tampered_payload() {
        let codec = codec();
        let token = codec.issue(&admin(), TokenPurpose::Access).unwrap();

        let forged = Claims::new(
            &Identity::new("1", "Soybean", "", &["super"], &[]),
            TokenPurpose::Access,
            Utc::now(),
            Duration::hours(24),
        );
        let forged_payload = TokenCodec::new("x", Duration::hours(1), Duration::hours(1))
            .encode(&forged)
            .unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = forged_payload.split('.').nth(1).unwrap();
        let tampered = parts.join(".");

        assert_eq!(codec.decode(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_rejects_garbage() {
        let codec = codec();

        assert_eq!(codec.decode(""), Err(TokenError::InvalidSignature));
        assert_eq!(codec.decode("not-a-token"), Err(TokenError::InvalidSignature));
        assert_eq!(codec.decode("a.b.c"), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let other = TokenCodec::new("other-secret", Duration::hours(24), Duration::days(7));
        let past = Utc::now() - Duration::days(2);
        let token = other.issue_at(&admin(), TokenPurpose::Access, past).unwrap();

        assert_eq!(codec().decode(&token), Err(TokenError::InvalidSignature));
    }
}
