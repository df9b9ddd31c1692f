use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Distinguishes access tokens from refresh tokens so a leaked refresh
/// token cannot be replayed as a bearer credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TokenUse {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    #[serde(default)]
    pub(crate) sub: String,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
    pub(crate) token_use: TokenUse,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum TokenError {
    #[error("invalid signature")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("missing subject claim")]
    MissingSubject,
    #[error("wrong token use")]
    WrongUse,
}

/// Encodes and verifies HS256-signed claims. Stateless; the keys are
/// derived once from the configured secret.
#[derive(Clone)]
pub(crate) struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub(crate) fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against the caller's clock in decode_at so
        // tests can simulate time
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub(crate) fn encode(
        &self,
        subject: &str,
        lifetime: Duration,
        token_use: TokenUse,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode_at(subject, lifetime, token_use, Utc::now().timestamp())
    }

    fn encode_at(
        &self,
        subject: &str,
        lifetime: Duration,
        token_use: TokenUse,
        now: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: now + lifetime.num_seconds(),
            iat: now,
            token_use,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub(crate) fn decode(&self, token: &str, expected_use: TokenUse) -> Result<Claims, TokenError> {
        self.decode_at(token, expected_use, Utc::now().timestamp())
    }

    fn decode_at(
        &self,
        token: &str,
        expected_use: TokenUse,
        now: i64,
    ) -> Result<Claims, TokenError> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
                |e| match e.kind() {
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        TokenError::SignatureInvalid
                    }
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                },
            )?;

        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        if claims.token_use != expected_use {
            return Err(TokenError::WrongUse);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    #[test]
    fn test_decode_roundtrip() {
        let token = codec()
            .encode("a@x.com", Duration::minutes(15), TokenUse::Access)
            .unwrap();

        let claims = codec().decode(&token, TokenUse::Access).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.token_use, TokenUse::Access);
    }

    #[test]
    fn test_decode_rejects_expired_token() {
        let codec = codec();
        let now = 1_700_000_000;
        let lifetime = Duration::minutes(15);

        let token = codec
            .encode_at("a@x.com", lifetime, TokenUse::Access, now)
            .unwrap();

        let elapsed = now + lifetime.num_seconds() + 1;

        assert!(matches!(
            codec.decode_at(&token, TokenUse::Access, elapsed),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_decode_rejects_tampered_signature() {
        let token = codec()
            .encode("a@x.com", Duration::minutes(15), TokenUse::Access)
            .unwrap();

        let (payload, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", payload, flipped, &signature[1..]);

        assert!(matches!(
            codec().decode(&tampered, TokenUse::Access),
            Err(TokenError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_decode_rejects_foreign_secret() {
        let token = TokenCodec::new("other-secret")
            .encode("a@x.com", Duration::minutes(15), TokenUse::Access)
            .unwrap();

        assert!(matches!(
            codec().decode(&token, TokenUse::Access),
            Err(TokenError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_use() {
        let codec = codec();

        let refresh = codec
            .encode("a@x.com", Duration::days(30), TokenUse::Refresh)
            .unwrap();

        assert!(matches!(
            codec.decode(&refresh, TokenUse::Access),
            Err(TokenError::WrongUse)
        ));

        let access = codec
            .encode("a@x.com", Duration::minutes(15), TokenUse::Access)
            .unwrap();

        assert!(matches!(
            codec.decode(&access, TokenUse::Refresh),
            Err(TokenError::WrongUse)
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            codec().decode("not-a-token", TokenUse::Access),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_decode_rejects_empty_subject() {
        let token = codec()
            .encode("", Duration::minutes(15), TokenUse::Access)
            .unwrap();

        assert!(matches!(
            codec().decode(&token, TokenUse::Access),
            Err(TokenError::MissingSubject)
        ));
    }
}
