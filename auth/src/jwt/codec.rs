use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::TokenClaims;
use super::errors::TokenError;
use crate::directory::Identity;

/// Issues and validates signed access tokens.
///
/// Tokens are compact JWTs signed with HS512. The secret and the lifetime are
/// fixed at construction; share one instance behind an `Arc` for the whole
/// process.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    const ALGORITHM: Algorithm = Algorithm::HS512;

    /// Create a codec from a signing secret and a token lifetime.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key
    /// * `ttl_minutes` - Minutes a token stays valid after issuance
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Empty secret, or a lifetime that is not positive
    ///   or does not fit the representable time range
    pub fn new(secret: &[u8], ttl_minutes: i64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidConfiguration(
                "signing secret must not be empty".to_string(),
            ));
        }
        if ttl_minutes <= 0 {
            return Err(TokenError::InvalidConfiguration(format!(
                "token lifetime must be positive, got {} minutes",
                ttl_minutes
            )));
        }

        let ttl = Duration::try_minutes(ttl_minutes)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                TokenError::InvalidConfiguration(format!(
                    "token lifetime of {} minutes is out of range",
                    ttl_minutes
                ))
            })?;

        // Expiry is checked by hand against the caller's clock, without leeway.
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Issue a token for `identity`, valid from now for the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiry falls outside the representable time range,
    ///   or claims could not be serialized or signed
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = TokenClaims::for_identity(identity, now, self.ttl).ok_or_else(|| {
            TokenError::EncodingFailed("token expiry is out of range".to_string())
        })?;

        encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Not a well-formed token, or claims are missing
    /// * `SignatureInvalid` - Signature does not match the signing secret
    /// * `Expired` - Current time is at or past `exp`
    pub fn validate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Email of the identity a valid token was issued to.
    pub fn subject_of(&self, token: &str) -> Result<String, TokenError> {
        self.validate(token).map(|claims| claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn ana() -> Identity {
        Identity::new(1, "Ana", "ana@x.com", "hash")
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 30).expect("Failed to create codec")
    }

    #[test]
    fn test_issue_and_validate() {
        let codec = codec();

        let token = codec.issue(&ana()).expect("Failed to issue token");
        let claims = codec.validate(&token).expect("Failed to validate token");

        assert_eq!(claims.sub, "ana@x.com");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.display_name, "Ana");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_is_hs512_jwt() {
        let token = codec().issue(&ana()).expect("Failed to issue token");

        assert_eq!(token.split('.').count(), 3);
        let header = jsonwebtoken::decode_header(&token).expect("Failed to decode header");
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_expires_after_ttl() {
        let codec = codec();
        let token = codec.issue_at(&ana(), t0()).expect("Failed to issue token");

        let claims = codec
            .validate_at(&token, t0())
            .expect("Token should be valid at issuance");
        assert_eq!(claims.sub, "ana@x.com");
        assert_eq!(claims.user_id, 1);

        let result = codec.validate_at(&token, t0() + Duration::minutes(31));
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let codec = codec();
        let token = codec.issue_at(&ana(), t0()).expect("Failed to issue token");
        let expires_at = t0() + Duration::minutes(30);

        assert!(codec
            .validate_at(&token, expires_at - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            codec.validate_at(&token, expires_at),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_flipping_any_signature_character_is_rejected() {
        let codec = codec();
        let token = codec.issue_at(&ana(), t0()).expect("Failed to issue token");
        let signature_start = token.rfind('.').unwrap() + 1;

        for position in signature_start..token.len() {
            let mut tampered: Vec<char> = token.chars().collect();
            tampered[position] = if tampered[position] == 'A' { 'B' } else { 'A' };
            let tampered: String = tampered.into_iter().collect();

            assert_eq!(
                codec.validate_at(&tampered, t0()),
                Err(TokenError::SignatureInvalid),
                "position {} was accepted",
                position
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenCodec::new(b"secret1_at_least_32_bytes_long_key!", 30).unwrap();
        let verifier = TokenCodec::new(b"secret2_at_least_32_bytes_long_key!", 30).unwrap();

        let token = issuer.issue(&ana()).expect("Failed to issue token");

        assert_eq!(verifier.validate(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let claims = TokenClaims::for_identity(&ana(), Utc::now(), Duration::minutes(30)).unwrap();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(codec().validate(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();

        for token in ["", "abc", "invalid.token.here", "a.b"] {
            assert!(
                matches!(codec.validate(token), Err(TokenError::Malformed(_))),
                "{:?} was not reported as malformed",
                token
            );
        }
    }

    #[test]
    fn test_subject_of() {
        let codec = codec();
        let token = codec.issue(&ana()).expect("Failed to issue token");

        assert_eq!(codec.subject_of(&token), Ok("ana@x.com".to_string()));
        assert!(codec.subject_of("invalid.token.here").is_err());
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        assert!(matches!(
            TokenCodec::new(SECRET, 0),
            Err(TokenError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            TokenCodec::new(b"", 30),
            Err(TokenError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_lifetime() {
        for ttl_minutes in [i64::MAX, 1_000_000_000_000] {
            assert!(
                matches!(
                    TokenCodec::new(SECRET, ttl_minutes),
                    Err(TokenError::InvalidConfiguration(_))
                ),
                "{} minutes was accepted",
                ttl_minutes
            );
        }
    }

    #[test]
    fn test_issue_past_representable_time_fails() {
        let far_future = DateTime::<Utc>::MAX_UTC - Duration::minutes(10);

        assert!(matches!(
            codec().issue_at(&ana(), far_future),
            Err(TokenError::EncodingFailed(_))
        ));
    }
}
