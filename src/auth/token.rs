//! Stateless issuance and verification of bearer identity tokens.
//!
//! Tokens are HS256 compact JWTs signed with a process-wide secret fixed at
//! startup. Verification is fail-closed: malformed input, a bad signature, a
//! wrong algorithm, and expiry all collapse to the same negative answer so
//! the request path never learns which part of validation failed.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::Role,
};

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User identifier
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies identity tokens.
///
/// Holds only the derived signing keys and the configured lifetime; no
/// mutable state, so a clone per request handler is safe under any
/// concurrency model.
#[derive(Clone)]
pub struct TokenAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_ms: u64,
}

impl TokenAuthenticator {
    /// Build an authenticator from the auth configuration.
    ///
    /// An empty secret is a startup-fatal misconfiguration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AppError::Internal(
                "JWT secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiration_ms: config.jwt_expiration_ms,
        })
    }

    /// Issue a signed token for an already-authenticated user.
    ///
    /// The caller is responsible for having checked the credential; this only
    /// encodes the verified `(user_id, email, role)` triple with the current
    /// clock reading.
    pub fn issue(&self, user_id: i32, email: &str, role: Role) -> AppResult<String> {
        let now_ms = Utc::now().timestamp_millis();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now_ms / 1000,
            // Standard `exp` is second-granular; the deadline truncates, so a
            // token never outlives its configured duration.
            exp: (now_ms + self.expiration_ms as i64) / 1000,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Check that a token parses, its signature validates, and it has not
    /// expired. All failure modes collapse to `false`.
    pub fn verify(&self, token: &str) -> bool {
        self.decode_claims(token).is_some()
    }

    /// Extract the user identifier claim. `None` for any invalid token.
    pub fn extract_user_id(&self, token: &str) -> Option<String> {
        self.decode_claims(token).map(|c| c.sub)
    }

    /// Extract the role claim. `None` for any invalid token.
    pub fn extract_role(&self, token: &str) -> Option<Role> {
        self.decode_claims(token).map(|c| c.role)
    }

    fn decode_claims(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below without leeway.
        validation.validate_exp = false;

        let claims = match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("Token validation failed: {}", e);
                return None;
            }
        };

        // Millisecond clock against the second-granular deadline, so a token
        // is dead the moment its expiry second begins.
        if Utc::now().timestamp_millis() >= claims.exp * 1000 {
            tracing::debug!("Token validation failed: expired");
            return None;
        }

        Some(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn authenticator(secret: &str, expiration_ms: u64) -> TokenAuthenticator {
        TokenAuthenticator::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_expiration_ms: expiration_ms,
        })
        .unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let tokens = authenticator("test-secret", 86_400_000);
        let token = tokens.issue(42, "a@b.com", Role::Admin).unwrap();

        assert!(tokens.verify(&token));
    }

    #[test]
    fn extracted_claims_match_issued_values() {
        let tokens = authenticator("test-secret", 86_400_000);
        let token = tokens.issue(42, "a@b.com", Role::Admin).unwrap();

        assert_eq!(tokens.extract_user_id(&token).as_deref(), Some("42"));
        assert_eq!(tokens.extract_role(&token), Some(Role::Admin));
    }

    #[test]
    fn tampering_with_any_signature_character_fails() {
        let tokens = authenticator("test-secret", 86_400_000);
        let token = tokens.issue(7, "reader@example.com", Role::User).unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        for i in signature_start..token.len() {
            let mut tampered: Vec<u8> = token.clone().into_bytes();
            tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(tampered).unwrap();
            if tampered == token {
                continue;
            }
            assert!(!tokens.verify(&tampered), "position {} accepted", i);
        }
    }

    #[test]
    fn malformed_tokens_fail() {
        let tokens = authenticator("test-secret", 86_400_000);

        assert!(!tokens.verify(""));
        assert!(!tokens.verify("garbage"));
        assert!(!tokens.verify("a.b.c"));
        assert_eq!(tokens.extract_user_id("garbage"), None);
        assert_eq!(tokens.extract_role("garbage"), None);
    }

    #[test]
    fn token_issued_under_other_secret_fails() {
        let issuer = authenticator("secret-a", 86_400_000);
        let verifier = authenticator("secret-b", 86_400_000);

        let token = issuer.issue(1, "a@b.com", Role::User).unwrap();

        assert!(issuer.verify(&token));
        assert!(!verifier.verify(&token));
    }

    /// Park the clock mid-second so the truncated deadline leaves a clear
    /// margin on both sides of the assertions below.
    fn wait_for_mid_second() {
        loop {
            let fraction = Utc::now().timestamp_subsec_millis();
            if (300..700).contains(&fraction) {
                return;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    #[test]
    fn short_lived_token_expires() {
        let tokens = authenticator("test-secret", 1_000);

        wait_for_mid_second();
        let token = tokens.issue(42, "a@b.com", Role::Admin).unwrap();

        assert!(tokens.verify(&token));

        std::thread::sleep(Duration::from_millis(1_100));
        assert!(
            !tokens.verify(&token),
            "token still verifies 1100 ms after issuance with a 1000 ms lifetime"
        );
        assert_eq!(tokens.extract_user_id(&token), None);
    }

    #[test]
    fn token_never_outlives_configured_duration() {
        let tokens = authenticator("test-secret", 1_000);

        wait_for_mid_second();
        let before_ms = Utc::now().timestamp_millis();
        let token = tokens.issue(42, "a@b.com", Role::Admin).unwrap();
        let claims = tokens.decode_claims(&token).unwrap();

        assert!(claims.exp * 1000 <= before_ms + 1_000 + 1);
    }

    #[test]
    fn empty_secret_is_rejected_at_construction() {
        let result = TokenAuthenticator::new(&AuthConfig {
            jwt_secret: String::new(),
            jwt_expiration_ms: 86_400_000,
        });

        assert!(result.is_err());
    }
}
