//! HS256 JWT validator.
//!
//! Tokens are issued by the platform's auth service. Only the signature and
//! expiry are checked here; the audience is not enforced so tokens minted
//! for any of the platform's clients are accepted.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedUser, TokenError, TokenValidator, UserId};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

pub struct JwtTokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[async_trait]
impl TokenValidator for JwtTokenValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let claims = self.decode_claims(token)?;
        let user_id = UserId::new(claims.user_id)
            .map_err(|e| TokenError::InvalidClaims(format!("user_id: {}", e)))?;

        tracing::debug!("Validated token for user '{}'", user_id);

        Ok(AuthenticatedUser {
            user_id,
            display_name: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &[u8] = b"test-secret";

    fn create_test_token(user_id: &str, username: &str, exp_offset_secs: i64, secret: &[u8]) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset_secs) as u64;
        let claims = Claims {
            user_id: user_id.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", user_id),
            role: "user".to_string(),
            exp,
            sub: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_validate_accepts_signed_token() {
        // テスト項目: 正しく署名された有効なトークンからユーザー情報が得られる
        // given (前提条件):
        let validator = JwtTokenValidator::new(SECRET);
        let token = create_test_token("user-1", "Alice", 3600, SECRET);

        // when (操作):
        let result = validator.validate(&token).await;

        // then (期待する結果):
        let user = result.unwrap();
        assert_eq!(user.user_id.as_str(), "user-1");
        assert_eq!(user.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_validate_rejects_wrong_secret() {
        // テスト項目: 別の鍵で署名されたトークンは Invalid になる
        // given (前提条件):
        let validator = JwtTokenValidator::new(SECRET);
        let token = create_test_token("user-1", "Alice", 3600, b"another-secret");

        // when (操作):
        let result = validator.validate(&token).await;

        // then (期待する結果):
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_validate_rejects_expired_token() {
        // テスト項目: 期限切れのトークンは Expired になる
        // given (前提条件):
        let validator = JwtTokenValidator::new(SECRET);
        let token = create_test_token("user-1", "Alice", -3600, SECRET);

        // when (操作):
        let result = validator.validate(&token).await;

        // then (期待する結果):
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn test_validate_rejects_garbage() {
        // テスト項目: JWT として解釈できない文字列は Invalid になる
        // given (前提条件):
        let validator = JwtTokenValidator::new(SECRET);

        // when (操作):
        let result = validator.validate("not-a-jwt").await;

        // then (期待する結果):
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_user_id_claim() {
        // テスト項目: user_id クレームが空のトークンは InvalidClaims になる
        // given (前提条件):
        let validator = JwtTokenValidator::new(SECRET);
        let token = create_test_token("", "Alice", 3600, SECRET);

        // when (操作):
        let result = validator.validate(&token).await;

        // then (期待する結果):
        assert!(matches!(result, Err(TokenError::InvalidClaims(_))));
    }
}
