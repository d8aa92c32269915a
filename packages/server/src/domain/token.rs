//! Token validation collaborator.

use async_trait::async_trait;

use super::{error::TokenError, value_object::UserId};

/// Identity extracted from a valid access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    /// May be empty; admission falls back to the user id
    pub display_name: String,
}

/// Validates bearer tokens presented at admission.
///
/// Token issuance is owned by another service; the signaling core only
/// consumes the result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
