//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use bazaar::users::{Role, User, UserId};

use crate::auth::{
    AuthServiceError, IssuedApiToken, NewApiToken, format_api_token, generate_api_token_secret,
    hash_api_token, parse_api_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Create a user account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::UsernameTaken`] when the name is in use.
    pub async fn create_user(&self, username: &str, role: Role) -> Result<User, AuthServiceError> {
        let user = User {
            id: UserId::new(),
            username: username.trim().to_string(),
            role,
        };

        Ok(self.repository.create_user(&user, Timestamp::now()).await?)
    }

    /// Issue a new API token for the named user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub async fn issue_api_token(&self, username: &str) -> Result<IssuedApiToken, AuthServiceError> {
        let user = self
            .repository
            .find_user_by_username(username)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        let token_uuid = Uuid::now_v7();
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, &secret);

        let metadata = self
            .repository
            .create_api_token(
                &NewApiToken {
                    uuid: token_uuid,
                    user_id: user.id,
                    token_hash: hash_api_token(&token),
                },
                Timestamp::now(),
            )
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid, Timestamp::now())
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[instrument(skip_all, err)]
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<User, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let user = self
            .repository
            .find_user_by_token_hash(parsed.token_uuid, &hash_api_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        // Best-effort metadata update; auth success should not depend on this write.
        let _touch_result = self
            .repository
            .touch_api_token_last_used(parsed.token_uuid, Timestamp::now())
            .await;

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<User, AuthServiceError>;
}
