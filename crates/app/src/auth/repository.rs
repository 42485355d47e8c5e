//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use bazaar::users::{Role, User, UserId};

use crate::{
    auth::{ApiTokenMetadata, NewApiToken},
    database,
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const FIND_USER_BY_USERNAME_SQL: &str = include_str!("sql/find_user_by_username.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const FIND_USER_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_user_by_token_hash.sql");
const TOUCH_API_TOKEN_SQL: &str = include_str!("sql/touch_api_token.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");

/// A `users` row.
struct UserRecord(User);

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(User {
            id: UserId::from_uuid(row.try_get("id")?),
            username: row.try_get("username")?,
            role: database::parsed::<Role>(row, "role")?,
        }))
    }
}

/// An `api_tokens` row, without the hash.
struct ApiTokenRecord(ApiTokenMetadata);

impl<'r> FromRow<'r, PgRow> for ApiTokenRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(ApiTokenMetadata {
            uuid: row.try_get("id")?,
            user_id: UserId::from_uuid(row.try_get("user_id")?),
            created_at: database::timestamp(row, "created_at")?,
            last_used_at: database::optional_timestamp(row, "last_used_at")?,
            revoked_at: database::optional_timestamp(row, "revoked_at")?,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_user(
        &self,
        user: &User,
        now: Timestamp,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.id.into_uuid())
            .bind(&user.username)
            .bind(user.role.as_str())
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&self.pool)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_USERNAME_SQL)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map(|record| record.map(|record| record.0))
    }

    pub(crate) async fn create_api_token(
        &self,
        token: &NewApiToken,
        now: Timestamp,
    ) -> Result<ApiTokenMetadata, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(CREATE_API_TOKEN_SQL)
            .bind(token.uuid)
            .bind(token.user_id.into_uuid())
            .bind(&token.token_hash)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&self.pool)
            .await
            .map(|record| record.0)
    }

    /// The user owning an unrevoked token with this id and hash.
    pub(crate) async fn find_user_by_token_hash(
        &self,
        token_uuid: Uuid,
        token_hash: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, UserRecord>(FIND_USER_BY_TOKEN_HASH_SQL)
            .bind(token_uuid)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map(|record| record.map(|record| record.0))
    }

    pub(crate) async fn touch_api_token_last_used(
        &self,
        token_uuid: Uuid,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(TOUCH_API_TOKEN_SQL)
            .bind(token_uuid)
            .bind(SqlxTimestamp::from(now))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Revoke a token. Returns `None` when it was unknown or already revoked.
    pub(crate) async fn revoke_api_token(
        &self,
        token_uuid: Uuid,
        now: Timestamp,
    ) -> Result<Option<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenRecord>(REVOKE_API_TOKEN_SQL)
            .bind(token_uuid)
            .bind(SqlxTimestamp::from(now))
            .fetch_optional(&self.pool)
            .await
            .map(|record| record.map(|record| record.0))
    }
}
