//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Transaction, query, query_as, types::Json};

use bazaar::{carts::Cart, users::UserId};

use crate::domain::carts::records::CartRecord;

const ENSURE_CART_SQL: &str = include_str!("sql/ensure_cart.sql");
const GET_CART_SQL: &str = include_str!("sql/get_cart.sql");
const LOCK_CART_SQL: &str = include_str!("sql/lock_cart.sql");
const SAVE_CART_SQL: &str = include_str!("sql/save_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map(|record| record.map(|record| record.0))
    }

    /// Insert `cart` unless the user already has one, so there is always a
    /// row for `lock_cart` to lock. Returns whether a row was inserted.
    pub(crate) async fn ensure_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
    ) -> Result<bool, sqlx::Error> {
        let result = query(ENSURE_CART_SQL)
            .bind(cart.id.into_uuid())
            .bind(cart.user_id.into_uuid())
            .bind(Json(&cart.lines))
            .bind(SqlxTimestamp::from(cart.created_at))
            .bind(SqlxTimestamp::from(cart.updated_at))
            .bind(SqlxTimestamp::from(cart.expires_at))
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(LOCK_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map(|record| record.map(|record| record.0))
    }

    /// Insert the user's cart or overwrite the existing one.
    pub(crate) async fn save_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, CartRecord>(SAVE_CART_SQL)
            .bind(cart.id.into_uuid())
            .bind(cart.user_id.into_uuid())
            .bind(Json(&cart.lines))
            .bind(SqlxTimestamp::from(cart.created_at))
            .bind(SqlxTimestamp::from(cart.updated_at))
            .bind(SqlxTimestamp::from(cart.expires_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }
}
