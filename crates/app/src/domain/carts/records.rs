//! Cart Records

use sqlx::{FromRow, Row, postgres::PgRow, types::Json};

use bazaar::{
    carts::{Cart, CartId, CartLine},
    users::UserId,
};

use crate::database;

/// A `carts` row. Lines are stored as a JSON document.
#[derive(Debug, Clone)]
pub(crate) struct CartRecord(pub(crate) Cart);

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Cart {
            id: CartId::from_uuid(row.try_get("id")?),
            user_id: UserId::from_uuid(row.try_get("user_id")?),
            lines: row.try_get::<Json<Vec<CartLine>>, _>("lines")?.0,
            created_at: database::timestamp(row, "created_at")?,
            updated_at: database::timestamp(row, "updated_at")?,
            expires_at: database::timestamp(row, "expires_at")?,
        }))
    }
}
