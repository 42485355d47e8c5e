//! Promotion Records

use rust_decimal::Decimal;
use sqlx::{FromRow, Row, postgres::PgRow};
use uuid::Uuid;

use bazaar::{
    money::Percentage,
    products::ProductId,
    promotions::{Promotion, PromotionId},
};

use crate::database;

/// A `promotions` row.
#[derive(Debug, Clone)]
pub(crate) struct PromotionRecord(pub(crate) Promotion);

impl<'r> FromRow<'r, PgRow> for PromotionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount = Percentage::new(row.try_get::<Decimal, _>("discount_percentage")?)
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percentage".to_string(),
                source: Box::new(e),
            })?;

        let applicable_products = row
            .try_get::<Vec<Uuid>, _>("applicable_products")?
            .into_iter()
            .map(ProductId::from_uuid)
            .collect();

        Ok(Self(Promotion {
            id: PromotionId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            discount,
            starts_at: database::timestamp(row, "starts_at")?,
            ends_at: database::timestamp(row, "ends_at")?,
            applicable_products,
            status: database::parsed(row, "status")?,
            status_synced_at: database::optional_timestamp(row, "status_synced_at")?,
            created_at: database::timestamp(row, "created_at")?,
            updated_at: database::timestamp(row, "updated_at")?,
        }))
    }
}
