//! Order Records

use rust_decimal::Decimal;
use sqlx::{FromRow, Row, postgres::PgRow, types::Json};

use bazaar::{
    orders::{Order, OrderId, OrderLine, ShippingAddress},
    users::UserId,
};

use crate::{database, domain::orders::data::StatusStats};

/// An `orders` row. Lines and the shipping address are JSON documents.
#[derive(Debug, Clone)]
pub(crate) struct OrderRecord(pub(crate) Order);

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Order {
            id: OrderId::from_uuid(row.try_get("id")?),
            order_number: database::parsed(row, "order_number")?,
            user_id: UserId::from_uuid(row.try_get("user_id")?),
            lines: row.try_get::<Json<Vec<OrderLine>>, _>("lines")?.0,
            total_amount: row.try_get::<Decimal, _>("total_amount")?,
            total_discount: row.try_get::<Decimal, _>("total_discount")?,
            final_amount: row.try_get::<Decimal, _>("final_amount")?,
            status: database::parsed(row, "status")?,
            shipping_address: row
                .try_get::<Json<ShippingAddress>, _>("shipping_address")?
                .0,
            payment_method: database::parsed(row, "payment_method")?,
            payment_status: database::parsed(row, "payment_status")?,
            notes: row.try_get("notes")?,
            created_at: database::timestamp(row, "created_at")?,
            updated_at: database::timestamp(row, "updated_at")?,
            delivered_at: database::optional_timestamp(row, "delivered_at")?,
        }))
    }
}

/// One row of the per-status aggregate.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StatusStatsRecord(pub(crate) StatusStats);

impl<'r> FromRow<'r, PgRow> for StatusStatsRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(StatusStats {
            status: database::parsed(row, "status")?,
            count: database::count(row, "count")?,
            total_amount: row.try_get::<Decimal, _>("total_amount")?,
        }))
    }
}
