//! Product Records

use rust_decimal::Decimal;
use sqlx::{FromRow, Row, postgres::PgRow, types::Json};

use bazaar::products::{Product, ProductId, Specifications};

use crate::database;

/// A `products` row.
#[derive(Debug, Clone)]
pub(crate) struct ProductRecord(pub(crate) Product);

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(Product {
            id: ProductId::from_uuid(row.try_get("id")?),
            name: row.try_get("name")?,
            price: row.try_get::<Decimal, _>("price")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            stock: database::quantity(row, "stock")?,
            brand: row.try_get("brand")?,
            image_url: row.try_get("image_url")?,
            specifications: row
                .try_get::<Json<Specifications>, _>("specifications")?
                .0,
            rating: row.try_get::<Decimal, _>("rating")?,
            created_at: database::timestamp(row, "created_at")?,
            updated_at: database::timestamp(row, "updated_at")?,
        }))
    }
}
