//! Products Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Row, Transaction, query, query_as, types::Json};
use uuid::Uuid;

use bazaar::products::{Product, ProductId};

use crate::{
    database,
    domain::products::{data::ProductFilter, records::ProductRecord},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const PRODUCTS_BY_IDS_SQL: &str = include_str!("sql/products_by_ids.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const COUNT_EXISTING_SQL: &str = include_str!("sql/count_existing.sql");
const TAKE_STOCK_SQL: &str = include_str!("sql/take_stock.sql");
const RESTORE_STOCK_SQL: &str = include_str!("sql/restore_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        // Sort column and direction come from closed enums, never from input.
        let sql = format!(
            "{} ORDER BY {} {}, id LIMIT $3 OFFSET $4",
            LIST_PRODUCTS_SQL.trim_end(),
            filter.sort.column(),
            filter.order.keyword(),
        );

        let records = query_as::<Postgres, ProductRecord>(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref().map(database::contains_pattern))
            .bind(filter.page.sql_limit())
            .bind(filter.page.sql_offset())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductFilter,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_PRODUCTS_SQL)
            .bind(filter.category.as_deref())
            .bind(filter.search.as_deref().map(database::contains_pattern))
            .fetch_one(&mut **tx)
            .await?;

        database::count(&row, "total")
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn products_by_ids(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductId],
    ) -> Result<Vec<Product>, sqlx::Error> {
        let ids: Vec<Uuid> = products.iter().map(|id| id.into_uuid()).collect();

        let records = query_as::<Postgres, ProductRecord>(PRODUCTS_BY_IDS_SQL)
            .bind(ids)
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &Product,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.id.into_uuid())
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.description.as_deref())
            .bind(database::encode_quantity("stock", product.stock)?)
            .bind(product.brand.as_deref())
            .bind(product.image_url.as_deref())
            .bind(Json(&product.specifications))
            .bind(product.rating)
            .bind(SqlxTimestamp::from(product.created_at))
            .bind(SqlxTimestamp::from(product.updated_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &Product,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.id.into_uuid())
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.description.as_deref())
            .bind(database::encode_quantity("stock", product.stock)?)
            .bind(product.brand.as_deref())
            .bind(product.image_url.as_deref())
            .bind(Json(&product.specifications))
            .bind(product.rating)
            .bind(SqlxTimestamp::from(product.updated_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows = query(LIST_CATEGORIES_SQL).fetch_all(&mut **tx).await?;

        rows.iter().map(|row| row.try_get("category")).collect()
    }

    /// How many of `products` exist.
    pub(crate) async fn count_existing(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductId],
    ) -> Result<u64, sqlx::Error> {
        let ids: Vec<Uuid> = products.iter().map(|id| id.into_uuid()).collect();

        let row = query(COUNT_EXISTING_SQL)
            .bind(ids)
            .fetch_one(&mut **tx)
            .await?;

        database::count(&row, "total")
    }

    /// Take `quantity` units if they are on hand. Returns `false`, changing
    /// nothing, when stock is short or the product is gone.
    pub(crate) async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(TAKE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(database::encode_quantity("stock", quantity)?)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    /// Hand `quantity` units back. Returns `false` when the product is gone.
    pub(crate) async fn restore_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(RESTORE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(database::encode_quantity("stock", quantity)?)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}
