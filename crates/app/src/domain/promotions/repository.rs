//! Promotions Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction, query, query_as};
use uuid::Uuid;

use bazaar::promotions::{Promotion, PromotionId, PromotionStatus};

use crate::{
    database,
    domain::promotions::{data::PromotionFilter, records::PromotionRecord},
};

const LIST_PROMOTIONS_SQL: &str = include_str!("sql/list_promotions.sql");
const COUNT_PROMOTIONS_SQL: &str = include_str!("sql/count_promotions.sql");
const GET_PROMOTION_SQL: &str = include_str!("sql/get_promotion.sql");
const LOCK_PROMOTION_SQL: &str = include_str!("sql/lock_promotion.sql");
const LIST_LIVE_PROMOTIONS_SQL: &str = include_str!("sql/list_live_promotions.sql");
const LOCK_ALL_PROMOTIONS_SQL: &str = include_str!("sql/lock_all_promotions.sql");
const CREATE_PROMOTION_SQL: &str = include_str!("sql/create_promotion.sql");
const UPDATE_PROMOTION_SQL: &str = include_str!("sql/update_promotion.sql");
const SET_STATUS_SQL: &str = include_str!("sql/set_status.sql");
const WRITE_SYNCED_STATUS_SQL: &str = include_str!("sql/write_synced_status.sql");
const DELETE_PROMOTION_SQL: &str = include_str!("sql/delete_promotion.sql");

fn applicable_products(promotion: &Promotion) -> Vec<Uuid> {
    promotion
        .applicable_products
        .iter()
        .map(|product| product.into_uuid())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromotionsRepository;

impl PgPromotionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &PromotionFilter,
    ) -> Result<Vec<Promotion>, sqlx::Error> {
        // Sort column and direction come from closed enums, never from input.
        let sql = format!(
            "{} ORDER BY {} {}, id LIMIT $3 OFFSET $4",
            LIST_PROMOTIONS_SQL.trim_end(),
            filter.sort.column(),
            filter.order.keyword(),
        );

        let records = query_as::<Postgres, PromotionRecord>(&sql)
            .bind(filter.status.map(PromotionStatus::as_str))
            .bind(filter.search.as_deref().map(database::contains_pattern))
            .bind(filter.page.sql_limit())
            .bind(filter.page.sql_offset())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn count_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &PromotionFilter,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_PROMOTIONS_SQL)
            .bind(filter.status.map(PromotionStatus::as_str))
            .bind(filter.search.as_deref().map(database::contains_pattern))
            .fetch_one(&mut **tx)
            .await?;

        database::count(&row, "total")
    }

    pub(crate) async fn get_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionId,
    ) -> Result<Promotion, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(GET_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn lock_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionId,
    ) -> Result<Promotion, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(LOCK_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    /// Promotions whose window contains `now`, regardless of persisted status.
    pub(crate) async fn list_live_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<Vec<Promotion>, sqlx::Error> {
        let records = query_as::<Postgres, PromotionRecord>(LIST_LIVE_PROMOTIONS_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    /// Every promotion, locked until the transaction ends.
    pub(crate) async fn lock_all_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Promotion>, sqlx::Error> {
        let records = query_as::<Postgres, PromotionRecord>(LOCK_ALL_PROMOTIONS_SQL)
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn create_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: &Promotion,
    ) -> Result<Promotion, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(CREATE_PROMOTION_SQL)
            .bind(promotion.id.into_uuid())
            .bind(&promotion.name)
            .bind(promotion.description.as_deref())
            .bind(Decimal::from(promotion.discount))
            .bind(SqlxTimestamp::from(promotion.starts_at))
            .bind(SqlxTimestamp::from(promotion.ends_at))
            .bind(applicable_products(promotion))
            .bind(promotion.status.as_str())
            .bind(promotion.status_synced_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(promotion.created_at))
            .bind(SqlxTimestamp::from(promotion.updated_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn update_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: &Promotion,
    ) -> Result<Promotion, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(UPDATE_PROMOTION_SQL)
            .bind(promotion.id.into_uuid())
            .bind(&promotion.name)
            .bind(promotion.description.as_deref())
            .bind(Decimal::from(promotion.discount))
            .bind(SqlxTimestamp::from(promotion.starts_at))
            .bind(SqlxTimestamp::from(promotion.ends_at))
            .bind(applicable_products(promotion))
            .bind(promotion.status.as_str())
            .bind(promotion.status_synced_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(promotion.updated_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionId,
        status: PromotionStatus,
        now: Timestamp,
    ) -> Result<Promotion, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(SET_STATUS_SQL)
            .bind(promotion.into_uuid())
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    /// Record the status a sweep resolved at `now`.
    pub(crate) async fn write_synced_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionId,
        status: PromotionStatus,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(WRITE_SYNCED_STATUS_SQL)
            .bind(promotion.into_uuid())
            .bind(status.as_str())
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
