//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, Row, Transaction, query, query_as, types::Json};

use bazaar::{
    orders::{Order, OrderId, OrderNumber, OrderStatus},
    users::UserId,
};

use crate::{
    database,
    domain::{
        orders::{
            data::{OrderFilter, OrderTotals, StatusStats},
            records::{OrderRecord, StatusStatsRecord},
        },
        pagination::PageRequest,
    },
};

const LOCK_DAY_SQL: &str = include_str!("sql/lock_day.sql");
const LAST_ORDER_NUMBER_SQL: &str = include_str!("sql/last_order_number.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("sql/count_user_orders.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const ORDER_TOTALS_SQL: &str = include_str!("sql/order_totals.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");
const USER_STATS_SQL: &str = include_str!("sql/user_stats.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Serialise numbering for one day until the transaction ends.
    pub(crate) async fn lock_day(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day_prefix: &str,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_DAY_SQL)
            .bind(day_prefix)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Highest order number issued under `day_prefix`.
    pub(crate) async fn last_order_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day_prefix: &str,
    ) -> Result<Option<OrderNumber>, sqlx::Error> {
        let row = query(LAST_ORDER_NUMBER_SQL)
            .bind(day_prefix)
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| database::parsed(&row, "order_number"))
            .transpose()
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.id.into_uuid())
            .bind(order.order_number.to_string())
            .bind(order.user_id.into_uuid())
            .bind(Json(&order.lines))
            .bind(order.total_amount)
            .bind(order.total_discount)
            .bind(order.final_amount)
            .bind(order.status.as_str())
            .bind(Json(&order.shipping_address))
            .bind(order.payment_method.as_str())
            .bind(order.payment_status.as_str())
            .bind(order.notes.as_deref())
            .bind(SqlxTimestamp::from(order.created_at))
            .bind(SqlxTimestamp::from(order.updated_at))
            .bind(order.delivered_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let records = query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn count_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        status: Option<OrderStatus>,
    ) -> Result<u64, sqlx::Error> {
        let row = query(COUNT_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        database::count(&row, "total")
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let records = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.from.map(SqlxTimestamp::from))
            .bind(filter.to.map(SqlxTimestamp::from))
            .bind(filter.page.sql_limit())
            .bind(filter.page.sql_offset())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }

    pub(crate) async fn order_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrderFilter,
    ) -> Result<OrderTotals, sqlx::Error> {
        let row = query(ORDER_TOTALS_SQL)
            .bind(filter.status.map(OrderStatus::as_str))
            .bind(filter.from.map(SqlxTimestamp::from))
            .bind(filter.to.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await?;

        Ok(OrderTotals {
            total_revenue: row.try_get("total_revenue")?,
            total_orders: database::count(&row, "total_orders")?,
            total_discount: row.try_get("total_discount")?,
        })
    }

    /// Persist the status fields a transition touches.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.id.into_uuid())
            .bind(order.status.as_str())
            .bind(order.payment_status.as_str())
            .bind(order.delivered_at.map(SqlxTimestamp::from))
            .bind(SqlxTimestamp::from(order.updated_at))
            .fetch_one(&mut **tx)
            .await
            .map(|record| record.0)
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn user_stats(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
    ) -> Result<Vec<StatusStats>, sqlx::Error> {
        let records = query_as::<Postgres, StatusStatsRecord>(USER_STATS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(records.into_iter().map(|record| record.0).collect())
    }
}
