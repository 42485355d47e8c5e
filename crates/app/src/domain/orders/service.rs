//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument, warn};

use bazaar::{
    carts::{StockCheck, UnavailableReason},
    orders::{
        Order, OrderDetails, OrderId, OrderItemRequest, OrderNumber, OrderStatus, PricedOrder,
        StatusEffect, price_cart, price_items, status::may_request,
    },
    products::{Catalog, ProductId},
    users::{User, UserId},
};

use crate::{
    database::Db,
    domain::{
        carts::{repository::PgCartsRepository, service::live_cart},
        orders::{
            data::{OrderDetail, OrderFilter, OrderListing, StatusUpdate, UserStats},
            errors::OrdersServiceError,
            repository::PgOrdersRepository,
        },
        pagination::{Page, PageRequest},
        products::repository::PgProductsRepository,
        promotions::repository::PgPromotionsRepository,
    },
};

/// Where the priced lines came from, which decides how a stock shortfall is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderSource {
    Cart,
    Items,
}

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    carts: PgCartsRepository,
    products: PgProductsRepository,
    promotions: PgPromotionsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            carts: PgCartsRepository::new(),
            products: PgProductsRepository::new(),
            promotions: PgPromotionsRepository::new(),
        }
    }

    async fn catalog(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductId],
    ) -> Result<Catalog, OrdersServiceError> {
        Ok(self
            .products
            .products_by_ids(tx, products)
            .await?
            .into_iter()
            .collect())
    }

    /// Allocate the next number for the day `now` falls on.
    async fn next_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<OrderNumber, OrdersServiceError> {
        let date = OrderNumber::date_of(now);
        let prefix = OrderNumber::day_prefix(date);

        self.repository.lock_day(tx, &prefix).await?;

        let last = self.repository.last_order_number(tx, &prefix).await?;

        Ok(OrderNumber::next(date, last.as_ref())?)
    }

    /// Report a decrement that found too little stock, re-reading the product.
    async fn shortage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        priced: &PricedOrder,
        product_id: ProductId,
        requested: u32,
        source: OrderSource,
    ) -> Result<OrdersServiceError, OrdersServiceError> {
        let product = match self.products.get_product(tx, product_id).await {
            Ok(product) => Some(product),
            Err(sqlx::Error::RowNotFound) => None,
            Err(error) => return Err(error.into()),
        };

        let product_name = product.as_ref().map_or_else(
            || {
                priced
                    .lines
                    .iter()
                    .find(|line| line.product_id == product_id)
                    .map(|line| line.snapshot.name.clone())
                    .unwrap_or_default()
            },
            |product| product.name.clone(),
        );

        warn!(product = %product_id, requested, "stock taken by a concurrent order");

        Ok(match (source, product) {
            (OrderSource::Items, None) => OrdersServiceError::ProductNotFound(product_id),
            (OrderSource::Items, Some(product)) => OrdersServiceError::InsufficientStock {
                product_id,
                name: product_name,
                requested,
                available: product.stock,
            },
            (OrderSource::Cart, product) => OrdersServiceError::StockUnavailable(vec![StockCheck {
                product_id,
                product_name,
                requested_quantity: requested,
                available: false,
                reason: Some(match product {
                    Some(_) => UnavailableReason::InsufficientStock,
                    None => UnavailableReason::ProductMissing,
                }),
                available_stock: product.map_or(0, |product| product.stock),
            }]),
        })
    }

    /// Number, insert and take stock for a priced order.
    async fn place(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        priced: PricedOrder,
        details: OrderDetails,
        source: OrderSource,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        for (product_id, quantity) in priced.stock_decrements() {
            if !self
                .products
                .take_stock(tx, product_id, quantity, now)
                .await?
            {
                return Err(self
                    .shortage(tx, &priced, product_id, quantity, source)
                    .await?);
            }
        }

        let number = self.next_number(tx, now).await?;
        let order = priced.into_order(OrderId::new(), number, user, details, now);
        let created = self.repository.create_order(tx, &order).await?;

        info!(
            order = %created.id,
            order_number = %created.order_number,
            final_amount = %created.final_amount,
            "order placed"
        );

        Ok(created)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[instrument(skip(self, details), err)]
    async fn checkout(
        &self,
        user: UserId,
        details: OrderDetails,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        details.shipping_address.validate()?;

        let mut tx = self.db.begin().await?;

        let stored = self.carts.lock_cart(&mut tx, user).await?;

        let mut cart = live_cart(stored, user, now)
            .filter(|cart| !cart.is_empty())
            .ok_or(OrdersServiceError::EmptyCart)?;

        let ids: Vec<ProductId> = cart.lines.iter().map(|line| line.product_id).collect();
        let catalog = self.catalog(&mut tx, &ids).await?;
        let promotions = self.promotions.list_live_promotions(&mut tx, now).await?;

        let priced = price_cart(&cart, &catalog, &promotions, now)?;
        let order = self
            .place(&mut tx, user, priced, details, OrderSource::Cart, now)
            .await?;

        cart.clear(now);
        self.carts.save_cart(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[instrument(skip(self, items, details), fields(items = items.len()), err)]
    async fn create_order(
        &self,
        user: UserId,
        items: Vec<OrderItemRequest>,
        details: OrderDetails,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        details.shipping_address.validate()?;

        let mut tx = self.db.begin().await?;

        let ids: Vec<ProductId> = items.iter().map(|item| item.product_id).collect();
        let catalog = self.catalog(&mut tx, &ids).await?;
        let promotions = self.promotions.list_live_promotions(&mut tx, now).await?;

        let priced = price_items(&items, &catalog, &promotions, now)?;
        let order = self
            .place(&mut tx, user, priced, details, OrderSource::Items, now)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id), err)]
    async fn get_order(&self, actor: User, order: OrderId) -> Result<OrderDetail, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        if !actor.can_access(order.user_id) {
            return Err(OrdersServiceError::AccessDenied);
        }

        let ids: Vec<ProductId> = order.lines.iter().map(|line| line.product_id).collect();
        let present: FxHashSet<ProductId> = self
            .products
            .products_by_ids(&mut tx, &ids)
            .await?
            .into_iter()
            .map(|product| product.id)
            .collect();

        tx.commit().await?;

        let products = order.check_products_existence(|id| present.contains(&id));

        Ok(OrderDetail { order, products })
    }

    #[instrument(skip(self), err)]
    async fn list_user_orders(
        &self,
        user: UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .repository
            .list_user_orders(&mut tx, user, status, page)
            .await?;
        let total = self
            .repository
            .count_user_orders(&mut tx, user, status)
            .await?;

        tx.commit().await?;

        Ok(Page::new(orders, total, page))
    }

    #[instrument(skip(self), err)]
    async fn list_all_orders(&self, filter: OrderFilter) -> Result<OrderListing, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx, &filter).await?;
        let totals = self.repository.order_totals(&mut tx, &filter).await?;

        tx.commit().await?;

        Ok(OrderListing {
            orders: Page::new(orders, totals.total_orders, filter.page),
            totals,
        })
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id), err)]
    async fn update_status(
        &self,
        actor: User,
        order: OrderId,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<StatusUpdate, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.repository.lock_order(&mut tx, order).await?;

        if !may_request(&actor, order.user_id, status) {
            return Err(OrdersServiceError::AccessDenied);
        }

        let effect = order.transition(status, now)?;
        let mut restocked = 0;

        if effect == StatusEffect::RestoreStock {
            for (product_id, quantity) in order.restock() {
                if self
                    .products
                    .restore_stock(&mut tx, product_id, quantity, now)
                    .await?
                {
                    restocked += 1;
                } else {
                    info!(product = %product_id, "skipping restock of deleted product");
                }
            }
        }

        let updated = self.repository.update_status(&mut tx, &order).await?;

        tx.commit().await?;

        Ok(StatusUpdate {
            order: updated,
            effect,
            restocked,
        })
    }

    #[instrument(skip(self), err)]
    async fn delete_order(&self, order: OrderId) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_order(&mut tx, order).await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn user_stats(&self, user: UserId) -> Result<UserStats, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows = self.repository.user_stats(&mut tx, user).await?;

        tx.commit().await?;

        Ok(UserStats::from_status_rows(rows))
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into a `pending` order.
    ///
    /// The order insert, every stock decrement and the cart clear commit
    /// together or not at all.
    async fn checkout(
        &self,
        user: UserId,
        details: OrderDetails,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// Place an order for explicit items, bypassing the cart.
    async fn create_order(
        &self,
        user: UserId,
        items: Vec<OrderItemRequest>,
        details: OrderDetails,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve an order the actor owns, or any order for admins.
    async fn get_order(&self, actor: User, order: OrderId) -> Result<OrderDetail, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_user_orders(
        &self,
        user: UserId,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Page<Order>, OrdersServiceError>;

    /// Every order, newest first, with totals across the filter.
    async fn list_all_orders(&self, filter: OrderFilter) -> Result<OrderListing, OrdersServiceError>;

    /// Move an order through its lifecycle. Cancelling hands stock back.
    async fn update_status(
        &self,
        actor: User,
        order: OrderId,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<StatusUpdate, OrdersServiceError>;

    async fn delete_order(&self, order: OrderId) -> Result<(), OrdersServiceError>;

    /// Order counts and spend per status for one user.
    async fn user_stats(&self, user: UserId) -> Result<UserStats, OrdersServiceError>;
}
