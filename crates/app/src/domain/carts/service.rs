//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, instrument};

use bazaar::{
    carts::{Cart, StockReport},
    products::{Catalog, ProductId},
    users::UserId,
};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{CartCleanup, EnrichedCart},
            errors::CartsServiceError,
            repository::PgCartsRepository,
        },
        products::repository::PgProductsRepository,
        promotions::repository::PgPromotionsRepository,
    },
};

/// Treat an expired cart as absent. The fresh cart keeps the old id so the
/// upsert overwrites the row in place.
pub(crate) fn live_cart(stored: Option<Cart>, user: UserId, now: Timestamp) -> Option<Cart> {
    match stored {
        Some(cart) if cart.is_expired(now) => {
            debug!(cart = %cart.id, "cart expired");

            Some(Cart {
                id: cart.id,
                ..Cart::new(user, now)
            })
        }
        stored => stored,
    }
}

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    repository: PgCartsRepository,
    products: PgProductsRepository,
    promotions: PgPromotionsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartsRepository::new(),
            products: PgProductsRepository::new(),
            promotions: PgPromotionsRepository::new(),
        }
    }

    /// Lock the user's cart, creating an empty one first when there is none.
    ///
    /// Concurrent first adds serialize on the inserted row instead of each
    /// upserting its own fresh cart.
    async fn lock_or_new(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserId,
        now: Timestamp,
    ) -> Result<Cart, CartsServiceError> {
        if self.repository.ensure_cart(tx, &Cart::new(user, now)).await? {
            debug!(user = %user, "cart created");
        }

        let stored = self.repository.lock_cart(tx, user).await?;

        Ok(live_cart(stored, user, now).unwrap_or_else(|| Cart::new(user, now)))
    }

    /// Load the live products referenced by the cart plus `extra`.
    async fn catalog_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
        extra: Option<ProductId>,
    ) -> Result<Catalog, CartsServiceError> {
        let ids: Vec<ProductId> = cart
            .lines
            .iter()
            .map(|line| line.product_id)
            .chain(extra)
            .collect();

        let products = self.products.products_by_ids(tx, &ids).await?;

        Ok(products.into_iter().collect())
    }

    async fn enrich(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: Cart,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError> {
        let catalog = self.catalog_for(tx, &cart, None).await?;
        let promotions = self.promotions.list_live_promotions(tx, now).await?;
        let view = cart.enrich(&catalog, &promotions, now);

        Ok(EnrichedCart { cart, view })
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[instrument(skip(self), err)]
    async fn get_cart(&self, user: UserId, now: Timestamp) -> Result<EnrichedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.get_cart(&mut tx, user).await?;
        let cart = live_cart(stored, user, now).unwrap_or_else(|| Cart::new(user, now));
        let enriched = self.enrich(&mut tx, cart, now).await?;

        tx.commit().await?;

        Ok(enriched)
    }

    #[instrument(skip(self), err)]
    async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.lock_or_new(&mut tx, user, now).await?;
        let catalog = self.catalog_for(&mut tx, &cart, Some(product)).await?;

        cart.add(&catalog, product, quantity, now)?;

        let saved = self.repository.save_cart(&mut tx, &cart).await?;
        let enriched = self.enrich(&mut tx, saved, now).await?;

        tx.commit().await?;

        Ok(enriched)
    }

    #[instrument(skip(self), err)]
    async fn update_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.lock_cart(&mut tx, user).await?;
        let mut cart = live_cart(stored, user, now).ok_or(CartsServiceError::NotFound)?;
        let catalog = self.catalog_for(&mut tx, &cart, Some(product)).await?;

        cart.update_quantity(&catalog, product, quantity, now)?;

        let saved = self.repository.save_cart(&mut tx, &cart).await?;
        let enriched = self.enrich(&mut tx, saved, now).await?;

        tx.commit().await?;

        Ok(enriched)
    }

    #[instrument(skip(self), err)]
    async fn remove_item(
        &self,
        user: UserId,
        product: ProductId,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.lock_cart(&mut tx, user).await?;

        let cart = match live_cart(stored, user, now) {
            Some(mut cart) => {
                cart.remove(product, now);

                self.repository.save_cart(&mut tx, &cart).await?
            }
            None => Cart::new(user, now),
        };

        let enriched = self.enrich(&mut tx, cart, now).await?;

        tx.commit().await?;

        Ok(enriched)
    }

    #[instrument(skip(self), err)]
    async fn clear_cart(&self, user: UserId, now: Timestamp) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.lock_cart(&mut tx, user).await?;

        let cart = match live_cart(stored, user, now) {
            Some(mut cart) => {
                cart.clear(now);

                self.repository.save_cart(&mut tx, &cart).await?
            }
            None => Cart::new(user, now),
        };

        tx.commit().await?;

        Ok(cart)
    }

    #[instrument(skip(self), err)]
    async fn remove_unavailable(
        &self,
        user: UserId,
        now: Timestamp,
    ) -> Result<CartCleanup, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.lock_cart(&mut tx, user).await?;
        let mut cart = live_cart(stored, user, now).ok_or(CartsServiceError::NotFound)?;
        let catalog = self.catalog_for(&mut tx, &cart, None).await?;

        let removed = cart.remove_unavailable(&catalog, now);

        let saved = self.repository.save_cart(&mut tx, &cart).await?;
        let enriched = self.enrich(&mut tx, saved, now).await?;

        tx.commit().await?;

        Ok(CartCleanup {
            removed,
            cart: enriched,
        })
    }

    #[instrument(skip(self), err)]
    async fn validate_cart(
        &self,
        user: UserId,
        now: Timestamp,
    ) -> Result<StockReport, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let stored = self.repository.get_cart(&mut tx, user).await?;

        let cart = live_cart(stored, user, now)
            .filter(|cart| !cart.is_empty())
            .ok_or(CartsServiceError::EmptyCart)?;

        let catalog = self.catalog_for(&mut tx, &cart, None).await?;

        tx.commit().await?;

        Ok(cart.validate_stock(&catalog))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The user's cart, priced live. Users without a cart get an empty one.
    async fn get_cart(&self, user: UserId, now: Timestamp) -> Result<EnrichedCart, CartsServiceError>;

    /// Add units of a product, merging into an existing line.
    async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError>;

    /// Overwrite a line's quantity.
    async fn update_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError>;

    /// Drop a line. Missing carts and lines are not errors.
    async fn remove_item(
        &self,
        user: UserId,
        product: ProductId,
        now: Timestamp,
    ) -> Result<EnrichedCart, CartsServiceError>;

    /// Empty the cart.
    async fn clear_cart(&self, user: UserId, now: Timestamp) -> Result<Cart, CartsServiceError>;

    /// Drop lines whose product is gone or sold out.
    async fn remove_unavailable(
        &self,
        user: UserId,
        now: Timestamp,
    ) -> Result<CartCleanup, CartsServiceError>;

    /// Check every line against live stock.
    async fn validate_cart(
        &self,
        user: UserId,
        now: Timestamp,
    ) -> Result<StockReport, CartsServiceError>;
}
