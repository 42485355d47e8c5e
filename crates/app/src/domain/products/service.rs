//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::instrument;

use bazaar::{
    pricing::resolve_price,
    products::{Product, ProductDraft, ProductId},
};

use crate::{
    database::Db,
    domain::{
        pagination::Page,
        products::{
            data::{PricedProduct, ProductFilter},
            errors::ProductsServiceError,
            repository::PgProductsRepository,
        },
        promotions::repository::PgPromotionsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    promotions: PgPromotionsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            promotions: PgPromotionsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    #[instrument(skip(self), err)]
    async fn list_products(
        &self,
        filter: ProductFilter,
        now: Timestamp,
    ) -> Result<Page<PricedProduct>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, &filter).await?;
        let total = self.repository.count_products(&mut tx, &filter).await?;
        let promotions = self.promotions.list_live_promotions(&mut tx, now).await?;

        tx.commit().await?;

        Ok(Page::new(products, total, filter.page).map(|product| PricedProduct {
            pricing: resolve_price(&product, &promotions, now),
            product,
        }))
    }

    #[instrument(skip(self), err)]
    async fn get_product(
        &self,
        product: ProductId,
        now: Timestamp,
    ) -> Result<PricedProduct, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self.repository.get_product(&mut tx, product).await?;
        let promotions = self.promotions.list_live_promotions(&mut tx, now).await?;

        tx.commit().await?;

        Ok(PricedProduct {
            pricing: resolve_price(&product, &promotions, now),
            product,
        })
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    async fn create_product(
        &self,
        product: ProductId,
        draft: ProductDraft,
        now: Timestamp,
    ) -> Result<Product, ProductsServiceError> {
        let product = draft.into_product(product, now)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[instrument(skip(self, draft), err)]
    async fn update_product(
        &self,
        product: ProductId,
        draft: ProductDraft,
        now: Timestamp,
    ) -> Result<Product, ProductsServiceError> {
        draft.validate()?;

        let mut tx = self.db.begin().await?;

        let mut current = self.repository.lock_product(&mut tx, product).await?;

        current.apply(draft, now)?;

        let updated = self.repository.update_product(&mut tx, &current).await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn delete_product(&self, product: ProductId) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list_categories(&self) -> Result<Vec<String>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Page through the catalog, each product priced against live promotions.
    async fn list_products(
        &self,
        filter: ProductFilter,
        now: Timestamp,
    ) -> Result<Page<PricedProduct>, ProductsServiceError>;

    /// Retrieve a single product with its live price.
    async fn get_product(
        &self,
        product: ProductId,
        now: Timestamp,
    ) -> Result<PricedProduct, ProductsServiceError>;

    /// Creates a product under the given id.
    async fn create_product(
        &self,
        product: ProductId,
        draft: ProductDraft,
        now: Timestamp,
    ) -> Result<Product, ProductsServiceError>;

    /// Overwrites a product's writable fields.
    async fn update_product(
        &self,
        product: ProductId,
        draft: ProductDraft,
        now: Timestamp,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product. Orders and carts referencing it keep their snapshots.
    async fn delete_product(&self, product: ProductId) -> Result<(), ProductsServiceError>;

    /// Distinct category names, sorted.
    async fn list_categories(&self) -> Result<Vec<String>, ProductsServiceError>;
}
