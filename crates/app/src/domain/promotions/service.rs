//! Promotions service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument};

use bazaar::{
    products::ProductId,
    promotions::{
        Promotion, PromotionDraft, PromotionId, PromotionStatus,
        sync::{SyncReport, plan_sync},
    },
};

use crate::{
    database::Db,
    domain::{
        pagination::Page,
        products::repository::PgProductsRepository,
        promotions::{
            data::{ProductSummary, PromotionFilter, PromotionView},
            errors::PromotionsServiceError,
            repository::PgPromotionsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPromotionsService {
    db: Db,
    repository: PgPromotionsRepository,
    products: PgProductsRepository,
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromotionsRepository::new(),
            products: PgProductsRepository::new(),
        }
    }

    async fn ensure_products_exist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: &Promotion,
    ) -> Result<(), PromotionsServiceError> {
        let existing = self
            .products
            .count_existing(tx, &promotion.applicable_products)
            .await?;

        if existing != promotion.applicable_products.len() as u64 {
            return Err(PromotionsServiceError::InvalidReference);
        }

        Ok(())
    }

    /// Resolve the applicable products of every promotion with one lookup.
    async fn views(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotions: Vec<Promotion>,
    ) -> Result<Vec<PromotionView>, PromotionsServiceError> {
        let mut ids: Vec<ProductId> = promotions
            .iter()
            .flat_map(|promotion| promotion.applicable_products.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let catalog: FxHashMap<ProductId, ProductSummary> = self
            .products
            .products_by_ids(tx, &ids)
            .await?
            .iter()
            .map(|product| (product.id, ProductSummary::from(product)))
            .collect();

        Ok(promotions
            .into_iter()
            .map(|promotion| PromotionView::resolve(promotion, &catalog))
            .collect())
    }

    async fn view(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: Promotion,
    ) -> Result<PromotionView, PromotionsServiceError> {
        self.views(tx, vec![promotion])
            .await?
            .pop()
            .ok_or(PromotionsServiceError::NotFound)
    }
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    #[instrument(skip(self), err)]
    async fn list_promotions(
        &self,
        filter: PromotionFilter,
    ) -> Result<Page<PromotionView>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let promotions = self.repository.list_promotions(&mut tx, &filter).await?;
        let total = self.repository.count_promotions(&mut tx, &filter).await?;
        let promotions = self.views(&mut tx, promotions).await?;

        tx.commit().await?;

        Ok(Page::new(promotions, total, filter.page))
    }

    #[instrument(skip(self), err)]
    async fn get_promotion(
        &self,
        promotion: PromotionId,
    ) -> Result<PromotionView, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let promotion = self.repository.get_promotion(&mut tx, promotion).await?;
        let view = self.view(&mut tx, promotion).await?;

        tx.commit().await?;

        Ok(view)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    async fn create_promotion(
        &self,
        promotion: PromotionId,
        draft: PromotionDraft,
        now: Timestamp,
    ) -> Result<Promotion, PromotionsServiceError> {
        let promotion = draft.into_promotion(promotion, now)?;

        let mut tx = self.db.begin().await?;

        self.ensure_products_exist(&mut tx, &promotion).await?;

        let created = self.repository.create_promotion(&mut tx, &promotion).await?;

        tx.commit().await?;

        Ok(created)
    }

    #[instrument(skip(self, draft), err)]
    async fn update_promotion(
        &self,
        promotion: PromotionId,
        draft: PromotionDraft,
        now: Timestamp,
    ) -> Result<PromotionView, PromotionsServiceError> {
        draft.validate()?;

        let mut tx = self.db.begin().await?;

        let mut current = self.repository.lock_promotion(&mut tx, promotion).await?;

        current.apply(draft, now)?;

        self.ensure_products_exist(&mut tx, &current).await?;

        let updated = self.repository.update_promotion(&mut tx, &current).await?;
        let view = self.view(&mut tx, updated).await?;

        tx.commit().await?;

        Ok(view)
    }

    #[instrument(skip(self), err)]
    async fn delete_promotion(&self, promotion: PromotionId) -> Result<(), PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_promotion(&mut tx, promotion).await?;

        if rows_affected == 0 {
            return Err(PromotionsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list_active_promotions(
        &self,
        now: Timestamp,
    ) -> Result<Vec<PromotionView>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let promotions = self.repository.list_live_promotions(&mut tx, now).await?;
        let views = self.views(&mut tx, promotions).await?;

        tx.commit().await?;

        Ok(views)
    }

    #[instrument(skip(self), err)]
    async fn set_promotion_status(
        &self,
        promotion: PromotionId,
        status: PromotionStatus,
        now: Timestamp,
    ) -> Result<Promotion, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .set_status(&mut tx, promotion, status, now)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn sync_statuses(&self, now: Timestamp) -> Result<SyncReport, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let promotions = self.repository.lock_all_promotions(&mut tx).await?;
        let report = plan_sync(&promotions, now);

        for change in &report.changes {
            self.repository
                .write_synced_status(&mut tx, change.promotion_id, change.to, now)
                .await?;

            info!(
                promotion = %change.promotion_id,
                name = %change.name,
                from = %change.from,
                to = %change.to,
                "promotion status synced"
            );
        }

        tx.commit().await?;

        Ok(report)
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Page through promotions, filtered on persisted status, with their
    /// applicable products resolved.
    async fn list_promotions(
        &self,
        filter: PromotionFilter,
    ) -> Result<Page<PromotionView>, PromotionsServiceError>;

    /// Retrieve a single promotion with its applicable products resolved.
    async fn get_promotion(
        &self,
        promotion: PromotionId,
    ) -> Result<PromotionView, PromotionsServiceError>;

    /// Creates a promotion. Every applicable product must exist.
    async fn create_promotion(
        &self,
        promotion: PromotionId,
        draft: PromotionDraft,
        now: Timestamp,
    ) -> Result<Promotion, PromotionsServiceError>;

    /// Overwrites a promotion and re-resolves its status.
    async fn update_promotion(
        &self,
        promotion: PromotionId,
        draft: PromotionDraft,
        now: Timestamp,
    ) -> Result<PromotionView, PromotionsServiceError>;

    async fn delete_promotion(&self, promotion: PromotionId) -> Result<(), PromotionsServiceError>;

    /// Promotions whose window contains `now`.
    async fn list_active_promotions(
        &self,
        now: Timestamp,
    ) -> Result<Vec<PromotionView>, PromotionsServiceError>;

    /// Pin the persisted status. The next sweep writes the live status back.
    async fn set_promotion_status(
        &self,
        promotion: PromotionId,
        status: PromotionStatus,
        now: Timestamp,
    ) -> Result<Promotion, PromotionsServiceError>;

    /// Rewrite every persisted status that disagrees with the clock.
    async fn sync_statuses(&self, now: Timestamp) -> Result<SyncReport, PromotionsServiceError>;
}
