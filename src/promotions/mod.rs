//! Promotions

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    ids::TypedUuid,
    money::Percentage,
    products::ProductId,
    validation::{self, ValidationError},
};

pub mod status;
pub mod sync;

pub use status::{InvalidPromotionStatus, PromotionStatus, resolve_status};

/// Promotion identifier
pub type PromotionId = TypedUuid<Promotion>;

/// Products a promotion applies to. Most promotions target a handful.
pub type ApplicableProducts = SmallVec<[ProductId; 8]>;

/// Time-boxed percentage discount on a set of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    /// Promotion UUID
    pub id: PromotionId,

    /// Display name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Discount applied to each unit
    pub discount: Percentage,

    /// Window start, inclusive
    pub starts_at: Timestamp,

    /// Window end, inclusive
    pub ends_at: Timestamp,

    /// Products the discount applies to
    #[serde(default)]
    pub applicable_products: ApplicableProducts,

    /// Persisted status. May lag the live status until the next sweep.
    pub status: PromotionStatus,

    /// When the sweep last wrote the status
    pub status_synced_at: Option<Timestamp>,

    /// Created at
    pub created_at: Timestamp,

    /// Updated at
    pub updated_at: Timestamp,
}

impl Promotion {
    /// Status computed from the window and `now`, ignoring the persisted value.
    pub fn live_status(&self, now: Timestamp) -> PromotionStatus {
        resolve_status(self.starts_at, self.ends_at, now)
    }

    /// Overwrite the writable fields from `draft` and re-resolve the status.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the draft is invalid; the promotion
    /// is left unchanged.
    pub fn apply(&mut self, draft: PromotionDraft, now: Timestamp) -> Result<(), ValidationError> {
        let updated = draft.into_promotion(self.id, now)?;

        *self = Promotion {
            created_at: self.created_at,
            ..updated
        };

        Ok(())
    }

    /// Whether the persisted status disagrees with the live one.
    pub fn is_stale(&self, now: Timestamp) -> bool {
        self.status != self.live_status(now)
    }

    /// Whether the promotion discounts `product`.
    pub fn applies_to(&self, product: ProductId) -> bool {
        self.applicable_products.contains(&product)
    }

    /// Whether the promotion discounts `product` at `now`.
    pub fn discounts(&self, product: ProductId, now: Timestamp) -> bool {
        self.applies_to(product) && self.live_status(now) == PromotionStatus::Active
    }
}

/// Writable promotion fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionDraft {
    /// Display name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Discount applied to each unit
    pub discount: Percentage,

    /// Window start
    pub starts_at: Timestamp,

    /// Window end
    pub ends_at: Timestamp,

    /// Products the discount applies to
    #[serde(default)]
    pub applicable_products: ApplicableProducts,
}

impl PromotionDraft {
    /// Check the draft against the promotion field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::text("Promotion name", &self.name, 3, 100)?;
        validation::optional_text("Description", self.description.as_deref(), 500)?;

        if self.ends_at <= self.starts_at {
            return Err(ValidationError::EndBeforeStart);
        }

        Ok(())
    }

    /// Build a promotion whose persisted status starts out equal to its live status.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the draft is invalid.
    pub fn into_promotion(
        self,
        id: PromotionId,
        now: Timestamp,
    ) -> Result<Promotion, ValidationError> {
        self.validate()?;

        let mut applicable_products = self.applicable_products;
        applicable_products.sort_unstable();
        applicable_products.dedup();

        Ok(Promotion {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            discount: self.discount,
            status: resolve_status(self.starts_at, self.ends_at, now),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            applicable_products,
            status_synced_at: Some(now),
            created_at: now,
            updated_at: now,
        })
    }
}

impl From<Promotion> for PromotionDraft {
    fn from(promotion: Promotion) -> Self {
        Self {
            name: promotion.name,
            description: promotion.description,
            discount: promotion.discount,
            starts_at: promotion.starts_at,
            ends_at: promotion.ends_at,
            applicable_products: promotion.applicable_products,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rust_decimal::Decimal;
    use smallvec::smallvec;
    use testresult::TestResult;

    use super::*;

    fn draft(now: Timestamp) -> Result<PromotionDraft, Box<dyn std::error::Error>> {
        Ok(PromotionDraft {
            name: "Summer Sale".to_string(),
            description: None,
            discount: Percentage::new(Decimal::from(25))?,
            starts_at: now.checked_sub(1.hour())?,
            ends_at: now.checked_add(1.hour())?,
            applicable_products: smallvec![],
        })
    }

    #[test]
    fn new_promotions_take_their_live_status() -> TestResult {
        let now = Timestamp::now();
        let promotion = draft(now)?.into_promotion(PromotionId::new(), now)?;

        assert_eq!(promotion.status, PromotionStatus::Active);
        assert!(!promotion.is_stale(now));

        Ok(())
    }

    #[test]
    fn apply_moves_the_window_and_resolves_status() -> TestResult {
        let now = Timestamp::now();
        let mut promotion = draft(now)?.into_promotion(PromotionId::new(), now)?;
        let created_at = promotion.created_at;

        let mut later = draft(now)?;
        later.starts_at = now.checked_add(24.hours())?;
        later.ends_at = now.checked_add(48.hours())?;

        let later_now = now.checked_add(1.second())?;
        promotion.apply(later, later_now)?;

        assert_eq!(promotion.status, PromotionStatus::Inactive);
        assert_eq!(promotion.created_at, created_at);
        assert_eq!(promotion.updated_at, later_now);

        Ok(())
    }

    #[test]
    fn end_must_follow_start() -> TestResult {
        let now = Timestamp::now();
        let mut draft = draft(now)?;
        draft.ends_at = draft.starts_at;

        assert_eq!(draft.validate(), Err(ValidationError::EndBeforeStart));

        Ok(())
    }

    #[test]
    fn short_names_are_rejected() -> TestResult {
        let now = Timestamp::now();
        let mut draft = draft(now)?;
        draft.name = "ab".to_string();

        assert!(matches!(
            draft.validate(),
            Err(ValidationError::TooShort { min: 3, .. })
        ));

        Ok(())
    }

    #[test]
    fn applicable_products_are_deduplicated() -> TestResult {
        let now = Timestamp::now();
        let product = ProductId::new();
        let mut draft = draft(now)?;
        draft.applicable_products = smallvec![product, product];

        let promotion = draft.into_promotion(PromotionId::new(), now)?;

        assert_eq!(promotion.applicable_products.len(), 1);
        assert!(promotion.applies_to(product));
        assert!(promotion.discounts(product, now));
        assert!(!promotion.discounts(product, now.checked_add(2.hours())?));

        Ok(())
    }
}
