//! Promotions Data

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use bazaar::{
    products::{Product, ProductId},
    promotions::{Promotion, PromotionStatus},
};

use crate::domain::{pagination::PageRequest, products::data::SortOrder};

/// Column a promotion listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromotionSort {
    #[default]
    CreatedAt,
    Name,
    Discount,
    StartsAt,
    EndsAt,
    Status,
}

impl PromotionSort {
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Name => "name",
            Self::Discount => "discount_percentage",
            Self::StartsAt => "starts_at",
            Self::EndsAt => "ends_at",
            Self::Status => "status",
        }
    }
}

/// Promotion listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionFilter {
    /// Persisted status
    pub status: Option<PromotionStatus>,

    /// Case-insensitive substring of the name
    pub search: Option<String>,

    pub sort: PromotionSort,
    pub order: SortOrder,
    pub page: PageRequest,
}

/// The catalog fields shown next to a promotion's applicable products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub category: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
        }
    }
}

/// A promotion with its applicable products resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionView {
    pub promotion: Promotion,

    /// Applicable products that still exist, in the promotion's order
    pub products: Vec<ProductSummary>,
}

impl PromotionView {
    /// Resolve `promotion`'s product ids through `catalog`. Ids with no live
    /// product are left out.
    pub fn resolve(promotion: Promotion, catalog: &FxHashMap<ProductId, ProductSummary>) -> Self {
        let products = promotion
            .applicable_products
            .iter()
            .filter_map(|id| catalog.get(id).cloned())
            .collect();

        Self {
            promotion,
            products,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use bazaar::{
        money::Percentage,
        promotions::{PromotionDraft, PromotionId},
    };

    use super::*;

    #[test]
    fn resolve_keeps_promotion_order_and_drops_deleted_products() -> TestResult {
        let kept = ProductId::new();
        let deleted = ProductId::new();
        let other = ProductId::new();

        let promotion = PromotionDraft {
            name: "Back to School".to_string(),
            description: None,
            discount: Percentage::new(Decimal::from(10))?,
            starts_at: Timestamp::UNIX_EPOCH,
            ends_at: Timestamp::MAX,
            applicable_products: [deleted, kept].into_iter().collect(),
        }
        .into_promotion(PromotionId::new(), Timestamp::UNIX_EPOCH)?;

        let summary = |id, name: &str| ProductSummary {
            id,
            name: name.to_string(),
            price: Decimal::new(1_999, 2),
            category: "Stationery".to_string(),
        };

        let catalog: FxHashMap<ProductId, ProductSummary> = [
            (kept, summary(kept, "Notebook")),
            (other, summary(other, "Pencil")),
        ]
        .into_iter()
        .collect();

        let view = PromotionView::resolve(promotion, &catalog);

        assert_eq!(view.products, vec![summary(kept, "Notebook")]);
        assert_eq!(view.promotion.applicable_products.len(), 2);

        Ok(())
    }
}
