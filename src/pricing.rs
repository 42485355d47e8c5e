//! Pricing
//!
//! Resolves the price a product sells for right now: its catalog price less
//! the single best active promotion that applies to it. Promotions never
//! stack.

use std::cmp::Ordering;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    money::{Percentage, round2},
    products::{Product, ProductId},
    promotions::{Promotion, PromotionId},
};

/// The promotion a quote was priced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotedPromotion {
    /// Promotion UUID
    pub id: PromotionId,

    /// Promotion name
    pub name: String,

    /// Discount percentage
    pub discount: Percentage,

    /// When the promotion ends
    pub ends_at: Timestamp,
}

impl From<&Promotion> for QuotedPromotion {
    fn from(promotion: &Promotion) -> Self {
        Self {
            id: promotion.id,
            name: promotion.name.clone(),
            discount: promotion.discount,
            ends_at: promotion.ends_at,
        }
    }
}

/// Unit price of a product after its best active promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    /// Catalog price
    pub original_price: Decimal,

    /// Price after discount
    pub discounted_price: Decimal,

    /// Percentage applied, zero when undiscounted
    pub discount: Percentage,

    /// Amount saved per unit
    pub save_amount: Decimal,

    /// Promotion applied, if any
    pub promotion: Option<QuotedPromotion>,
}

impl PriceQuote {
    /// Quote with no promotion applied.
    pub fn undiscounted(price: Decimal) -> Self {
        Self {
            original_price: price,
            discounted_price: price,
            discount: Percentage::ZERO,
            save_amount: Decimal::ZERO,
            promotion: None,
        }
    }

    /// Quote for `price` discounted by `promotion`.
    pub fn discounted(price: Decimal, promotion: &Promotion) -> Self {
        let save_amount = promotion.discount.of(price);

        Self {
            original_price: price,
            discounted_price: round2(price - save_amount),
            discount: promotion.discount,
            save_amount,
            promotion: Some(promotion.into()),
        }
    }

    /// Pre-discount total for `quantity` units.
    pub fn gross_total(&self, quantity: u32) -> Decimal {
        self.original_price * Decimal::from(quantity)
    }

    /// Post-discount total for `quantity` units.
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.discounted_price * Decimal::from(quantity)
    }

    /// Discount across `quantity` units.
    pub fn line_discount(&self, quantity: u32) -> Decimal {
        self.save_amount * Decimal::from(quantity)
    }
}

/// Order promotions by preference: higher discount first, then the one that
/// started earlier, then the lower id.
fn preference(a: &Promotion, b: &Promotion) -> Ordering {
    a.discount
        .cmp(&b.discount)
        .then_with(|| b.starts_at.cmp(&a.starts_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Pick the best promotion that discounts `product` at `now`.
pub fn best_promotion<'a>(
    product: ProductId,
    promotions: impl IntoIterator<Item = &'a Promotion>,
    now: Timestamp,
) -> Option<&'a Promotion> {
    promotions
        .into_iter()
        .filter(|promotion| promotion.discounts(product, now))
        .max_by(|a, b| preference(a, b))
}

/// Resolve the current unit price of `product`.
///
/// Status is resolved live from each promotion's window, so a promotion whose
/// persisted status lags the clock is still priced correctly.
pub fn resolve_price<'a>(
    product: &Product,
    promotions: impl IntoIterator<Item = &'a Promotion>,
    now: Timestamp,
) -> PriceQuote {
    match best_promotion(product.id, promotions, now) {
        Some(promotion) => PriceQuote::discounted(product.price, promotion),
        None => PriceQuote::undiscounted(product.price),
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::{
        products::ProductDraft,
        promotions::{PromotionDraft, PromotionStatus},
    };

    use super::*;

    fn product(price: Decimal) -> TestResult<Product> {
        Ok(ProductDraft {
            name: "Mechanical Keyboard".to_string(),
            price,
            category: "Accessories".to_string(),
            stock: 10,
            ..ProductDraft::default()
        }
        .into_product(ProductId::new(), Timestamp::UNIX_EPOCH)?)
    }

    fn promotion(
        product: ProductId,
        percent: i64,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> TestResult<Promotion> {
        Ok(PromotionDraft {
            name: format!("{percent} percent off"),
            description: None,
            discount: Percentage::new(Decimal::from(percent))?,
            starts_at,
            ends_at,
            applicable_products: smallvec![product],
        }
        .into_promotion(PromotionId::new(), starts_at)?)
    }

    #[test]
    fn no_promotion_keeps_original_price() -> TestResult {
        let product = product(Decimal::new(4_999, 2))?;

        let none: [&Promotion; 0] = [];

        let quote = resolve_price(&product, none, Timestamp::now());

        assert_eq!(quote, PriceQuote::undiscounted(Decimal::new(4_999, 2)));

        Ok(())
    }

    #[test]
    fn thirty_three_percent_of_nine_ninety_nine() -> TestResult {
        let now = Timestamp::now();
        let product = product(Decimal::new(999, 2))?;
        let promo = promotion(
            product.id,
            33,
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;

        let quote = resolve_price(&product, [&promo], now);

        assert_eq!(quote.save_amount, Decimal::new(330, 2));
        assert_eq!(quote.discounted_price, Decimal::new(669, 2));
        assert_eq!(quote.promotion.map(|p| p.id), Some(promo.id));

        Ok(())
    }

    #[test]
    fn highest_percentage_wins() -> TestResult {
        let now = Timestamp::now();
        let product = product(Decimal::ONE_HUNDRED)?;
        let start = now.checked_sub(1.hour())?;
        let end = now.checked_add(1.hour())?;

        let small = promotion(product.id, 10, start, end)?;
        let large = promotion(product.id, 40, start, end)?;
        let medium = promotion(product.id, 25, start, end)?;

        let quote = resolve_price(&product, [&small, &large, &medium], now);

        assert_eq!(quote.discounted_price, Decimal::from(60));
        assert_eq!(quote.promotion.map(|p| p.id), Some(large.id));

        Ok(())
    }

    #[test]
    fn ties_prefer_earlier_start_then_lower_id() -> TestResult {
        let now = Timestamp::now();
        let product = product(Decimal::ONE_HUNDRED)?;
        let end = now.checked_add(1.hour())?;

        let early = promotion(product.id, 20, now.checked_sub(2.hours())?, end)?;
        let late = promotion(product.id, 20, now.checked_sub(1.hour())?, end)?;

        let picked = best_promotion(product.id, [&late, &early], now).map(|p| p.id);
        assert_eq!(picked, Some(early.id));

        let twin = Promotion {
            id: PromotionId::new(),
            ..early.clone()
        };
        let lowest = early.id.min(twin.id);

        let picked = best_promotion(product.id, [&twin, &early], now).map(|p| p.id);
        assert_eq!(picked, Some(lowest));

        let picked = best_promotion(product.id, [&early, &twin], now).map(|p| p.id);
        assert_eq!(picked, Some(lowest));

        Ok(())
    }

    #[test]
    fn live_status_overrides_persisted_status() -> TestResult {
        let now = Timestamp::now();
        let product = product(Decimal::ONE_HUNDRED)?;

        let mut stale_active = promotion(
            product.id,
            50,
            now.checked_sub(2.hours())?,
            now.checked_sub(1.hour())?,
        )?;
        stale_active.status = PromotionStatus::Active;

        let mut stale_inactive = promotion(
            product.id,
            20,
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;
        stale_inactive.status = PromotionStatus::Inactive;

        let quote = resolve_price(&product, [&stale_active, &stale_inactive], now);

        assert_eq!(quote.discount, stale_inactive.discount);
        assert_eq!(quote.discounted_price, Decimal::from(80));

        Ok(())
    }

    #[test]
    fn promotions_for_other_products_are_ignored() -> TestResult {
        let now = Timestamp::now();
        let product = product(Decimal::TEN)?;
        let other = promotion(
            ProductId::new(),
            90,
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;

        let quote = resolve_price(&product, [&other], now);

        assert!(quote.promotion.is_none());
        assert_eq!(quote.discounted_price, quote.original_price);

        Ok(())
    }

    #[test]
    fn discounted_price_never_exceeds_original() -> TestResult {
        let now = Timestamp::now();
        let start = now.checked_sub(1.hour())?;
        let end = now.checked_add(1.hour())?;

        for cents in [1_i64, 5, 99, 333, 999, 1_005, 123_456] {
            for percent in [0_i64, 1, 15, 33, 50, 99, 100] {
                let product = product(Decimal::new(cents, 2))?;
                let promo = promotion(product.id, percent, start, end)?;
                let quote = resolve_price(&product, [&promo], now);

                assert!(quote.discounted_price <= quote.original_price);
                assert!(quote.discounted_price >= Decimal::ZERO);

                let saved = round2(product.price * Decimal::from(percent) / Decimal::ONE_HUNDRED);
                assert_eq!(quote.discounted_price, round2(product.price - saved));
            }
        }

        Ok(())
    }

    #[test]
    fn resolution_is_idempotent() -> TestResult {
        let now = Timestamp::now();
        let product = product(Decimal::new(1_999, 2))?;
        let promo = promotion(
            product.id,
            15,
            now.checked_sub(1.hour())?,
            now.checked_add(1.hour())?,
        )?;
        let before = (product.clone(), promo.clone());

        let first = resolve_price(&product, [&promo], now);
        let second = resolve_price(&product, [&promo], now);

        assert_eq!(first, second);
        assert_eq!((product, promo), before);

        Ok(())
    }
}
