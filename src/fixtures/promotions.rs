//! Promotion Fixtures

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_amount},
    money::Percentage,
    products::ProductId,
    promotions::{Promotion, PromotionDraft, PromotionId},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion key -> promotion fixture
    pub promotions: BTreeMap<String, PromotionFixture>,
}

/// Promotion fixture from YAML.
///
/// Windows are relative to the moment the fixture is loaded, so a fixture
/// keeps describing an active promotion no matter when it is loaded.
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Discount percentage (e.g., "25")
    pub discount: String,

    /// Hours from load time until the window opens; negative for the past
    pub starts_in_hours: i64,

    /// Window length in hours
    pub lasts_hours: i64,

    /// Product keys the promotion applies to
    #[serde(default)]
    pub products: Vec<String>,
}

impl PromotionFixture {
    /// Build a validated promotion, resolving product keys through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the discount is invalid, a product key is unknown,
    /// or the window cannot be represented.
    pub fn try_into_promotion(
        self,
        now: Timestamp,
        lookup: impl Fn(&str) -> Option<ProductId>,
    ) -> Result<Promotion, FixtureError> {
        let percent: Decimal = parse_amount(&self.discount)?;
        let discount = Percentage::new(percent)
            .map_err(|_err| FixtureError::InvalidPercentage(self.discount.clone()))?;

        let starts_at = now.checked_add(SignedDuration::from_hours(self.starts_in_hours))?;
        let ends_at = starts_at.checked_add(SignedDuration::from_hours(self.lasts_hours))?;

        let applicable_products = self
            .products
            .iter()
            .map(|key| lookup(key).ok_or_else(|| FixtureError::ProductNotFound(key.clone())))
            .collect::<Result<_, _>>()?;

        let draft = PromotionDraft {
            name: self.name,
            description: self.description,
            discount,
            starts_at,
            ends_at,
            applicable_products,
        };

        Ok(draft.into_promotion(PromotionId::new(), now)?)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::promotions::PromotionStatus;

    use super::*;

    #[test]
    fn relative_windows_resolve_against_load_time() -> TestResult {
        let yaml = r#"
promotions:
  flash:
    name: Flash Sale
    discount: "25"
    starts_in_hours: -1
    lasts_hours: 2
    products: [laptop]
"#;

        let laptop = ProductId::new();
        let now = Timestamp::now();
        let fixture: PromotionsFixture = serde_norway::from_str(yaml)?;

        let promotion = fixture
            .promotions
            .into_iter()
            .next()
            .ok_or("no promotions")?
            .1
            .try_into_promotion(now, |key| (key == "laptop").then_some(laptop))?;

        assert_eq!(promotion.status, PromotionStatus::Active);
        assert!(promotion.applies_to(laptop));

        Ok(())
    }

    #[test]
    fn unknown_product_keys_are_errors() -> TestResult {
        let fixture = PromotionFixture {
            name: "Ghost Sale".to_string(),
            description: None,
            discount: "10".to_string(),
            starts_in_hours: 0,
            lasts_hours: 1,
            products: vec!["ghost".to_string()],
        };

        assert!(matches!(
            fixture.try_into_promotion(Timestamp::now(), |_| None),
            Err(FixtureError::ProductNotFound(key)) if key == "ghost"
        ));

        Ok(())
    }

    #[test]
    fn out_of_range_discounts_are_errors() {
        let fixture = PromotionFixture {
            name: "Too Good".to_string(),
            description: None,
            discount: "120".to_string(),
            starts_in_hours: 0,
            lasts_hours: 1,
            products: Vec::new(),
        };

        assert!(matches!(
            fixture.try_into_promotion(Timestamp::now(), |_| None),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }
}
