//! Product Fixtures

use std::collections::BTreeMap;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductDraft, ProductId, Specifications},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: BTreeMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "1299.99")
    pub price: String,

    /// Category
    pub category: String,

    /// Description
    #[serde(default)]
    pub description: Option<String>,

    /// Units on hand
    #[serde(default)]
    pub stock: u32,

    /// Brand
    #[serde(default)]
    pub brand: Option<String>,

    /// Image reference
    #[serde(default)]
    pub image_url: Option<String>,

    /// Specifications
    #[serde(default)]
    pub specifications: Specifications,

    /// Rating (e.g., "4.5")
    #[serde(default)]
    pub rating: Option<String>,
}

/// Parse a decimal amount string such as `"1299.99"`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the string is not a decimal number.
pub fn parse_amount(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}

impl ProductFixture {
    /// Build a validated product.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be parsed or the product fails validation.
    pub fn try_into_product(self, now: Timestamp) -> Result<Product, FixtureError> {
        let draft = ProductDraft {
            name: self.name,
            price: parse_amount(&self.price)?,
            category: self.category,
            description: self.description,
            stock: self.stock,
            brand: self.brand,
            image_url: self.image_url,
            specifications: self.specifications,
            rating: self
                .rating
                .as_deref()
                .map(parse_amount)
                .transpose()?
                .unwrap_or_default(),
        };

        Ok(draft.into_product(ProductId::new(), now)?)
    }
}
