//! Fixtures
//!
//! YAML product and promotion sets under `fixtures/products/<name>.yml` and
//! `fixtures/promotions/<name>.yml`. Promotions reference products by their
//! fixture key.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    fixtures::{products::ProductsFixture, promotions::PromotionsFixture},
    products::{Catalog, Product, ProductId},
    promotions::Promotion,
    validation::ValidationError,
};

pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// A fixture entry failed validation
    #[error("Invalid fixture data: {0}")]
    Invalid(#[from] ValidationError),

    /// A promotion window could not be represented
    #[error("Invalid promotion window: {0}")]
    Window(#[from] jiff::Error),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Instant promotion windows are relative to
    now: Timestamp,

    /// Loaded products, in key order per file
    products: Vec<Product>,

    /// Loaded promotions, in key order per file
    promotions: Vec<Promotion>,

    /// Fixture key -> index lookups
    product_keys: FxHashMap<String, usize>,
    promotion_keys: FxHashMap<String, usize>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new(now: Timestamp) -> Self {
        Self::with_base_path("./fixtures", now)
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>, now: Timestamp) -> Self {
        Self {
            base_path: base_path.into(),
            now,
            products: Vec::new(),
            promotions: Vec::new(),
            product_keys: FxHashMap::default(),
            promotion_keys: FxHashMap::default(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a product is invalid.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let product = product_fixture.try_into_product(self.now)?;

            self.product_keys.insert(key, self.products.len());
            self.products.push(product);
        }

        Ok(self)
    }

    /// Load promotions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a promotion is
    /// invalid, or it references a product key that has not been loaded.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for (key, promotion_fixture) in fixture.promotions {
            let promotion = promotion_fixture.try_into_promotion(self.now, |product_key| {
                self.product_keys
                    .get(product_key)
                    .and_then(|index| self.products.get(*index))
                    .map(|product| product.id)
            })?;

            self.promotion_keys.insert(key, self.promotions.len());
            self.promotions.push(promotion);
        }

        Ok(self)
    }

    /// Load products and promotions sharing the same set name
    ///
    /// # Errors
    ///
    /// Returns an error if either file fails to load.
    pub fn from_set(name: &str, now: Timestamp) -> Result<Self, FixtureError> {
        let mut fixture = Self::new(now);

        fixture.load_products(name)?.load_promotions(name)?;

        Ok(fixture)
    }

    /// Get a product by fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ProductNotFound`] for an unknown key.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.product_keys
            .get(key)
            .and_then(|index| self.products.get(*index))
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product id by fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ProductNotFound`] for an unknown key.
    pub fn product_id(&self, key: &str) -> Result<ProductId, FixtureError> {
        self.product(key).map(|product| product.id)
    }

    /// Get a promotion by fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::PromotionNotFound`] for an unknown key.
    pub fn promotion(&self, key: &str) -> Result<&Promotion, FixtureError> {
        self.promotion_keys
            .get(key)
            .and_then(|index| self.promotions.get(*index))
            .ok_or_else(|| FixtureError::PromotionNotFound(key.to_string()))
    }

    /// All loaded products
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All loaded promotions
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// A catalog of every loaded product
    pub fn catalog(&self) -> Catalog {
        self.products.iter().cloned().collect()
    }

    /// Instant promotion windows were resolved against
    pub fn now(&self) -> Timestamp {
        self.now
    }
}
