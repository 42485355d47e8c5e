//! Products

use std::collections::BTreeMap;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedUuid,
    money::round2,
    validation::{self, ValidationError},
};

/// Product identifier
pub type ProductId = TypedUuid<Product>;

/// Free-form product specification map, e.g. `ram: 16GB`.
pub type Specifications = BTreeMap<String, String>;

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product UUID
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Category name
    pub category: String,

    /// Description
    pub description: Option<String>,

    /// Units on hand
    pub stock: u32,

    /// Brand
    pub brand: Option<String>,

    /// Image reference
    pub image_url: Option<String>,

    /// Specifications
    #[serde(default)]
    pub specifications: Specifications,

    /// Average rating, 0 to 5
    #[serde(default)]
    pub rating: Decimal,

    /// Created at
    pub created_at: Timestamp,

    /// Updated at
    pub updated_at: Timestamp,
}

impl Product {
    /// Whether `quantity` units can be taken from stock.
    pub fn has_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Overwrite the writable fields from `draft`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the draft is invalid; the product is
    /// left unchanged.
    pub fn apply(&mut self, draft: ProductDraft, now: Timestamp) -> Result<(), ValidationError> {
        let updated = draft.into_product(self.id, self.created_at)?;

        *self = Product {
            updated_at: now,
            ..updated
        };

        Ok(())
    }

    /// The fields copied onto a cart line when it is added.
    pub fn cart_snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            name: self.name.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            category: Some(self.category.clone()),
            brand: self.brand.clone(),
        }
    }

    /// The fields frozen onto an order line at purchase time.
    pub fn purchase_snapshot(&self) -> PurchaseSnapshot {
        PurchaseSnapshot {
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            brand: self.brand.clone(),
            specifications: self.specifications.clone(),
        }
    }
}

/// Product fields captured on a cart line for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Name at add time
    pub name: String,

    /// Price at add time
    pub price: Decimal,

    /// Image at add time
    pub image_url: Option<String>,

    /// Category at add time
    pub category: Option<String>,

    /// Brand at add time
    pub brand: Option<String>,
}

/// Product fields frozen onto an order line. Never re-derived from the live product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseSnapshot {
    /// Name at purchase time
    pub name: String,

    /// Undiscounted unit price at purchase time
    pub price: Decimal,

    /// Category at purchase time
    pub category: String,

    /// Description at purchase time
    pub description: Option<String>,

    /// Image at purchase time
    pub image_url: Option<String>,

    /// Brand at purchase time
    pub brand: Option<String>,

    /// Specifications at purchase time
    #[serde(default)]
    pub specifications: Specifications,
}

/// Writable product fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Display name
    pub name: String,

    /// Unit price
    pub price: Decimal,

    /// Category name
    pub category: String,

    /// Description
    pub description: Option<String>,

    /// Units on hand
    pub stock: u32,

    /// Brand
    pub brand: Option<String>,

    /// Image reference
    pub image_url: Option<String>,

    /// Specifications
    #[serde(default)]
    pub specifications: Specifications,

    /// Average rating, 0 to 5
    #[serde(default)]
    pub rating: Decimal,
}

impl ProductDraft {
    /// Check the draft against the catalog's field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::text("Product name", &self.name, 2, 100)?;
        validation::non_negative("Price", self.price)?;
        validation::text("Product category", &self.category, 1, 100)?;
        validation::optional_text("Description", self.description.as_deref(), 500)?;
        validation::range("Rating", self.rating, Decimal::ZERO, Decimal::from(5))?;

        Ok(())
    }

    /// Build a new product from the draft.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the draft is invalid.
    pub fn into_product(self, id: ProductId, now: Timestamp) -> Result<Product, ValidationError> {
        self.validate()?;

        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            price: round2(self.price),
            category: self.category.trim().to_string(),
            description: self.description,
            stock: self.stock,
            brand: self.brand,
            image_url: self.image_url,
            specifications: self.specifications,
            rating: self.rating,
            created_at: now,
            updated_at: now,
        })
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            price: product.price,
            category: product.category,
            description: product.description,
            stock: product.stock,
            brand: product.brand,
            image_url: product.image_url,
            specifications: product.specifications,
            rating: product.rating,
        }
    }
}

/// Live products keyed by id, as loaded for one operation.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: FxHashMap<ProductId, Product>,
}

impl Catalog {
    /// Look up a live product.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Whether the product still exists.
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    /// Insert or replace a product.
    pub fn insert(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    /// Drop a product, as a delete would.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        self.products.remove(&id)
    }

    /// Number of products loaded.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Iterate over the loaded products in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().map(|product| (product.id, product)).collect(),
        }
    }
}
