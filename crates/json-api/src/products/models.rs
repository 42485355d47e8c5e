//! Product request and response bodies

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar::{
    pricing::{PriceQuote, QuotedPromotion},
    products::{Product, ProductDraft},
};
use bazaar_app::domain::products::data::PricedProduct;

/// Promotion a price was quoted with
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuotedPromotionResponse {
    pub id: Uuid,
    pub name: String,

    /// Discount percentage
    #[salvo(schema(value_type = String))]
    pub discount: Decimal,

    pub end_date: String,
}

impl From<QuotedPromotion> for QuotedPromotionResponse {
    fn from(promotion: QuotedPromotion) -> Self {
        Self {
            id: promotion.id.into_uuid(),
            name: promotion.name,
            discount: promotion.discount.value(),
            end_date: promotion.ends_at.to_string(),
        }
    }
}

/// Live unit price after the best active promotion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricingResponse {
    #[salvo(schema(value_type = String))]
    pub original_price: Decimal,

    #[salvo(schema(value_type = String))]
    pub discounted_price: Decimal,

    /// Percentage applied, zero when undiscounted
    #[salvo(schema(value_type = String))]
    pub discount: Decimal,

    #[salvo(schema(value_type = String))]
    pub save_amount: Decimal,

    pub promotion: Option<QuotedPromotionResponse>,
}

impl From<PriceQuote> for PricingResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            original_price: quote.original_price,
            discounted_price: quote.discounted_price,
            discount: quote.discount.value(),
            save_amount: quote.save_amount,
            promotion: quote.promotion.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub id: Uuid,

    pub name: String,

    /// Catalog unit price
    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub category: String,
    pub description: Option<String>,

    /// Units on hand
    pub stock: u32,

    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub specifications: BTreeMap<String, String>,

    #[salvo(schema(value_type = String))]
    pub rating: Decimal,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,

    /// Live price, present on catalog reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingResponse>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.into_uuid(),
            name: product.name,
            price: product.price,
            category: product.category,
            description: product.description,
            stock: product.stock,
            brand: product.brand,
            image_url: product.image_url,
            specifications: product.specifications,
            rating: product.rating,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
            pricing: None,
        }
    }
}

impl From<PricedProduct> for ProductResponse {
    fn from(priced: PricedProduct) -> Self {
        Self {
            pricing: Some(priced.pricing.into()),
            ..priced.product.into()
        }
    }
}

/// Writable product fields
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductRequest {
    pub name: String,

    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub category: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub stock: u32,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub specifications: BTreeMap<String, String>,

    #[serde(default)]
    #[salvo(schema(value_type = String))]
    pub rating: Decimal,
}

impl From<ProductRequest> for ProductDraft {
    fn from(request: ProductRequest) -> Self {
        ProductDraft {
            name: request.name,
            price: request.price,
            category: request.category,
            description: request.description,
            stock: request.stock,
            brand: request.brand,
            image_url: request.image_url,
            specifications: request.specifications,
            rating: request.rating,
        }
    }
}

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateProductRequest {
    /// Client-chosen id; generated when absent
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(flatten)]
    pub product: ProductRequest,
}
