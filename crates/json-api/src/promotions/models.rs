//! Promotion request and response bodies

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar::{
    money::Percentage,
    products::ProductId,
    promotions::{Promotion, PromotionDraft},
};
use bazaar_app::domain::promotions::data::{ProductSummary, PromotionView};

use crate::response::ApiError;

/// Catalog fields of an applicable product
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplicableProductResponse {
    pub id: Uuid,
    pub name: String,

    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub category: String,
}

impl From<ProductSummary> for ApplicableProductResponse {
    fn from(summary: ProductSummary) -> Self {
        Self {
            id: summary.id.into_uuid(),
            name: summary.name,
            price: summary.price,
            category: summary.category,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Discount percentage, 0 to 100
    #[salvo(schema(value_type = String))]
    pub discount: Decimal,

    pub start_date: String,
    pub end_date: String,
    pub applicable_products: Vec<Uuid>,

    /// Applicable products that still exist, present on reads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ApplicableProductResponse>>,

    /// Status as stored; may lag until the next sweep
    pub status: String,

    /// Status computed from the window at response time
    pub live_status: String,

    pub status_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PromotionResponse {
    pub(crate) fn at(promotion: Promotion, now: Timestamp) -> Self {
        Self {
            live_status: promotion.live_status(now).as_str().to_string(),
            id: promotion.id.into_uuid(),
            name: promotion.name,
            description: promotion.description,
            discount: promotion.discount.value(),
            start_date: promotion.starts_at.to_string(),
            end_date: promotion.ends_at.to_string(),
            applicable_products: promotion
                .applicable_products
                .into_iter()
                .map(ProductId::into_uuid)
                .collect(),
            products: None,
            status: promotion.status.as_str().to_string(),
            status_synced_at: promotion.status_synced_at.map(|at| at.to_string()),
            created_at: promotion.created_at.to_string(),
            updated_at: promotion.updated_at.to_string(),
        }
    }

    /// A read response, with the applicable products' catalog fields.
    pub(crate) fn view(view: PromotionView, now: Timestamp) -> Self {
        Self {
            products: Some(view.products.into_iter().map(Into::into).collect()),
            ..Self::at(view.promotion, now)
        }
    }
}

/// Writable promotion fields
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionRequest {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Discount percentage, 0 to 100
    #[salvo(schema(value_type = String))]
    pub discount: Decimal,

    /// RFC 3339 timestamp
    #[salvo(schema(value_type = String))]
    pub start_date: Timestamp,

    /// RFC 3339 timestamp
    #[salvo(schema(value_type = String))]
    pub end_date: Timestamp,

    #[serde(default)]
    pub applicable_products: Vec<Uuid>,
}

impl TryFrom<PromotionRequest> for PromotionDraft {
    type Error = ApiError;

    fn try_from(request: PromotionRequest) -> Result<Self, Self::Error> {
        let discount = Percentage::new(request.discount)
            .map_err(|_ignored| ApiError::bad_request("Discount must be between 0 and 100"))?;

        Ok(PromotionDraft {
            name: request.name,
            description: request.description,
            discount,
            starts_at: request.start_date,
            ends_at: request.end_date,
            applicable_products: request
                .applicable_products
                .into_iter()
                .map(ProductId::from_uuid)
                .collect(),
        })
    }
}

/// Create Promotion Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePromotionRequest {
    /// Client-chosen id; generated when absent
    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(flatten)]
    pub promotion: PromotionRequest,
}

/// Status override
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromotionStatusRequest {
    /// `active`, `inactive` or `expired`
    pub status: String,
}
