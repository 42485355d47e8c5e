//! Cart request and response bodies

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar::carts::{Cart, CartLine, CartLineView, StockCheck, StockReport};
use bazaar_app::domain::carts::data::{CartCleanup, EnrichedCart};

use crate::products::models::QuotedPromotionResponse;

/// One cart line, priced against the live catalog
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    pub product_id: Uuid,

    /// Name captured when the line was added
    pub name: String,

    /// Price captured when the line was added
    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub quantity: u32,
    pub added_at: String,

    #[salvo(schema(value_type = String))]
    pub current_price: Decimal,

    #[salvo(schema(value_type = String))]
    pub discounted_price: Decimal,

    #[salvo(schema(value_type = String))]
    pub save_amount: Decimal,

    pub promotion: Option<QuotedPromotionResponse>,

    /// Whether live stock covers the quantity
    pub available: bool,

    pub stock: u32,

    #[salvo(schema(value_type = String))]
    pub item_subtotal: Decimal,

    #[salvo(schema(value_type = String))]
    pub item_discount: Decimal,
}

impl CartLineResponse {
    fn snapshot(line: CartLine) -> Self {
        Self {
            product_id: line.product_id.into_uuid(),
            current_price: line.snapshot.price,
            discounted_price: line.snapshot.price,
            save_amount: Decimal::ZERO,
            promotion: None,
            available: true,
            stock: 0,
            item_subtotal: line.snapshot.price * Decimal::from(line.quantity),
            item_discount: Decimal::ZERO,
            name: line.snapshot.name,
            price: line.snapshot.price,
            image_url: line.snapshot.image_url,
            category: line.snapshot.category,
            brand: line.snapshot.brand,
            quantity: line.quantity,
            added_at: line.added_at.to_string(),
        }
    }
}

impl From<CartLineView> for CartLineResponse {
    fn from(view: CartLineView) -> Self {
        Self {
            current_price: view.current_price,
            discounted_price: view.discounted_price,
            save_amount: view.save_amount,
            promotion: view.promotion.map(Into::into),
            available: view.available,
            stock: view.stock,
            item_subtotal: view.item_subtotal,
            item_discount: view.item_discount,
            ..Self::snapshot(view.line)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartLineResponse>,

    /// Sum of undiscounted line totals
    #[salvo(schema(value_type = String))]
    pub subtotal: Decimal,

    #[salvo(schema(value_type = String))]
    pub total_discount: Decimal,

    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    pub total_items: u64,
    pub created_at: String,
    pub updated_at: String,
    pub expires_at: String,
}

impl From<EnrichedCart> for CartResponse {
    fn from(enriched: EnrichedCart) -> Self {
        let EnrichedCart { cart, view } = enriched;

        Self {
            id: cart.id.into_uuid(),
            user_id: cart.user_id.into_uuid(),
            items: view.lines.into_iter().map(Into::into).collect(),
            subtotal: view.subtotal,
            total_discount: view.total_discount,
            total: view.total,
            total_items: view.total_items,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
            expires_at: cart.expires_at.to_string(),
        }
    }
}

/// A cart that was not priced; lines show the price captured when added.
impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let items: Vec<CartLineResponse> =
            cart.lines.into_iter().map(CartLineResponse::snapshot).collect();
        let subtotal = items.iter().map(|item| item.item_subtotal).sum();

        Self {
            id: cart.id.into_uuid(),
            user_id: cart.user_id.into_uuid(),
            total_items: items.iter().map(|item| u64::from(item.quantity)).sum(),
            items,
            subtotal,
            total_discount: Decimal::ZERO,
            total: subtotal,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
            expires_at: cart.expires_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockCheckResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub requested_quantity: u32,
    pub available: bool,

    /// Why the line cannot be checked out
    pub reason: Option<String>,

    pub available_stock: u32,
}

impl From<StockCheck> for StockCheckResponse {
    fn from(check: StockCheck) -> Self {
        Self {
            product_id: check.product_id.into_uuid(),
            product_name: check.product_name,
            requested_quantity: check.requested_quantity,
            available: check.available,
            reason: check.reason.map(|reason| reason.to_string()),
            available_stock: check.available_stock,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockReportResponse {
    pub all_available: bool,
    pub items: Vec<StockCheckResponse>,
}

impl From<StockReport> for StockReportResponse {
    fn from(report: StockReport) -> Self {
        Self {
            all_available: report.all_available,
            items: report.items.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartCleanupResponse {
    /// Lines dropped
    pub removed_count: usize,

    pub cart: CartResponse,
}

impl From<CartCleanup> for CartCleanupResponse {
    fn from(cleanup: CartCleanup) -> Self {
        Self {
            removed_count: cleanup.removed,
            cart: cleanup.cart.into(),
        }
    }
}

fn one() -> u32 {
    1
}

/// Add Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemRequest {
    pub product_id: Uuid,

    /// Units to add, defaults to 1
    #[serde(default = "one")]
    pub quantity: u32,
}

/// Update Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateItemRequest {
    pub product_id: Uuid,

    /// New quantity, at least 1
    pub quantity: u32,
}
