//! Order request and response bodies

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar::{
    orders::{
        AppliedPromotion, Order, OrderDetails, OrderItemRequest, OrderLine, PaymentMethod,
        ProductExistence, ShippingAddress,
    },
    products::{ProductId, PurchaseSnapshot},
};
use bazaar_app::domain::orders::data::{OrderTotals, StatusStats, UserStats};

use crate::{extensions::*, response::ApiError};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingAddressBody {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,

    #[serde(default)]
    pub district: Option<String>,

    #[serde(default)]
    pub ward: Option<String>,

    #[serde(default)]
    pub zip_code: Option<String>,
}

impl From<ShippingAddressBody> for ShippingAddress {
    fn from(body: ShippingAddressBody) -> Self {
        Self {
            full_name: body.full_name,
            phone: body.phone,
            address: body.address,
            city: body.city,
            district: body.district,
            ward: body.ward,
            zip_code: body.zip_code,
        }
    }
}

impl From<ShippingAddress> for ShippingAddressBody {
    fn from(address: ShippingAddress) -> Self {
        Self {
            full_name: address.full_name,
            phone: address.phone,
            address: address.address,
            city: address.city,
            district: address.district,
            ward: address.ward,
            zip_code: address.zip_code,
        }
    }
}

/// Delivery and payment details, shared by checkout and direct orders
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderDetailsRequest {
    pub shipping_address: ShippingAddressBody,

    /// `cash`, `credit_card`, `bank_transfer` or `e_wallet`; defaults to `cash`
    #[serde(default)]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<OrderDetailsRequest> for OrderDetails {
    type Error = ApiError;

    fn try_from(request: OrderDetailsRequest) -> Result<Self, Self::Error> {
        let payment_method = request
            .payment_method
            .map(|method| method.parse::<PaymentMethod>())
            .transpose()
            .or_400("Invalid payment method")?
            .unwrap_or_default();

        Ok(OrderDetails {
            shipping_address: request.shipping_address.into(),
            payment_method,
            notes: request.notes,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemBody {
    pub product_id: Uuid,
    pub quantity: u32,
}

impl From<OrderItemBody> for OrderItemRequest {
    fn from(body: OrderItemBody) -> Self {
        Self {
            product_id: ProductId::from_uuid(body.product_id),
            quantity: body.quantity,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub items: Vec<OrderItemBody>,

    #[serde(flatten)]
    pub details: OrderDetailsRequest,
}

/// Status change
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderStatusRequest {
    /// `pending`, `confirmed`, `processing`, `shipped`, `delivered` or `cancelled`
    pub status: String,
}

/// Product as it was when the order was placed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PurchaseSnapshotResponse {
    pub name: String,

    #[salvo(schema(value_type = String))]
    pub price: Decimal,

    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub specifications: BTreeMap<String, String>,
}

impl From<PurchaseSnapshot> for PurchaseSnapshotResponse {
    fn from(snapshot: PurchaseSnapshot) -> Self {
        Self {
            name: snapshot.name,
            price: snapshot.price,
            category: snapshot.category,
            description: snapshot.description,
            image_url: snapshot.image_url,
            brand: snapshot.brand,
            specifications: snapshot.specifications,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppliedPromotionResponse {
    pub promotion_id: Uuid,
    pub name: String,

    #[salvo(schema(value_type = String))]
    pub discount: Decimal,

    /// Discount across the whole line
    #[salvo(schema(value_type = String))]
    pub discount_amount: Decimal,
}

impl From<AppliedPromotion> for AppliedPromotionResponse {
    fn from(applied: AppliedPromotion) -> Self {
        Self {
            promotion_id: applied.promotion_id.into_uuid(),
            name: applied.name,
            discount: applied.discount.value(),
            discount_amount: applied.discount_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineResponse {
    pub product_id: Uuid,
    pub product_snapshot: PurchaseSnapshotResponse,
    pub quantity: u32,

    /// Unit price after the promotion
    #[salvo(schema(value_type = String))]
    pub price_at_purchase: Decimal,

    pub applied_promotion: Option<AppliedPromotionResponse>,

    #[salvo(schema(value_type = String))]
    pub subtotal: Decimal,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            product_id: line.product_id.into_uuid(),
            product_snapshot: line.snapshot.into(),
            quantity: line.quantity,
            price_at_purchase: line.price_at_purchase,
            applied_promotion: line.applied_promotion.map(Into::into),
            subtotal: line.subtotal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,

    /// `ORD-YYYYMMDD-NNNN`
    pub order_number: String,

    pub user_id: Uuid,
    pub items: Vec<OrderLineResponse>,

    /// Undiscounted total
    #[salvo(schema(value_type = String))]
    pub total_amount: Decimal,

    #[salvo(schema(value_type = String))]
    pub total_discount: Decimal,

    /// Amount charged
    #[salvo(schema(value_type = String))]
    pub final_amount: Decimal,

    pub total_items: u64,
    pub status: String,
    pub shipping_address: ShippingAddressBody,
    pub payment_method: String,
    pub payment_status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub delivered_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            total_items: order.total_items(),
            id: order.id.into_uuid(),
            order_number: order.order_number.to_string(),
            user_id: order.user_id.into_uuid(),
            items: order.lines.into_iter().map(Into::into).collect(),
            total_amount: order.total_amount,
            total_discount: order.total_discount,
            final_amount: order.final_amount,
            status: order.status.as_str().to_string(),
            shipping_address: order.shipping_address.into(),
            payment_method: order.payment_method.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            notes: order.notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            delivered_at: order.delivered_at.map(|at| at.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductExistenceResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub exists: bool,
    pub message: String,
}

impl From<ProductExistence> for ProductExistenceResponse {
    fn from(existence: ProductExistence) -> Self {
        Self {
            product_id: existence.product_id.into_uuid(),
            product_name: existence.product_name,
            exists: existence.exists,
            message: existence.message.to_string(),
        }
    }
}

/// An order plus whether each line's product is still in the catalog
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderDetailResponse {
    pub order: OrderResponse,
    pub product_existence: Vec<ProductExistenceResponse>,
}

/// Totals across every order matching the filter
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderTotalsResponse {
    #[salvo(schema(value_type = String))]
    pub total_revenue: Decimal,

    pub total_orders: u64,

    #[salvo(schema(value_type = String))]
    pub total_discount: Decimal,
}

impl From<OrderTotals> for OrderTotalsResponse {
    fn from(totals: OrderTotals) -> Self {
        Self {
            total_revenue: totals.total_revenue,
            total_orders: totals.total_orders,
            total_discount: totals.total_discount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderListingResponse {
    pub orders: Vec<OrderResponse>,
    pub stats: OrderTotalsResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusStatsResponse {
    pub status: String,
    pub count: u64,

    #[salvo(schema(value_type = String))]
    pub total_amount: Decimal,
}

impl From<StatusStats> for StatusStatsResponse {
    fn from(stats: StatusStats) -> Self {
        Self {
            status: stats.status.as_str().to_string(),
            count: stats.count,
            total_amount: stats.total_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpentResponse {
    #[salvo(schema(value_type = String))]
    pub total: Decimal,

    pub orders: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserStatsResponse {
    pub by_status: Vec<StatusStatsResponse>,

    /// Processing, shipped and delivered orders
    pub total_spent: SpentResponse,
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        Self {
            by_status: stats.by_status.into_iter().map(Into::into).collect(),
            total_spent: SpentResponse {
                total: stats.total_spent.total,
                orders: stats.total_spent.orders,
            },
        }
    }
}
