//! Test Helpers

use jiff::Timestamp;
use rust_decimal::Decimal;

use bazaar::{
    orders::{OrderDetails, ShippingAddress},
    products::{Product, ProductDraft, ProductId},
    users::UserId,
};

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, data::EnrichedCart},
        products::{ProductsService, ProductsServiceError},
    },
    test::TestContext,
};

/// Fixed clock for service tests. Whole seconds survive the round trip
/// through `TIMESTAMPTZ` unchanged.
pub(crate) fn now() -> Timestamp {
    "2026-03-01T10:00:00Z"
        .parse()
        .expect("fixed test timestamp should parse")
}

pub(crate) fn draft(name: &str, price: Decimal, stock: u32) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        price,
        category: "Electronics".to_string(),
        description: None,
        stock,
        brand: None,
        image_url: None,
        specifications: Default::default(),
        rating: Decimal::ZERO,
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    id: ProductId,
    name: &str,
    price: Decimal,
    stock: u32,
) -> Result<Product, ProductsServiceError> {
    ctx.products
        .create_product(id, draft(name, price, stock), now())
        .await
}

pub(crate) async fn stock_of(ctx: &TestContext, product: ProductId) -> u32 {
    ctx.products
        .get_product(product, now())
        .await
        .expect("product should exist")
        .product
        .stock
}

pub(crate) async fn add_item(
    ctx: &TestContext,
    user: UserId,
    product: ProductId,
    quantity: u32,
) -> Result<EnrichedCart, CartsServiceError> {
    ctx.carts.add_item(user, product, quantity, now()).await
}

pub(crate) async fn order_count(ctx: &TestContext) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM orders")
        .fetch_one(ctx.db.pool())
        .await
        .expect("orders should be countable")
}

pub(crate) fn order_details() -> OrderDetails {
    OrderDetails {
        shipping_address: ShippingAddress {
            full_name: "Nguyen Van A".to_string(),
            phone: "0901234567".to_string(),
            address: "12 Le Loi".to_string(),
            city: "Ho Chi Minh".to_string(),
            district: Some("District 1".to_string()),
            ward: None,
            zip_code: None,
        },
        notes: Some("Leave at the door".to_string()),
        ..OrderDetails::default()
    }
}
