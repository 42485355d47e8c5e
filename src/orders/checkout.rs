//! Checkout pricing
//!
//! Turns a cart, or an ad-hoc list of items, into priced order lines. Prices
//! come from the live catalog and promotions at the moment of checkout, never
//! from the cart's snapshots.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    carts::{Cart, StockCheck},
    orders::{
        AppliedPromotion, Order, OrderId, OrderLine, OrderNumber, OrderStatus, PaymentMethod,
        PaymentStatus, ShippingAddress, per_product,
    },
    pricing::resolve_price,
    products::{Catalog, Product, ProductId},
    promotions::Promotion,
    users::UserId,
    validation::ValidationError,
};

/// Errors that stop an order from being priced. None of them leave side effects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart is missing or has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// At least one cart line failed the stock check.
    #[error("Some items are not available. Please review your cart.")]
    StockUnavailable(Vec<StockCheck>),

    /// A requested product does not exist.
    #[error("Product not found")]
    ProductNotFound(ProductId),

    /// A requested product cannot cover the quantity.
    #[error("Insufficient stock for {name}. Only {available} items available")]
    InsufficientStock {
        /// Product requested
        product_id: ProductId,
        /// Product name
        name: String,
        /// Units requested across the order
        requested: u32,
        /// Units on hand
        available: u32,
    },

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One product and quantity in a direct order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    /// Product to buy
    pub product_id: ProductId,

    /// Units, at least one
    pub quantity: u32,
}

/// Customer-supplied order details.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// Payment method
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Customer notes
    pub notes: Option<String>,
}

/// Priced lines and totals, ready to be numbered and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedOrder {
    /// Priced lines
    pub lines: Vec<OrderLine>,

    /// Total before discounts
    pub total_amount: Decimal,

    /// Sum of line discounts
    pub total_discount: Decimal,

    /// Amount to charge, the sum of line subtotals
    pub final_amount: Decimal,
}

impl PricedOrder {
    fn from_lines(lines: Vec<OrderLine>) -> Self {
        let final_amount: Decimal = lines.iter().map(|line| line.subtotal).sum();
        let total_discount: Decimal = lines
            .iter()
            .filter_map(|line| line.applied_promotion.as_ref())
            .map(|promotion| promotion.discount_amount)
            .sum();

        Self {
            lines,
            total_amount: final_amount + total_discount,
            total_discount,
            final_amount,
        }
    }

    /// Stock to take per product, merged across lines and ordered by product id.
    pub fn stock_decrements(&self) -> Vec<(ProductId, u32)> {
        per_product(self.lines.iter().map(|line| (line.product_id, line.quantity)))
    }

    /// Attach identity and customer details to produce a `pending` order.
    pub fn into_order(
        self,
        id: OrderId,
        order_number: OrderNumber,
        user_id: UserId,
        details: OrderDetails,
        now: Timestamp,
    ) -> Order {
        Order {
            id,
            order_number,
            user_id,
            lines: self.lines,
            total_amount: self.total_amount,
            total_discount: self.total_discount,
            final_amount: self.final_amount,
            status: OrderStatus::Pending,
            shipping_address: details.shipping_address,
            payment_method: details.payment_method,
            payment_status: PaymentStatus::Pending,
            notes: details.notes,
            created_at: now,
            updated_at: now,
            delivered_at: None,
        }
    }
}

fn price_line(
    product: &Product,
    quantity: u32,
    promotions: &[Promotion],
    now: Timestamp,
) -> OrderLine {
    let quote = resolve_price(product, promotions, now);

    let applied_promotion = quote.promotion.as_ref().map(|promotion| AppliedPromotion {
        promotion_id: promotion.id,
        name: promotion.name.clone(),
        discount: promotion.discount,
        discount_amount: quote.line_discount(quantity),
    });

    OrderLine {
        product_id: product.id,
        snapshot: product.purchase_snapshot(),
        quantity,
        price_at_purchase: quote.discounted_price,
        applied_promotion,
        subtotal: quote.line_total(quantity),
    }
}

/// Price a cart for checkout.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no lines.
/// - [`CheckoutError::StockUnavailable`]: any line fails the live stock check;
///   carries the failing lines.
pub fn price_cart(
    cart: &Cart,
    catalog: &Catalog,
    promotions: &[Promotion],
    now: Timestamp,
) -> Result<PricedOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let report = cart.validate_stock(catalog);

    if !report.all_available {
        return Err(CheckoutError::StockUnavailable(
            report.unavailable().cloned().collect(),
        ));
    }

    let lines = cart
        .lines
        .iter()
        .filter_map(|line| {
            catalog
                .get(line.product_id)
                .map(|product| price_line(product, line.quantity, promotions, now))
        })
        .collect();

    Ok(PricedOrder::from_lines(lines))
}

/// Price a direct order that bypasses the cart.
///
/// Repeated products are checked against stock with their quantities combined.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: no items were given.
/// - [`CheckoutError::Validation`]: an item has quantity zero.
/// - [`CheckoutError::ProductNotFound`]: an item references an unknown product.
/// - [`CheckoutError::InsufficientStock`]: stock cannot cover a product's total quantity.
pub fn price_items(
    items: &[OrderItemRequest],
    catalog: &Catalog,
    promotions: &[Promotion],
    now: Timestamp,
) -> Result<PricedOrder, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut requested: FxHashMap<ProductId, u32> = FxHashMap::default();
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        if item.quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let product = catalog
            .get(item.product_id)
            .ok_or(CheckoutError::ProductNotFound(item.product_id))?;

        let total = requested.entry(item.product_id).or_default();
        *total = total.saturating_add(item.quantity);

        if !product.has_stock(*total) {
            return Err(CheckoutError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                requested: *total,
                available: product.stock,
            });
        }

        lines.push(price_line(product, item.quantity, promotions, now));
    }

    Ok(PricedOrder::from_lines(lines))
}
