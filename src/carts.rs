//! Carts

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ids::TypedUuid,
    pricing::{QuotedPromotion, resolve_price},
    products::{CartSnapshot, Catalog, ProductId},
    promotions::Promotion,
    users::UserId,
    validation::ValidationError,
};

/// Cart identifier
pub type CartId = TypedUuid<Cart>;

/// How long a cart survives without being touched.
pub const CART_RETENTION: SignedDuration = SignedDuration::from_hours(30 * 24);

/// Errors raised by cart mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The product does not exist.
    #[error("Product not found")]
    ProductNotFound(ProductId),

    /// The cart has no line for the product.
    #[error("Item not found in cart")]
    LineNotFound(ProductId),

    /// Live stock cannot cover the requested quantity.
    #[error("Insufficient stock. Only {available} items available")]
    InsufficientStock {
        /// Product being requested
        product_id: ProductId,
        /// Quantity the line would hold
        requested: u32,
        /// Units on hand
        available: u32,
    },

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One product in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Referenced product
    pub product_id: ProductId,

    /// Product fields captured when the line was added
    pub snapshot: CartSnapshot,

    /// Units, at least one
    pub quantity: u32,

    /// When the line was added
    pub added_at: Timestamp,
}

/// A user's cart. One per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart UUID
    pub id: CartId,

    /// Owning user
    pub user_id: UserId,

    /// Lines in the order they were added
    pub lines: Vec<CartLine>,

    /// Created at
    pub created_at: Timestamp,

    /// Updated at
    pub updated_at: Timestamp,

    /// Retention deadline, pushed back on every mutation
    pub expires_at: Timestamp,
}

fn ensure_quantity(quantity: u32) -> Result<(), CartError> {
    if quantity == 0 {
        return Err(ValidationError::ZeroQuantity.into());
    }

    Ok(())
}

fn expiry(from: Timestamp) -> Timestamp {
    from.checked_add(CART_RETENTION).unwrap_or(Timestamp::MAX)
}

impl Cart {
    /// Empty cart for `user_id`.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: CartId::new(),
            user_id,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
            expires_at: expiry(now),
        }
    }

    /// Whether the retention window has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Line for `product_id`, if present.
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
        self.expires_at = expiry(now);
    }

    /// Add `quantity` units of a product, merging into an existing line.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`]: `quantity` is zero.
    /// - [`CartError::ProductNotFound`]: the product is not in the catalog.
    /// - [`CartError::InsufficientStock`]: stock cannot cover the resulting line quantity.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<(), CartError> {
        ensure_quantity(quantity)?;

        let product = catalog
            .get(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        let existing = self
            .lines
            .iter()
            .position(|line| line.product_id == product_id);

        let requested = existing
            .and_then(|index| self.lines.get(index))
            .map_or(quantity, |line| line.quantity.saturating_add(quantity));

        if !product.has_stock(requested) {
            return Err(CartError::InsufficientStock {
                product_id,
                requested,
                available: product.stock,
            });
        }

        match existing.and_then(|index| self.lines.get_mut(index)) {
            Some(line) => line.quantity = requested,
            None => self.lines.push(CartLine {
                product_id,
                snapshot: product.cart_snapshot(),
                quantity,
                added_at: now,
            }),
        }

        self.touch(now);

        Ok(())
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// The line is left untouched when the update is rejected.
    ///
    /// # Errors
    ///
    /// - [`CartError::Validation`]: `quantity` is zero.
    /// - [`CartError::LineNotFound`]: the cart has no line for the product.
    /// - [`CartError::ProductNotFound`]: the product has been deleted.
    /// - [`CartError::InsufficientStock`]: stock cannot cover `quantity`.
    pub fn update_quantity(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<(), CartError> {
        ensure_quantity(quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
            .ok_or(CartError::LineNotFound(product_id))?;

        let product = catalog
            .get(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;

        if !product.has_stock(quantity) {
            return Err(CartError::InsufficientStock {
                product_id,
                requested: quantity,
                available: product.stock,
            });
        }

        line.quantity = quantity;
        self.touch(now);

        Ok(())
    }

    /// Remove the line for a product. Removing an absent line is not an error.
    ///
    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId, now: Timestamp) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.product_id != product_id);
        self.touch(now);

        self.lines.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self, now: Timestamp) {
        self.lines.clear();
        self.touch(now);
    }

    /// Drop lines whose product is gone or out of stock. Returns how many were dropped.
    pub fn remove_unavailable(&mut self, catalog: &Catalog, now: Timestamp) -> usize {
        let before = self.lines.len();

        self.lines.retain(|line| {
            catalog
                .get(line.product_id)
                .is_some_and(|product| product.stock > 0)
        });
        self.touch(now);

        before - self.lines.len()
    }

    /// Re-check every line against live stock without mutating the cart.
    pub fn validate_stock(&self, catalog: &Catalog) -> StockReport {
        let items: Vec<StockCheck> = self
            .lines
            .iter()
            .map(|line| match catalog.get(line.product_id) {
                None => StockCheck {
                    product_id: line.product_id,
                    product_name: line.snapshot.name.clone(),
                    requested_quantity: line.quantity,
                    available: false,
                    reason: Some(UnavailableReason::ProductMissing),
                    available_stock: 0,
                },
                Some(product) if !product.has_stock(line.quantity) => StockCheck {
                    product_id: line.product_id,
                    product_name: product.name.clone(),
                    requested_quantity: line.quantity,
                    available: false,
                    reason: Some(UnavailableReason::InsufficientStock),
                    available_stock: product.stock,
                },
                Some(product) => StockCheck {
                    product_id: line.product_id,
                    product_name: product.name.clone(),
                    requested_quantity: line.quantity,
                    available: true,
                    reason: None,
                    available_stock: product.stock,
                },
            })
            .collect();

        StockReport {
            all_available: items.iter().all(|item| item.available),
            items,
        }
    }

    /// Price every line against the live catalog and promotions for display.
    pub fn enrich(&self, catalog: &Catalog, promotions: &[Promotion], now: Timestamp) -> CartView {
        let mut view = CartView {
            lines: Vec::with_capacity(self.lines.len()),
            subtotal: Decimal::ZERO,
            total_discount: Decimal::ZERO,
            total: Decimal::ZERO,
            total_items: self.total_items(),
        };

        for line in &self.lines {
            let Some(product) = catalog.get(line.product_id) else {
                view.lines.push(CartLineView {
                    line: line.clone(),
                    current_price: line.snapshot.price,
                    discounted_price: line.snapshot.price,
                    save_amount: Decimal::ZERO,
                    promotion: None,
                    available: false,
                    stock: 0,
                    item_subtotal: Decimal::ZERO,
                    item_discount: Decimal::ZERO,
                });

                continue;
            };

            let quote = resolve_price(product, promotions, now);
            let item_subtotal = quote.line_total(line.quantity);
            let item_discount = quote.line_discount(line.quantity);

            view.subtotal += quote.gross_total(line.quantity);
            view.total_discount += item_discount;
            view.total += item_subtotal;

            view.lines.push(CartLineView {
                line: line.clone(),
                current_price: quote.original_price,
                discounted_price: quote.discounted_price,
                save_amount: quote.save_amount,
                promotion: quote.promotion,
                available: product.has_stock(line.quantity),
                stock: product.stock,
                item_subtotal,
                item_discount,
            });
        }

        view
    }
}

/// Why a cart line cannot be checked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The product was deleted after it was added.
    ProductMissing,

    /// Live stock is below the line quantity.
    InsufficientStock,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductMissing => f.write_str("Product not found or has been deleted"),
            Self::InsufficientStock => f.write_str("Insufficient stock"),
        }
    }
}

/// Stock check for one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockCheck {
    /// Referenced product
    pub product_id: ProductId,

    /// Live name, or the snapshot name when the product is gone
    pub product_name: String,

    /// Line quantity
    pub requested_quantity: u32,

    /// Whether the line can be fulfilled
    pub available: bool,

    /// Why not, when unavailable
    pub reason: Option<UnavailableReason>,

    /// Units on hand, zero when the product is gone
    pub available_stock: u32,
}

/// Result of re-checking a cart against live stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReport {
    /// Whether every line can be fulfilled
    pub all_available: bool,

    /// One check per line, in cart order
    pub items: Vec<StockCheck>,
}

impl StockReport {
    /// Lines that failed the check.
    pub fn unavailable(&self) -> impl Iterator<Item = &StockCheck> {
        self.items.iter().filter(|item| !item.available)
    }
}

/// A cart line priced for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    /// The stored line, snapshot included
    pub line: CartLine,

    /// Live catalog price, or the snapshot price when the product is gone
    pub current_price: Decimal,

    /// Live unit price after promotion
    pub discounted_price: Decimal,

    /// Per-unit saving
    pub save_amount: Decimal,

    /// Promotion applied, if any
    pub promotion: Option<QuotedPromotion>,

    /// Whether live stock covers the line
    pub available: bool,

    /// Units on hand
    pub stock: u32,

    /// Post-discount line total
    pub item_subtotal: Decimal,

    /// Discount across the line
    pub item_discount: Decimal,
}

/// Display-ready cart with running totals. Deleted products are listed but not totalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    /// Priced lines, in cart order
    pub lines: Vec<CartLineView>,

    /// Pre-discount total
    pub subtotal: Decimal,

    /// Total discount
    pub total_discount: Decimal,

    /// Amount payable
    pub total: Decimal,

    /// Sum of quantities
    pub total_items: u64,
}
