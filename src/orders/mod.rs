//! Orders
//!
//! An order is priced once, at creation, and its lines carry a frozen copy of
//! each product. After that only its status moves.

use std::{collections::BTreeMap, fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    ids::TypedUuid,
    money::Percentage,
    products::{ProductId, PurchaseSnapshot},
    promotions::PromotionId,
    users::UserId,
    validation::{self, ValidationError},
};

pub mod checkout;
pub mod number;
pub mod status;

pub use checkout::{
    CheckoutError, OrderDetails, OrderItemRequest, PricedOrder, price_cart, price_items,
};
pub use number::{OrderNumber, OrderNumberError};
pub use status::{InvalidOrderStatus, OrderStatus, StatusEffect, TransitionError};

/// Order identifier
pub type OrderId = TypedUuid<Order>;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cash,

    /// Card payment
    CreditCard,

    /// Bank transfer
    BankTransfer,

    /// Wallet app
    EWallet,
}

/// Where the payment stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet paid
    #[default]
    Pending,

    /// Paid in full
    Paid,

    /// Payment failed
    Failed,

    /// Payment returned
    Refunded,
}

macro_rules! string_enum {
    ($ty:ident, $err:ident, $label:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Database and wire representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #[doc = concat!("Unrecognised ", $label, " value")]
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $err(pub String);

        impl fmt::Display for $err {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "Invalid {}: {}", $label, self.0)
            }
        }

        impl std::error::Error for $err {}

        impl FromStr for $ty {
            type Err = $err;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err($err(other.to_string())),
                }
            }
        }
    };
}

string_enum!(PaymentMethod, InvalidPaymentMethod, "payment method", {
    Cash => "cash",
    CreditCard => "credit_card",
    BankTransfer => "bank_transfer",
    EWallet => "e_wallet",
});

string_enum!(PaymentStatus, InvalidPaymentStatus, "payment status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

/// Delivery address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient
    pub full_name: String,

    /// Contact phone
    pub phone: String,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// District
    pub district: Option<String>,

    /// Ward
    pub ward: Option<String>,

    /// Postal code
    pub zip_code: Option<String>,
}

impl ShippingAddress {
    /// Check the required fields are present.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::text("Full name", &self.full_name, 1, 100)?;
        validation::text("Phone", &self.phone, 1, 30)?;
        validation::text("Address", &self.address, 1, 200)?;
        validation::text("City", &self.city, 1, 100)?;

        Ok(())
    }
}

/// Promotion applied to an order line, frozen at purchase time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPromotion {
    /// Promotion UUID
    pub promotion_id: PromotionId,

    /// Promotion name
    pub name: String,

    /// Discount percentage
    pub discount: Percentage,

    /// Discount across the whole line, not per unit
    pub discount_amount: Decimal,
}

/// One purchased product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product the line was bought from. The product may since have been deleted.
    pub product_id: ProductId,

    /// Product as it was at purchase time
    pub snapshot: PurchaseSnapshot,

    /// Units bought
    pub quantity: u32,

    /// Unit price charged, after discount
    pub price_at_purchase: Decimal,

    /// Promotion applied, if any
    pub applied_promotion: Option<AppliedPromotion>,

    /// `price_at_purchase × quantity`
    pub subtotal: Decimal,
}

/// Order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order UUID
    pub id: OrderId,

    /// Human-readable number, `ORD-YYYYMMDD-NNNN`
    pub order_number: OrderNumber,

    /// Owning user
    pub user_id: UserId,

    /// Purchased lines
    pub lines: Vec<OrderLine>,

    /// Total before discounts
    pub total_amount: Decimal,

    /// Sum of line discounts
    pub total_discount: Decimal,

    /// Amount charged
    pub final_amount: Decimal,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Payment status
    pub payment_status: PaymentStatus,

    /// Customer notes
    pub notes: Option<String>,

    /// Created at
    pub created_at: Timestamp,

    /// Updated at
    pub updated_at: Timestamp,

    /// Set when the order is delivered
    pub delivered_at: Option<Timestamp>,
}

impl Order {
    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Report, per line, whether the referenced product still exists.
    pub fn check_products_existence(
        &self,
        exists: impl Fn(ProductId) -> bool,
    ) -> Vec<ProductExistence> {
        self.lines
            .iter()
            .map(|line| {
                let found = exists(line.product_id);

                ProductExistence {
                    product_id: line.product_id,
                    product_name: line.snapshot.name.clone(),
                    exists: found,
                    message: if found {
                        "Product still exists"
                    } else {
                        "Product has been deleted"
                    },
                }
            })
            .collect()
    }

    /// Units to hand back to stock when the order is cancelled, one entry
    /// per product in ascending id order.
    pub fn restock(&self) -> Vec<(ProductId, u32)> {
        per_product(self.lines.iter().map(|line| (line.product_id, line.quantity)))
    }
}

/// Sum quantities per product, ordered by product id.
///
/// Stock rows are locked in the order returned, so every transaction that
/// touches several products must take them in this order.
pub(crate) fn per_product(
    quantities: impl IntoIterator<Item = (ProductId, u32)>,
) -> Vec<(ProductId, u32)> {
    let mut merged: BTreeMap<ProductId, u32> = BTreeMap::new();

    for (product_id, quantity) in quantities {
        let total = merged.entry(product_id).or_default();
        *total = total.saturating_add(quantity);
    }

    merged.into_iter().collect()
}

/// Whether an order line's product is still in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductExistence {
    /// Referenced product
    pub product_id: ProductId,

    /// Name from the line snapshot
    pub product_name: String,

    /// Whether the product exists
    pub exists: bool,

    /// Human-readable summary
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_product_orders_by_id_whatever_the_line_order() {
        let first = ProductId::new();
        let second = ProductId::new();
        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };

        let forward = per_product([(low, 1), (high, 2)]);
        let backward = per_product([(high, 2), (low, 1), (low, 3)]);

        assert_eq!(forward, vec![(low, 1), (high, 2)]);
        assert_eq!(backward, vec![(low, 4), (high, 2)]);
    }

    #[test]
    fn payment_enums_round_trip_names() {
        assert_eq!("e_wallet".parse::<PaymentMethod>(), Ok(PaymentMethod::EWallet));
        assert_eq!(PaymentMethod::CreditCard.to_string(), "credit_card");
        assert_eq!("refunded".parse::<PaymentStatus>(), Ok(PaymentStatus::Refunded));
        assert_eq!(
            "cheque".parse::<PaymentMethod>(),
            Err(InvalidPaymentMethod("cheque".to_string()))
        );
    }

    #[test]
    fn shipping_address_requires_core_fields() {
        let mut address = ShippingAddress {
            full_name: "Nguyen Van A".to_string(),
            phone: "0901234567".to_string(),
            address: "1 Le Loi".to_string(),
            city: "Ho Chi Minh".to_string(),
            ..ShippingAddress::default()
        };

        assert_eq!(address.validate(), Ok(()));

        address.city = String::new();

        assert_eq!(
            address.validate(),
            Err(ValidationError::Required { field: "City" })
        );
    }
}
