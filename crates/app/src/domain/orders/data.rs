//! Orders Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use bazaar::orders::{Order, OrderStatus, ProductExistence, StatusEffect};

use crate::domain::pagination::{Page, PageRequest};

/// Admin order listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,

    /// Created at or after
    pub from: Option<Timestamp>,

    /// Created at or before
    pub to: Option<Timestamp>,

    pub page: PageRequest,
}

/// Aggregates over every order matching an [`OrderFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of final amounts
    pub total_revenue: Decimal,

    pub total_orders: u64,

    pub total_discount: Decimal,
}

/// One page of orders plus totals across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListing {
    pub orders: Page<Order>,
    pub totals: OrderTotals,
}

/// An order alongside whether each line's product still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub order: Order,
    pub products: Vec<ProductExistence>,
}

/// Result of a status change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub order: Order,
    pub effect: StatusEffect,

    /// Lines whose stock was handed back
    pub restocked: usize,
}

/// Order count and spend for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStats {
    pub status: OrderStatus,
    pub count: u64,

    /// Sum of final amounts
    pub total_amount: Decimal,
}

/// Money spent across processing, shipped and delivered orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpentStats {
    pub total: Decimal,
    pub orders: u64,
}

/// A user's order statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub by_status: Vec<StatusStats>,
    pub total_spent: SpentStats,
}

impl UserStats {
    /// Build the summary from per-status rows.
    #[must_use]
    pub fn from_status_rows(by_status: Vec<StatusStats>) -> Self {
        let total_spent = by_status
            .iter()
            .filter(|row| OrderStatus::SPENT.contains(&row.status))
            .fold(SpentStats::default(), |spent, row| SpentStats {
                total: spent.total + row.total_amount,
                orders: spent.orders + row.count,
            });

        Self {
            by_status,
            total_spent,
        }
    }
}
