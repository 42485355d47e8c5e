//! Order status state machine
//!
//! ```text
//! pending -> confirmed -> processing -> shipped -> delivered
//!    \___________\____________\___________\______-> cancelled
//! ```
//!
//! Forward moves may skip steps. Any non-terminal status may be cancelled.
//! `delivered` and `cancelled` are terminal.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    orders::{Order, PaymentStatus},
    users::{User, UserId},
};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    #[default]
    Pending,

    /// Accepted by the shop
    Confirmed,

    /// Being prepared
    Processing,

    /// Handed to the carrier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Called off
    Cancelled,
}

/// Unrecognised order status value
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid status: {0}")]
pub struct InvalidOrderStatus(pub String);

/// A status change the state machine does not allow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Cannot change order status from {from} to {to}")]
pub struct TransitionError {
    /// Current status
    pub from: OrderStatus,

    /// Requested status
    pub to: OrderStatus,
}

/// Work the caller must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    /// Status field only
    StatusOnly,

    /// Return every line's quantity to stock, skipping deleted products
    RestoreStock,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Statuses counted as money spent.
    pub const SPENT: [Self; 3] = [Self::Processing, Self::Shipped, Self::Delivered];

    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Position on the forward path. `None` for `cancelled`.
    const fn step(self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Processing => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled => None,
        }
    }

    /// Whether no further transitions are allowed.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether `self -> next` is a legal move.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }

        match (self.step(), next.step()) {
            (_, None) => true,
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidOrderStatus(s.to_string()))
    }
}

/// Whether `actor` may move an order owned by `owner` to `next`.
///
/// Owners may cancel their own orders. Every other move is an admin action.
pub fn may_request(actor: &User, owner: UserId, next: OrderStatus) -> bool {
    match next {
        OrderStatus::Cancelled => actor.can_access(owner),
        _ => actor.is_admin(),
    }
}

impl Order {
    /// Move the order to `next`, stamping delivery details where needed.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the move is not allowed; the order is
    /// left unchanged.
    pub fn transition(
        &mut self,
        next: OrderStatus,
        now: Timestamp,
    ) -> Result<StatusEffect, TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = now;

        Ok(match next {
            OrderStatus::Delivered => {
                self.delivered_at = Some(now);
                self.payment_status = PaymentStatus::Paid;

                StatusEffect::StatusOnly
            }
            OrderStatus::Cancelled => StatusEffect::RestoreStock,
            _ => StatusEffect::StatusOnly,
        })
    }
}
