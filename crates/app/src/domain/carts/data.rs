//! Carts Data

use bazaar::carts::{Cart, CartView};

/// A cart with every line priced against the live catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCart {
    pub cart: Cart,
    pub view: CartView,
}

/// Result of dropping unavailable lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CartCleanup {
    /// Lines dropped
    pub removed: usize,

    pub cart: EnrichedCart,
}
