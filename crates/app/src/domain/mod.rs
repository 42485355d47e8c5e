//! Bazaar Domain Concerns

pub mod carts;
pub mod orders;
pub mod pagination;
pub mod products;
pub mod promotions;
