//! Bazaar
//!
//! Bazaar is the business engine behind a small shop: a product catalog,
//! time-boxed percentage promotions, per-user carts and orders.
//!
//! Everything in this crate is synchronous and free of I/O. Callers load the
//! products and promotions an operation needs, hand them in, and persist what
//! comes back.

pub mod carts;
pub mod fixtures;
pub mod ids;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod users;
pub mod validation;
