//! Cart Handlers
//!
//! Every cart route acts on the authenticated user's own cart.

pub(crate) mod add;
pub(crate) mod checkout;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod unavailable;
pub(crate) mod update;
pub(crate) mod validate;
