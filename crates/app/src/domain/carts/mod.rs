//! Carts

pub mod data;
pub mod errors;
pub(crate) mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
