//! Carts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use bazaar::{carts::CartError, products::ProductId, validation::ValidationError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("Cart not found")]
    NotFound,

    #[error("Product not found")]
    ProductNotFound(ProductId),

    #[error("Item not found in cart")]
    LineNotFound(ProductId),

    #[error("Insufficient stock. Only {available} items available")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("cart already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::ProductNotFound(product) => Self::ProductNotFound(product),
            CartError::LineNotFound(product) => Self::LineNotFound(product),
            CartError::InsufficientStock {
                product_id,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                requested,
                available,
            },
            CartError::Validation(error) => Self::Validation(error),
        }
    }
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
