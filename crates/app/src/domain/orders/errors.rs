//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use bazaar::{
    carts::StockCheck,
    orders::{CheckoutError, OrderNumberError, TransitionError},
    products::ProductId,
    validation::ValidationError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("Order not found")]
    NotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Some items are not available. Please review your cart.")]
    StockUnavailable(Vec<StockCheck>),

    #[error("Product not found")]
    ProductNotFound(ProductId),

    #[error("Insufficient stock for {name}. Only {available} items available")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("order numbering failed")]
    Numbering(#[from] OrderNumberError),

    #[error("order already exists")]
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

impl From<CheckoutError> for OrdersServiceError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::EmptyCart => Self::EmptyCart,
            CheckoutError::StockUnavailable(items) => Self::StockUnavailable(items),
            CheckoutError::ProductNotFound(product) => Self::ProductNotFound(product),
            CheckoutError::InsufficientStock {
                product_id,
                name,
                requested,
                available,
            } => Self::InsufficientStock {
                product_id,
                name,
                requested,
                available,
            },
            CheckoutError::Validation(error) => Self::Validation(error),
        }
    }
}

impl From<Error> for OrdersServiceError {
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
