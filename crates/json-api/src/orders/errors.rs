//! Order Errors

use bazaar_app::domain::orders::OrdersServiceError;

use crate::{carts::models::StockCheckResponse, response::ApiError};

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::NotFound => ApiError::not_found("Order not found"),
        OrdersServiceError::AccessDenied => ApiError::forbidden(),
        OrdersServiceError::ProductNotFound(product) => {
            ApiError::not_found(format!("Product not found: {product}"))
        }
        OrdersServiceError::StockUnavailable(items) => {
            let items: Vec<StockCheckResponse> = items.into_iter().map(Into::into).collect();

            ApiError::bad_request("Some items are not available. Please review your cart.")
                .with_data(&items)
        }
        error @ (OrdersServiceError::EmptyCart
        | OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::InvalidTransition(_)
        | OrdersServiceError::Validation(_)) => ApiError::bad_request(error.to_string()),
        OrdersServiceError::AlreadyExists => ApiError::conflict("Order already exists"),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => ApiError::bad_request("Invalid order payload"),
        error @ OrdersServiceError::Numbering(_) => {
            ApiError::internal("failed to number order", &error)
        }
        OrdersServiceError::Sql(source) => ApiError::internal("order storage failed", &source),
    }
}
