//! Cart Errors

use bazaar_app::domain::carts::CartsServiceError;

use crate::response::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::NotFound => ApiError::not_found("Cart not found"),
        error @ (CartsServiceError::ProductNotFound(_) | CartsServiceError::LineNotFound(_)) => {
            ApiError::not_found(error.to_string())
        }
        error @ (CartsServiceError::InsufficientStock { .. } | CartsServiceError::EmptyCart) => {
            ApiError::bad_request(error.to_string())
        }
        CartsServiceError::Validation(error) => ApiError::bad_request(error.to_string()),
        CartsServiceError::AlreadyExists => ApiError::conflict("Cart already exists"),
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => ApiError::bad_request("Invalid cart payload"),
        CartsServiceError::Sql(source) => ApiError::internal("cart storage failed", &source),
    }
}
