//! Promotion Errors

use bazaar_app::domain::promotions::PromotionsServiceError;

use crate::response::ApiError;

pub(crate) fn into_api_error(error: PromotionsServiceError) -> ApiError {
    match error {
        PromotionsServiceError::AlreadyExists => ApiError::conflict("Promotion already exists"),
        PromotionsServiceError::InvalidReference => {
            ApiError::bad_request("One or more applicable products do not exist")
        }
        PromotionsServiceError::MissingRequiredData | PromotionsServiceError::InvalidData => {
            ApiError::bad_request("Invalid promotion payload")
        }
        PromotionsServiceError::Validation(error) => ApiError::bad_request(error.to_string()),
        PromotionsServiceError::NotFound => ApiError::not_found("Promotion not found"),
        PromotionsServiceError::Sql(source) => {
            ApiError::internal("promotion storage failed", &source)
        }
    }
}
