//! Product Errors

use bazaar_app::domain::products::ProductsServiceError;

use crate::response::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError) -> ApiError {
    match error {
        ProductsServiceError::AlreadyExists => ApiError::conflict("Product already exists"),
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData => ApiError::bad_request("Invalid product payload"),
        ProductsServiceError::Validation(error) => ApiError::bad_request(error.to_string()),
        ProductsServiceError::NotFound => ApiError::not_found("Product not found"),
        ProductsServiceError::Sql(source) => ApiError::internal("product storage failed", &source),
    }
}

#[cfg(test)]
mod tests {
    use bazaar::validation::ValidationError;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn validation_messages_reach_the_client() {
        let error = into_api_error(ProductsServiceError::Validation(ValidationError::Negative {
            field: "Price",
        }));

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.message, "Price cannot be negative");
    }

    #[test]
    fn missing_products_are_404() {
        let error = into_api_error(ProductsServiceError::NotFound);

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.message, "Product not found");
    }
}
