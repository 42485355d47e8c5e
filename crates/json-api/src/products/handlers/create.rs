//! Create Product Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use bazaar::products::ProductId;

use crate::{
    extensions::*,
    products::{
        errors::into_api_error,
        models::{CreateProductRequest, ProductResponse},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApiResponse<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let id = request.id.map_or_else(ProductId::new, ProductId::from_uuid);

    let product = state
        .app
        .products
        .create_product(id, request.product.into(), Timestamp::now())
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/products/{}", product.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(ApiResponse::message(
        "Product created successfully",
        product.into(),
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;
    use uuid::Uuid;

    use bazaar::validation::ValidationError;
    use bazaar_app::domain::products::ProductsServiceError;

    use crate::test_helpers::{Mocks, admin, make_product, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(admin(), mocks, Router::with_path("products").post(handler))
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let id = ProductId::from_uuid(Uuid::from_u128(7));
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .withf(move |product, draft, _| {
                *product == id
                    && draft.name == "Laptop Dell XPS 15"
                    && draft.price == Decimal::new(129_999, 2)
                    && draft.stock == 50
            })
            .return_once(move |_, _, _| Ok(make_product(id)));

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "id": id.into_uuid(),
                "name": "Laptop Dell XPS 15",
                "price": "1299.99",
                "category": "Electronics",
                "stock": 50,
            }))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/products/{id}").as_str()));
        assert_eq!(body["message"], "Product created successfully");
        assert_eq!(body["data"]["id"], id.to_string());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_validation_error_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .return_once(|_, _, _| {
                Err(ProductsServiceError::Validation(ValidationError::TooShort {
                    field: "Product name",
                    min: 2,
                }))
            });

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "X", "price": "10", "category": "Misc" }))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body["message"],
            "Product name must be at least 2 characters long"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_conflict_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_create_product()
            .once()
            .return_once(|_, _, _| Err(ProductsServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Mouse", "price": "10", "category": "Misc" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
