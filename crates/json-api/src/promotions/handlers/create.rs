//! Create Promotion Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use bazaar::promotions::{PromotionDraft, PromotionId};

use crate::{
    extensions::*,
    promotions::{
        errors::into_api_error,
        models::{CreatePromotionRequest, PromotionResponse},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Create Promotion Handler
///
/// The stored status is resolved from the window at creation time.
#[endpoint(
    tags("promotions"),
    summary = "Create Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Promotion created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePromotionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApiResponse<PromotionResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let id = request.id.map_or_else(PromotionId::new, PromotionId::from_uuid);
    let draft = PromotionDraft::try_from(request.promotion)?;
    let now = Timestamp::now();

    let promotion = state
        .app
        .promotions
        .create_promotion(id, draft, now)
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/promotions/{}", promotion.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(ApiResponse::message(
        "Promotion created successfully",
        PromotionResponse::at(promotion, now),
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;
    use uuid::Uuid;

    use bazaar::{products::ProductId, validation::ValidationError};
    use bazaar_app::domain::promotions::PromotionsServiceError;

    use crate::test_helpers::{Mocks, admin, make_promotion, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(admin(), mocks, Router::with_path("promotions").post(handler))
    }

    #[tokio::test]
    async fn test_create_promotion_success() -> TestResult {
        let id = PromotionId::from_uuid(Uuid::from_u128(9));
        let product = ProductId::from_uuid(Uuid::from_u128(3));
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_create_promotion()
            .once()
            .withf(move |promotion, draft, _| {
                *promotion == id
                    && draft.name == "Summer Sale"
                    && draft.discount.value() == Decimal::from(25)
                    && draft.applicable_products.as_slice() == [product]
            })
            .return_once(move |_, _, now| Ok(make_promotion(id, now)));

        let mut res = TestClient::post("http://example.com/promotions")
            .json(&json!({
                "id": id.into_uuid(),
                "name": "Summer Sale",
                "discount": "25",
                "startDate": "2026-06-01T00:00:00Z",
                "endDate": "2026-06-30T23:59:59Z",
                "applicableProducts": [product.into_uuid()],
            }))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/promotions/{id}").as_str()));
        assert_eq!(body["message"], "Promotion created successfully");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_promotion_rejects_large_discounts() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.promotions.expect_create_promotion().never();

        let mut res = TestClient::post("http://example.com/promotions")
            .json(&json!({
                "name": "Too Good",
                "discount": "150",
                "startDate": "2026-06-01T00:00:00Z",
                "endDate": "2026-06-30T23:59:59Z",
            }))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["message"], "Discount must be between 0 and 100");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_promotion_inverted_window_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_create_promotion()
            .once()
            .return_once(|_, _, _| {
                Err(PromotionsServiceError::Validation(
                    ValidationError::EndBeforeStart,
                ))
            });

        let mut res = TestClient::post("http://example.com/promotions")
            .json(&json!({
                "name": "Backwards",
                "discount": "10",
                "startDate": "2026-06-30T00:00:00Z",
                "endDate": "2026-06-01T00:00:00Z",
            }))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["message"], "End date must be after start date");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_promotion_unknown_product_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_create_promotion()
            .once()
            .return_once(|_, _, _| Err(PromotionsServiceError::InvalidReference));

        let res = TestClient::post("http://example.com/promotions")
            .json(&json!({
                "name": "Ghost Sale",
                "discount": "10",
                "startDate": "2026-06-01T00:00:00Z",
                "endDate": "2026-06-30T00:00:00Z",
                "applicableProducts": [Uuid::nil()],
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
