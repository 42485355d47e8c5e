//! Get Promotion Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::{errors::into_api_error, models::PromotionResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

/// Get Promotion Handler
#[endpoint(tags("promotions"), summary = "Get Promotion")]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<PromotionResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let view = state
        .app
        .promotions
        .get_promotion(id.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(PromotionResponse::view(
        view,
        Timestamp::now(),
    )))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use bazaar::promotions::PromotionId;
    use bazaar_app::domain::promotions::PromotionsServiceError;

    use crate::test_helpers::{Mocks, anonymous_service, make_promotion_view};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("promotions/{id}").get(handler))
    }

    #[tokio::test]
    async fn test_get_promotion_success() -> TestResult {
        let id = PromotionId::new();
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_get_promotion()
            .once()
            .withf(move |promotion| *promotion == id)
            .return_once(move |_| Ok(make_promotion_view(id, Timestamp::now())));

        let mut res = TestClient::get(format!("http://example.com/promotions/{id}"))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["name"], "Summer Sale");
        assert_eq!(body["data"]["status"], "active");
        assert_eq!(body["data"]["liveStatus"], "active");
        assert_eq!(body["data"]["products"][0]["price"], "1299.99");
        assert_eq!(body["data"]["products"][0]["category"], "Electronics");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_promotion_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_get_promotion()
            .once()
            .return_once(|_| Err(PromotionsServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/promotions/{}", Uuid::nil()))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body["message"], "Promotion not found");

        Ok(())
    }
}
