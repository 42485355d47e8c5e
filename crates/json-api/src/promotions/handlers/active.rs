//! Active Promotions Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    promotions::{errors::into_api_error, models::PromotionResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

/// Active Promotions Handler
///
/// Promotions whose window contains `at` (default: now), regardless of the
/// stored status.
#[endpoint(tags("promotions"), summary = "List Active Promotions")]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<PromotionResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let promotions = state
        .app
        .promotions
        .list_active_promotions(point_in_time)
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(
        promotions
            .into_iter()
            .map(|view| PromotionResponse::view(view, point_in_time))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use bazaar::promotions::{PromotionId, PromotionStatus};

    use crate::test_helpers::{Mocks, anonymous_service, make_promotion_view};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(
            mocks,
            Router::with_path("promotions/active/list").get(handler),
        )
    }

    #[tokio::test]
    async fn test_active_uses_live_status() -> TestResult {
        let at: Timestamp = "2026-06-15T00:00:00Z".parse()?;
        let id = PromotionId::new();
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_list_active_promotions()
            .once()
            .withf(move |now| *now == at)
            .return_once(move |now| {
                let mut view = make_promotion_view(id, now);
                view.promotion.status = PromotionStatus::Inactive;

                Ok(vec![view])
            });

        let mut res = TestClient::get(
            "http://example.com/promotions/active/list?at=2026-06-15T00:00:00Z",
        )
        .send(&make_service(mocks))
        .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"][0]["status"], "inactive");
        assert_eq!(body["data"][0]["liveStatus"], "active");
        assert!(body.get("pagination").is_none(), "active list is not paginated");

        Ok(())
    }

    #[tokio::test]
    async fn test_active_rejects_bad_timestamps() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.promotions.expect_list_active_promotions().never();

        let res = TestClient::get("http://example.com/promotions/active/list?at=soon")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
