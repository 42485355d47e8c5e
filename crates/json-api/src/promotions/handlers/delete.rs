//! Delete Promotion Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::errors::into_api_error,
    response::{ApiError, ApiResponse, Empty},
    state::State,
};

/// Delete Promotion Handler
///
/// Orders keep the promotion details they were priced with.
#[endpoint(tags("promotions"), summary = "Delete Promotion", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .promotions
        .delete_promotion(id.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message("Promotion deleted successfully", Empty {}))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use bazaar::promotions::PromotionId;
    use bazaar_app::domain::promotions::PromotionsServiceError;

    use crate::test_helpers::{Mocks, admin, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(admin(), mocks, Router::with_path("promotions/{id}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_promotion_success() -> TestResult {
        let id = PromotionId::new();
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_delete_promotion()
            .once()
            .withf(move |promotion| *promotion == id)
            .return_once(|_| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/promotions/{id}"))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(
            body,
            json!({ "success": true, "message": "Promotion deleted successfully", "data": {} })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_promotion_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_delete_promotion()
            .once()
            .return_once(|_| Err(PromotionsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/promotions/{}", Uuid::nil()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
