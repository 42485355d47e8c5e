//! Promotion Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::QueryParam, prelude::*};

use bazaar::promotions::PromotionStatus;
use bazaar_app::domain::{
    pagination::PageRequest,
    promotions::data::{PromotionFilter, PromotionSort},
};

use crate::{
    extensions::*,
    promotions::{errors::into_api_error, models::PromotionResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

fn parse_sort(value: Option<&str>) -> Result<PromotionSort, ApiError> {
    Ok(match value {
        None | Some("createdAt" | "created_at") => PromotionSort::CreatedAt,
        Some("name") => PromotionSort::Name,
        Some("discount" | "discountPercentage") => PromotionSort::Discount,
        Some("startDate" | "startsAt" | "starts_at") => PromotionSort::StartsAt,
        Some("endDate" | "endsAt" | "ends_at") => PromotionSort::EndsAt,
        Some("status") => PromotionSort::Status,
        Some(other) => return Err(ApiError::bad_request(format!("Invalid sort field: {other}"))),
    })
}

/// Promotion Index Handler
///
/// Filters on the stored status, which may lag the clock until the next sweep.
#[endpoint(tags("promotions"), summary = "List Promotions")]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    search: QueryParam<String, false>,
    sort_by: QueryParam<String, false>,
    order: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<PromotionResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = status
        .into_inner()
        .filter(|value| !value.is_empty())
        .map(|value| value.parse::<PromotionStatus>())
        .transpose()
        .or_400("Invalid status value")?;

    let filter = PromotionFilter {
        status,
        search: search.into_inner().filter(|value| !value.trim().is_empty()),
        sort: parse_sort(sort_by.into_inner().as_deref())?,
        order: order.into_sort_order()?,
        page: PageRequest::new(page.into_inner(), limit.into_inner()),
    };

    let promotions = state
        .app
        .promotions
        .list_promotions(filter)
        .await
        .map_err(into_api_error)?;

    let now = Timestamp::now();

    Ok(ApiResponse::page(promotions, |view| {
        PromotionResponse::view(view, now)
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use bazaar::promotions::PromotionId;
    use bazaar_app::domain::{pagination::Page, products::data::SortOrder};

    use crate::test_helpers::{Mocks, anonymous_service, make_promotion_view};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("promotions").get(handler))
    }

    #[tokio::test]
    async fn test_index_filters_on_status_and_search() -> TestResult {
        let id = PromotionId::new();
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_list_promotions()
            .once()
            .withf(|filter| {
                filter.status == Some(PromotionStatus::Active)
                    && filter.search.as_deref() == Some("summer")
                    && filter.sort == PromotionSort::CreatedAt
                    && filter.order == SortOrder::Desc
                    && filter.page == PageRequest::new(Some(1), Some(20))
            })
            .return_once(move |filter| {
                Ok(Page::new(
                    vec![make_promotion_view(id, Timestamp::now())],
                    1,
                    filter.page,
                ))
            });

        let mut res =
            TestClient::get("http://example.com/promotions?status=active&search=summer&limit=20")
                .send(&make_service(mocks))
                .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"][0]["id"], id.to_string());
        assert_eq!(body["data"][0]["discount"], "25");
        assert_eq!(body["pagination"]["total"], 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_sorts_and_lists_product_details() -> TestResult {
        let id = PromotionId::new();
        let mut mocks = Mocks::default();

        mocks
            .promotions
            .expect_list_promotions()
            .once()
            .withf(|filter| {
                filter.sort == PromotionSort::Discount && filter.order == SortOrder::Asc
            })
            .return_once(move |filter| {
                Ok(Page::new(
                    vec![make_promotion_view(id, Timestamp::now())],
                    1,
                    filter.page,
                ))
            });

        let mut res =
            TestClient::get("http://example.com/promotions?sort_by=discount&order=asc")
                .send(&make_service(mocks))
                .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"][0]["products"][0]["name"], "Laptop Dell XPS 15");
        assert_eq!(body["data"][0]["products"][0]["price"], "1299.99");
        assert_eq!(
            body["data"][0]["applicableProducts"][0],
            body["data"][0]["products"][0]["id"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_unknown_sort_fields() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.promotions.expect_list_promotions().never();

        let mut res = TestClient::get("http://example.com/promotions?sort_by=colour")
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["message"], "Invalid sort field: colour");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_unknown_status() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.promotions.expect_list_promotions().never();

        let mut res = TestClient::get("http://example.com/promotions?status=paused")
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["message"], "Invalid status value");

        Ok(())
    }
}
