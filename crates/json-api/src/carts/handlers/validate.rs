//! Validate Cart Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::StockReportResponse},
    extensions::*,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Validate Cart Handler
///
/// Checks every line against live stock. Fails with the full report when any
/// line cannot be checked out.
#[endpoint(tags("cart"), summary = "Validate Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<ApiResponse<StockReportResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let report: StockReportResponse = state
        .app
        .carts
        .validate_cart(user.id, Timestamp::now())
        .await
        .map_err(into_api_error)?
        .into();

    if !report.all_available {
        return Err(ApiError::bad_request("Some items are not available").with_data(&report));
    }

    Ok(ApiResponse::message("All items are available", report))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use bazaar::{
        carts::{StockCheck, StockReport, UnavailableReason},
        products::ProductId,
    };
    use bazaar_app::domain::carts::CartsServiceError;

    use crate::test_helpers::{Mocks, customer, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(customer(), mocks, Router::with_path("cart/validate").get(handler))
    }

    fn check(available: bool) -> StockCheck {
        StockCheck {
            product_id: ProductId::new(),
            product_name: "Mouse".to_string(),
            requested_quantity: 2,
            available,
            reason: (!available).then_some(UnavailableReason::ProductMissing),
            available_stock: if available { 10 } else { 0 },
        }
    }

    #[tokio::test]
    async fn test_validate_available_cart() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.carts.expect_validate_cart().once().return_once(|_, _| {
            Ok(StockReport {
                all_available: true,
                items: vec![check(true)],
            })
        });

        let mut res = TestClient::get("http://example.com/cart/validate")
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["message"], "All items are available");
        assert_eq!(body["data"]["allAvailable"], true);

        Ok(())
    }

    #[tokio::test]
    async fn test_validate_reports_unavailable_lines() -> TestResult {
        let mut mocks = Mocks::default();

        mocks.carts.expect_validate_cart().once().return_once(|_, _| {
            Ok(StockReport {
                all_available: false,
                items: vec![check(true), check(false)],
            })
        });

        let mut res = TestClient::get("http://example.com/cart/validate")
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["success"], false);
        assert_eq!(body["data"]["items"][1]["available"], false);
        assert_eq!(
            body["data"]["items"][1]["reason"],
            "Product not found or has been deleted"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_validate_empty_cart_returns_400() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_validate_cart()
            .once()
            .return_once(|_, _| Err(CartsServiceError::EmptyCart));

        let mut res = TestClient::get("http://example.com/cart/validate")
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["message"], "Cart is empty");

        Ok(())
    }
}
