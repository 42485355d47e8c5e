//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::errors::into_api_error,
    response::{ApiError, ApiResponse, Empty},
    state::State,
};

/// Delete Product Handler
///
/// Carts and orders referencing the product keep their snapshots.
#[endpoint(tags("products"), summary = "Delete Product", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .products
        .delete_product(id.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message("Product deleted successfully", Empty {}))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use bazaar::products::ProductId;
    use bazaar_app::domain::products::ProductsServiceError;

    use crate::test_helpers::{Mocks, admin, service_as};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        service_as(admin(), mocks, Router::with_path("products/{id}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_product_success() -> TestResult {
        let id = ProductId::new();
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_delete_product()
            .once()
            .withf(move |product| *product == id)
            .return_once(|_| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/products/{id}"))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body,
            json!({ "success": true, "message": "Product deleted successfully", "data": {} })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_delete_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/products/{}", Uuid::nil()))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
