//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{errors::into_api_error, models::ProductResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

/// Get Product Handler
///
/// Returns a product with its live price.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let product = state
        .app
        .products
        .get_product(id.into_inner().into(), point_in_time)
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(product.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use bazaar::{money::Percentage, pricing::PriceQuote, products::ProductId};
    use bazaar_app::domain::products::{ProductsServiceError, data::PricedProduct};

    use crate::test_helpers::{Mocks, anonymous_service, make_product};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        anonymous_service(mocks, Router::with_path("products/{id}").get(handler))
    }

    #[tokio::test]
    async fn test_get_product_includes_pricing() -> TestResult {
        let id = ProductId::new();
        let product = make_product(id);
        let pricing = PriceQuote {
            original_price: product.price,
            discounted_price: Decimal::new(116_999, 2),
            discount: Percentage::new(Decimal::from(10))?,
            save_amount: Decimal::new(13_000, 2),
            promotion: None,
        };
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_get_product()
            .once()
            .withf(move |product, _| *product == id)
            .return_once(move |_, _| Ok(PricedProduct { product, pricing }));

        let mut res = TestClient::get(format!("http://example.com/products/{id}"))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["name"], "Laptop Dell XPS 15");
        assert_eq!(body["data"]["pricing"]["discountedPrice"], "1169.99");
        assert_eq!(body["data"]["pricing"]["saveAmount"], "130.00");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_get_product()
            .once()
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/products/{}", Uuid::nil()))
            .send(&make_service(mocks))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body["message"], "Product not found");

        Ok(())
    }
}
