//! Product Categories Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    products::errors::into_api_error,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Product Categories Handler
///
/// Returns the distinct category names in use, sorted.
#[endpoint(tags("products"), summary = "List Product Categories")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let categories = state
        .app
        .products
        .list_categories()
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(categories))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, anonymous_service};

    use super::*;

    #[tokio::test]
    async fn test_categories_are_listed() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .products
            .expect_list_categories()
            .once()
            .return_once(|| Ok(vec!["Audio".to_string(), "Electronics".to_string()]));

        let response: ApiResponse<Vec<String>> =
            TestClient::get("http://example.com/products/categories/list")
                .send(&anonymous_service(
                    mocks,
                    Router::with_path("products/categories/list").get(handler),
                ))
                .await
                .take_json()
                .await?;

        assert_eq!(response.data, vec!["Audio", "Electronics"]);

        Ok(())
    }
}
