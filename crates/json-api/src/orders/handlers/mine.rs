//! My Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use bazaar::orders::OrderStatus;
use bazaar_app::domain::pagination::PageRequest;

use crate::{
    extensions::*,
    orders::{errors::into_api_error, models::OrderResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

/// My Orders Handler
///
/// The caller's orders, newest first.
#[endpoint(tags("orders"), summary = "List My Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<OrderResponse>>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = status
        .into_inner()
        .filter(|value| !value.is_empty())
        .map(|value| value.parse::<OrderStatus>())
        .transpose()
        .or_400("Invalid status value")?;

    let orders = state
        .app
        .orders
        .list_user_orders(
            user.id,
            status,
            PageRequest::new(page.into_inner(), limit.into_inner()),
        )
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::page(orders, Into::into))
}
