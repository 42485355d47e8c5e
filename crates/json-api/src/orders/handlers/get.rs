//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_api_error, models::OrderDetailResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

/// Get Order Handler
///
/// Owners see their own orders; admins see any. Each line reports whether
/// its product is still in the catalog.
#[endpoint(tags("orders"), summary = "Get Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<OrderDetailResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let detail = state
        .app
        .orders
        .get_order(user, id.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(OrderDetailResponse {
        order: detail.order.into(),
        product_existence: detail.products.into_iter().map(Into::into).collect(),
    }))
}
