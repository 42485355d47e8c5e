//! Delete Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::errors::into_api_error,
    response::{ApiError, ApiResponse, Empty},
    state::State,
};

/// Delete Order Handler
///
/// Stock is not returned; cancel first to restock.
#[endpoint(tags("orders"), summary = "Delete Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .orders
        .delete_order(id.into_inner().into())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message("Order deleted successfully", Empty {}))
}
