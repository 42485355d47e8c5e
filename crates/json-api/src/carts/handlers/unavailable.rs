//! Remove Unavailable Items Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartCleanupResponse},
    extensions::*,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Remove Unavailable Items Handler
///
/// Drops lines whose product was deleted or is sold out.
#[endpoint(
    tags("cart"),
    summary = "Remove Unavailable Items",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<ApiResponse<CartCleanupResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cleanup = state
        .app
        .carts
        .remove_unavailable(user.id, Timestamp::now())
        .await
        .map_err(into_api_error)?;

    let message = format!("Removed {} unavailable item(s)", cleanup.removed);

    Ok(ApiResponse::message(message, cleanup.into()))
}
