//! Get Cart Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    extensions::*,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Get Cart Handler
///
/// Prices every line against the live catalog. Users without a cart get an
/// empty one.
#[endpoint(tags("cart"), summary = "Get Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ApiResponse<CartResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(user.id, Timestamp::now())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(cart.into()))
}
