//! Remove Cart Item Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    extensions::*,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing a product that is not in the cart is not an error.
#[endpoint(tags("cart"), summary = "Remove Cart Item", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    product_id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<CartResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .remove_item(user.id, product_id.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message("Item removed from cart", cart.into()))
}
