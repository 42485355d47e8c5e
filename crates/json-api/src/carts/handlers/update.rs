//! Update Cart Item Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::{
        errors::into_api_error,
        models::{CartResponse, UpdateItemRequest},
    },
    extensions::*,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Update Cart Item Handler
#[endpoint(tags("cart"), summary = "Update Cart Item", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    json: JsonBody<UpdateItemRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<CartResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .update_item(
            user.id,
            request.product_id.into(),
            request.quantity,
            Timestamp::now(),
        )
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message("Cart updated", cart.into()))
}
