//! Add Cart Item Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    carts::{
        errors::into_api_error,
        models::{AddItemRequest, CartResponse},
    },
    extensions::*,
    response::{ApiError, ApiResponse},
    state::State,
};

/// Add Cart Item Handler
///
/// Merges into an existing line for the same product. The merged quantity
/// must not exceed live stock.
#[endpoint(tags("cart"), summary = "Add Item To Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<CartResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .add_item(
            user.id,
            request.product_id.into(),
            request.quantity,
            Timestamp::now(),
        )
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message("Item added to cart", cart.into()))
}
