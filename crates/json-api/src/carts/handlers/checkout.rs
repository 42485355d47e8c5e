//! Checkout Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use bazaar::orders::OrderDetails;

use crate::{
    extensions::*,
    orders::{
        errors::into_api_error,
        models::{OrderDetailsRequest, OrderResponse},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Checkout Handler
///
/// Turns the cart into a pending order priced with the promotions active
/// now. Stock is taken and the cart emptied in the same transaction.
#[endpoint(
    tags("cart"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
    ),
)]
#[tracing::instrument(name = "cart.checkout", skip_all, fields(user_id = tracing::field::Empty), err)]
pub(crate) async fn handler(
    json: JsonBody<OrderDetailsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApiResponse<OrderResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let details = OrderDetails::try_from(json.into_inner())?;

    tracing::Span::current().record("user_id", tracing::field::display(user.id));

    let order = state
        .app
        .orders
        .checkout(user.id, details, Timestamp::now())
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(ApiResponse::message(
        "Order created successfully from cart",
        order.into(),
    ))
}
