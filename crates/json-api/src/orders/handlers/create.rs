//! Create Order Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use bazaar::orders::{OrderDetails, OrderItemRequest};

use crate::{
    extensions::*,
    orders::{
        errors::into_api_error,
        models::{CreateOrderRequest, OrderResponse},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Create Order Handler
///
/// Places an order for explicit items without touching the cart. Repeated
/// products are combined into one line.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApiResponse<OrderResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.items.is_empty() {
        return Err(ApiError::bad_request("Order must have at least one item"));
    }

    let items: Vec<OrderItemRequest> = request.items.into_iter().map(Into::into).collect();
    let details = OrderDetails::try_from(request.details)?;

    let order = state
        .app
        .orders
        .create_order(user.id, items, details, Timestamp::now())
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(ApiResponse::message("Order created successfully", order.into()))
}
