//! Order Status Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use bazaar::orders::{OrderStatus, StatusEffect};

use crate::{
    extensions::*,
    orders::{
        errors::into_api_error,
        models::{OrderResponse, OrderStatusRequest},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Order Status Handler
///
/// Admins move orders forward. Owners may only cancel. Cancelling hands the
/// stock back.
#[endpoint(tags("orders"), summary = "Update Order Status", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<OrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<OrderResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = json
        .into_inner()
        .status
        .parse::<OrderStatus>()
        .or_400("Invalid status value")?;

    let update = state
        .app
        .orders
        .update_status(user, id.into_inner().into(), status, Timestamp::now())
        .await
        .map_err(into_api_error)?;

    if update.effect == StatusEffect::RestoreStock {
        info!(
            order_id = %update.order.id,
            restocked = update.restocked,
            "order cancelled, stock restored"
        );
    }

    Ok(ApiResponse::message("Order status updated", update.order.into()))
}
