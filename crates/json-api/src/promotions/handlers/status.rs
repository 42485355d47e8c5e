//! Promotion Status Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use bazaar::promotions::PromotionStatus;

use crate::{
    extensions::*,
    promotions::{
        errors::into_api_error,
        models::{PromotionResponse, PromotionStatusRequest},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Promotion Status Handler
///
/// Pins the stored status. The sweep writes the live status back on its next pass.
#[endpoint(
    tags("promotions"),
    summary = "Override Promotion Status",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<PromotionStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<PromotionResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = json
        .into_inner()
        .status
        .parse::<PromotionStatus>()
        .or_400("Invalid status value")?;

    let now = Timestamp::now();

    let promotion = state
        .app
        .promotions
        .set_promotion_status(id.into_inner().into(), status, now)
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message(
        "Promotion status updated successfully",
        PromotionResponse::at(promotion, now),
    ))
}
