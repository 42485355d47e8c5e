//! Update Promotion Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use bazaar::promotions::PromotionDraft;

use crate::{
    extensions::*,
    promotions::{
        errors::into_api_error,
        models::{PromotionRequest, PromotionResponse},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Update Promotion Handler
///
/// Replaces every writable field and re-resolves the stored status.
#[endpoint(tags("promotions"), summary = "Update Promotion", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<PromotionRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<PromotionResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let draft = PromotionDraft::try_from(json.into_inner())?;
    let now = Timestamp::now();

    let view = state
        .app
        .promotions
        .update_promotion(id.into_inner().into(), draft, now)
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message(
        "Promotion updated successfully",
        PromotionResponse::view(view, now),
    ))
}
