//! My Order Stats Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_api_error, models::UserStatsResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

/// My Order Stats Handler
#[endpoint(tags("orders"), summary = "My Order Statistics", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<ApiResponse<UserStatsResponse>>, ApiError> {
    let user = depot.principal_or_401()?;
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .orders
        .user_stats(user.id)
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::data(stats.into()))
}
