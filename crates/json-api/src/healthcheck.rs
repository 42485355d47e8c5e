//! Healthcheck Handler

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::response::ApiResponse;

/// Healthcheck body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// Always `ok` while the process serves requests
    pub status: String,

    /// Server clock, RFC 3339
    pub timestamp: String,

    /// Crate version
    pub version: String,
}

/// Healthcheck handler
///
/// Does not touch the database.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler() -> Json<ApiResponse<HealthResponse>> {
    ApiResponse::message(
        "Server is running",
        HealthResponse {
            status: "ok".to_string(),
            timestamp: Timestamp::now().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}
