//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use tracing::error;

use crate::response::ApiError;

/// Map any error to an API error.
pub(crate) trait ResultExt<T> {
    /// A client mistake, rendered with `message`.
    fn or_400(self, message: &str) -> Result<T, ApiError>;

    /// A logged internal server error.
    fn or_500(self, context: &str) -> Result<T, ApiError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_400(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|_ignored| ApiError::bad_request(message))
    }

    fn or_500(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            ApiError::new(
                salvo::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            )
        })
    }
}
