//! Response envelope
//!
//! Every body is `{success, message?, error?, data?, pagination?}`. Failures render
//! through [`ApiError`] with `success: false`.

use salvo::{
    http::StatusCode,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::*,
    writing::Scribe,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use bazaar_app::domain::pagination::Page;

/// Successful response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApiResponse<T: ToSchema + 'static> {
    /// Always `true`
    pub success: bool,

    /// Human-readable summary of a mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Payload
    pub data: T,

    /// Present on paginated listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: ToSchema + 'static> ApiResponse<T> {
    pub(crate) fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data,
            pagination: None,
        })
    }

    pub(crate) fn message(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message.into()),
            data,
            pagination: None,
        })
    }
}

impl<T: ToSchema + 'static> ApiResponse<Vec<T>> {
    pub(crate) fn page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Json<Self> {
        let pagination = Pagination::of(&page);

        Json(Self {
            success: true,
            message: None,
            data: page.items.into_iter().map(f).collect(),
            pagination: Some(pagination),
        })
    }
}

/// Pagination block of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct Pagination {
    /// Items across all pages
    pub total: u64,

    /// 1-based page returned
    pub page: u32,

    /// Number of pages
    pub pages: u64,

    /// Page size
    pub limit: u32,
}

impl Pagination {
    pub(crate) fn of<T>(page: &Page<T>) -> Self {
        Self {
            total: page.total,
            page: page.page,
            pages: page.pages(),
            limit: page.limit,
        }
    }
}

/// Empty `data` object, rendered as `{}`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct Empty {}

/// Failure envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// Human-readable reason
    pub message: String,

    /// Operation that failed, on internal errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Structured detail, e.g. the cart lines that failed a stock check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[salvo(schema(value_type = Object))]
    pub data: Option<Value>,
}

/// A failed request: an HTTP status plus the envelope body.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{status}: {message}")]
pub(crate) struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
    pub data: Option<Value>,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
            data: None,
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Access denied")
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Internal failure. The cause is logged, only `context` is rendered.
    pub(crate) fn internal(context: &str, cause: &dyn std::error::Error) -> Self {
        error!("{context}: {cause}");

        Self {
            error: Some(context.to_string()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }

    /// Attach structured detail to the body.
    #[must_use]
    pub(crate) fn with_data(mut self, data: &impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.data = Some(value),
            Err(source) => error!("failed to serialise error detail: {source}"),
        }

        self
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(ErrorResponse {
            success: false,
            message: self.message,
            error: self.error,
            data: self.data,
        }));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::BAD_REQUEST, "Bad Request"),
            (StatusCode::UNAUTHORIZED, "Unauthorized"),
            (StatusCode::FORBIDDEN, "Forbidden"),
            (StatusCode::NOT_FOUND, "Not Found"),
            (StatusCode::CONFLICT, "Conflict"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", ErrorResponse::to_schema(components)),
            );
        }
    }
}
