//! Point-in-time query parsing helpers.

use jiff::Timestamp;
use salvo::oapi::extract::QueryParam;

use crate::{extensions::*, response::ApiError};

/// Resolve the optional `at` query parameter, defaulting to the current time.
pub(crate) trait PointInTimeExt {
    fn into_point_in_time(self) -> Result<Timestamp, ApiError>;
}

impl PointInTimeExt for QueryParam<String, false> {
    fn into_point_in_time(self) -> Result<Timestamp, ApiError> {
        parse_point_in_time(self.into_inner())
    }
}

fn parse_point_in_time(value: Option<String>) -> Result<Timestamp, ApiError> {
    value
        .map(|value| value.parse::<Timestamp>())
        .transpose()
        .or_400("could not parse \"at\" query parameter")
        .map(|point_in_time| point_in_time.unwrap_or_else(Timestamp::now))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn explicit_timestamps_are_parsed() -> TestResult {
        let at = parse_point_in_time(Some("2026-02-21T12:00:00Z".to_string()))?;

        assert_eq!(at, "2026-02-21T12:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn garbage_is_a_bad_request() {
        let error = parse_point_in_time(Some("yesterday".to_string())).err();

        assert_eq!(
            error.map(|error| error.status),
            Some(salvo::http::StatusCode::BAD_REQUEST)
        );
    }
}
