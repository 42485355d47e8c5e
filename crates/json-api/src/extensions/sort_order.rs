//! Sort direction query parsing.

use salvo::oapi::extract::QueryParam;

use bazaar_app::domain::products::data::SortOrder;

use crate::response::ApiError;

/// Resolve the optional `order` query parameter, defaulting to descending.
pub(crate) trait SortOrderExt {
    fn into_sort_order(self) -> Result<SortOrder, ApiError>;
}

impl SortOrderExt for QueryParam<String, false> {
    fn into_sort_order(self) -> Result<SortOrder, ApiError> {
        parse_sort_order(self.into_inner().as_deref())
    }
}

fn parse_sort_order(value: Option<&str>) -> Result<SortOrder, ApiError> {
    match value {
        None | Some("desc") => Ok(SortOrder::Desc),
        Some("asc") => Ok(SortOrder::Asc),
        Some(other) => Err(ApiError::bad_request(format!("Invalid sort order: {other}"))),
    }
}
