//! All Orders Handler

use std::sync::Arc;

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{oapi::extract::QueryParam, prelude::*};

use bazaar::orders::OrderStatus;
use bazaar_app::domain::{orders::data::OrderFilter, pagination::PageRequest};

use crate::{
    extensions::*,
    orders::{errors::into_api_error, models::OrderListingResponse},
    response::{ApiError, ApiResponse, Pagination},
    state::State,
};

/// Parse a `from`/`to` bound. A bare date covers the whole UTC day.
fn parse_bound(value: Option<String>, end_of_day: bool) -> Result<Option<Timestamp>, ApiError> {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Ok(Some(timestamp));
    }

    let date: Date = value.parse().or_400("Invalid date range")?;
    let time = if end_of_day {
        date.at(23, 59, 59, 999_999_999)
    } else {
        date.at(0, 0, 0, 0)
    };

    let zoned = time.to_zoned(TimeZone::UTC).or_400("Invalid date range")?;

    Ok(Some(zoned.timestamp()))
}

/// All Orders Handler
///
/// Every order, newest first, with revenue totals across the whole filter.
#[endpoint(tags("orders"), summary = "List All Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<OrderListingResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = OrderFilter {
        status: status
            .into_inner()
            .filter(|value| !value.is_empty())
            .map(|value| value.parse::<OrderStatus>())
            .transpose()
            .or_400("Invalid status value")?,
        from: parse_bound(from.into_inner(), false)?,
        to: parse_bound(to.into_inner(), true)?,
        page: PageRequest::new(page.into_inner(), limit.into_inner()),
    };

    let listing = state
        .app
        .orders
        .list_all_orders(filter)
        .await
        .map_err(into_api_error)?;

    let pagination = Pagination::of(&listing.orders);

    Ok(Json(ApiResponse {
        success: true,
        message: None,
        data: OrderListingResponse {
            orders: listing.orders.items.into_iter().map(Into::into).collect(),
            stats: listing.totals.into(),
        },
        pagination: Some(pagination),
    }))
}
