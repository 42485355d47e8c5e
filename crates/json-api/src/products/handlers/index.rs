//! Product Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use bazaar_app::domain::{
    pagination::PageRequest,
    products::data::{ProductFilter, ProductSort},
};

use crate::{
    extensions::*,
    products::{errors::into_api_error, models::ProductResponse},
    response::{ApiError, ApiResponse},
    state::State,
};

fn parse_sort(value: Option<&str>) -> Result<ProductSort, ApiError> {
    Ok(match value {
        None | Some("createdAt" | "created_at") => ProductSort::CreatedAt,
        Some("name") => ProductSort::Name,
        Some("price") => ProductSort::Price,
        Some("stock") => ProductSort::Stock,
        Some("rating") => ProductSort::Rating,
        Some(other) => return Err(ApiError::bad_request(format!("Invalid sort field: {other}"))),
    })
}

/// Product Index Handler
///
/// Returns a page of products, each with its live price.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    category: QueryParam<String, false>,
    search: QueryParam<String, false>,
    sort_by: QueryParam<String, false>,
    order: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<ProductResponse>>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let filter = ProductFilter {
        category: category.into_inner().filter(|value| !value.is_empty()),
        search: search.into_inner().filter(|value| !value.trim().is_empty()),
        sort: parse_sort(sort_by.into_inner().as_deref())?,
        order: order.into_sort_order()?,
        page: PageRequest::new(page.into_inner(), limit.into_inner()),
    };

    let products = state
        .app
        .products
        .list_products(filter, point_in_time)
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::page(products, Into::into))
}
