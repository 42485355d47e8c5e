//! Update Product Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    products::{
        errors::into_api_error,
        models::{ProductRequest, ProductResponse},
    },
    response::{ApiError, ApiResponse},
    state::State,
};

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(
    name = "products.update",
    skip(id, json, depot),
    fields(product_id = tracing::field::Empty, stock = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<ProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<ProductResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let id = id.into_inner();

    let span = tracing::Span::current();

    span.record("product_id", tracing::field::display(id));
    span.record("stock", request.stock);

    let product = state
        .app
        .products
        .update_product(id.into(), request.into(), Timestamp::now())
        .await
        .map_err(into_api_error)?;

    Ok(ApiResponse::message(
        "Product updated successfully",
        product.into(),
    ))
}
