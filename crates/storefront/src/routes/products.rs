//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::ecwid::client::product_id_from_handle;
use crate::ecwid::sorting::sort_for_slug;
use crate::ecwid::types::Product;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Search and sort query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Search keyword.
    pub q: Option<String>,
    /// Sort slug, e.g. `price-asc`.
    pub sort: Option<String>,
}

/// Search products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Vec<Product>>> {
    let sort = sort_for_slug(query.sort.as_deref());
    let products = state.ecwid().get_products(query.q.as_deref(), &sort).await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    state
        .ecwid()
        .get_product(&handle)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product not found: {handle}")))
}

/// Related products; accepts a product id or a product handle.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let product_id = product_id_from_handle(&handle);
    let products = state.ecwid().get_product_recommendations(product_id).await?;
    Ok(Json(products))
}
