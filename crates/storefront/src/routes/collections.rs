//! Collection and menu route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::ecwid::sorting::sort_for_slug;
use crate::ecwid::types::{Collection, Menu, Product};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Sort query parameter for collection listings.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

/// Collection listing, led by "All".
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(state.ecwid().get_collections().await?))
}

/// Collection detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Collection>> {
    state
        .ecwid()
        .get_collection(&handle)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Collection not found: {handle}")))
}

/// Products of a collection.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<Product>>> {
    let sort = sort_for_slug(query.sort.as_deref());
    let products = state
        .ecwid()
        .get_collection_products(&handle, &sort)
        .await?;
    Ok(Json(products))
}

/// Navigation menu by handle.
#[instrument(skip(state))]
pub async fn menu(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Menu>>> {
    Ok(Json(state.ecwid().get_menu(&handle).await?))
}
