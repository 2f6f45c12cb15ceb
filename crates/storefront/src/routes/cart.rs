//! Cart route handlers.
//!
//! Thin JSON wrappers over [`crate::actions`]. The cart id and Ecwid
//! session token are kept in the visitor's session.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::actions;
use crate::ecwid::types::Cart;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub variant_id: Option<String>,
    pub quantity: Option<u32>,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub line_id: String,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub line_id: String,
    /// Defaults to the line id, which encodes the same variant.
    pub variant_id: Option<String>,
    pub quantity: u32,
}

/// Current cart, `null` when the session has none.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<Option<Cart>>> {
    let cart = actions::current_cart(state.ecwid(), &session).await?;
    Ok(Json(cart))
}

/// Add an item, creating the cart if needed.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<Cart>> {
    let cart = actions::add_item(
        state.ecwid(),
        &session,
        body.variant_id.as_deref(),
        body.quantity,
    )
    .await?;

    add_breadcrumb(
        "cart",
        "Added item to cart",
        Some(&[("variant_id", body.variant_id.as_deref().unwrap_or_default())]),
    );
    Ok(Json(cart))
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<Cart>> {
    let cart = actions::remove_item(state.ecwid(), &session, &body.line_id).await?;

    add_breadcrumb(
        "cart",
        "Removed item from cart",
        Some(&[("line_id", body.line_id.as_str())]),
    );
    Ok(Json(cart))
}

/// Change the quantity of a line; 0 removes it.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<Cart>> {
    let variant_id = body.variant_id.as_deref().unwrap_or(&body.line_id);
    let cart = actions::update_item_quantity(
        state.ecwid(),
        &session,
        &body.line_id,
        variant_id,
        body.quantity,
    )
    .await?;

    Ok(Json(cart))
}
