//! Ecwid revalidation webhook.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use tracing::instrument;

use crate::revalidate::{RevalidationResponse, SECRET_HEADER, revalidate};
use crate::state::AppState;

/// Handle an Ecwid webhook.
///
/// Always answers 200 so Ecwid does not retry; see [`revalidate`].
#[instrument(skip_all)]
pub async fn handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<RevalidationResponse> {
    let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());

    Json(
        revalidate(
            state.ecwid(),
            &state.config().revalidation_secret,
            provided,
            &body,
        )
        .await,
    )
}
