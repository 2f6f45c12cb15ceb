//! Cart actions invoked by the storefront UI.
//!
//! The cart id and the Ecwid session token live in the visitor's session.
//! Every failure is reduced to a short message that can be shown as-is;
//! the underlying error is logged.

use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use crate::ecwid::{CacheTag, EcwidClient, EcwidError};
use crate::ecwid::types::{Cart, CartLineInput, CartLineUpdateInput};

/// Session keys for cart state.
pub mod keys {
    /// Key for storing the Ecwid checkout id backing the cart.
    pub const CART_ID: &str = "cartId";
}

/// Failure of a cart action, worded for the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CartActionError {
    #[error("Missing product variant ID")]
    MissingVariantId,
    #[error("Missing cart ID")]
    MissingCartId,
    #[error("Error adding item to cart")]
    AddFailed,
    #[error("Error removing item from cart")]
    RemoveFailed,
    #[error("Error updating item quantity")]
    UpdateFailed,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn read_key(session: &Session, key: &str) -> Option<String> {
    session
        .get::<String>(key)
        .await
        .ok()
        .flatten()
        .filter(|v| !v.is_empty())
}

/// Get the cart id from the session.
pub async fn get_cart_id(session: &Session) -> Option<String> {
    read_key(session, keys::CART_ID).await
}

/// Get the Ecwid session token from the session.
pub async fn get_session_token(client: &EcwidClient, session: &Session) -> Option<String> {
    read_key(session, &client.session_cookie_name()).await
}

/// Remember a freshly created cart.
async fn store_cart(client: &EcwidClient, session: &Session, cart: &Cart) {
    if let Err(e) = session.insert(keys::CART_ID, &cart.id).await {
        tracing::error!("Failed to save cart ID to session: {e}");
    }
    if let Some(token) = &cart.session_token
        && let Err(e) = session.insert(&client.session_cookie_name(), token).await
    {
        tracing::error!("Failed to save Ecwid session token to session: {e}");
    }
}

/// Token for a cart action that needs an existing cart.
async fn require_cart(
    client: &EcwidClient,
    session: &Session,
) -> Result<String, CartActionError> {
    if get_cart_id(session).await.is_none() {
        return Err(CartActionError::MissingCartId);
    }
    get_session_token(client, session)
        .await
        .ok_or(CartActionError::MissingCartId)
}

// =============================================================================
// Actions
// =============================================================================

/// The session's cart, if it has one Ecwid still knows.
///
/// # Errors
///
/// Returns an error if the Ecwid request fails.
#[instrument(skip(client, session))]
pub async fn current_cart(
    client: &EcwidClient,
    session: &Session,
) -> Result<Option<Cart>, EcwidError> {
    if get_cart_id(session).await.is_none() {
        return Ok(None);
    }
    let token = get_session_token(client, session).await;
    client.get_cart(token.as_deref()).await
}

/// Add a variant to the session's cart, creating the cart first if needed.
///
/// # Errors
///
/// - [`CartActionError::MissingVariantId`] when no variant was selected
/// - [`CartActionError::AddFailed`] when Ecwid rejects the call
#[instrument(skip(client, session))]
pub async fn add_item(
    client: &EcwidClient,
    session: &Session,
    variant_id: Option<&str>,
    quantity: Option<u32>,
) -> Result<Cart, CartActionError> {
    let existing = match current_cart(client, session).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!("Failed to load cart, starting a new one: {e}");
            None
        }
    };

    if existing.is_none() {
        let cart = client.create_cart().await.map_err(|e| {
            tracing::error!("Failed to create cart: {e}");
            CartActionError::AddFailed
        })?;
        store_cart(client, session, &cart).await;
    }

    let Some(variant_id) = variant_id.filter(|v| !v.is_empty()) else {
        return Err(CartActionError::MissingVariantId);
    };

    let token = get_session_token(client, session)
        .await
        .ok_or(CartActionError::AddFailed)?;

    let line = CartLineInput {
        merchandise_id: variant_id.to_string(),
        quantity: quantity.unwrap_or(1),
    };

    let cart = client.add_to_cart(&token, &[line]).await.map_err(|e| {
        tracing::error!("Failed to add item to cart: {e}");
        CartActionError::AddFailed
    })?;

    client.revalidate_tag(CacheTag::Cart).await;
    Ok(cart)
}

/// Remove a line from the session's cart.
///
/// # Errors
///
/// - [`CartActionError::MissingCartId`] when the session has no cart
/// - [`CartActionError::RemoveFailed`] when Ecwid rejects the call
#[instrument(skip(client, session))]
pub async fn remove_item(
    client: &EcwidClient,
    session: &Session,
    line_id: &str,
) -> Result<Cart, CartActionError> {
    let token = require_cart(client, session).await?;

    let cart = client
        .remove_from_cart(&token, &[line_id.to_string()])
        .await
        .map_err(|e| {
            tracing::error!("Failed to remove item from cart: {e}");
            CartActionError::RemoveFailed
        })?;

    client.revalidate_tag(CacheTag::Cart).await;
    Ok(cart)
}

/// Change the quantity of a line; quantity 0 removes it.
///
/// # Errors
///
/// - [`CartActionError::MissingCartId`] when the session has no cart
/// - [`CartActionError::UpdateFailed`] when Ecwid rejects a call
#[instrument(skip(client, session))]
pub async fn update_item_quantity(
    client: &EcwidClient,
    session: &Session,
    line_id: &str,
    variant_id: &str,
    quantity: u32,
) -> Result<Cart, CartActionError> {
    let token = require_cart(client, session).await?;

    let result = if quantity == 0 {
        client.remove_from_cart(&token, &[line_id.to_string()]).await
    } else {
        let line = CartLineUpdateInput {
            id: line_id.to_string(),
            merchandise_id: variant_id.to_string(),
            quantity,
        };
        client.update_cart(&token, &[line]).await
    };

    let cart = result.map_err(|e| {
        tracing::error!("Failed to update cart item quantity: {e}");
        CartActionError::UpdateFailed
    })?;

    client.revalidate_tag(CacheTag::Cart).await;
    Ok(cart)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use secrecy::SecretString;

    use crate::config::EcwidConfig;
    use crate::middleware::session::MokaSessionStore;

    fn client() -> EcwidClient {
        // Unroutable endpoints: these tests must never reach the network.
        EcwidClient::new(&EcwidConfig {
            store_id: "1003".to_string(),
            api_key: SecretString::from("secret_key"),
            api_url: "http://127.0.0.1:9/api/v3/".to_string(),
            storefront_api_url: "http://127.0.0.1:9/storefront/api/v1/".to_string(),
            cache_ttl: Duration::from_secs(60),
        })
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MokaSessionStore::default()), None)
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            CartActionError::MissingVariantId.to_string(),
            "Missing product variant ID"
        );
        assert_eq!(CartActionError::MissingCartId.to_string(), "Missing cart ID");
        assert_eq!(
            CartActionError::AddFailed.to_string(),
            "Error adding item to cart"
        );
        assert_eq!(
            CartActionError::RemoveFailed.to_string(),
            "Error removing item from cart"
        );
        assert_eq!(
            CartActionError::UpdateFailed.to_string(),
            "Error updating item quantity"
        );
    }

    #[tokio::test]
    async fn test_remove_without_cart_id() {
        let result = remove_item(&client(), &session(), "42").await;
        assert_eq!(result.unwrap_err(), CartActionError::MissingCartId);
    }

    #[tokio::test]
    async fn test_update_without_cart_id() {
        let result = update_item_quantity(&client(), &session(), "42", "42", 0).await;
        assert_eq!(result.unwrap_err(), CartActionError::MissingCartId);
    }

    #[tokio::test]
    async fn test_current_cart_without_cart_id() {
        assert!(current_cart(&client(), &session()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_keys() {
        let client = client();
        let session = session();
        session.insert(keys::CART_ID, "C1").await.unwrap();
        session.insert("ec-1003-session", "tok").await.unwrap();

        assert_eq!(get_cart_id(&session).await.as_deref(), Some("C1"));
        assert_eq!(
            get_session_token(&client, &session).await.as_deref(),
            Some("tok")
        );
    }
}
