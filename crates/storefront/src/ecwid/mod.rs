//! Ecwid REST and Storefront API adaptation layer.
//!
//! # Architecture
//!
//! - Ecwid is source of truth: catalog, carts and checkouts live there
//! - Responses are reshaped into the storefront model on every fetch
//! - Tagged GET responses are cached in memory via `moka` and dropped per
//!   tag when a webhook reports a change
//!
//! # APIs
//!
//! ## Admin REST API (`/api/v3/<store>`)
//! - Profile, categories, products
//! - Authenticated with the store's API key
//!
//! ## Storefront API (`/storefront/api/v1/<store>`)
//! - Checkout session backing each cart
//! - Authenticated with the per-cart session token
//!
//! # Example
//!
//! ```rust,ignore
//! use ecwid_headless_storefront::ecwid::EcwidClient;
//!
//! let client = EcwidClient::new(&config.ecwid);
//! client.init_currency_code().await;
//!
//! let product = client.get_product("Enamel-Mug-p42").await?;
//!
//! let cart = client.create_cart().await?;
//! let token = cart.session_token.clone().unwrap_or_default();
//! let cart = client.add_to_cart(&token, &[CartLineInput {
//!     merchandise_id: product.unwrap().variants[0].id.to_string(),
//!     quantity: 1,
//! }]).await?;
//! ```

pub mod api;
pub mod client;
pub mod reshape;
pub mod sorting;
pub mod types;
pub mod variants;

pub use client::{CacheTag, EcwidClient};
pub use types::*;

use ecwid_headless_core::VariantIdError;
use thiserror::Error;

/// Errors that can occur when interacting with the Ecwid APIs.
#[derive(Debug, Error)]
pub enum EcwidError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ecwid answered with an error body or a non-success status.
    #[error("Ecwid API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Ecwid.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An operation was called without what it needs (e.g. no cart lines).
    #[error("Missing precondition: {0}")]
    MissingPrecondition(String),

    /// A merchandise or line id could not be parsed.
    #[error("Invalid variant id: {0}")]
    InvalidVariantId(#[from] VariantIdError),

    /// A configured API base URL is not a valid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl EcwidError {
    /// Whether Ecwid reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecwid_error_display() {
        let err = EcwidError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");
    }

    #[test]
    fn test_api_error_display() {
        let err = EcwidError::Api {
            status: 400,
            message: "Invalid product id".to_string(),
        };
        assert_eq!(err.to_string(), "Ecwid API error (400): Invalid product id");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = EcwidError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_invalid_variant_id_from() {
        let err: EcwidError = VariantIdError::Empty.into();
        assert!(matches!(err, EcwidError::InvalidVariantId(_)));
    }

    #[test]
    fn test_is_not_found() {
        assert!(EcwidError::NotFound(String::new()).is_not_found());
        assert!(
            EcwidError::Api {
                status: 404,
                message: String::new()
            }
            .is_not_found()
        );
        assert!(
            !EcwidError::Api {
                status: 500,
                message: String::new()
            }
            .is_not_found()
        );
    }
}
