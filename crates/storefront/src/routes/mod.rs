//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                            - Health check
//!
//! # Navigation
//! GET  /api/menu/{handle}                 - Menu (top-level categories)
//!
//! # Collections
//! GET  /api/collections                   - Collection listing
//! GET  /api/collections/{handle}          - Collection detail
//! GET  /api/collections/{handle}/products - Collection products (?sort=)
//!
//! # Products
//! GET  /api/products                      - Product search (?q=&sort=)
//! GET  /api/products/{handle}             - Product detail
//! GET  /api/products/{handle}/recommendations - Related products
//!
//! # Cart (session backed)
//! GET  /api/cart                          - Current cart or null
//! POST /api/cart/add                      - Add item {variantId, quantity?}
//! POST /api/cart/remove                   - Remove line {lineId}
//! POST /api/cart/update                   - Update quantity {lineId, variantId?, quantity}
//!
//! # Webhooks
//! POST /api/revalidate                    - Ecwid cache revalidation
//! ```

pub mod cart;
pub mod collections;
pub mod products;
pub mod webhook;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
        .route("/{handle}/recommendations", get(products::recommendations))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
        .route("/{handle}/products", get(collections::products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/menu/{handle}", get(collections::menu))
        .nest("/api/products", product_routes())
        .nest("/api/collections", collection_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/revalidate", post(webhook::handle))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::SessionManagerLayer;

    use crate::config::{EcwidConfig, StorefrontConfig};
    use crate::middleware::session::MokaSessionStore;

    fn app() -> Router {
        // Unroutable endpoints: these requests must be answered locally.
        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            ecwid: EcwidConfig {
                store_id: "1003".to_string(),
                api_key: SecretString::from("secret_key"),
                api_url: "http://127.0.0.1:9/api/v3/".to_string(),
                storefront_api_url: "http://127.0.0.1:9/storefront/api/v1/".to_string(),
                cache_ttl: Duration::from_secs(60),
            },
            revalidation_secret: SecretString::from("k7Qp2Zr9Lm4Xv8Ws"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        routes()
            .layer(SessionManagerLayer::new(MokaSessionStore::default()))
            .with_state(AppState::new(config))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_non_numeric_product_is_not_found() {
        let response = app()
            .oneshot(
                Request::get("/api/products/not-a-product")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not-a-product"));
    }

    #[tokio::test]
    async fn test_footer_menu_is_empty() {
        let response = app()
            .oneshot(
                Request::get("/api/menu/next-js-frontend-footer-menu")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_cart_without_session_is_null() {
        let response = app()
            .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_json(response).await.is_null());
    }

    #[tokio::test]
    async fn test_add_when_cart_cannot_be_created() {
        let response = app()
            .oneshot(
                Request::post("/api/cart/add")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        // The cart is created before the variant is checked
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Error adding item to cart");
    }

    #[tokio::test]
    async fn test_remove_without_cart_is_bad_request() {
        let response = app()
            .oneshot(
                Request::post("/api/cart/remove")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"lineId":"100"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing cart ID");
    }

    #[tokio::test]
    async fn test_revalidate_with_wrong_secret_is_acknowledged() {
        let response = app()
            .oneshot(
                Request::post("/api/revalidate")
                    .header("X-Ecwid-Revalidation-Secret", "wrong")
                    .body(Body::from(r#"{"eventType":"product.updated"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], 200);
        assert!(body.get("revalidated").is_none());
    }

    #[tokio::test]
    async fn test_revalidate_with_secret_reports_revalidation() {
        let response = app()
            .oneshot(
                Request::post("/api/revalidate")
                    .header("X-Ecwid-Revalidation-Secret", "k7Qp2Zr9Lm4Xv8Ws")
                    .body(Body::from(r#"{"eventType":"category.created"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["revalidated"], true);
        assert!(body["now"].as_i64().unwrap() > 0);
    }
}
