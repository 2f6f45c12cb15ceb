//! Ecwid API client implementation.
//!
//! One `reqwest` client talks to both Ecwid surfaces. Tagged GET responses
//! are cached with `moka` until their TTL expires or their tag is
//! revalidated.

mod cache;
mod cart;
mod catalog;

pub use cache::CacheTag;
pub use catalog::{HOMEPAGE_COLLECTIONS, category_id_from_handle, product_id_from_handle};

use std::sync::{Arc, RwLock};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::EcwidConfig;
use crate::ecwid::EcwidError;
use crate::ecwid::api::EcwidErrorBody;
use crate::ecwid::types::CurrencyCode;

use cache::ResponseCache;

/// Language sent with every storefront API call.
pub(crate) const STOREFRONT_LANG: &str = "en";

// =============================================================================
// Requests
// =============================================================================

/// Which Ecwid API a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSurface {
    /// Admin REST API, authenticated with the store API key.
    Admin,
    /// Storefront API, authenticated with a cart session token.
    Storefront,
}

/// A single call to one of the Ecwid APIs.
#[derive(Debug, Clone)]
pub struct EcwidRequest {
    method: Method,
    surface: ApiSurface,
    path: String,
    query: Vec<(String, String)>,
    bearer: Option<String>,
    tag: Option<CacheTag>,
    payload: Option<Value>,
    no_store: bool,
}

impl EcwidRequest {
    /// A request with no query, payload, or tag.
    #[must_use]
    pub fn new(method: Method, surface: ApiSurface, path: impl Into<String>) -> Self {
        Self {
            method,
            surface,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            tag: None,
            payload: None,
            no_store: false,
        }
    }

    /// GET against the admin API.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, ApiSurface::Admin, path)
    }

    /// POST against the storefront API.
    #[must_use]
    pub fn storefront_post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, ApiSurface::Storefront, path)
    }

    /// Append a query pair. Repeating a key sends it more than once.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Authenticate with `token` instead of the store API key.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    #[must_use]
    pub const fn tag(mut self, tag: CacheTag) -> Self {
        self.tag = Some(tag);
        self
    }

    #[must_use]
    pub fn json(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Bypass the response cache.
    #[must_use]
    pub const fn no_store(mut self) -> Self {
        self.no_store = true;
        self
    }

    /// Tag to cache the response under, if it may be cached at all.
    fn cache_tag(&self) -> Option<CacheTag> {
        if self.no_store || self.method != Method::GET {
            return None;
        }
        self.tag
    }
}

// =============================================================================
// EcwidClient
// =============================================================================

/// Client for the Ecwid admin and storefront APIs.
///
/// Cheap to clone; clones share the HTTP client, response cache, and store
/// currency.
#[derive(Clone)]
pub struct EcwidClient {
    inner: Arc<EcwidClientInner>,
}

struct EcwidClientInner {
    client: reqwest::Client,
    store_id: String,
    admin_endpoint: String,
    storefront_endpoint: String,
    api_key: SecretString,
    cache: ResponseCache,
    currency: RwLock<CurrencyCode>,
}

impl EcwidClient {
    /// Create a new Ecwid API client.
    ///
    /// The store currency starts as `USD` until [`Self::init_currency_code`]
    /// reads the store profile.
    #[must_use]
    pub fn new(config: &EcwidConfig) -> Self {
        Self {
            inner: Arc::new(EcwidClientInner {
                client: reqwest::Client::new(),
                store_id: config.store_id.clone(),
                admin_endpoint: format!("{}{}", config.api_url, config.store_id),
                storefront_endpoint: format!("{}{}", config.storefront_api_url, config.store_id),
                api_key: config.api_key.clone(),
                cache: ResponseCache::new(config.cache_ttl),
                currency: RwLock::new(CurrencyCode::default()),
            }),
        }
    }

    /// Name of the cookie Ecwid's own widgets use for the session token.
    #[must_use]
    pub fn session_cookie_name(&self) -> String {
        format!("ec-{}-session", self.inner.store_id)
    }

    /// The store currency applied to amount-only prices.
    #[must_use]
    pub fn currency_code(&self) -> CurrencyCode {
        match self.inner.currency.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_currency_code(&self, code: CurrencyCode) {
        match self.inner.currency.write() {
            Ok(mut guard) => *guard = code,
            Err(poisoned) => *poisoned.into_inner() = code,
        }
    }

    /// Drop every cached response stored under `tag`.
    #[instrument(skip(self), fields(tag = %tag))]
    pub async fn revalidate_tag(&self, tag: CacheTag) {
        self.inner.cache.invalidate(tag).await;
        info!("Revalidated cache tag");
    }

    fn url_for(&self, request: &EcwidRequest) -> Result<Url, EcwidError> {
        let endpoint = match request.surface {
            ApiSurface::Admin => &self.inner.admin_endpoint,
            ApiSurface::Storefront => &self.inner.storefront_endpoint,
        };

        let mut url = Url::parse(&format!("{endpoint}{}", request.path))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Execute a request and deserialize its body.
    ///
    /// Returns `Ok(None)` when a successful response has no JSON body.
    ///
    /// # Errors
    ///
    /// - [`EcwidError::Http`] when the request cannot be sent
    /// - [`EcwidError::RateLimited`] on HTTP 429
    /// - [`EcwidError::Api`] when the body carries `errors` or
    ///   `errorMessage`, or the status is not a success
    /// - [`EcwidError::Parse`] when the body does not match `T`
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: EcwidRequest,
    ) -> Result<Option<T>, EcwidError> {
        let url = self.url_for(&request)?;
        let cache_tag = request
            .cache_tag()
            .filter(|tag| self.inner.cache.is_cacheable(*tag));

        if let Some(tag) = cache_tag
            && let Some(body) = self.inner.cache.get(tag, url.as_str()).await
        {
            debug!(tag = %tag, "Cache hit");
            return Ok(Some(serde_json::from_value(body)?));
        }

        let token = request
            .bearer
            .as_deref()
            .unwrap_or_else(|| self.inner.api_key.expose_secret());

        let mut builder = self
            .inner
            .client
            .request(request.method.clone(), url.clone())
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token);
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(EcwidError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;
        let body = serde_json::from_str::<Value>(&response_text).ok();

        if let Some(err) = body.as_ref().and_then(|b| provider_error(status, b)) {
            tracing::warn!(error = %err, "Ecwid returned an error body");
            return Err(err);
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Ecwid API returned non-success status"
            );
            return Err(EcwidError::Api {
                status: status.as_u16(),
                message: format!(
                    "HTTP {status}: {}",
                    response_text.chars().take(200).collect::<String>()
                ),
            });
        }

        let Some(body) = body.filter(|b| !b.is_null()) else {
            debug!("Response has no JSON body");
            return Ok(None);
        };

        if let Some(tag) = cache_tag {
            self.inner
                .cache
                .insert(tag, url.to_string(), body.clone())
                .await;
        }

        Ok(Some(serde_json::from_value(body)?))
    }
}

/// Map an Ecwid error body to an error, if the body is one.
///
/// The first entry of `errors` wins; otherwise `errorMessage` is used.
fn provider_error(status: StatusCode, body: &Value) -> Option<EcwidError> {
    if body.get("errors").is_none() && body.get("errorMessage").is_none() {
        return None;
    }

    let parsed: EcwidErrorBody = serde_json::from_value(body.clone()).ok()?;
    let fallback_status = if status.is_success() {
        500
    } else {
        status.as_u16()
    };

    if let Some(first) = parsed.errors.into_iter().next() {
        return Some(EcwidError::Api {
            status: first.status.unwrap_or(fallback_status),
            message: first.message.unwrap_or_default(),
        });
    }

    parsed.error_message.map(|message| EcwidError::Api {
        status: fallback_status,
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;

    fn client() -> EcwidClient {
        EcwidClient::new(&EcwidConfig {
            store_id: "1003".to_string(),
            api_key: SecretString::from("secret_key"),
            api_url: "https://app.ecwid.com/api/v3/".to_string(),
            storefront_api_url: "https://app.ecwid.com/storefront/api/v1/".to_string(),
            cache_ttl: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_url_includes_store_id_and_query() {
        let request = EcwidRequest::get("/categories")
            .query("parent", "0")
            .query("baseUrl", "/search");
        let url = client().url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.ecwid.com/api/v3/1003/categories?parent=0&baseUrl=%2Fsearch"
        );
    }

    #[test]
    fn test_url_repeats_multi_valued_keys() {
        let request = EcwidRequest::get("/products")
            .query("categories", "1")
            .query("categories", "2");
        let url = client().url_for(&request).unwrap();
        assert_eq!(url.query(), Some("categories=1&categories=2"));
    }

    #[test]
    fn test_storefront_url() {
        let request = EcwidRequest::storefront_post("/checkout/create");
        let url = client().url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://app.ecwid.com/storefront/api/v1/1003/checkout/create"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_only_tagged_gets_are_cacheable() {
        assert_eq!(
            EcwidRequest::get("/products")
                .tag(CacheTag::Products)
                .cache_tag(),
            Some(CacheTag::Products)
        );
        assert_eq!(EcwidRequest::get("/products").cache_tag(), None);
        assert_eq!(
            EcwidRequest::get("/products")
                .tag(CacheTag::Products)
                .no_store()
                .cache_tag(),
            None
        );
        assert_eq!(
            EcwidRequest::storefront_post("/checkout")
                .tag(CacheTag::Cart)
                .cache_tag(),
            None
        );
    }

    #[test]
    fn test_provider_error_uses_first_error() {
        let body = json!({"errors": [
            {"status": 404, "message": "Product not found"},
            {"status": 500, "message": "ignored"}
        ]});
        let err = provider_error(StatusCode::NOT_FOUND, &body).unwrap();
        assert!(matches!(
            err,
            EcwidError::Api { status: 404, ref message } if message == "Product not found"
        ));
    }

    #[test]
    fn test_provider_error_message_shape() {
        let body = json!({"errorMessage": "Invalid token", "errorCode": "INVALID_TOKEN"});
        let err = provider_error(StatusCode::FORBIDDEN, &body).unwrap();
        assert!(matches!(err, EcwidError::Api { status: 403, .. }));
    }

    #[test]
    fn test_provider_error_defaults_status_to_500() {
        let body = json!({"errors": [{"message": "boom"}]});
        let err = provider_error(StatusCode::OK, &body).unwrap();
        assert!(matches!(err, EcwidError::Api { status: 500, .. }));
    }

    #[test]
    fn test_regular_body_is_not_an_error() {
        assert!(provider_error(StatusCode::OK, &json!({"id": 1})).is_none());
        assert!(provider_error(StatusCode::OK, &json!([1, 2])).is_none());
    }

    #[test]
    fn test_currency_code_roundtrip() {
        let client = client();
        assert_eq!(client.currency_code().as_str(), "USD");
        client.set_currency_code(CurrencyCode::new("eur"));
        assert_eq!(client.clone().currency_code().as_str(), "EUR");
    }

    #[test]
    fn test_session_cookie_name() {
        assert_eq!(client().session_cookie_name(), "ec-1003-session");
    }
}
