//! Webhook-driven cache revalidation.
//!
//! Ecwid retries any webhook that is not answered with a 200, so every
//! outcome here (bad secret, unknown event, malformed body) is a 200. Only
//! the body tells whether anything was revalidated.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{debug, error, info, instrument, warn};

use crate::ecwid::{CacheTag, EcwidClient};

/// Header carrying the shared revalidation secret.
pub const SECRET_HEADER: &str = "X-Ecwid-Revalidation-Secret";

/// Group of Ecwid events that invalidate the same cache tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookTopic {
    Collections,
    Products,
    Profile,
}

impl WebhookTopic {
    /// Classify an Ecwid `eventType`. `None` for events that need no
    /// revalidation.
    #[must_use]
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "category.created" | "category.deleted" | "category.updated" => {
                Some(Self::Collections)
            }
            "product.created" | "product.deleted" | "product.updated" => Some(Self::Products),
            "profile.updated" => Some(Self::Profile),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag(self) -> CacheTag {
        match self {
            Self::Collections => CacheTag::Collections,
            Self::Products => CacheTag::Products,
            Self::Profile => CacheTag::Profile,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEvent {
    event_type: String,
}

/// JSON body of the webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevalidationResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidated: Option<bool>,
    /// Epoch milliseconds at which revalidation happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<i64>,
}

impl RevalidationResponse {
    /// Acknowledged, nothing revalidated.
    #[must_use]
    pub const fn acknowledged() -> Self {
        Self {
            status: 200,
            revalidated: None,
            now: None,
        }
    }

    #[must_use]
    pub fn revalidated() -> Self {
        Self {
            status: 200,
            revalidated: Some(true),
            now: Some(chrono::Utc::now().timestamp_millis()),
        }
    }
}

/// Compare the provided secret with the configured one in constant time.
#[must_use]
pub fn verify_secret(expected: &SecretString, provided: Option<&str>) -> bool {
    let Some(provided) = provided else {
        return false;
    };
    let expected = expected.expose_secret();
    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
}

/// Handle one revalidation webhook.
///
/// The secret is checked before the body is looked at. A `profile.updated`
/// event also reloads the store currency.
#[instrument(skip_all)]
pub async fn revalidate(
    client: &EcwidClient,
    expected_secret: &SecretString,
    provided_secret: Option<&str>,
    body: &[u8],
) -> RevalidationResponse {
    if !verify_secret(expected_secret, provided_secret) {
        error!("Invalid revalidation secret");
        return RevalidationResponse::acknowledged();
    }

    let event: WebhookEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Malformed revalidation webhook body");
            return RevalidationResponse::acknowledged();
        }
    };

    let Some(topic) = WebhookTopic::from_event_type(&event.event_type) else {
        debug!(event_type = %event.event_type, "No revalidation needed");
        return RevalidationResponse::acknowledged();
    };

    client.revalidate_tag(topic.tag()).await;

    if topic == WebhookTopic::Profile {
        client.init_currency_code().await;
    }

    info!(event_type = %event.event_type, tag = %topic.tag(), "Revalidated from webhook");
    RevalidationResponse::revalidated()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_classification() {
        assert_eq!(
            WebhookTopic::from_event_type("category.updated"),
            Some(WebhookTopic::Collections)
        );
        assert_eq!(
            WebhookTopic::from_event_type("product.deleted"),
            Some(WebhookTopic::Products)
        );
        assert_eq!(
            WebhookTopic::from_event_type("profile.updated"),
            Some(WebhookTopic::Profile)
        );
        assert_eq!(WebhookTopic::from_event_type("order.created"), None);
        assert_eq!(WebhookTopic::from_event_type(""), None);
    }

    #[test]
    fn test_topic_tags() {
        assert_eq!(WebhookTopic::Collections.tag(), CacheTag::Collections);
        assert_eq!(WebhookTopic::Products.tag(), CacheTag::Products);
        assert_eq!(WebhookTopic::Profile.tag(), CacheTag::Profile);
    }

    #[test]
    fn test_verify_secret() {
        let expected = SecretString::from("kR8#pW2!zQ5@mN7$");
        assert!(verify_secret(&expected, Some("kR8#pW2!zQ5@mN7$")));
        assert!(!verify_secret(&expected, Some("kR8#pW2!zQ5@mN7")));
        assert!(!verify_secret(&expected, Some("")));
        assert!(!verify_secret(&expected, None));
    }

    #[test]
    fn test_empty_configured_secret_never_matches() {
        assert!(!verify_secret(&SecretString::from(""), Some("")));
    }

    #[test]
    fn test_response_bodies() {
        assert_eq!(
            serde_json::to_value(RevalidationResponse::acknowledged()).unwrap(),
            json!({"status": 200})
        );

        let body = serde_json::to_value(RevalidationResponse::revalidated()).unwrap();
        assert_eq!(body["status"], 200);
        assert_eq!(body["revalidated"], true);
        assert!(body["now"].as_i64().unwrap() > 0);
    }
}
