//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. Sessions only hold the
//! cart id and the Ecwid session token, both of which Ecwid can recreate,
//! so they live in a bounded moka cache that evicts idle sessions.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "storefront_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Maximum number of sessions kept in memory.
const MAX_SESSIONS: u64 = 100_000;

/// Session store backed by a moka cache.
///
/// Entries are dropped once idle for longer than the session expiry, and
/// the least recently used sessions are evicted past the capacity.
#[derive(Clone, Debug)]
pub struct MokaSessionStore {
    cache: Cache<Id, Record>,
}

impl MokaSessionStore {
    #[must_use]
    pub fn new(max_sessions: u64, time_to_idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(time_to_idle)
                .build(),
        }
    }
}

impl Default for MokaSessionStore {
    fn default() -> Self {
        Self::new(
            MAX_SESSIONS,
            Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs()),
        )
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer with an in-memory store.
///
/// Cookies are marked `Secure` unless the server binds to loopback, which
/// is only the case in local development.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaSessionStore> {
    let store = MokaSessionStore::default();
    let is_secure = !config.host.is_loopback();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
