//! Tag-scoped response cache.
//!
//! Each cache tag owns its own `moka` cache, so revalidating a tag is a
//! plain `invalidate_all` on that cache and never touches the others.

use std::fmt;
use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

/// Label grouping cached responses for revalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Collections,
    Products,
    Cart,
    Profile,
}

impl CacheTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collections => "collections",
            Self::Products => "products",
            Self::Cart => "cart",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed response bodies keyed by request, one cache per tag.
///
/// The `cart` tag has no cache: cart responses are session-scoped and
/// always fetched fresh.
pub(super) struct ResponseCache {
    collections: Cache<String, Value>,
    products: Cache<String, Value>,
    profile: Cache<String, Value>,
}

impl ResponseCache {
    pub(super) fn new(ttl: Duration) -> Self {
        let build = || {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(ttl)
                .build()
        };

        Self {
            collections: build(),
            products: build(),
            profile: build(),
        }
    }

    const fn for_tag(&self, tag: CacheTag) -> Option<&Cache<String, Value>> {
        match tag {
            CacheTag::Collections => Some(&self.collections),
            CacheTag::Products => Some(&self.products),
            CacheTag::Profile => Some(&self.profile),
            CacheTag::Cart => None,
        }
    }

    pub(super) const fn is_cacheable(&self, tag: CacheTag) -> bool {
        self.for_tag(tag).is_some()
    }

    pub(super) async fn get(&self, tag: CacheTag, key: &str) -> Option<Value> {
        match self.for_tag(tag) {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    pub(super) async fn insert(&self, tag: CacheTag, key: String, value: Value) {
        if let Some(cache) = self.for_tag(tag) {
            cache.insert(key, value).await;
        }
    }

    /// Drop every entry stored under `tag`.
    pub(super) async fn invalidate(&self, tag: CacheTag) {
        if let Some(cache) = self.for_tag(tag) {
            cache.invalidate_all();
            cache.run_pending_tasks().await;
        }
    }
}
