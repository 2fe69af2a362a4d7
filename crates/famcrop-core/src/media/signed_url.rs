//! Signed-URL resolution with a bounded TTL cache and request coalescing.
//!
//! Concurrent lookups of the same key share one signer call: the first caller
//! stores a [`Shared`] future in the in-flight table and later callers await a
//! clone of it. The task removes itself from the table when it finishes.
//!
//! When the cache is full, expired entries are dropped first and then the
//! oldest stored entry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture, Shared};

use super::{MediaError, StorageRef};
use crate::clock::Clock;
use crate::config::MediaCacheConfig;

/// Produces time-limited URLs for stored objects.
#[allow(async_fn_in_trait)]
pub trait UrlSigner {
    async fn sign(
        &self,
        reference: &StorageRef,
        expires_in: Option<u32>,
    ) -> Result<String, MediaError>;
}

type PendingUrl = Shared<LocalBoxFuture<'static, String>>;

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    expires_at: u64,
    stored: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CachedUrl>,
    in_flight: HashMap<String, PendingUrl>,
    next_stored: u64,
}

impl CacheState {
    fn store(&mut self, key: String, url: String, now: u64, expires_at: u64, max_entries: usize) {
        self.entries.retain(|_, entry| entry.expires_at > now);

        if !self.entries.contains_key(&key) && self.entries.len() >= max_entries.max(1) {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored)
                .map(|(key, _)| key.clone())
            {
                self.entries.remove(&oldest);
            }
        }

        self.next_stored += 1;
        self.entries.insert(
            key,
            CachedUrl {
                url,
                expires_at,
                stored: self.next_stored,
            },
        );
    }
}

/// Resolves media values to display URLs.
pub struct SignedUrlCache<S> {
    signer: Rc<S>,
    config: MediaCacheConfig,
    clock: Clock,
    state: Rc<RefCell<CacheState>>,
}

impl<S: UrlSigner + 'static> SignedUrlCache<S> {
    pub fn new(signer: S, config: MediaCacheConfig, clock: Clock) -> Self {
        Self {
            signer: Rc::new(signer),
            config,
            clock,
            state: Rc::new(RefCell::new(CacheState::default())),
        }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Number of cached URLs, expired ones included.
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a stored value to something an `<img src>` can load.
    ///
    /// Empty input gives an empty string and plain URLs pass through.
    /// Storage references are signed, served from cache while fresh.
    /// Signing failures give an empty string and are not cached.
    pub async fn resolve(&self, raw: &str, expires_in: Option<u32>) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }
        let Some(reference) = StorageRef::parse(raw) else {
            return raw.to_string();
        };

        let expires_in = expires_in.filter(|secs| *secs > 0);
        let key = match expires_in {
            Some(secs) => format!("{raw}|{secs}"),
            None => format!("{raw}|"),
        };

        let pending = {
            let mut state = self.state.borrow_mut();
            let now = (self.clock)();
            if let Some(cached) = state.entries.get(&key) {
                if cached.expires_at > now && !cached.url.is_empty() {
                    return cached.url.clone();
                }
            }

            let existing = state.in_flight.get(&key).cloned();
            match existing {
                Some(pending) => pending,
                None => {
                    let pending = self.spawn_sign(key.clone(), reference, expires_in, now);
                    state.in_flight.insert(key, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    fn spawn_sign(
        &self,
        key: String,
        reference: StorageRef,
        expires_in: Option<u32>,
        requested_at: u64,
    ) -> PendingUrl {
        let signer = Rc::clone(&self.signer);
        let state = Rc::clone(&self.state);
        let clock = Rc::clone(&self.clock);
        let ttl_ms = self.config.ttl_ms;
        let max_entries = self.config.max_entries;

        async move {
            let result = signer.sign(&reference, expires_in).await;

            let mut state = state.borrow_mut();
            state.in_flight.remove(&key);

            match result {
                Ok(url) => {
                    // Expiry counts from the request, not from when signing finished.
                    if !url.is_empty() && ttl_ms > 0 {
                        let expires_at = requested_at.saturating_add(ttl_ms);
                        state.store(key, url.clone(), clock(), expires_at, max_entries);
                    }
                    url
                }
                Err(e) => {
                    log::warn!("failed to sign {reference}: {e}");
                    String::new()
                }
            }
        }
        .boxed_local()
        .shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Signs by formatting, after yielding once so calls can overlap.
    #[derive(Default)]
    struct CountingSigner {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl UrlSigner for CountingSigner {
        async fn sign(
            &self,
            reference: &StorageRef,
            expires_in: Option<u32>,
        ) -> Result<String, MediaError> {
            self.calls.set(self.calls.get() + 1);
            tokio::task::yield_now().await;
            if self.fail.get() {
                return Err(MediaError::Sign("bucket offline".to_string()));
            }
            Ok(format!(
                "https://storage.example/{}/{}?e={}&n={}",
                reference.bucket,
                reference.object_path,
                expires_in.unwrap_or(3600),
                self.calls.get()
            ))
        }
    }

    fn manual_clock() -> (Rc<Cell<u64>>, Clock) {
        let now = Rc::new(Cell::new(1_000));
        let handle = Rc::clone(&now);
        (now, Rc::new(move || handle.get()))
    }

    fn cache(config: MediaCacheConfig) -> (Rc<Cell<u64>>, SignedUrlCache<CountingSigner>) {
        let (now, clock) = manual_clock();
        (now, SignedUrlCache::new(CountingSigner::default(), config, clock))
    }

    #[tokio::test]
    async fn test_empty_and_plain_values() {
        let (_, cache) = cache(MediaCacheConfig::default());
        assert_eq!(cache.resolve("", None).await, "");
        assert_eq!(cache.resolve("   ", None).await, "");
        assert_eq!(cache.resolve("/uploads/a.jpg", None).await, "/uploads/a.jpg");
        assert_eq!(cache.resolve("sb://bucket", None).await, "sb://bucket");
        assert_eq!(cache.signer().calls.get(), 0);
    }

    #[tokio::test]
    async fn test_cached_until_expiry() {
        let (now, cache) = cache(MediaCacheConfig::default());

        let first = cache.resolve("sb://media/a.jpg", None).await;
        let second = cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(first, second);
        assert_eq!(cache.signer().calls.get(), 1);

        now.set(now.get() + 120_000);
        let third = cache.resolve("sb://media/a.jpg", None).await;
        assert_ne!(first, third);
        assert_eq!(cache.signer().calls.get(), 2);
    }

    #[tokio::test]
    async fn test_expires_in_is_part_of_key() {
        let (_, cache) = cache(MediaCacheConfig::default());
        cache.resolve("sb://media/a.jpg", Some(60)).await;
        cache.resolve("sb://media/a.jpg", Some(600)).await;
        cache.resolve("sb://media/a.jpg", Some(0)).await;
        cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(cache.signer().calls.get(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_requests_coalesce() {
        let (_, cache) = cache(MediaCacheConfig::default());

        let (a, b) = futures_util::future::join(
            cache.resolve("sb://media/a.jpg", None),
            cache.resolve("sb://media/a.jpg", None),
        )
        .await;

        assert_eq!(a, b);
        assert!(!a.is_empty());
        assert_eq!(cache.signer().calls.get(), 1);
        assert!(cache.state.borrow().in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        let (_, cache) = cache(MediaCacheConfig::default());
        cache.signer().fail.set(true);

        assert_eq!(cache.resolve("sb://media/a.jpg", None).await, "");
        assert!(cache.is_empty());

        cache.signer().fail.set(false);
        assert!(!cache.resolve("sb://media/a.jpg", None).await.is_empty());
        assert_eq!(cache.signer().calls.get(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_caching() {
        let (_, cache) = cache(MediaCacheConfig {
            ttl_ms: 0,
            max_entries: 10,
        });
        cache.resolve("sb://media/a.jpg", None).await;
        cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(cache.signer().calls.get(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let (_, cache) = cache(MediaCacheConfig {
            ttl_ms: 60_000,
            max_entries: 2,
        });

        cache.resolve("sb://media/a.jpg", None).await;
        cache.resolve("sb://media/b.jpg", None).await;
        // A hit does not refresh a's position.
        cache.resolve("sb://media/a.jpg", None).await;
        cache.resolve("sb://media/c.jpg", None).await;
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.signer().calls.get(), 3);

        cache.resolve("sb://media/b.jpg", None).await;
        assert_eq!(cache.signer().calls.get(), 3);

        cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(cache.signer().calls.get(), 4);
    }

    #[tokio::test]
    async fn test_expired_entries_pruned_on_store() {
        let (now, cache) = cache(MediaCacheConfig {
            ttl_ms: 1_000,
            max_entries: 10,
        });

        cache.resolve("sb://media/a.jpg", None).await;
        cache.resolve("sb://media/b.jpg", None).await;
        now.set(now.get() + 5_000);
        cache.resolve("sb://media/c.jpg", None).await;

        assert_eq!(cache.len(), 1);
    }

    /// Advances the shared clock while signing, like a slow network call.
    struct SlowSigner {
        now: Rc<Cell<u64>>,
        latency_ms: u64,
        calls: Cell<usize>,
    }

    impl UrlSigner for SlowSigner {
        async fn sign(
            &self,
            reference: &StorageRef,
            _expires_in: Option<u32>,
        ) -> Result<String, MediaError> {
            self.calls.set(self.calls.get() + 1);
            self.now.set(self.now.get() + self.latency_ms);
            Ok(format!("https://storage.example/{}", reference.object_path))
        }
    }

    #[tokio::test]
    async fn test_ttl_counts_from_request_start() {
        let (now, clock) = manual_clock();
        let cache = SignedUrlCache::new(
            SlowSigner {
                now: Rc::clone(&now),
                latency_ms: 500,
                calls: Cell::new(0),
            },
            MediaCacheConfig {
                ttl_ms: 1_000,
                max_entries: 10,
            },
            clock,
        );

        cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(now.get(), 1_500);

        now.set(1_999);
        cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(cache.signer().calls.get(), 1);

        // Requested at 1000 with a 1000ms TTL, so stale at 2000 even though
        // signing only finished at 1500.
        now.set(2_000);
        cache.resolve("sb://media/a.jpg", None).await;
        assert_eq!(cache.signer().calls.get(), 2);
    }
}
