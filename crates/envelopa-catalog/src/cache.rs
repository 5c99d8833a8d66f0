//! # Catalog Cache
//!
//! In-memory TTL cache over a [`CatalogSource`].
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Cache Lifecycle                              │
//! │                                                                         │
//! │  The quote form recomputes totals on EVERY keystroke, and every        │
//! │  recompute needs the service catalog. Hitting the backend each time    │
//! │  is absurd; persisting the catalog forever (the old durable            │
//! │  local-storage cache) served stale prices for days.                    │
//! │                                                                         │
//! │  This cache is the middle ground:                                      │
//! │                                                                         │
//! │    services() ──► snapshot younger than TTL? ──► serve from memory     │
//! │                         │                                               │
//! │                         ▼ no (or never fetched)                         │
//! │                   fetch both catalogs, stamp, serve                     │
//! │                                                                         │
//! │    invalidate() ──► drop snapshot (next read fetches)                  │
//! │    refresh()    ──► fetch now, regardless of age                       │
//! │                                                                         │
//! │  In-memory only. A new session always starts with a fresh fetch.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! The snapshot sits behind a `tokio::sync::RwLock`: concurrent totals
//! recomputations read in parallel; only a refresh takes the write lock.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info};

use envelopa_core::types::{CatalogProduct, ServiceCatalog};

use crate::error::CatalogResult;
use crate::source::CatalogSource;

/// Default snapshot lifetime. Catalog prices change a few times a day at
/// most; five minutes keeps a quoting session honest without hammering
/// the backend.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// One fetched generation of both catalogs.
#[derive(Debug, Clone)]
struct Snapshot {
    products: Vec<CatalogProduct>,
    services: ServiceCatalog,
    fetched_at: Instant,
}

/// TTL cache over a catalog source.
///
/// ## Usage
/// ```rust,ignore
/// let cache = CatalogCache::new(rest_catalog, DEFAULT_TTL);
///
/// // Before recomputing totals:
/// let services = cache.services().await?;
/// let totals = draft.totals(&services);
///
/// // After the admin edits a service price:
/// cache.invalidate().await;
/// ```
#[derive(Debug)]
pub struct CatalogCache<S> {
    source: S,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<S: CatalogSource> CatalogCache<S> {
    /// Creates a cache over the given source.
    pub fn new(source: S, ttl: Duration) -> Self {
        CatalogCache {
            source,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Creates a cache with the default TTL.
    pub fn with_default_ttl(source: S) -> Self {
        Self::new(source, DEFAULT_TTL)
    }

    /// Returns the eligible service catalog, fetching if stale.
    pub async fn services(&self) -> CatalogResult<ServiceCatalog> {
        Ok(self.fresh_snapshot().await?.services)
    }

    /// Returns the product catalog, fetching if stale.
    pub async fn products(&self) -> CatalogResult<Vec<CatalogProduct>> {
        Ok(self.fresh_snapshot().await?.products)
    }

    /// Forces a fetch now, regardless of snapshot age.
    pub async fn refresh(&self) -> CatalogResult<()> {
        let snapshot = self.fetch().await?;
        *self.snapshot.write().await = Some(snapshot);
        Ok(())
    }

    /// Drops the snapshot; the next read will fetch.
    ///
    /// Called after any local catalog mutation (price edit, new service)
    /// so the quoting session never prices against known-stale data.
    pub async fn invalidate(&self) {
        info!("catalog cache invalidated");
        *self.snapshot.write().await = None;
    }

    /// Whether a live snapshot is currently held.
    pub async fn is_fresh(&self) -> bool {
        match &*self.snapshot.read().await {
            Some(snapshot) => snapshot.fetched_at.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Serves the snapshot, refreshing it first when missing or expired.
    async fn fresh_snapshot(&self) -> CatalogResult<Snapshot> {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = &*guard {
                if snapshot.fetched_at.elapsed() < self.ttl {
                    debug!(
                        services = snapshot.services.len(),
                        products = snapshot.products.len(),
                        "catalog cache hit"
                    );
                    return Ok(snapshot.clone());
                }
            }
        }

        // Take the write lock and re-check: another task may have
        // refreshed while we waited.
        let mut guard = self.snapshot.write().await;
        if let Some(snapshot) = &*guard {
            if snapshot.fetched_at.elapsed() < self.ttl {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = self.fetch().await?;
        *guard = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn fetch(&self) -> CatalogResult<Snapshot> {
        let products = self.source.fetch_products().await?;
        let raw_services = self.source.fetch_services().await?;
        let services = ServiceCatalog::from_services(raw_services);

        info!(
            products = products.len(),
            services = services.len(),
            "catalog refreshed"
        );

        Ok(Snapshot {
            products,
            services,
            fetched_at: Instant::now(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use envelopa_core::types::{AdditionalService, ServiceUnit, SERVICE_TYPE_WRAP};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts fetches.
    struct FakeSource {
        fetches: AtomicUsize,
        fail: bool,
    }

    impl FakeSource {
        fn new() -> Self {
            FakeSource {
                fetches: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            FakeSource {
                fetches: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl CatalogSource for &FakeSource {
        async fn fetch_products(&self) -> CatalogResult<Vec<CatalogProduct>> {
            if self.fail {
                return Err(CatalogError::unavailable("backend down"));
            }
            Ok(vec![])
        }

        async fn fetch_services(&self) -> CatalogResult<Vec<AdditionalService>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                AdditionalService {
                    id: "1".to_string(),
                    name: "Aplicação".to_string(),
                    price_cents: 500,
                    unit: ServiceUnit::SquareMeter,
                    category: None,
                    is_active: true,
                    service_type: SERVICE_TYPE_WRAP.to_string(),
                },
                AdditionalService {
                    id: "2".to_string(),
                    name: "Inativo".to_string(),
                    price_cents: 100,
                    unit: ServiceUnit::Unit,
                    category: None,
                    is_active: false,
                    service_type: SERVICE_TYPE_WRAP.to_string(),
                },
            ])
        }
    }

    /// Run tests with RUST_LOG=debug to see cache hit/refresh events.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    #[tokio::test]
    async fn test_serves_from_snapshot_within_ttl() {
        init_tracing();
        let source = FakeSource::new();
        let cache = CatalogCache::new(&source, Duration::from_secs(60));

        cache.services().await.unwrap();
        cache.services().await.unwrap();
        cache.products().await.unwrap();

        assert_eq!(source.fetch_count(), 1);
        assert!(cache.is_fresh().await);
    }

    #[tokio::test]
    async fn test_refetches_after_expiry() {
        let source = FakeSource::new();
        // Zero TTL: every read is stale
        let cache = CatalogCache::new(&source, Duration::ZERO);

        cache.services().await.unwrap();
        cache.services().await.unwrap();

        assert_eq!(source.fetch_count(), 2);
        assert!(!cache.is_fresh().await);
    }

    #[tokio::test]
    async fn test_invalidate_forces_next_fetch() {
        let source = FakeSource::new();
        let cache = CatalogCache::new(&source, Duration::from_secs(60));

        cache.services().await.unwrap();
        cache.invalidate().await;
        assert!(!cache.is_fresh().await);

        cache.services().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_filters_ineligible_services() {
        let source = FakeSource::new();
        let cache = CatalogCache::new(&source, Duration::from_secs(60));

        let services = cache.services().await.unwrap();
        assert_eq!(services.len(), 1);
        assert!(services.find("1").is_some());
        assert!(services.find("2").is_none()); // inactive, filtered out
    }

    #[tokio::test]
    async fn test_source_failure_surfaces() {
        let source = FakeSource::failing();
        let cache = CatalogCache::new(&source, Duration::from_secs(60));

        let err = cache.services().await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable { .. }));
        assert!(!cache.is_fresh().await);
    }

    #[tokio::test]
    async fn test_explicit_refresh_refetches() {
        let source = FakeSource::new();
        let cache = CatalogCache::new(&source, Duration::from_secs(60));

        cache.services().await.unwrap();
        cache.refresh().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }
}
