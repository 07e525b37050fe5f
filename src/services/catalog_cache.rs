use async_trait::async_trait;
use tracing::debug;

/// Which cached catalog views an invalidation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogScope {
    Movie(i32),
    Series(i32),
}

/// Hook for whatever caches catalog listings in front of this crate.
#[async_trait]
pub trait CatalogCache: Send + Sync {
    async fn invalidate(&self, scope: CatalogScope);
}

/// Default hook when no cache sits in front of the catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingCatalogCache;

#[async_trait]
impl CatalogCache for LoggingCatalogCache {
    async fn invalidate(&self, scope: CatalogScope) {
        debug!("Catalog cache invalidated for {:?}", scope);
    }
}
