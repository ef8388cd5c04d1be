use sqlx::PgPool;
use std::sync::Arc;

use crate::config::{AppConfig, CacheBackend};
use crate::database::{Database, PgCacheStore};
use crate::error::ServiceError;
use crate::files::{CacheStore, CloudUrlGenerator, FileUrlCache, FileUrlSettings, MemoryCacheStore, PgFileLookup};
use crate::pagination::{PageQuery, PageRequest};

/// Connections and collaborators shared by every command.
pub struct AppContext {
    pub config: &'static AppConfig,
    pub pool: PgPool,
}

impl AppContext {
    pub async fn connect(config: &'static AppConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        let pool = Database::connect(&config.database).await?;
        Ok(Self { config, pool })
    }

    /// Built on demand: storage credentials are only needed by commands that resolve URLs.
    pub async fn file_urls(&self) -> Result<FileUrlCache, ServiceError> {
        let store: Arc<dyn CacheStore> = match self.config.cache.backend {
            CacheBackend::Memory => {
                tracing::warn!("FILE_CACHE_BACKEND=memory: cached URLs are discarded when this command exits");
                Arc::new(MemoryCacheStore::new())
            }
            CacheBackend::Postgres => {
                let store = PgCacheStore::new(self.pool.clone());
                store.ensure_schema().await?;
                Arc::new(store)
            }
        };
        let generator = CloudUrlGenerator::from_config(self.config)?;
        tracing::debug!("Resolving file URLs with {:?} cache and {:?}", self.config.cache.backend, generator);

        Ok(FileUrlCache::new(
            store,
            Arc::new(PgFileLookup::new(self.pool.clone())),
            Arc::new(generator),
            FileUrlSettings::from_config(self.config),
        ))
    }

    /// Invalidation against a per-process cache would report success without touching anything.
    pub fn require_shared_cache(&self) -> Result<(), ServiceError> {
        require_shared_cache(self.config.cache.backend)
    }

    pub fn page_request(&self, page: Option<u64>, limit: Option<u64>) -> Result<PageRequest, ServiceError> {
        PageQuery::new(page, limit).resolve(&self.config.pagination)
    }
}

fn require_shared_cache(backend: CacheBackend) -> Result<(), ServiceError> {
    if backend.is_shared() {
        Ok(())
    } else {
        Err(ServiceError::configuration(
            "the memory cache backend is private to this process; set FILE_CACHE_BACKEND=postgres to invalidate shared entries",
        ))
    }
}
