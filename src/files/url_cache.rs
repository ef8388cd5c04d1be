use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::generator::UrlGenerator;
use super::key::{Delivery, UrlCacheKey};
use super::lookup::FileLookup;
use super::store::CacheStore;
use crate::config::AppConfig;
use crate::error::ServiceError;

/// Cache lifetime for a presigned storage URL: 90% of its validity, floored to whole seconds.
pub fn signed_cache_ttl(expiry: Duration) -> Duration {
    let secs = (u128::from(expiry.as_secs()) * 9 / 10) as u64;
    Duration::from_secs(secs)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileUrlSettings {
    /// Validity requested for presigned storage URLs
    pub signed_url_expiry: Duration,
    /// Cache lifetime for delivery-network and stable URLs
    pub default_ttl: Duration,
}

impl FileUrlSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            signed_url_expiry: config.storage.signed_url_expiry(),
            default_ttl: config.cache.file_url_ttl(),
        }
    }
}

/// Resolves file ids to URLs, caching each (file, signed, delivery) combination.
#[derive(Clone)]
pub struct FileUrlCache {
    store: Arc<dyn CacheStore>,
    lookup: Arc<dyn FileLookup>,
    generator: Arc<dyn UrlGenerator>,
    settings: FileUrlSettings,
}

impl FileUrlCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        lookup: Arc<dyn FileLookup>,
        generator: Arc<dyn UrlGenerator>,
        settings: FileUrlSettings,
    ) -> Self {
        Self {
            store,
            lookup,
            generator,
            settings,
        }
    }

    pub fn settings(&self) -> FileUrlSettings {
        self.settings
    }

    pub async fn resolve_url(&self, file_id: Uuid, signed: bool, via: Delivery) -> Result<String, ServiceError> {
        let key = UrlCacheKey::new(file_id, signed, via).to_string();

        if let Some(url) = self.store.get(&key).await? {
            debug!("File URL cache hit: {}", key);
            return Ok(url);
        }
        debug!("File URL cache miss: {}", key);

        let storage_key = self.lookup.storage_key(file_id).await?;

        let (url, ttl) = match (signed, via) {
            (true, Delivery::Storage) => {
                let expiry = self.settings.signed_url_expiry;
                let url = self
                    .generator
                    .signed_storage_url(&storage_key, expiry)
                    .await
                    .inspect_err(|e| error!("Failed to sign storage URL for {}: {}", file_id, e))?;
                (url, signed_cache_ttl(expiry))
            }
            (true, Delivery::Network) => {
                let url = self
                    .generator
                    .signed_delivery_url(&storage_key)
                    .inspect_err(|e| error!("Failed to sign delivery URL for {}: {}", file_id, e))?;
                (url, self.settings.default_ttl)
            }
            (false, via) => (self.generator.stable_url(&storage_key, via)?, self.settings.default_ttl),
        };

        if ttl.is_zero() {
            debug!("Not caching {}: TTL rounds to zero", key);
        } else {
            self.store.set(&key, &url, ttl).await?;
        }

        Ok(url)
    }

    /// Drop every cached URL for `file_id`, whatever combination it was resolved with.
    pub async fn invalidate(&self, file_id: Uuid) -> Result<(), ServiceError> {
        for key in UrlCacheKey::all_for(file_id) {
            self.store.delete(&key.to_string()).await?;
        }
        info!("Invalidated cached URLs for file {}", file_id);
        Ok(())
    }

    /// Invalidate the file a previously issued URL points at; returns its id.
    pub async fn invalidate_by_url(&self, url: &str) -> Result<Uuid, ServiceError> {
        let storage_key = self.generator.key_from_url(url)?;
        let file_id = self
            .lookup
            .file_id_for_key(&storage_key)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("No file stored at {}", storage_key)))?;

        self.invalidate(file_id).await?;
        Ok(file_id)
    }
}
