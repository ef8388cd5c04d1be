use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::error::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub storage: StorageConfig,
    pub delivery: DeliveryConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_page: u64,
    pub default_limit: u64,
    pub max_limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub signed_url_expiry_secs: u64,
}

/// Delivery network (CDN) in front of the bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub domain: Option<String>,
    pub signing_key: Option<String>,
    pub signed_url_expiry_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheBackend {
    /// Lives and dies with one process; for tests and embedders.
    Memory,
    Postgres,
}

impl CacheBackend {
    /// Whether entries outlive the process that wrote them.
    pub fn is_shared(&self) -> bool {
        matches!(self, CacheBackend::Postgres)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub file_url_ttl_secs: u64,
}

const ONE_HOUR: u64 = 60 * 60;
const ONE_DAY: u64 = 24 * ONE_HOUR;
/// S3 presigned URLs cannot live longer than a week.
const MAX_PRESIGN_SECS: u64 = 7 * ONE_DAY;
const MAX_EXPIRY_SECS: u64 = 365 * ONE_DAY;

impl StorageConfig {
    pub fn signed_url_expiry(&self) -> Duration {
        Duration::from_secs(self.signed_url_expiry_secs)
    }
}

impl DeliveryConfig {
    pub fn signed_url_expiry(&self) -> Duration {
        Duration::from_secs(self.signed_url_expiry_secs)
    }
}

impl CacheConfig {
    pub fn file_url_ttl(&self) -> Duration {
        Duration::from_secs(self.file_url_ttl_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs = v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        // Pagination overrides
        if let Ok(v) = env::var("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = v.parse().ok();
        }

        // Storage overrides
        if let Ok(v) = env::var("AWS_S3_BUCKET_NAME") {
            self.storage.bucket = Some(v);
        }
        if let Ok(v) = env::var("AWS_REGION") {
            self.storage.region = Some(v);
        }
        if let Ok(v) = env::var("AWS_S3_SIGNED_URL_EXPIRY_SECS") {
            self.storage.signed_url_expiry_secs = v.parse().unwrap_or(self.storage.signed_url_expiry_secs);
        }

        // Delivery network overrides
        if let Ok(v) = env::var("CDN_DOMAIN") {
            self.delivery.domain = Some(v);
        }
        if let Ok(v) = env::var("CDN_SIGNING_KEY") {
            self.delivery.signing_key = Some(v);
        }
        if let Ok(v) = env::var("CDN_SIGNED_URL_EXPIRY_SECS") {
            self.delivery.signed_url_expiry_secs = v.parse().unwrap_or(self.delivery.signed_url_expiry_secs);
        }

        // Cache overrides
        if let Ok(v) = env::var("FILE_CACHE_EXPIRY_SECS") {
            self.cache.file_url_ttl_secs = v.parse().unwrap_or(self.cache.file_url_ttl_secs);
        }
        match env::var("FILE_CACHE_BACKEND").as_deref() {
            Ok("postgres") | Ok("pg") => self.cache.backend = CacheBackend::Postgres,
            Ok("memory") => self.cache.backend = CacheBackend::Memory,
            _ => {}
        }

        self
    }

    /// Reject combinations that would let a cached URL outlive the URL itself.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.delivery.signed_url_expiry_secs <= self.cache.file_url_ttl_secs {
            return Err(ServiceError::configuration(format!(
                "delivery signed URL expiry ({}s) must exceed the file URL cache TTL ({}s)",
                self.delivery.signed_url_expiry_secs, self.cache.file_url_ttl_secs
            )));
        }
        if self.storage.signed_url_expiry_secs > MAX_PRESIGN_SECS {
            return Err(ServiceError::configuration(format!(
                "storage signed URL expiry ({}s) exceeds the {}s presign limit",
                self.storage.signed_url_expiry_secs, MAX_PRESIGN_SECS
            )));
        }
        if self.delivery.signed_url_expiry_secs > MAX_EXPIRY_SECS || self.cache.file_url_ttl_secs > MAX_EXPIRY_SECS {
            return Err(ServiceError::configuration(format!(
                "delivery expiry and cache TTL must not exceed {}s",
                MAX_EXPIRY_SECS
            )));
        }
        if self.pagination.default_limit == 0 || self.pagination.default_page == 0 {
            return Err(ServiceError::configuration("pagination defaults must be at least 1"));
        }
        if self.pagination.max_limit == Some(0) {
            return Err(ServiceError::configuration("pagination max_limit must be at least 1"));
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            pagination: PaginationConfig {
                default_page: 1,
                default_limit: 10,
                max_limit: Some(1000),
            },
            storage: StorageConfig {
                bucket: None,
                region: None,
                signed_url_expiry_secs: ONE_DAY,
            },
            delivery: DeliveryConfig {
                domain: None,
                signing_key: None,
                signed_url_expiry_secs: ONE_DAY,
            },
            cache: CacheConfig {
                backend: CacheBackend::Postgres,
                file_url_ttl_secs: ONE_HOUR,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            pagination: PaginationConfig {
                default_page: 1,
                default_limit: 10,
                max_limit: Some(500),
            },
            storage: StorageConfig {
                bucket: None,
                region: None,
                signed_url_expiry_secs: ONE_DAY,
            },
            delivery: DeliveryConfig {
                domain: None,
                signing_key: None,
                signed_url_expiry_secs: ONE_DAY,
            },
            cache: CacheConfig {
                backend: CacheBackend::Postgres,
                file_url_ttl_secs: ONE_HOUR,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            pagination: PaginationConfig {
                default_page: 1,
                default_limit: 10,
                max_limit: Some(100),
            },
            storage: StorageConfig {
                bucket: None,
                region: None,
                signed_url_expiry_secs: ONE_DAY,
            },
            delivery: DeliveryConfig {
                domain: None,
                signing_key: None,
                signed_url_expiry_secs: 7 * ONE_DAY,
            },
            cache: CacheConfig {
                backend: CacheBackend::Postgres,
                file_url_ttl_secs: 6 * ONE_HOUR,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
