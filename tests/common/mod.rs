#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use church_connect_api::error::ServiceError;
use church_connect_api::files::{
    CacheStore, Delivery, FileLookup, FileUrlCache, FileUrlSettings, MemoryCacheStore, UrlGenerator,
};
use church_connect_api::pagination::{CountArgs, FindManyArgs, PageSource};

/// In-memory rows served through the page window; records every call.
pub struct VecSource<T> {
    rows: Vec<T>,
    pub find_calls: Mutex<Vec<FindManyArgs>>,
    pub count_calls: Mutex<Vec<CountArgs>>,
}

impl<T> VecSource<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            find_calls: Mutex::new(Vec::new()),
            count_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> PageSource<T> for VecSource<T> {
    type Error = ServiceError;

    async fn find_many(&self, args: FindManyArgs) -> Result<Vec<T>, ServiceError> {
        let skip = usize::try_from(args.skip).unwrap_or(usize::MAX);
        let take = usize::try_from(args.take).unwrap_or(usize::MAX);
        let rows = self.rows.iter().skip(skip).take(take).cloned().collect();
        self.find_calls.lock().unwrap().push(args);
        Ok(rows)
    }

    async fn count(&self, args: CountArgs) -> Result<u64, ServiceError> {
        self.count_calls.lock().unwrap().push(args);
        Ok(self.rows.len() as u64)
    }
}

/// Fixed id -> storage key table.
#[derive(Default)]
pub struct StaticLookup {
    keys: HashMap<Uuid, String>,
    pub calls: AtomicUsize,
}

impl StaticLookup {
    pub fn with(entries: &[(Uuid, &str)]) -> Self {
        Self {
            keys: entries.iter().map(|(id, key)| (*id, key.to_string())).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FileLookup for StaticLookup {
    async fn storage_key(&self, file_id: Uuid) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys
            .get(&file_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("File not found"))
    }

    async fn file_id_for_key(&self, key: &str) -> Result<Option<Uuid>, ServiceError> {
        Ok(self.keys.iter().find(|(_, k)| k.as_str() == key).map(|(id, _)| *id))
    }
}

/// Issues distinguishable URLs and counts calls per generation path.
#[derive(Default)]
pub struct CountingGenerator {
    pub storage_signed: AtomicUsize,
    pub delivery_signed: AtomicUsize,
    pub stable: AtomicUsize,
    pub last_expiry: Mutex<Option<Duration>>,
    pub fail: bool,
}

impl CountingGenerator {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn upstream_calls(&self) -> usize {
        self.storage_signed.load(Ordering::SeqCst)
            + self.delivery_signed.load(Ordering::SeqCst)
            + self.stable.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlGenerator for CountingGenerator {
    async fn signed_storage_url(&self, key: &str, expires_in: Duration) -> Result<String, ServiceError> {
        if self.fail {
            return Err(ServiceError::upstream("signer unavailable"));
        }
        let n = self.storage_signed.fetch_add(1, Ordering::SeqCst);
        *self.last_expiry.lock().unwrap() = Some(expires_in);
        Ok(format!("https://media.s3.test/{}?X-Amz-Expires={}&n={}", key, expires_in.as_secs(), n))
    }

    fn signed_delivery_url(&self, key: &str) -> Result<String, ServiceError> {
        if self.fail {
            return Err(ServiceError::upstream("signer unavailable"));
        }
        let n = self.delivery_signed.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://cdn.test/{}?token=t{}", key, n))
    }

    fn stable_url(&self, key: &str, via: Delivery) -> Result<String, ServiceError> {
        self.stable.fetch_add(1, Ordering::SeqCst);
        Ok(match via {
            Delivery::Storage => format!("https://media.s3.test/{}", key),
            Delivery::Network => format!("https://cdn.test/{}", key),
        })
    }

    fn key_from_url(&self, url: &str) -> Result<String, ServiceError> {
        let rest = url
            .strip_prefix("https://media.s3.test/")
            .or_else(|| url.strip_prefix("https://cdn.test/"))
            .ok_or_else(|| ServiceError::validation(format!("foreign URL {}", url)))?;
        Ok(rest.split('?').next().unwrap_or_default().to_string())
    }
}

/// Cache wired to fakes, with handles kept for assertions.
pub struct Harness {
    pub cache: FileUrlCache,
    pub store: MemoryCacheStore,
    pub lookup: Arc<StaticLookup>,
    pub generator: Arc<CountingGenerator>,
}

pub fn harness(lookup: StaticLookup, generator: CountingGenerator) -> Harness {
    let settings = FileUrlSettings {
        signed_url_expiry: Duration::from_secs(3600),
        default_ttl: Duration::from_secs(600),
    };
    harness_with(lookup, generator, settings)
}

pub fn harness_with(lookup: StaticLookup, generator: CountingGenerator, settings: FileUrlSettings) -> Harness {
    let store = MemoryCacheStore::new();
    let lookup = Arc::new(lookup);
    let generator = Arc::new(generator);
    let cache = FileUrlCache::new(
        Arc::new(store.clone()) as Arc<dyn CacheStore>,
        lookup.clone(),
        generator.clone(),
        settings,
    );
    Harness { cache, store, lookup, generator }
}
