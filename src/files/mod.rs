//! File URL resolution with a TTL cache in front of the URL signers.
//!
//! A file can be served four ways: signed or not, straight from object storage
//! or through the delivery network. Each combination is cached under its own
//! [`UrlCacheKey`]; presigned storage URLs are cached for 90% of their
//! validity so a cached URL never outlives the signature.

pub mod generator;
pub mod key;
pub mod lookup;
pub mod store;
pub mod url_cache;

pub use generator::{CloudUrlGenerator, DeliverySigner, UrlGenerator};
pub use key::{Delivery, UrlCacheKey};
pub use lookup::{FileLookup, PgFileLookup};
pub use store::{CacheStore, MemoryCacheStore};
pub use url_cache::{signed_cache_ttl, FileUrlCache, FileUrlSettings};
