use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use percent_encoding::percent_decode_str;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::key::Delivery;
use crate::config::AppConfig;
use crate::error::ServiceError;

/// Produces file URLs for storage keys.
#[async_trait]
pub trait UrlGenerator: Send + Sync {
    /// Time-limited URL straight from object storage.
    async fn signed_storage_url(&self, key: &str, expires_in: Duration) -> Result<String, ServiceError>;

    /// Time-limited URL through the delivery network, using its own expiry.
    fn signed_delivery_url(&self, key: &str) -> Result<String, ServiceError>;

    fn stable_url(&self, key: &str, via: Delivery) -> Result<String, ServiceError>;

    /// Storage key a URL produced by this generator points at.
    fn key_from_url(&self, url: &str) -> Result<String, ServiceError>;
}

/// Token signing for delivery-network URLs.
///
/// `token = base64url(sha256(signing_key + path + expires))`, appended as
/// `?expires={unix}&token={token}`.
#[derive(Clone)]
pub struct DeliverySigner {
    domain: String,
    signing_key: String,
    expires_in: Duration,
}

impl std::fmt::Debug for DeliverySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliverySigner")
            .field("domain", &self.domain)
            .field("signing_key", &"***")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl DeliverySigner {
    pub fn new(domain: impl Into<String>, signing_key: impl Into<String>, expires_in: Duration) -> Self {
        Self {
            domain: domain.into(),
            signing_key: signing_key.into(),
            expires_in,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }

    /// Unsigned delivery URL for `key`.
    pub fn url(&self, key: &str) -> Result<Url, ServiceError> {
        key_url(&format!("https://{}/", self.domain), key)
    }

    /// Signed URL valid until `expires` (unix seconds).
    pub fn sign_at(&self, key: &str, expires: i64) -> Result<String, ServiceError> {
        let mut url = self.url(key)?;
        let token = self.token(url.path(), expires);
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string())
            .append_pair("token", &token);
        Ok(url.into())
    }

    pub fn sign(&self, key: &str) -> Result<String, ServiceError> {
        let expires = i64::try_from(self.expires_in.as_secs())
            .ok()
            .and_then(|secs| chrono::Utc::now().timestamp().checked_add(secs))
            .ok_or_else(|| ServiceError::validation(format!("delivery expiry out of range: {:?}", self.expires_in)))?;
        self.sign_at(key, expires)
    }

    fn token(&self, path: &str, expires: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.signing_key.as_bytes());
        hasher.update(path.as_bytes());
        hasher.update(expires.to_string().as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

/// S3 for storage URLs, an optional delivery network in front of it.
#[derive(Clone)]
pub struct CloudUrlGenerator {
    signer: Arc<dyn Signer>,
    bucket: String,
    delivery: Option<DeliverySigner>,
}

impl std::fmt::Debug for CloudUrlGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudUrlGenerator")
            .field("bucket", &self.bucket)
            .field("delivery", &self.delivery)
            .finish()
    }
}

impl CloudUrlGenerator {
    pub fn new(signer: Arc<dyn Signer>, bucket: impl Into<String>, delivery: Option<DeliverySigner>) -> Self {
        Self {
            signer,
            bucket: bucket.into(),
            delivery,
        }
    }

    /// Credentials come from the usual `AWS_*` environment variables.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let bucket = config
            .storage
            .bucket
            .as_deref()
            .ok_or_else(|| ServiceError::configuration("AWS_S3_BUCKET_NAME is not set"))?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = &config.storage.region {
            builder = builder.with_region(region);
        }
        let store = builder
            .build()
            .map_err(|e| ServiceError::configuration(format!("Failed to create S3 client: {}", e)))?;

        let delivery = match (&config.delivery.domain, &config.delivery.signing_key) {
            (Some(domain), Some(signing_key)) => {
                Some(DeliverySigner::new(domain, signing_key, config.delivery.signed_url_expiry()))
            }
            (Some(_), None) => {
                tracing::warn!("CDN_DOMAIN is set without CDN_SIGNING_KEY; delivery URLs disabled");
                None
            }
            _ => None,
        };

        Ok(Self::new(Arc::new(store), bucket, delivery))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn delivery(&self) -> Result<&DeliverySigner, ServiceError> {
        self.delivery
            .as_ref()
            .ok_or_else(|| ServiceError::configuration("delivery network is not configured"))
    }
}

#[async_trait]
impl UrlGenerator for CloudUrlGenerator {
    async fn signed_storage_url(&self, key: &str, expires_in: Duration) -> Result<String, ServiceError> {
        let path = ObjectPath::from(key);
        let url = self
            .signer
            .signed_url(reqwest::Method::GET, &path, expires_in)
            .await
            .map_err(|e| ServiceError::upstream(format!("Failed to presign {}: {}", key, e)))?;
        Ok(url.into())
    }

    fn signed_delivery_url(&self, key: &str) -> Result<String, ServiceError> {
        self.delivery()?.sign(key)
    }

    fn stable_url(&self, key: &str, via: Delivery) -> Result<String, ServiceError> {
        let url = match via {
            Delivery::Storage => key_url(&format!("https://{}.s3.amazonaws.com/", self.bucket), key)?,
            Delivery::Network => self.delivery()?.url(key)?,
        };
        Ok(url.into())
    }

    fn key_from_url(&self, raw: &str) -> Result<String, ServiceError> {
        let url = Url::parse(raw).map_err(|e| ServiceError::validation(format!("Invalid URL '{}': {}", raw, e)))?;
        let mut segments = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default();

        // Path-style storage URLs carry the bucket as the first segment
        let host = url.host_str().unwrap_or_default();
        let virtual_hosted = host.starts_with(&format!("{}.", self.bucket));
        let delivery_host = self.delivery.as_ref().is_some_and(|d| d.domain() == host);
        if !virtual_hosted && !delivery_host && segments.first() == Some(&self.bucket.as_str()) {
            segments.remove(0);
        }

        let decoded = segments
            .iter()
            .map(|seg| percent_decode_str(seg).decode_utf8().map(|s| s.into_owned()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ServiceError::validation(format!("URL path is not valid UTF-8: {}", raw)))?;

        if decoded.is_empty() {
            return Err(ServiceError::validation(format!("URL has no storage key: {}", raw)));
        }
        Ok(decoded.join("/"))
    }
}

fn key_url(base: &str, key: &str) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base).map_err(|e| ServiceError::configuration(format!("Invalid base URL {}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ServiceError::configuration(format!("Base URL cannot carry a path: {}", base)))?
        .pop_if_empty()
        .extend(key.split('/'));
    Ok(url)
}
