use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a file URL points: the storage bucket itself or the delivery network in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    #[default]
    Storage,
    Network,
}

impl Delivery {
    pub fn is_network(self) -> bool {
        matches!(self, Delivery::Network)
    }
}

impl FromStr for Delivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "storage" | "s3" => Ok(Delivery::Storage),
            "network" | "cdn" => Ok(Delivery::Network),
            other => Err(format!("unknown delivery '{}', expected storage or network", other)),
        }
    }
}

/// Cache key for one (file, signed, delivery) combination.
///
/// Renders as `file:{id}:{signed}:{network}`, e.g.
/// `file:5b0c…:true:false` for a presigned storage URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UrlCacheKey {
    pub file_id: Uuid,
    pub signed: bool,
    pub via: Delivery,
}

impl UrlCacheKey {
    pub fn new(file_id: Uuid, signed: bool, via: Delivery) -> Self {
        Self { file_id, signed, via }
    }

    /// Every key a file can be cached under.
    pub fn all_for(file_id: Uuid) -> [UrlCacheKey; 4] {
        [
            Self::new(file_id, false, Delivery::Storage),
            Self::new(file_id, true, Delivery::Storage),
            Self::new(file_id, false, Delivery::Network),
            Self::new(file_id, true, Delivery::Network),
        ]
    }
}

impl fmt::Display for UrlCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file:{}:{}:{}", self.file_id, self.signed, self.via.is_network())
    }
}
