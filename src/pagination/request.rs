use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::error::ServiceError;

/// Page number and size for one pagination call. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Result<Self, ServiceError> {
        if page < 1 {
            return Err(ServiceError::field_validation("page", "page must not be less than 1"));
        }
        if limit < 1 {
            return Err(ServiceError::field_validation("limit", "limit must not be less than 1"));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Rows to skip before this page starts
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn with_page(self, page: u64) -> Result<Self, ServiceError> {
        Self::new(page, self.limit)
    }

    pub fn with_limit(self, limit: u64) -> Result<Self, ServiceError> {
        Self::new(self.page, limit)
    }

    /// Clamp the page size to an optional upper bound.
    pub fn capped(self, max_limit: Option<u64>) -> Self {
        match max_limit {
            Some(max) if max >= 1 && self.limit > max => {
                tracing::warn!("Limit {} exceeds max {}, capping to max", self.limit, max);
                Self { page: self.page, limit: max }
            }
            _ => self,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Raw `page`/`limit` pair as it arrives from a caller, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self { page, limit }
    }

    /// Fill in configured defaults, validate, and apply the configured cap.
    pub fn resolve(self, config: &PaginationConfig) -> Result<PageRequest, ServiceError> {
        let request = PageRequest::new(
            self.page.unwrap_or(config.default_page),
            self.limit.unwrap_or(config.default_limit),
        )?;
        Ok(request.capped(config.max_limit))
    }
}
