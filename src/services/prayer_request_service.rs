use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::PrayerRequest;
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::pagination::{paginate, PageRequest, PageResult};
use crate::query::{OrderBy, QuerySpec, Where};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerRequestFilter {
    pub is_answered: Option<bool>,
}

impl PrayerRequestFilter {
    pub fn to_query(&self) -> QuerySpec {
        QuerySpec::new()
            .filter(self.is_answered.map(|answered| Where::eq("is_answered", answered)))
            .order_by(OrderBy::desc("created_at"))
    }
}

pub struct PrayerRequestService {
    requests: PgTable<PrayerRequest>,
}

impl PrayerRequestService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            requests: PgTable::new(PrayerRequest::TABLE, pool),
        }
    }

    pub async fn list(
        &self,
        request: PageRequest,
        filter: &PrayerRequestFilter,
    ) -> Result<PageResult<PrayerRequest>, ServiceError> {
        Ok(paginate(&self.requests, request, filter.to_query()).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<PrayerRequest, ServiceError> {
        Ok(self.requests.find_404(id, None, "Prayer request").await?)
    }
}
