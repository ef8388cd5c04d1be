use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Testimony;
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::pagination::{paginate, PageRequest, PageResult};
use crate::query::{OrderBy, QuerySpec, Where};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonyFilter {
    pub is_approved: Option<bool>,
}

impl TestimonyFilter {
    pub fn to_query(&self) -> QuerySpec {
        QuerySpec::new()
            .filter(self.is_approved.map(|approved| Where::eq("is_approved", approved)))
            .order_by(OrderBy::desc("created_at"))
    }
}

pub struct TestimonyService {
    testimonies: PgTable<Testimony>,
}

impl TestimonyService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            testimonies: PgTable::new(Testimony::TABLE, pool),
        }
    }

    pub async fn list(&self, request: PageRequest, filter: &TestimonyFilter) -> Result<PageResult<Testimony>, ServiceError> {
        Ok(paginate(&self.testimonies, request, filter.to_query()).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Testimony, ServiceError> {
        Ok(self.testimonies.find_404(id, None, "Testimony").await?)
    }
}
