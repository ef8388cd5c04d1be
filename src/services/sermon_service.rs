use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Sermon;
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::pagination::{paginate, PageRequest, PageResult};
use crate::query::{OrderBy, QuerySpec, Where};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SermonFilter {
    pub preacher: Option<String>,
    pub title: Option<String>,
    pub date_preached: Option<DateTime<Utc>>,
}

impl SermonFilter {
    pub fn to_query(&self) -> QuerySpec {
        let mut conditions = Vec::new();
        if let Some(preacher) = &self.preacher {
            conditions.push(Where::icontains("preacher", preacher));
        }
        if let Some(title) = &self.title {
            conditions.push(Where::icontains("title", title));
        }
        if let Some(date) = self.date_preached {
            conditions.push(Where::eq("date_preached", date));
        }

        QuerySpec::new()
            .filter(Where::all(conditions))
            .order_by(OrderBy::desc("date_preached"))
    }
}

pub struct SermonService {
    sermons: PgTable<Sermon>,
}

impl SermonService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sermons: PgTable::new(Sermon::TABLE, pool),
        }
    }

    pub async fn list(&self, request: PageRequest, filter: &SermonFilter) -> Result<PageResult<Sermon>, ServiceError> {
        Ok(paginate(&self.sermons, request, filter.to_query()).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Sermon, ServiceError> {
        Ok(self.sermons.find_404(id, None, "Sermon").await?)
    }
}
