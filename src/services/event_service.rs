use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Event;
use crate::database::PgTable;
use crate::error::ServiceError;
use crate::files::{Delivery, FileUrlCache};
use crate::pagination::{paginate, PageRequest, PageResult};
use crate::query::{OrderBy, QuerySpec, Where};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    pub title: Option<String>,
    /// Events starting at or after this instant
    pub start_date: Option<DateTime<Utc>>,
    /// Events ending at or before this instant
    pub end_date: Option<DateTime<Utc>>,
}

impl EventFilter {
    pub fn to_query(&self) -> QuerySpec {
        let mut conditions = Vec::new();
        if let Some(title) = &self.title {
            conditions.push(Where::icontains("title", title));
        }
        if let Some(start) = self.start_date {
            conditions.push(Where::gte("start_date_time", start));
        }
        if let Some(end) = self.end_date {
            conditions.push(Where::lte("end_date_time", end));
        }

        QuerySpec::new()
            .filter(Where::all(conditions))
            .order_by(OrderBy::asc("start_date_time"))
    }
}

/// An event with its banner image resolved to a URL.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub image_url: Option<String>,
}

pub struct EventService {
    events: PgTable<Event>,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: PgTable::new(Event::TABLE, pool),
        }
    }

    pub async fn list(&self, request: PageRequest, filter: &EventFilter) -> Result<PageResult<Event>, ServiceError> {
        Ok(paginate(&self.events, request, filter.to_query()).await?)
    }

    pub async fn get_detail(&self, id: Uuid, urls: &FileUrlCache) -> Result<EventDetail, ServiceError> {
        let event = self.events.find_404(id, None, "Event").await?;
        let image_url = match event.image_file_id {
            Some(file_id) => Some(urls.resolve_url(file_id, true, Delivery::Network).await?),
            None => None,
        };
        Ok(EventDetail { event, image_url })
    }
}
