use async_trait::async_trait;

use crate::query::{OrderBy, QuerySpec, Where};

/// Arguments for fetching one window of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindManyArgs {
    pub where_clause: Option<Where>,
    pub select: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub order: Vec<OrderBy>,
    pub skip: u64,
    pub take: u64,
}

impl FindManyArgs {
    pub fn from_spec(spec: QuerySpec, skip: u64, take: u64) -> Self {
        Self {
            where_clause: spec.where_clause,
            select: spec.select,
            include: spec.include,
            order: spec.order,
            skip,
            take,
        }
    }
}

/// Arguments for counting every row the filter matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountArgs {
    pub where_clause: Option<Where>,
}

/// Anything that can return a window of rows and a separate total count.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    type Error: Send;

    async fn find_many(&self, args: FindManyArgs) -> Result<Vec<T>, Self::Error>;

    async fn count(&self, args: CountArgs) -> Result<u64, Self::Error>;
}
