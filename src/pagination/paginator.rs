use async_trait::async_trait;

use super::meta::{PageMeta, PageResult};
use super::request::PageRequest;
use super::source::{CountArgs, FindManyArgs, PageSource};
use crate::query::QuerySpec;

/// A pagination strategy over a [`PageSource`].
#[async_trait]
pub trait Paginator<T, S>
where
    T: Send + 'static,
    S: PageSource<T> + ?Sized,
{
    async fn paginate(&self, source: &S, query: QuerySpec) -> Result<PageResult<T>, S::Error>;
}

/// Absolute page index with a fixed page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageNumberPaginator {
    request: PageRequest,
}

impl PageNumberPaginator {
    pub fn new(request: PageRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> PageRequest {
        self.request
    }
}

#[async_trait]
impl<T, S> Paginator<T, S> for PageNumberPaginator
where
    T: Send + 'static,
    S: PageSource<T> + ?Sized,
{
    async fn paginate(&self, source: &S, query: QuerySpec) -> Result<PageResult<T>, S::Error> {
        let request = self.request;
        let count_args = CountArgs { where_clause: query.where_clause.clone() };
        let find_args = FindManyArgs::from_spec(query, request.skip(), request.limit());

        tracing::debug!(
            "Paginating page {} (skip {}, take {})",
            request.page(),
            find_args.skip,
            find_args.take
        );

        // No ordering between the two; a slightly stale total is acceptable.
        let (data, total) = futures::try_join!(source.find_many(find_args), source.count(count_args))?;

        Ok(PageResult { data, meta: PageMeta::new(total, &request) })
    }
}

/// Paginate `source` with the page-number strategy.
pub async fn paginate<T, S>(source: &S, request: PageRequest, query: QuerySpec) -> Result<PageResult<T>, S::Error>
where
    T: Send + 'static,
    S: PageSource<T> + ?Sized,
{
    <PageNumberPaginator as Paginator<T, S>>::paginate(&PageNumberPaginator::new(request), source, query).await
}
