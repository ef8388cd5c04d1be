mod common;

use anyhow::Result;
use std::sync::Arc;

use church_connect_api::error::ServiceError;
use church_connect_api::pagination::{paginate, PageNumberPaginator, PageRequest, PageSource, Paginator};
use church_connect_api::query::{OrderBy, QuerySpec, Where};
use common::VecSource;

fn rows(n: u32) -> VecSource<u32> {
    VecSource::new((1..=n).collect())
}

#[tokio::test]
async fn third_page_skips_twenty_rows() -> Result<()> {
    let source = rows(45);
    let page = paginate(&source, PageRequest::new(3, 10)?, QuerySpec::new()).await?;

    assert_eq!(page.data, (21..=30).collect::<Vec<_>>());
    assert_eq!(page.meta.total, 45);
    assert_eq!(page.meta.last_page, 5);
    assert_eq!((page.meta.prev, page.meta.next), (Some(2), Some(4)));

    let calls = source.find_calls.lock().unwrap();
    assert_eq!((calls[0].skip, calls[0].take), (20, 10));
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() -> Result<()> {
    let source = rows(5);
    let page = paginate(&source, PageRequest::new(100, 10)?, QuerySpec::new()).await?;

    assert!(page.data.is_empty());
    assert_eq!(page.meta.total, 5);
    assert_eq!(page.meta.current_page, 100);
    assert_eq!(page.meta.next, None);
    assert_eq!(page.meta.prev, Some(99));
    Ok(())
}

#[tokio::test]
async fn empty_source_has_zero_pages() -> Result<()> {
    let source = rows(0);
    let page = paginate(&source, PageRequest::default(), QuerySpec::new()).await?;

    assert!(page.data.is_empty());
    assert_eq!(page.meta.last_page, 0);
    assert_eq!((page.meta.prev, page.meta.next), (None, None));
    Ok(())
}

#[tokio::test]
async fn query_spec_passes_through_untouched() -> Result<()> {
    let source = rows(3);
    let condition = Where::or(vec![Where::icontains("first_name", "ada"), Where::icontains("last_name", "ada")]);
    let spec = QuerySpec::new()
        .filter(Some(condition.clone()))
        .select(["id", "first_name"])
        .include("department")
        .order_by(OrderBy::desc("created_at"));

    paginate(&source, PageRequest::new(1, 2)?, spec).await?;

    let find = source.find_calls.lock().unwrap()[0].clone();
    assert_eq!(find.where_clause, Some(condition.clone()));
    assert_eq!(find.select, Some(vec!["id".to_string(), "first_name".to_string()]));
    assert_eq!(find.include, Some(vec!["department".to_string()]));
    assert_eq!(find.order, vec![OrderBy::desc("created_at")]);

    // count only ever sees the filter
    let count = source.count_calls.lock().unwrap()[0].clone();
    assert_eq!(count.where_clause, Some(condition));
    Ok(())
}

#[tokio::test]
async fn strategy_is_usable_through_a_trait_object() -> Result<()> {
    let source = rows(12);
    let strategy: Arc<dyn Paginator<u32, VecSource<u32>>> = Arc::new(PageNumberPaginator::new(PageRequest::new(2, 5)?));
    let page = strategy.paginate(&source, QuerySpec::new()).await?;

    assert_eq!(page.data, vec![6, 7, 8, 9, 10]);
    assert_eq!(page.meta.last_page, 3);
    Ok(())
}

#[tokio::test]
async fn works_over_dyn_sources() -> Result<()> {
    let source: Box<dyn PageSource<u32, Error = ServiceError>> = Box::new(rows(4));
    let page = paginate(source.as_ref(), PageRequest::new(2, 3)?, QuerySpec::new()).await?;

    assert_eq!(page.data, vec![4]);
    assert_eq!(page.meta.next, None);
    Ok(())
}

#[tokio::test]
async fn concurrent_callers_do_not_share_requests() -> Result<()> {
    let source = Arc::new(rows(30));
    let base = PageRequest::new(1, 10)?;

    let handles: Vec<_> = (1..=3)
        .map(|n| {
            let source = source.clone();
            let request = base.with_page(n);
            tokio::spawn(async move { paginate(source.as_ref(), request?, QuerySpec::new()).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let page = handle.await??;
        assert_eq!(page.meta.current_page, i as u64 + 1);
        assert_eq!(page.data.first().copied(), Some(i as u32 * 10 + 1));
    }
    assert_eq!(base.page(), 1);
    Ok(())
}
