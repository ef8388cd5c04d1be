//! Page-number pagination over any data source that can fetch a skip/take
//! window and count the rows matching a filter.
//!
//! ```rust,ignore
//! let request = PageRequest::new(2, 10)?;
//! let spec = QuerySpec::new().order_by(OrderBy::desc("created_at"));
//! let page = paginate(&PgTable::<Sermon>::new("sermons", pool), request, spec).await?;
//! assert_eq!(page.meta.current_page, 2);
//! ```

pub mod meta;
pub mod paginator;
pub mod request;
pub mod source;

pub use meta::{PageMeta, PageResult};
pub use paginator::{paginate, PageNumberPaginator, Paginator};
pub use request::{PageQuery, PageRequest};
pub use source::{CountArgs, FindManyArgs, PageSource};
