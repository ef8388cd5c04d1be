pub mod cache_store;
pub mod manager;
pub mod models;
pub mod table;

pub use cache_store::PgCacheStore;
pub use manager::{Database, DatabaseError};
pub use table::PgTable;
