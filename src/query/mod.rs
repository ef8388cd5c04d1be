//! Typed query descriptions and their Postgres compilation.
//!
//! A [`QuerySpec`] is built by the listing services and passed through the
//! paginator untouched; only a concrete data source (see
//! [`crate::database::PgTable`]) turns it into SQL.

pub mod error;
pub mod statement;
pub mod types;
pub mod where_sql;

pub use error::QueryError;
pub use statement::{SelectStatement, MAX_BIGINT};
pub use types::*;
