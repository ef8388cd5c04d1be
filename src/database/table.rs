use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::pagination::{CountArgs, FindManyArgs, PageSource};
use crate::query::{OrderBy, SelectStatement, SqlResult, SqlValue, Where, MAX_BIGINT};

/// Typed access to one table, usable as a [`PageSource`].
pub struct PgTable<T> {
    table_name: String,
    pool: PgPool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> PgTable<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            table_name: table_name.into(),
            pool,
            _phantom: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Fetch one row by primary key, projecting `columns` when given.
    pub async fn find_by_id(&self, id: Uuid, columns: Option<&[String]>) -> Result<Option<T>, DatabaseError> {
        let condition = Where::eq("id", id);
        let sql = SelectStatement::new(&self.table_name)
            .columns(columns)
            .filter(Some(&condition))
            .window(0, 1)
            .to_sql()?;
        let row = bind_all(sqlx::query_as::<_, T>(&sql.query), &sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Every matching row, unwindowed.
    pub async fn find_all(
        &self,
        condition: Option<&Where>,
        columns: Option<&[String]>,
        order: &[OrderBy],
    ) -> Result<Vec<T>, DatabaseError> {
        let sql = SelectStatement::new(&self.table_name)
            .columns(columns)
            .filter(condition)
            .order(order)
            .to_sql()?;
        let rows = bind_all(sqlx::query_as::<_, T>(&sql.query), &sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing row is an error.
    pub async fn find_404(&self, id: Uuid, columns: Option<&[String]>, label: &str) -> Result<T, DatabaseError> {
        self.find_by_id(id, columns)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", label)))
    }
}

#[async_trait]
impl<T> PageSource<T> for PgTable<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    type Error = DatabaseError;

    async fn find_many(&self, args: FindManyArgs) -> Result<Vec<T>, DatabaseError> {
        if let Some(include) = &args.include {
            // Relations are resolved by callers; the table source only reads its own rows.
            tracing::debug!("Ignoring include {:?} for {}", include, self.table_name);
        }
        if args.skip > MAX_BIGINT {
            // No table holds that many rows
            return Ok(vec![]);
        }

        let sql = SelectStatement::new(&self.table_name)
            .columns(args.select.as_deref())
            .filter(args.where_clause.as_ref())
            .order(&args.order)
            .window(args.skip, args.take)
            .to_sql()?;
        tracing::debug!("find_many: {}", sql.query);

        let rows = bind_all(sqlx::query_as::<_, T>(&sql.query), &sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self, args: CountArgs) -> Result<u64, DatabaseError> {
        let sql = SelectStatement::new(&self.table_name)
            .filter(args.where_clause.as_ref())
            .to_count_sql()?;
        tracing::debug!("count: {}", sql.query);

        let (count,): (i64,) = bind_all(sqlx::query_as::<_, (i64,)>(&sql.query), &sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

fn bind_all<'q, O>(
    mut q: QueryAs<'q, Postgres, O, PgArguments>,
    sql: &SqlResult,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    for value in &sql.params {
        q = bind_value(q, value);
    }
    q
}

fn bind_value<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    value: &SqlValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match value {
        SqlValue::Null => q.bind(None::<String>),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Uuid(u) => q.bind(*u),
        SqlValue::Timestamp(t) => q.bind(*t),
        SqlValue::Text(s) => q.bind(s.clone()),
    }
}
