use super::error::QueryError;
use super::types::{OrderBy, SqlResult, SqlValue, Where};
use super::where_sql::{quote_identifier, WhereCompiler};

/// Largest value a Postgres `LIMIT`/`OFFSET` accepts.
pub const MAX_BIGINT: u64 = i64::MAX as u64;

/// A windowed SELECT over one table.
#[derive(Debug, Clone)]
pub struct SelectStatement<'a> {
    table_name: &'a str,
    columns: Option<&'a [String]>,
    where_clause: Option<&'a Where>,
    order: &'a [OrderBy],
    window: Option<(u64, u64)>,
}

impl<'a> SelectStatement<'a> {
    pub fn new(table_name: &'a str) -> Self {
        Self {
            table_name,
            columns: None,
            where_clause: None,
            order: &[],
            window: None,
        }
    }

    pub fn columns(mut self, columns: Option<&'a [String]>) -> Self {
        self.columns = columns;
        self
    }

    pub fn filter(mut self, where_clause: Option<&'a Where>) -> Self {
        self.where_clause = where_clause;
        self
    }

    pub fn order(mut self, order: &'a [OrderBy]) -> Self {
        self.order = order;
        self
    }

    /// `OFFSET skip LIMIT take`, both clamped to the bigint range Postgres accepts.
    pub fn window(mut self, skip: u64, take: u64) -> Self {
        self.window = Some((skip, take));
        self
    }

    pub fn to_sql(&self) -> Result<SqlResult, QueryError> {
        let table = quote_table(self.table_name)?;
        let select_clause = self.build_select_clause()?;
        let (where_sql, params) = self.build_where_clause()?;
        let order_clause = self.build_order_clause()?;
        let limit_clause = match self.window {
            Some((skip, take)) => format!("LIMIT {} OFFSET {}", take.min(MAX_BIGINT), skip.min(MAX_BIGINT)),
            None => String::new(),
        };

        let query = [
            format!("SELECT {}", select_clause),
            format!("FROM {}", table),
            where_sql,
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    /// Row count for the same predicate, ignoring projection, order and window.
    pub fn to_count_sql(&self) -> Result<SqlResult, QueryError> {
        let table = quote_table(self.table_name)?;
        let (where_sql, params) = self.build_where_clause()?;
        let query = if where_sql.is_empty() {
            format!("SELECT COUNT(*) AS count FROM {}", table)
        } else {
            format!("SELECT COUNT(*) AS count FROM {} {}", table, where_sql)
        };
        Ok(SqlResult { query, params })
    }

    fn build_select_clause(&self) -> Result<String, QueryError> {
        match self.columns {
            None => Ok("*".to_string()),
            Some(columns) if columns.is_empty() || columns.iter().any(|c| c == "*") => Ok("*".to_string()),
            Some(columns) => {
                let quoted = columns
                    .iter()
                    .map(|c| quote_identifier(c))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(quoted.join(", "))
            }
        }
    }

    fn build_where_clause(&self) -> Result<(String, Vec<SqlValue>), QueryError> {
        match self.where_clause {
            Some(condition) => {
                let (sql, params) = WhereCompiler::generate(condition)?;
                Ok((format!("WHERE {}", sql), params))
            }
            None => Ok((String::new(), vec![])),
        }
    }

    fn build_order_clause(&self) -> Result<String, QueryError> {
        if self.order.is_empty() {
            return Ok(String::new());
        }
        let parts = self
            .order
            .iter()
            .map(|o| -> Result<String, QueryError> {
                Ok(format!("{} {}", quote_identifier(&o.column)?, o.direction.to_sql()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}

fn quote_table(name: &str) -> Result<String, QueryError> {
    quote_identifier(name).map_err(|_| QueryError::InvalidTableName(name.to_string()))
}
