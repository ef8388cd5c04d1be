use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::QueryError;

/// A typed bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Text(String),
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        SqlValue::Uuid(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

/// Condition tree for the `where` part of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    Compare {
        column: String,
        op: CompareOp,
        value: SqlValue,
    },
    /// Case-insensitive substring match
    IContains { column: String, needle: String },
    In { column: String, values: Vec<SqlValue> },
    IsNull(String),
    And(Vec<Where>),
    Or(Vec<Where>),
    Not(Box<Where>),
}

impl Where {
    fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<SqlValue>) -> Self {
        Where::Compare { column: column.into(), op, value: value.into() }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Ne, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Gte, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Lt, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::compare(column, CompareOp::Lte, value)
    }

    pub fn icontains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Where::IContains { column: column.into(), needle: needle.into() }
    }

    pub fn is_in<V: Into<SqlValue>>(column: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Where::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Where::IsNull(column.into())
    }

    pub fn or(conditions: Vec<Where>) -> Self {
        Where::Or(conditions)
    }

    pub fn not(condition: Where) -> Self {
        Where::Not(Box::new(condition))
    }

    /// Conjunction of optional conditions; `None` when nothing was collected.
    pub fn all(mut conditions: Vec<Where>) -> Option<Where> {
        match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Where::And(conditions)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self { column: column.into(), direction: SortDirection::Asc }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self { column: column.into(), direction: SortDirection::Desc }
    }
}

impl FromStr for OrderBy {
    type Err = QueryError;

    /// Parses `"created_at desc"`; direction defaults to ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut it = s.split_whitespace();
        let column = it
            .next()
            .ok_or_else(|| QueryError::InvalidOrder("empty order term".to_string()))?;
        let direction = match it.next() {
            None => SortDirection::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(dir) => return Err(QueryError::InvalidOrder(format!("unknown direction '{}'", dir))),
        };
        if it.next().is_some() {
            return Err(QueryError::InvalidOrder(format!("unexpected tokens in '{}'", s)));
        }
        Ok(Self { column: column.to_string(), direction })
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.to_sql().to_ascii_lowercase())
    }
}

/// Filter, projection and ordering handed through to a data source untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub where_clause: Option<Where>,
    pub select: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub order: Vec<OrderBy>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, where_clause: Option<Where>) -> Self {
        self.where_clause = where_clause;
        self
    }

    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn include(mut self, relation: impl Into<String>) -> Self {
        self.include.get_or_insert_with(Vec::new).push(relation.into());
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_order_terms() {
        assert_eq!("created_at desc".parse::<OrderBy>().unwrap(), OrderBy::desc("created_at"));
        assert_eq!("title".parse::<OrderBy>().unwrap(), OrderBy::asc("title"));
        assert_eq!("title ASC".parse::<OrderBy>().unwrap(), OrderBy::asc("title"));
        assert!("title sideways".parse::<OrderBy>().is_err());
        assert!("".parse::<OrderBy>().is_err());
    }

    #[test]
    fn all_collapses_small_condition_lists() {
        assert_eq!(Where::all(vec![]), None);
        assert_eq!(Where::all(vec![Where::eq("a", 1)]), Some(Where::eq("a", 1)));
        assert!(matches!(Where::all(vec![Where::eq("a", 1), Where::eq("b", 2)]), Some(Where::And(v)) if v.len() == 2));
    }

    #[test]
    fn option_values_become_null() {
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(true)), SqlValue::Bool(true));
    }
}
