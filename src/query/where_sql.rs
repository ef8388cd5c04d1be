use super::error::QueryError;
use super::types::{CompareOp, SqlValue, Where};

/// Compiles a [`Where`] tree into a parameterised Postgres predicate.
pub struct WhereCompiler {
    params: Vec<SqlValue>,
}

impl WhereCompiler {
    pub fn new() -> Self {
        Self { params: vec![] }
    }

    /// Compile a predicate, returning the SQL fragment and its bind values in order.
    pub fn generate(where_clause: &Where) -> Result<(String, Vec<SqlValue>), QueryError> {
        let mut compiler = Self::new();
        let sql = compiler.build(where_clause)?;
        Ok((sql, compiler.params))
    }

    fn build(&mut self, condition: &Where) -> Result<String, QueryError> {
        match condition {
            Where::Compare { column, op, value } => {
                let quoted = quote_identifier(column)?;
                match (op, value) {
                    (CompareOp::Eq, SqlValue::Null) => Ok(format!("{} IS NULL", quoted)),
                    (CompareOp::Ne, SqlValue::Null) => Ok(format!("{} IS NOT NULL", quoted)),
                    (_, SqlValue::Null) => Err(QueryError::InvalidOperatorData(format!(
                        "'{}' cannot be compared with {} NULL",
                        column,
                        op.to_sql()
                    ))),
                    _ => Ok(format!("{} {} {}", quoted, op.to_sql(), self.param(value.clone()))),
                }
            }
            Where::IContains { column, needle } => {
                let quoted = quote_identifier(column)?;
                let pattern = format!("%{}%", escape_like(needle));
                Ok(format!("{} ILIKE {}", quoted, self.param(SqlValue::Text(pattern))))
            }
            Where::In { column, values } => {
                let quoted = quote_identifier(column)?;
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                if values.iter().any(|v| matches!(v, SqlValue::Null)) {
                    return Err(QueryError::InvalidOperatorData(format!("IN list for '{}' contains NULL", column)));
                }
                let placeholders: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} IN ({})", quoted, placeholders.join(", ")))
            }
            Where::IsNull(column) => Ok(format!("{} IS NULL", quote_identifier(column)?)),
            Where::And(conditions) => self.join(conditions, " AND ", "1=1"),
            Where::Or(conditions) => self.join(conditions, " OR ", "1=0"),
            Where::Not(inner) => Ok(format!("NOT ({})", self.build(inner)?)),
        }
    }

    fn join(&mut self, conditions: &[Where], joiner: &str, empty: &str) -> Result<String, QueryError> {
        if conditions.is_empty() {
            return Ok(empty.to_string());
        }
        let mut parts = Vec::with_capacity(conditions.len());
        for condition in conditions {
            parts.push(format!("({})", self.build(condition)?));
        }
        Ok(parts.join(joiner))
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

impl Default for WhereCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate and double-quote a table or column identifier.
pub fn quote_identifier(name: &str) -> Result<String, QueryError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(QueryError::InvalidColumn(format!("Invalid identifier format: '{}'", name)));
    }
    Ok(format!("\"{}\"", name))
}

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
