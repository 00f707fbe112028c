//! Parameterized SQL select builder.
//!
//! Condition values are always emitted as bind parameters, never interpolated
//! into the statement text. Identifiers (table, projection fields, sort
//! columns) cannot be bound, so they are validated against a strict
//! identifier grammar instead.

use fedquery_core::{AdapterError, Intent, SortOrder};

use crate::driver::SqlValue;

/// Placeholder style per relational dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlDialect {
    /// `$1`, `$2`, ... numbered placeholders.
    Postgres,
    /// `?` positional placeholders.
    Mysql,
}

impl SqlDialect {
    fn placeholder(&self, position: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${position}"),
            SqlDialect::Mysql => "?".to_string(),
        }
    }
}

/// How the generic condition slots map onto one table's columns.
///
/// `None` means the slot produces no predicate for this table.
#[derive(Debug, Clone, Copy)]
pub struct SlotColumns {
    pub subject: Option<&'static str>,
    pub object: Option<&'static str>,
    pub role: Option<&'static str>,
    /// Skip the object predicate when the extracted object is this value
    /// (the slot then merely named the table, not a filter).
    pub object_skip_value: Option<&'static str>,
}

/// A built statement plus its bind parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// True if `s` is a plain SQL identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_safe_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn checked_identifier<'a>(s: &'a str, what: &str) -> Result<&'a str, AdapterError> {
    if is_safe_identifier(s) {
        Ok(s)
    } else {
        Err(AdapterError::InvalidQuery(format!("{what} is not a valid identifier: {s:?}")))
    }
}

/// Build a parameterized SELECT for `table` from the intent's condition
/// slots.
///
/// Predicates are equality tests AND-joined in slot order (subject, object,
/// role); absent slots contribute nothing.
pub fn build_select(
    intent: &Intent, dialect: SqlDialect, table: &str, slots: &SlotColumns,
) -> Result<SqlQuery, AdapterError> {
    let table = checked_identifier(table, "table name")?;

    let projection = match &intent.fields {
        None => "*".to_string(),
        Some(fields) if fields.is_empty() => "*".to_string(),
        Some(fields) => {
            let mut columns = Vec::with_capacity(fields.len());
            for field in fields {
                columns.push(checked_identifier(field, "projection field")?);
            }
            columns.join(", ")
        }
    };

    let mut sql = format!("SELECT {projection} FROM {table}");
    let mut params: Vec<SqlValue> = Vec::new();
    let mut predicates: Vec<String> = Vec::new();

    let mut push_predicate = |column: &str, value: &str, params: &mut Vec<SqlValue>| {
        params.push(SqlValue::Text(value.to_string()));
        predicates.push(format!("{column} = {}", dialect.placeholder(params.len())));
    };

    if let Some(column) = slots.subject
        && let Some(subject) = &intent.conditions.subject
    {
        push_predicate(column, subject, &mut params);
    }

    if let Some(column) = slots.object
        && let Some(object) = &intent.conditions.object
        && slots.object_skip_value != Some(object.as_str())
    {
        push_predicate(column, object, &mut params);
    }

    if let Some(column) = slots.role
        && let Some(role) = &intent.conditions.role
    {
        push_predicate(column, role, &mut params);
    }

    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }

    if let Some(sort) = &intent.sort {
        let column = checked_identifier(&sort.field, "sort field")?;
        let direction = match sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {column} {direction}"));
    }

    if let Some(limit) = intent.limit {
        params.push(SqlValue::Int(i64::from(limit)));
        sql.push_str(&format!(" LIMIT {}", dialect.placeholder(params.len())));
    }

    Ok(SqlQuery { sql, params })
}
