// Query model -> SQLite SQL
//
// Identifiers are double-quoted, values are always bound. Bounded mutations
// are restricted inside the statement through a rowid sub-select, since
// SQLite builds usually lack `UPDATE ... LIMIT`.

use repokit_core::case::WILDCARD;
use repokit_core::domain::{
    DeleteQuery, Direction, Fields, Filter, Query, Record, UpdateQuery,
};
use repokit_core::error::{AppError, Result};
use serde_json::{Number, Value};
use sqlx::{QueryBuilder, Sqlite};

pub(crate) fn select(query: &Query) -> Result<QueryBuilder<'static, Sqlite>> {
    let mut qb = QueryBuilder::new("SELECT ");
    push_columns(&mut qb, &query.fields);
    qb.push(" FROM ").push(quote_ident(&query.table));
    push_filters(&mut qb, &query.filters)?;
    push_order(&mut qb, &query.order_by);
    push_window(&mut qb, query.limit, query.offset);
    Ok(qb)
}

/// One row per statement so each row keeps its own column defaults
pub(crate) fn insert(table: &str, row: &Record, returning: Option<&Fields>) -> Result<QueryBuilder<'static, Sqlite>> {
    let mut qb = QueryBuilder::new("INSERT INTO ");
    qb.push(quote_ident(table));

    if row.is_empty() {
        qb.push(" DEFAULT VALUES");
    } else {
        qb.push(" (");
        for (i, column) in row.keys().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(quote_ident(column));
        }
        qb.push(") VALUES (");
        for (i, value) in row.values().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value)?;
        }
        qb.push(")");
    }

    if let Some(fields) = returning {
        qb.push(" RETURNING ");
        push_columns(&mut qb, fields);
    }
    Ok(qb)
}

pub(crate) fn update(query: &UpdateQuery) -> Result<QueryBuilder<'static, Sqlite>> {
    let mut qb = QueryBuilder::new("UPDATE ");
    qb.push(quote_ident(&query.scope.table)).push(" SET ");
    for (i, (column, value)) in query.changes.iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(quote_ident(column)).push(" = ");
        push_value(&mut qb, value)?;
    }
    push_scope(&mut qb, &query.scope)?;
    Ok(qb)
}

pub(crate) fn delete(query: &DeleteQuery) -> Result<QueryBuilder<'static, Sqlite>> {
    let mut qb = QueryBuilder::new("DELETE FROM ");
    qb.push(quote_ident(&query.scope.table));
    push_scope(&mut qb, &query.scope)?;
    Ok(qb)
}

pub(crate) fn quote_ident(name: &str) -> String {
    if name == WILDCARD {
        return name.to_string();
    }
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn push_columns(qb: &mut QueryBuilder<'static, Sqlite>, fields: &Fields) {
    match fields.columns() {
        None => {
            qb.push(WILDCARD);
        }
        Some(columns) => {
            let list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
            qb.push(list.join(", "));
        }
    }
}

fn push_filters(qb: &mut QueryBuilder<'static, Sqlite>, filters: &[Filter]) -> Result<()> {
    for (i, filter) in filters.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });

        match filter {
            Filter::Eq { column, value } if value.is_null() => {
                qb.push(quote_ident(column)).push(" IS NULL");
            }
            Filter::Eq { column, value } => {
                qb.push(quote_ident(column)).push(" = ");
                push_value(qb, value)?;
            }
            // Nothing is a member of the empty set
            Filter::In { values, .. } if values.is_empty() => {
                qb.push("1 = 0");
            }
            Filter::In { column, values } => {
                qb.push(quote_ident(column)).push(" IN (");
                for (j, value) in values.iter().enumerate() {
                    if j > 0 {
                        qb.push(", ");
                    }
                    push_value(qb, value)?;
                }
                qb.push(")");
            }
        }
    }
    Ok(())
}

fn push_order(qb: &mut QueryBuilder<'static, Sqlite>, order_by: &[(String, Direction)]) {
    for (i, (column, direction)) in order_by.iter().enumerate() {
        qb.push(if i == 0 { " ORDER BY " } else { ", " });
        qb.push(quote_ident(column)).push(" ").push(direction);
    }
}

fn push_window(qb: &mut QueryBuilder<'static, Sqlite>, limit: Option<u64>, offset: Option<u64>) {
    if limit.is_none() && offset.is_none() {
        return;
    }

    // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded
    qb.push(" LIMIT ");
    match limit {
        Some(limit) => {
            qb.push_bind(to_i64(limit));
        }
        None => {
            qb.push("-1");
        }
    }

    if let Some(offset) = offset {
        qb.push(" OFFSET ").push_bind(to_i64(offset));
    }
}

fn push_scope(qb: &mut QueryBuilder<'static, Sqlite>, scope: &Query) -> Result<()> {
    if scope.limit.is_none() && scope.offset.is_none() {
        return push_filters(qb, &scope.filters);
    }

    qb.push(" WHERE rowid IN (SELECT rowid FROM ")
        .push(quote_ident(&scope.table));
    push_filters(qb, &scope.filters)?;
    push_order(qb, &scope.order_by);
    push_window(qb, scope.limit, scope.offset);
    qb.push(")");
    Ok(())
}

/// Arrays and objects are stored as JSON text. Integers outside the `i64`
/// range are rejected rather than rounded through `f64`.
fn push_value(qb: &mut QueryBuilder<'static, Sqlite>, value: &Value) -> Result<()> {
    match value {
        Value::Null => {
            qb.push("NULL");
        }
        Value::Bool(b) => {
            qb.push_bind(*b);
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => {
                qb.push_bind(i);
            }
            None => {
                qb.push_bind(real(n)?);
            }
        },
        Value::String(s) => {
            qb.push_bind(s.clone());
        }
        Value::Array(_) | Value::Object(_) => {
            qb.push_bind(value.to_string());
        }
    }
    Ok(())
}

fn real(n: &Number) -> Result<f64> {
    match n.as_f64() {
        Some(f) if n.is_f64() => Ok(f),
        _ => Err(AppError::Validation(format!(
            "{} does not fit a 64-bit SQLite integer",
            n
        ))),
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
