//! Translates a sparse `field -> value` map into SeaORM predicates.
//!
//! Dispatch is on the value's kind: text is a case-insensitive substring
//! match, dates compare against the date-truncated column, lists become
//! `IN`, everything else is plain equality. Each entry yields one
//! independent predicate; callers AND them with [`and_all`].

use std::str::FromStr;

use sea_orm::sea_query::{Alias, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(Date),
    Uuid(Uuid),
    /// Enumerated value, compared by its stored string form
    Enum(String),
    List(Vec<FilterValue>),
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::Text(v.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::Text(v)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<Date> for FilterValue {
    fn from(v: Date) -> Self {
        FilterValue::Date(v)
    }
}

impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self {
        FilterValue::Uuid(v)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("unknown filter field '{0}'")]
    UnknownField(String),
    #[error("unsupported filter value for '{field}': {reason}")]
    Unsupported { field: String, reason: &'static str },
}

/// Insertion-ordered sparse map of filters. Re-inserting a field replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    entries: Vec<(String, FilterValue)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FilterValue>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Inserts only when `value` is set.
    pub fn with_opt<V: Into<FilterValue>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One predicate per usable entry, in query order.
///
/// Unknown fields and unsupported values are dropped with a debug trace;
/// use [`try_build`] to reject them instead.
pub fn build<E: EntityTrait>(query: &SearchQuery) -> Vec<SimpleExpr> {
    query
        .iter()
        .filter_map(|(field, value)| match predicate_for::<E>(field, value) {
            Ok(expr) => Some(expr),
            Err(err) => {
                debug!(entity = E::default().table_name(), error = %err, "Skipping filter");
                None
            }
        })
        .collect()
}

pub fn try_build<E: EntityTrait>(query: &SearchQuery) -> Result<Vec<SimpleExpr>, FilterError> {
    query
        .iter()
        .map(|(field, value)| predicate_for::<E>(field, value))
        .collect()
}

pub fn and_all(predicates: Vec<SimpleExpr>) -> Condition {
    predicates
        .into_iter()
        .fold(Condition::all(), |cond, expr| cond.add(expr))
}

fn resolve_column<E: EntityTrait>(field: &str) -> Result<E::Column, FilterError> {
    E::Column::from_str(field)
        .or_else(|_| E::Column::from_str(&camel_to_snake(field)))
        .map_err(|_| FilterError::UnknownField(field.to_string()))
}

fn predicate_for<E: EntityTrait>(field: &str, value: &FilterValue) -> Result<SimpleExpr, FilterError> {
    let column = resolve_column::<E>(field)?;
    let unsupported = |reason| FilterError::Unsupported {
        field: field.to_string(),
        reason,
    };

    match value {
        FilterValue::Text(text) => {
            let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
            Ok(
                Expr::expr(Func::lower(Expr::col(column.as_column_ref())))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
        }
        FilterValue::Date(date) => Ok(Expr::expr(
            Func::cust(Alias::new("DATE")).arg(Expr::col(column.as_column_ref())),
        )
        .eq(*date)),
        FilterValue::List(values) => {
            if values.is_empty() {
                return Err(unsupported("empty list"));
            }
            let scalars = values
                .iter()
                .map(|v| scalar(v).ok_or_else(|| unsupported("list members must be scalars")))
                .collect::<Result<Vec<Value>, _>>()?;
            Ok(column.is_in(scalars))
        }
        other => scalar(other)
            .map(|v| column.eq(v))
            .ok_or_else(|| unsupported("no equality form")),
    }
}

/// Equality operand for a scalar value. Dates and lists have none.
fn scalar(value: &FilterValue) -> Option<Value> {
    match value {
        FilterValue::Text(v) | FilterValue::Enum(v) => Some(v.clone().into()),
        FilterValue::Int(v) => Some((*v).into()),
        FilterValue::Float(v) => Some((*v).into()),
        FilterValue::Bool(v) => Some((*v).into()),
        FilterValue::Uuid(v) => Some((*v).into()),
        FilterValue::Date(_) | FilterValue::List(_) => None,
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn camel_to_snake(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for c in raw.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
