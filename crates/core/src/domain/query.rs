// Query Model - what an adapter renders and executes
//
// Column names in here are already storage-cased; the repository layer does
// the renaming before building a query.

use crate::case::{snake_case, WILDCARD};
use crate::domain::{Direction, Record};
use serde::Deserialize;
use serde_json::Value;

/// Projection: which columns (or fields) to return
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "FieldsRepr")]
pub enum Fields {
    /// `*`
    #[default]
    All,
    Only(Vec<String>),
}

impl Fields {
    pub fn all() -> Self {
        Fields::All
    }

    /// An empty list or one containing `*` selects everything
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() || names.iter().any(|n| n == WILDCARD) {
            Fields::All
        } else {
            Fields::Only(names)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Fields::All)
    }

    /// The explicit column list, `None` for `*`
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            Fields::All => None,
            Fields::Only(names) => Some(names),
        }
    }

    /// Same projection with every name snake_cased
    pub fn to_snake(&self) -> Fields {
        match self {
            Fields::All => Fields::All,
            Fields::Only(names) => Fields::Only(names.iter().map(|n| snake_case(n)).collect()),
        }
    }
}

impl From<Vec<String>> for Fields {
    fn from(names: Vec<String>) -> Self {
        Fields::only(names)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(names: Vec<&str>) -> Self {
        Fields::only(names)
    }
}

impl From<&[&str]> for Fields {
    fn from(names: &[&str]) -> Self {
        Fields::only(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(names: [&str; N]) -> Self {
        Fields::only(names)
    }
}

impl From<Option<Fields>> for Fields {
    fn from(fields: Option<Fields>) -> Self {
        fields.unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldsRepr {
    One(String),
    Many(Vec<String>),
}

impl From<FieldsRepr> for Fields {
    fn from(repr: FieldsRepr) -> Self {
        match repr {
            FieldsRepr::One(name) => Fields::only([name]),
            FieldsRepr::Many(names) => Fields::only(names),
        }
    }
}

/// A single WHERE condition
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    In { column: String, values: Vec<Value> },
}

/// A table-scoped SELECT, also used as the scope of UPDATE and DELETE
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filters: Vec<Filter>,
    pub fields: Fields,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            fields: Fields::All,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: Value) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value,
        });
        self
    }

    pub fn where_in(mut self, column: impl Into<String>, values: Vec<Value>) -> Self {
        self.filters.push(Filter::In {
            column: column.into(),
            values,
        });
        self
    }

    pub fn select(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// INSERT of one or more rows into a table
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub table: String,
    pub rows: Vec<Record>,
}

/// UPDATE of the rows selected by `scope`. A scope with a limit is a
/// bounded mutation: the adapter must restrict the statement itself.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub scope: Query,
    pub changes: Record,
}

/// DELETE of the rows selected by `scope`, bounded like [`UpdateQuery`]
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub scope: Query,
}
