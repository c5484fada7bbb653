// Pagination & ordering parameters for `list`

use crate::domain::{Criteria, Fields};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => write!(f, "ASC"),
            Direction::Desc => write!(f, "DESC"),
        }
    }
}

/// One sort key. Parses from `"email"` (ascending) or `"-email"` (descending),
/// and deserializes from either that string or `{ "field", "direction" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderingRepr")]
pub struct Ordering {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Ordering {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Some(Direction::Asc),
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Some(Direction::Desc),
        }
    }

    /// Ascending unless stated otherwise
    pub fn direction(&self) -> Direction {
        self.direction.unwrap_or_default()
    }
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.strip_prefix('-') {
            Some(rest) => (rest, Direction::Desc),
            None => (s, Direction::Asc),
        };

        if field.trim().is_empty() {
            return Err(format!("invalid ordering '{}': missing field name", s));
        }

        Ok(Self {
            field: field.to_string(),
            direction: Some(direction),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderingRepr {
    Short(String),
    Full {
        field: String,
        #[serde(default)]
        direction: Option<Direction>,
    },
}

impl TryFrom<OrderingRepr> for Ordering {
    type Error = String;

    fn try_from(repr: OrderingRepr) -> Result<Self, Self::Error> {
        match repr {
            OrderingRepr::Short(s) => s.parse(),
            OrderingRepr::Full { field, direction } => Ok(Self { field, direction }),
        }
    }
}

/// Options for `list`. Every field is optional; unset fields take the
/// defaults (`page` 1, `page_size` 25, no criteria, no ordering, all fields).
/// Caller values override defaults field by field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationParams {
    pub criteria: Option<Criteria>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub order_by: Option<Vec<Ordering>>,
    pub fields: Option<Fields>,
}

/// Pagination with every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPagination {
    pub criteria: Criteria,
    pub fields: Fields,
    pub page: u64,
    pub page_size: u64,
    pub order_by: Vec<Ordering>,
}

impl ResolvedPagination {
    /// Rows to skip: `(page - 1) * page_size`
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Append a sort key; earlier keys sort first
    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.order_by.get_or_insert_with(Vec::new).push(ordering);
        self
    }

    pub fn fields(mut self, fields: impl Into<Fields>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Apply defaults. A page below 1 is treated as the first page.
    pub fn resolve(self) -> ResolvedPagination {
        ResolvedPagination {
            criteria: self.criteria.unwrap_or_default(),
            fields: self.fields.unwrap_or_default(),
            page: self.page.unwrap_or(DEFAULT_PAGE).max(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            order_by: self.order_by.unwrap_or_default(),
        }
    }
}
