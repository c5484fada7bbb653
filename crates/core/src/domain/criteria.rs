// Criteria: which rows an operation applies to

use crate::error::{AppError, Result};
use serde::Deserialize;
use serde_json::Value;

/// How a single field is matched
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field = value` (`IS NULL` when the value is null)
    Equals(Value),
    /// `field IN (values)`; an empty list matches nothing
    In(Vec<Value>),
}

/// Field name (application casing) to condition, in insertion order.
///
/// Empty criteria match every row. Deserializes from a JSON object the same
/// way [`Criteria::try_from`] resolves one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Criteria {
    conditions: Vec<(String, Condition)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match rows whose `field` equals `value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.into(), Condition::Equals(value.into())));
        self
    }

    /// Match rows whose `field` is one of `values`
    pub fn any_of<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.push((field.into(), Condition::In(values)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions
            .iter()
            .map(|(field, condition)| (field.as_str(), condition))
    }
}

impl From<crate::domain::Record> for Criteria {
    /// Arrays become membership matches, everything else equality
    fn from(record: crate::domain::Record) -> Self {
        let conditions = record
            .into_iter()
            .map(|(field, value)| match value {
                Value::Array(values) => (field, Condition::In(values)),
                other => (field, Condition::Equals(other)),
            })
            .collect();
        Self { conditions }
    }
}

impl TryFrom<Value> for Criteria {
    type Error = AppError;

    /// `null` means "no criteria"; anything other than an object is rejected
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(record) => Ok(Self::from(record)),
            other => Err(AppError::Validation(format!(
                "criteria must be an object, got {}",
                other
            ))),
        }
    }
}

impl From<Option<Criteria>> for Criteria {
    fn from(criteria: Option<Criteria>) -> Self {
        criteria.unwrap_or_default()
    }
}
