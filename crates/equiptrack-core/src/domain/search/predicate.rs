//! Predicate builder
//!
//! Turns a free-text query plus optional structured constraints into a
//! `Predicate` tree. Building never touches the store. The same tree is
//! translated to SQL once for both the page and the count.

use serde::{Deserialize, Serialize};

use super::schema::{SearchField, fold_case, resolve_search_fields};
use crate::domain::equipment::{CONDITION_MAX, CONDITION_MIN};
use crate::error::{Error, Result};

/// A composable boolean filter over equipment fields
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring containment
    Contains { field: SearchField, text: String },
    /// Exact status match
    StatusEquals(String),
    /// Inclusive lower bound on condition
    ConditionAtLeast(i64),
    /// Inclusive upper bound on condition
    ConditionAtMost(i64),
    /// Every child must hold; an empty list always holds
    And(Vec<Predicate>),
    /// Some child must hold; an empty list never holds
    Or(Vec<Predicate>),
}

impl Predicate {
    /// OR over containment of `text` in each field
    pub fn any_field_contains(fields: &[SearchField], text: &str) -> Self {
        Self::Or(
            fields
                .iter()
                .map(|field| Self::Contains {
                    field: *field,
                    text: text.to_string(),
                })
                .collect(),
        )
    }
}

/// Case-insensitive substring test using the same fold as the store
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

/// Structured constraints for a basic search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCriteria {
    pub query: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub condition_min: Option<i64>,
    #[serde(default)]
    pub condition_max: Option<i64>,
}

impl BasicCriteria {
    /// Criteria with only a text query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Require an exact status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Restrict condition to an inclusive range; either side may be open
    pub fn with_condition(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.condition_min = min;
        self.condition_max = max;
        self
    }
}

/// Builds predicates for the two search modes
pub struct PredicateBuilder;

impl PredicateBuilder {
    /// Basic mode: text over every searchable field, AND each present filter
    ///
    /// Bounds outside the condition scale are rejected. `min > max` is a valid
    /// predicate that matches nothing.
    pub fn basic(criteria: &BasicCriteria) -> Result<Predicate> {
        let mut clauses = vec![Predicate::any_field_contains(
            &SearchField::ALL,
            &criteria.query,
        )];

        if let Some(status) = &criteria.status {
            clauses.push(Predicate::StatusEquals(status.clone()));
        }
        if let Some(min) = criteria.condition_min {
            check_bound("condition_min", min)?;
            clauses.push(Predicate::ConditionAtLeast(min));
        }
        if let Some(max) = criteria.condition_max {
            check_bound("condition_max", max)?;
            clauses.push(Predicate::ConditionAtMost(max));
        }

        Ok(Predicate::And(clauses))
    }

    /// Advanced mode: text over the allowlisted subset of `fields`
    pub fn advanced(query: &str, fields: &[String]) -> Predicate {
        Predicate::any_field_contains(&resolve_search_fields(fields), query)
    }
}

fn check_bound(name: &str, value: i64) -> Result<()> {
    if !(CONDITION_MIN..=CONDITION_MAX).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{} must be between {} and {}, got {}",
            name, CONDITION_MIN, CONDITION_MAX, value
        )));
    }
    Ok(())
}
