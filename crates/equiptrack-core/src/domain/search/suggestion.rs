//! Suggestion engine
//!
//! Autocomplete over name and serial number. Suggestions are the distinct
//! matching field values in record id order, name before serial within one
//! record.

use super::predicate::{Predicate, contains_ignore_case};
use super::repository::SearchRepository;
use super::schema::SearchField;
use super::sql::SqlTranslator;
use crate::error::Result;
use sqlx::SqlitePool;
use std::ops::ControlFlow;

/// Shortest query that produces suggestions, in characters
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Looks up autocomplete values
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    repository: SearchRepository,
}

impl SuggestionEngine {
    /// Create a new engine
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: SearchRepository::new(pool),
        }
    }

    /// At most `limit` distinct names or serials containing `query`
    pub async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if query.chars().count() < MIN_SUGGESTION_QUERY_CHARS || limit == 0 {
            return Ok(Vec::new());
        }

        let predicate = Predicate::any_field_contains(&SearchField::ADVANCED_DEFAULT, query);
        let mut collector = Collector::new(query, limit);
        self.repository
            .visit_name_serial_pairs(&SqlTranslator::translate(&predicate), |name, serial| {
                collector.offer(name, serial)
            })
            .await?;

        Ok(collector.values)
    }
}

/// Distinct matching values in arrival order, capped at `limit`
struct Collector<'a> {
    query: &'a str,
    limit: usize,
    values: Vec<String>,
}

impl<'a> Collector<'a> {
    fn new(query: &'a str, limit: usize) -> Self {
        Self {
            query,
            limit,
            values: Vec::new(),
        }
    }

    /// Breaks once the cap is reached
    fn offer(&mut self, name: String, serial: String) -> ControlFlow<()> {
        for value in [name, serial] {
            if contains_ignore_case(&value, self.query) && !self.values.contains(&value) {
                self.values.push(value);
            }
            if self.values.len() == self.limit {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}
