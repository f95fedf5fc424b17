//! Query executor
//!
//! Runs one predicate for both the page and the total. The predicate is
//! translated once and the resulting clause feeds both queries, so the count
//! can never be derived from a different filter than the page.

use super::entity::{Page, SearchPage};
use super::predicate::Predicate;
use super::repository::SearchRepository;
use super::sql::SqlTranslator;
use crate::error::Result;
use sqlx::SqlitePool;

/// Executes search predicates against the store
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    repository: SearchRepository,
}

impl QueryExecutor {
    /// Create a new executor
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: SearchRepository::new(pool),
        }
    }

    /// One page of matches plus the unpaged total for the same predicate
    pub async fn execute(&self, predicate: &Predicate, page: Page) -> Result<SearchPage> {
        let filter = SqlTranslator::translate(predicate);

        let results = self.repository.find_matching(&filter, page).await?;
        let total_count = self.repository.count_matching(&filter).await?;

        Ok(SearchPage {
            results,
            total_count,
        })
    }
}
