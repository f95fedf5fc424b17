//! Search service
//!
//! Validates caller input, builds the predicate and hands it to the executor.
//! Every rejection happens before the store is touched.

use super::analytics::{AnalyticsAggregator, SearchAnalytics, SearchStats};
use super::entity::{
    AdvancedSearchRequest, DEFAULT_QUICK_LIMIT, DEFAULT_SUGGESTION_LIMIT, MAX_QUICK_LIMIT,
    MAX_SUGGESTION_LIMIT, Page, SearchRequest, SearchResponse, SuggestionResponse, check_limit,
    check_query,
};
use super::executor::QueryExecutor;
use super::predicate::{BasicCriteria, PredicateBuilder};
use super::suggestion::SuggestionEngine;
use crate::error::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Service for equipment search, suggestions and analytics
#[derive(Debug, Clone)]
pub struct SearchService {
    executor: QueryExecutor,
    suggestions: SuggestionEngine,
    analytics: AnalyticsAggregator,
}

impl SearchService {
    /// Create a new search service
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            executor: QueryExecutor::new(pool.clone()),
            suggestions: SuggestionEngine::new(pool.clone()),
            analytics: AnalyticsAggregator::new(pool),
        }
    }

    /// Basic filtered search
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        check_query(&request.query)?;
        let page = Page::new(request.limit, request.offset)?;
        let predicate = PredicateBuilder::basic(&BasicCriteria {
            query: request.query.clone(),
            status: request.status.clone(),
            condition_min: request.condition_min,
            condition_max: request.condition_max,
        })?;

        let found = self.executor.execute(&predicate, page).await?;
        debug!(query = %request.query, total = found.total_count, "Basic search");
        Ok(SearchResponse::from_page(found, &request.query, page))
    }

    /// Search over a caller-chosen subset of fields
    pub async fn advanced_search(&self, request: &AdvancedSearchRequest) -> Result<SearchResponse> {
        check_query(&request.query)?;
        let page = Page::new(request.limit, request.offset)?;
        let fields = request.search_fields.as_deref().unwrap_or_default();
        let predicate = PredicateBuilder::advanced(&request.query, fields);

        let found = self.executor.execute(&predicate, page).await?;
        debug!(query = %request.query, total = found.total_count, "Advanced search");
        Ok(SearchResponse::from_page(found, &request.query, page))
    }

    /// Basic search without filters from offset 0
    pub async fn quick_search(&self, query: &str, limit: Option<i64>) -> Result<SearchResponse> {
        check_query(query)?;
        let limit = limit.unwrap_or(DEFAULT_QUICK_LIMIT);
        check_limit("limit", limit, MAX_QUICK_LIMIT)?;
        let page = Page::new(limit, 0)?;
        let predicate = PredicateBuilder::basic(&BasicCriteria::new(query))?;

        let found = self.executor.execute(&predicate, page).await?;
        debug!(query, total = found.total_count, "Quick search");
        Ok(SearchResponse::from_page(found, query, page))
    }

    /// Autocomplete values for `query`
    pub async fn suggestions(&self, query: &str, limit: Option<i64>) -> Result<SuggestionResponse> {
        check_query(query)?;
        let limit = limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
        check_limit("limit", limit, MAX_SUGGESTION_LIMIT)?;

        let suggestions = self.suggestions.suggest(query, limit as usize).await?;
        debug!(query, count = suggestions.len(), "Suggestions");
        Ok(SuggestionResponse {
            query: query.to_string(),
            count: suggestions.len(),
            suggestions,
        })
    }

    /// Summary statistics
    pub async fn stats(&self) -> Result<SearchStats> {
        self.analytics.stats().await
    }

    /// Detailed analytics
    pub async fn analytics(&self) -> Result<SearchAnalytics> {
        self.analytics.analytics().await
    }
}
