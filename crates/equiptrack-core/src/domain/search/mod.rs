//! Search domain module
//!
//! Turns a free-text query and optional filters into a page of equipment
//! plus a matching total, and maintains the derived search vector.
//!
//! # Architecture
//!
//! - **Schema**: `SearchField` / `FilterField` allowlist for caller-named fields
//! - **Predicate**: `PredicateBuilder` composes a `Predicate` tree
//! - **SQL**: `SqlTranslator` turns a predicate into a parameterized clause
//! - **Executor**: `QueryExecutor` runs one clause for both page and count
//! - **Vector**: `SearchVectorMaintainer` recomputes the derived blob on demand
//! - **Suggestion**: `SuggestionEngine` for autocomplete over name and serial
//! - **Analytics**: `AnalyticsAggregator` for read-only rollups
//! - **Service**: `SearchService` validates requests before any query runs
//!
//! # Example
//!
//! ```ignore
//! use equiptrack_core::domain::search::{SearchRequest, SearchService};
//!
//! let service = SearchService::new(pool.clone());
//!
//! let mut request = SearchRequest::new("latitude");
//! request.condition_min = Some(6);
//! let page = service.search(&request).await?;
//! println!("{} of {}", page.results.len(), page.total_count);
//! ```

pub mod analytics;
pub mod entity;
pub mod executor;
pub mod predicate;
pub mod repository;
pub mod schema;
pub mod service;
pub mod sql;
pub mod suggestion;
pub mod vector;

pub use analytics::{
    AnalyticsAggregator, ConditionBucket, ConditionDistribution, SearchAnalytics, SearchStats,
};
pub use entity::{
    AdvancedSearchRequest, Page, SearchPage, SearchRequest, SearchResponse, SuggestionResponse,
};
pub use executor::QueryExecutor;
pub use predicate::{BasicCriteria, Predicate, PredicateBuilder};
pub use repository::SearchRepository;
pub use schema::{FilterField, SearchField, fold_case, is_searchable_field};
pub use service::SearchService;
pub use sql::{SqlClause, SqlParam, SqlTranslator};
pub use suggestion::SuggestionEngine;
pub use vector::{
    BulkFailure, BulkItemOutcome, BulkReport, MAX_BULK_IDS, OptimizeReport,
    SearchVectorMaintainer, build_search_vector,
};
