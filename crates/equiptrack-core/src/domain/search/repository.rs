//! Search repository for database operations
//!
//! Read-only queries behind search, suggestions and analytics. Every filtered
//! query takes an already translated `SqlClause`.

use super::entity::Page;
use super::sql::{SqlClause, bind_params};
use crate::domain::equipment::EquipmentDetail;
use crate::domain::equipment::repository::{DETAIL_COLUMNS, DETAIL_FROM, DetailRow};
use crate::error::{Error, Result};
use futures_util::stream::TryStreamExt;
use sqlx::SqlitePool;
use std::ops::ControlFlow;

/// Repository for search database operations
#[derive(Debug, Clone)]
pub struct SearchRepository {
    pool: SqlitePool,
}

impl SearchRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========== Filtered Queries ==========

    /// One page of matching records, id ascending, type and location resolved
    pub async fn find_matching(
        &self,
        filter: &SqlClause,
        page: Page,
    ) -> Result<Vec<EquipmentDetail>> {
        let sql = format!(
            "SELECT {} {} WHERE {} ORDER BY e.id LIMIT ? OFFSET ?",
            DETAIL_COLUMNS, DETAIL_FROM, filter.clause
        );
        let rows: Vec<DetailRow> = bind_params(sqlx::query_as(&sql), &filter.params)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        rows.into_iter().map(DetailRow::into_detail).collect()
    }

    /// Number of records matching the clause, ignoring paging
    pub async fn count_matching(&self, filter: &SqlClause) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM equipments e WHERE {}", filter.clause);
        let (count,): (i64,) = bind_params(sqlx::query_as(&sql), &filter.params)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        Ok(count)
    }

    /// Stream `(name, serial_number)` of matching records to `visit`, id ascending
    ///
    /// Rows are pulled one at a time; the query stops once `visit` breaks.
    pub async fn visit_name_serial_pairs<F>(&self, filter: &SqlClause, mut visit: F) -> Result<()>
    where
        F: FnMut(String, String) -> ControlFlow<()>,
    {
        let sql = format!(
            "SELECT e.name, e.serial_number FROM equipments e WHERE {} ORDER BY e.id",
            filter.clause
        );
        let mut rows = bind_params(sqlx::query_as::<_, (String, String)>(&sql), &filter.params)
            .fetch(&self.pool);

        while let Some((name, serial)) = rows.try_next().await.map_err(Error::DatabaseError)? {
            if visit(name, serial).is_break() {
                break;
            }
        }
        Ok(())
    }

    // ========== Rollups ==========

    /// Total number of equipment records
    pub async fn count_all(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM equipments")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;
        Ok(count)
    }

    /// Records whose search vector is present and non-empty
    pub async fn count_with_search_vector(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM equipments WHERE search_vector IS NOT NULL AND search_vector <> ''",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;
        Ok(count)
    }

    /// Mean condition, `None` when there are no records
    pub async fn average_condition(&self) -> Result<Option<f64>> {
        let (average,): (Option<f64>,) =
            sqlx::query_as("SELECT AVG(CAST(condition AS REAL)) FROM equipments")
                .fetch_one(&self.pool)
                .await
                .map_err(Error::DatabaseError)?;
        Ok(average)
    }

    /// `(status, count)` ordered by status
    pub async fn status_counts(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM equipments GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;
        Ok(rows)
    }

    /// `(condition, count)` ordered by condition
    pub async fn condition_counts(&self) -> Result<Vec<(i64, i64)>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT condition, COUNT(*) FROM equipments GROUP BY condition ORDER BY condition",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;
        Ok(rows)
    }

    /// `(type name, count)` over types that have at least one record
    pub async fn type_counts(&self) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT t.name, COUNT(e.id)
            FROM equipments e
            JOIN equipment_types t ON t.id = e.type_id
            GROUP BY t.name
            ORDER BY t.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::{EquipmentRepository, NewEquipment, NewEquipmentType, NewLocation};
    use crate::domain::search::predicate::{BasicCriteria, PredicateBuilder};
    use crate::domain::search::sql::SqlTranslator;
    use crate::storage::Database;

    async fn seeded() -> SearchRepository {
        let db = Database::in_memory()
            .await
            .expect("Failed to create test database");
        let pool = db.pool().clone();
        let equipment = EquipmentRepository::new(pool.clone());

        let laptop = equipment
            .create_type(&NewEquipmentType {
                name: "Laptop".to_string(),
            })
            .await
            .unwrap();
        let desk = equipment
            .create_location(&NewLocation {
                name: "Desk 4".to_string(),
                description: None,
            })
            .await
            .unwrap();

        for (name, serial, condition) in [
            ("Dell Latitude", "DL-100", 8),
            ("Dell XPS", "DX-200", 7),
            ("ThinkPad 100%", "TP_300", 9),
        ] {
            equipment
                .insert(&NewEquipment::new(
                    name, serial, "available", condition, laptop.id, desk.id,
                ))
                .await
                .unwrap();
        }

        SearchRepository::new(pool)
    }

    #[tokio::test]
    async fn test_page_and_count_share_clause() {
        let repo = seeded().await;
        let filter =
            SqlTranslator::translate(&PredicateBuilder::basic(&BasicCriteria::new("dell")).unwrap());

        let page = repo
            .find_matching(&filter, Page::new(1, 0).unwrap())
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].equipment.name, "Dell Latitude");
        assert_eq!(page[0].equipment_type.name, "Laptop");
        assert_eq!(repo.count_matching(&filter).await.unwrap(), 2);

        let second = repo
            .find_matching(&filter, Page::new(1, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(second[0].equipment.name, "Dell XPS");
    }

    #[tokio::test]
    async fn test_wildcards_match_literally() {
        let repo = seeded().await;

        let percent = SqlTranslator::translate(&PredicateBuilder::advanced("0%", &[]));
        assert_eq!(repo.count_matching(&percent).await.unwrap(), 1);

        let underscore = SqlTranslator::translate(&PredicateBuilder::advanced("P_3", &[]));
        assert_eq!(repo.count_matching(&underscore).await.unwrap(), 1);

        let no_literal = SqlTranslator::translate(&PredicateBuilder::advanced("L_1", &[]));
        assert_eq!(repo.count_matching(&no_literal).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_visit_stops_when_asked() {
        let repo = seeded().await;
        let filter = SqlTranslator::translate(&PredicateBuilder::advanced("d", &[]));

        let mut seen = Vec::new();
        repo.visit_name_serial_pairs(&filter, |name, serial| {
            seen.push((name, serial));
            ControlFlow::Break(())
        })
        .await
        .unwrap();
        assert_eq!(
            seen,
            vec![("Dell Latitude".to_string(), "DL-100".to_string())]
        );

        let mut all = 0;
        repo.visit_name_serial_pairs(&filter, |_, _| {
            all += 1;
            ControlFlow::Continue(())
        })
        .await
        .unwrap();
        assert_eq!(all, 3);
    }

    #[tokio::test]
    async fn test_rollups() {
        let repo = seeded().await;

        assert_eq!(repo.count_all().await.unwrap(), 3);
        assert_eq!(repo.count_with_search_vector().await.unwrap(), 0);
        assert_eq!(repo.average_condition().await.unwrap(), Some(8.0));
        assert_eq!(
            repo.status_counts().await.unwrap(),
            vec![("available".to_string(), 3)]
        );
        assert_eq!(
            repo.condition_counts().await.unwrap(),
            vec![(7, 1), (8, 1), (9, 1)]
        );
        assert_eq!(
            repo.type_counts().await.unwrap(),
            vec![("Laptop".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_average_over_empty_store() {
        let db = Database::in_memory().await.unwrap();
        let repo = SearchRepository::new(db.pool().clone());
        assert_eq!(repo.average_condition().await.unwrap(), None);
    }
}
