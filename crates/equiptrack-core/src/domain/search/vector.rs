//! Search vector maintenance
//!
//! The search vector is a denormalized text blob derived from a record and
//! its type and location. It is only ever written here, on demand, and never
//! as part of an ordinary field update. Writing it leaves `updated_at` alone.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::repository::SearchRepository;
use crate::domain::equipment::{EquipmentDetail, EquipmentRepository};
use crate::error::{Error, Result};
use sqlx::SqlitePool;

/// Most ids accepted by one bulk recompute
pub const MAX_BULK_IDS: usize = 100;

/// Assemble the vector for one record
///
/// Non-empty parts are joined with single spaces in a fixed order: name,
/// serial number, status, condition, type name, location name, location
/// description.
pub fn build_search_vector(detail: &EquipmentDetail) -> String {
    let equipment = &detail.equipment;
    let condition = equipment.condition.to_string();

    let parts = [
        Some(equipment.name.as_str()),
        Some(equipment.serial_number.as_str()),
        Some(equipment.status.as_str()),
        Some(condition.as_str()),
        Some(detail.equipment_type.name.as_str()),
        Some(detail.location.name.as_str()),
        detail.location.description.as_deref(),
    ];

    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result of recomputing one id in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkItemOutcome {
    Updated { equipment_id: i64 },
    Failed { equipment_id: i64, reason: String },
}

/// One failed id in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub equipment_id: i64,
    pub reason: String,
}

/// Summary of a bulk recompute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkReport {
    pub message: String,
    pub updated_count: usize,
    pub failed_count: usize,
    pub total_processed: usize,
    pub failures: Vec<BulkFailure>,
}

impl BulkReport {
    /// Aggregate per-item outcomes
    pub fn from_outcomes(outcomes: Vec<BulkItemOutcome>) -> Self {
        let total_processed = outcomes.len();
        let failures: Vec<BulkFailure> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                BulkItemOutcome::Updated { .. } => None,
                BulkItemOutcome::Failed {
                    equipment_id,
                    reason,
                } => Some(BulkFailure {
                    equipment_id,
                    reason,
                }),
            })
            .collect();
        let failed_count = failures.len();
        let updated_count = total_processed - failed_count;

        Self {
            message: format!(
                "Bulk search vector update completed: {} updated, {} failed",
                updated_count, failed_count
            ),
            updated_count,
            failed_count,
            total_processed,
            failures,
        }
    }
}

/// Summary of a full recompute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeReport {
    pub message: String,
    pub total_equipment: i64,
    pub equipment_with_search_vectors: i64,
    pub optimization_percentage: f64,
}

/// Recomputes search vectors
#[derive(Debug, Clone)]
pub struct SearchVectorMaintainer {
    equipment: EquipmentRepository,
    search: SearchRepository,
}

impl SearchVectorMaintainer {
    /// Create a new maintainer
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            equipment: EquipmentRepository::new(pool.clone()),
            search: SearchRepository::new(pool),
        }
    }

    /// Recompute and store the vector for one record
    pub async fn recompute(&self, equipment_id: i64) -> Result<String> {
        let detail = self
            .equipment
            .get_detail(equipment_id)
            .await?
            .ok_or(Error::EquipmentNotFound(equipment_id))?;

        self.store(&detail).await
    }

    /// Recompute every record; returns how many vectors were written
    pub async fn recompute_all(&self) -> Result<usize> {
        let details = self.equipment.list_details().await?;

        let mut written = 0;
        for detail in &details {
            match self.store(detail).await {
                Ok(_) => written += 1,
                // deleted between the scan and the write
                Err(Error::EquipmentNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        info!(written, total = details.len(), "Recomputed all search vectors");
        Ok(written)
    }

    /// Recompute a batch of ids, isolating per-item failures
    ///
    /// The id list is checked before anything is read or written.
    pub async fn recompute_bulk(&self, ids: &[i64]) -> Result<BulkReport> {
        check_bulk_ids(ids)?;

        let mut outcomes = Vec::with_capacity(ids.len());
        for &equipment_id in ids {
            let outcome = match self.recompute(equipment_id).await {
                Ok(_) => BulkItemOutcome::Updated { equipment_id },
                Err(e) => {
                    warn!(equipment_id, error = %e, "Search vector recompute failed");
                    BulkItemOutcome::Failed {
                        equipment_id,
                        reason: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = BulkReport::from_outcomes(outcomes);
        info!(
            updated = report.updated_count,
            failed = report.failed_count,
            total = report.total_processed,
            "Bulk search vector update finished"
        );
        Ok(report)
    }

    /// Recompute everything and report vector coverage
    pub async fn optimize(&self) -> Result<OptimizeReport> {
        self.recompute_all().await?;

        let total_equipment = self.search.count_all().await?;
        let equipment_with_search_vectors = self.search.count_with_search_vector().await?;

        Ok(OptimizeReport {
            message: "Search performance optimization completed".to_string(),
            total_equipment,
            equipment_with_search_vectors,
            optimization_percentage: super::analytics::percentage(
                equipment_with_search_vectors,
                total_equipment,
            ),
        })
    }

    async fn store(&self, detail: &EquipmentDetail) -> Result<String> {
        let id = detail.equipment.id;
        let vector = build_search_vector(detail);

        if !self.equipment.set_search_vector(id, &vector).await? {
            return Err(Error::EquipmentNotFound(id));
        }
        Ok(vector)
    }
}

/// Reject an empty or oversized bulk id list
pub fn check_bulk_ids(ids: &[i64]) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::InvalidInput(
            "equipment_ids must contain at least one id".to_string(),
        ));
    }
    if ids.len() > MAX_BULK_IDS {
        return Err(Error::InvalidInput(format!(
            "at most {} equipment ids per request, got {}",
            MAX_BULK_IDS,
            ids.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::{Equipment, EquipmentType, Location};
    use chrono::Utc;

    fn detail(description: Option<&str>) -> EquipmentDetail {
        let now = Utc::now();
        EquipmentDetail {
            equipment: Equipment {
                id: 3,
                name: "Dell Latitude".to_string(),
                serial_number: "DL-7".to_string(),
                status: "available".to_string(),
                condition: 0,
                photo_url: None,
                qr_code_data: None,
                metadata: None,
                search_vector: None,
                type_id: 1,
                location_id: 1,
                created_at: now,
                updated_at: now,
            },
            equipment_type: EquipmentType {
                id: 1,
                name: "Laptop".to_string(),
                created_at: now,
                updated_at: now,
            },
            location: Location {
                id: 1,
                name: "Lab".to_string(),
                description: description.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_vector_field_order() {
        assert_eq!(
            build_search_vector(&detail(Some("Second floor"))),
            "Dell Latitude DL-7 available 0 Laptop Lab Second floor"
        );
    }

    #[test]
    fn test_vector_skips_empty_parts() {
        assert_eq!(
            build_search_vector(&detail(None)),
            "Dell Latitude DL-7 available 0 Laptop Lab"
        );
        assert_eq!(
            build_search_vector(&detail(Some(""))),
            "Dell Latitude DL-7 available 0 Laptop Lab"
        );
    }

    #[test]
    fn test_bulk_id_limits() {
        assert!(matches!(check_bulk_ids(&[]), Err(Error::InvalidInput(_))));
        assert!(check_bulk_ids(&[1]).is_ok());
        let ids: Vec<i64> = (1..=100).collect();
        assert!(check_bulk_ids(&ids).is_ok());
        let ids: Vec<i64> = (1..=101).collect();
        assert!(check_bulk_ids(&ids).is_err());
    }

    #[test]
    fn test_report_from_outcomes() {
        let report = BulkReport::from_outcomes(vec![
            BulkItemOutcome::Updated { equipment_id: 1 },
            BulkItemOutcome::Failed {
                equipment_id: 9,
                reason: "Equipment 9 not found".to_string(),
            },
            BulkItemOutcome::Updated { equipment_id: 2 },
        ]);

        assert_eq!(report.updated_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.total_processed, 3);
        assert_eq!(report.failures[0].equipment_id, 9);
    }
}
