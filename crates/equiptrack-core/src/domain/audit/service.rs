//! Audit recorder
//!
//! The write path calls `record_mutation` after its write has succeeded and
//! before it reports success to the caller. Nothing here is triggered by the
//! store itself.

use super::entity::{AuditAction, HistoryEntry, NewHistoryEntry};
use super::repository::HistoryRepository;
use crate::domain::equipment::EquipmentDetail;
use crate::error::{Error, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Appends history entries for equipment mutations
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    repository: HistoryRepository,
}

impl AuditRecorder {
    /// Create a new recorder
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: HistoryRepository::new(pool),
        }
    }

    /// Append one entry documenting a completed write
    ///
    /// `old` must be absent for `Create` and present for `Update`, and both
    /// snapshots must describe the same record.
    pub async fn record_mutation(
        &self,
        actor: &str,
        action: AuditAction,
        old: Option<&EquipmentDetail>,
        new: &EquipmentDetail,
    ) -> Result<HistoryEntry> {
        if actor.trim().is_empty() {
            return Err(Error::MissingActor);
        }

        match (action, old) {
            (AuditAction::Create, Some(_)) => {
                return Err(Error::InvalidInput(
                    "a create entry cannot carry a previous snapshot".to_string(),
                ));
            }
            (AuditAction::Update, None) => {
                return Err(Error::InvalidInput(
                    "an update entry requires the previous snapshot".to_string(),
                ));
            }
            (_, Some(old)) if old.equipment.id != new.equipment.id => {
                return Err(Error::InvalidInput(format!(
                    "snapshots describe different records ({} vs {})",
                    old.equipment.id, new.equipment.id
                )));
            }
            _ => {}
        }

        let entry = NewHistoryEntry {
            equipment_id: new.equipment.id,
            action,
            old: old.map(EquipmentDetail::snapshot).transpose()?,
            new: new.snapshot()?,
            actor: actor.to_string(),
        };

        let stored = self.repository.append(&entry).await?;
        info!(
            equipment_id = stored.equipment_id,
            action = %stored.action,
            actor = %stored.actor,
            "Recorded history entry"
        );
        Ok(stored)
    }

    /// History for one equipment record in insertion order
    pub async fn history(&self, equipment_id: i64) -> Result<Vec<HistoryEntry>> {
        self.repository.list_for_equipment(equipment_id).await
    }
}
