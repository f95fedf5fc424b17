//! History repository
//!
//! Append and read only; there is no update or delete path.

use super::entity::{AuditAction, HistoryEntry, NewHistoryEntry};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Repository for the `history` table
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    pool: SqlitePool,
}

impl HistoryRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one entry
    pub async fn append(&self, entry: &NewHistoryEntry) -> Result<HistoryEntry> {
        let old = entry.old.as_ref().map(serde_json::to_string).transpose()?;
        let new = serde_json::to_string(&entry.new)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO history (equipment_id, action, old, new, actor, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.equipment_id)
        .bind(entry.action.as_str())
        .bind(&old)
        .bind(&new)
        .bind(&entry.actor)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(HistoryEntry {
            id: result.last_insert_rowid(),
            equipment_id: entry.equipment_id,
            action: entry.action,
            old: entry.old.clone(),
            new: entry.new.clone(),
            actor: entry.actor.clone(),
            created_at,
        })
    }

    /// History for one equipment record in insertion order
    pub async fn list_for_equipment(&self, equipment_id: i64) -> Result<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, equipment_id, action, old, new, actor, created_at
            FROM history
            WHERE equipment_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(equipment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        rows.into_iter().map(HistoryRow::into_entry).collect()
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    equipment_id: i64,
    action: String,
    old: Option<String>,
    new: String,
    actor: String,
    created_at: DateTime<Utc>,
}

impl HistoryRow {
    fn into_entry(self) -> Result<HistoryEntry> {
        let action = AuditAction::parse(&self.action)
            .ok_or_else(|| Error::Other(format!("Unknown history action: {}", self.action)))?;
        let old = self
            .old
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(Error::Serialization)?;
        let new = serde_json::from_str(&self.new).map_err(Error::Serialization)?;

        Ok(HistoryEntry {
            id: self.id,
            equipment_id: self.equipment_id,
            action,
            old,
            new,
            actor: self.actor,
            created_at: self.created_at,
        })
    }
}
