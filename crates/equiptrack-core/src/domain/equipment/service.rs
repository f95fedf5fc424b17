//! Inventory service
//!
//! The audited write path: every create and patch is written first and then
//! documented with one history entry before the call returns.

use super::entity::{
    Equipment, EquipmentDetail, EquipmentPatch, EquipmentType, Location, NewEquipment,
    NewEquipmentType, NewLocation,
};
use super::repository::EquipmentRepository;
use crate::domain::audit::{AuditAction, AuditRecorder, HistoryEntry};
use crate::error::{Error, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Service for audited equipment writes
#[derive(Debug, Clone)]
pub struct InventoryService {
    repository: EquipmentRepository,
    audit: AuditRecorder,
}

impl InventoryService {
    /// Create a new inventory service
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: EquipmentRepository::new(pool.clone()),
            audit: AuditRecorder::new(pool),
        }
    }

    /// Create equipment and record a `create` entry
    pub async fn create(&self, actor: &str, new: NewEquipment) -> Result<EquipmentDetail> {
        require_actor(actor)?;
        new.validate()?;
        self.check_references(new.type_id, new.location_id).await?;

        let id = self.repository.insert(&new).await?;
        let created = self.load(id).await?;

        self.audit
            .record_mutation(actor, AuditAction::Create, None, &created)
            .await?;

        debug!(equipment_id = id, "Created equipment");
        Ok(created)
    }

    /// Apply a partial update and record an `update` entry
    pub async fn patch(
        &self,
        actor: &str,
        id: i64,
        patch: EquipmentPatch,
    ) -> Result<EquipmentDetail> {
        require_actor(actor)?;

        let old = self.load(id).await?;

        let mut updated = old.equipment.clone();
        updated.apply(&patch);
        updated.validate()?;
        self.check_references(updated.type_id, updated.location_id)
            .await?;

        self.repository.update(&updated).await?;
        let new = self.load(id).await?;

        self.audit
            .record_mutation(actor, AuditAction::Update, Some(&old), &new)
            .await?;

        debug!(equipment_id = id, "Patched equipment");
        Ok(new)
    }

    /// Get equipment with type and location resolved
    pub async fn get(&self, id: i64) -> Result<EquipmentDetail> {
        self.load(id).await
    }

    /// Get the plain record
    pub async fn get_record(&self, id: i64) -> Result<Equipment> {
        self.repository
            .get(id)
            .await?
            .ok_or(Error::EquipmentNotFound(id))
    }

    /// History for one equipment record in insertion order
    pub async fn history(&self, id: i64) -> Result<Vec<HistoryEntry>> {
        // distinguish "no entries" from "no such equipment"
        self.get_record(id).await?;
        self.audit.history(id).await
    }

    /// Create an equipment type
    pub async fn create_type(&self, new: NewEquipmentType) -> Result<EquipmentType> {
        require_name(&new.name)?;
        self.repository.create_type(&new).await
    }

    /// List equipment types
    pub async fn list_types(&self) -> Result<Vec<EquipmentType>> {
        self.repository.list_types().await
    }

    /// Create a location
    pub async fn create_location(&self, new: NewLocation) -> Result<Location> {
        require_name(&new.name)?;
        self.repository.create_location(&new).await
    }

    /// List locations
    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        self.repository.list_locations().await
    }

    async fn load(&self, id: i64) -> Result<EquipmentDetail> {
        self.repository
            .get_detail(id)
            .await?
            .ok_or(Error::EquipmentNotFound(id))
    }

    async fn check_references(&self, type_id: i64, location_id: i64) -> Result<()> {
        if !self.repository.type_exists(type_id).await? {
            return Err(Error::ValidationFailed(format!(
                "equipment type {} does not exist",
                type_id
            )));
        }
        if !self.repository.location_exists(location_id).await? {
            return Err(Error::ValidationFailed(format!(
                "location {} does not exist",
                location_id
            )));
        }
        Ok(())
    }
}

fn require_actor(actor: &str) -> Result<()> {
    if actor.trim().is_empty() {
        return Err(Error::MissingActor);
    }
    Ok(())
}

fn require_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::ValidationFailed("name must not be empty".to_string()));
    }
    Ok(())
}
