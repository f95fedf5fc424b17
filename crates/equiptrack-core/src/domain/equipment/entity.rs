//! Equipment entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest valid condition score
pub const CONDITION_MIN: i64 = 0;

/// Highest valid condition score
pub const CONDITION_MAX: i64 = 10;

/// A category of equipment (laptop, monitor, projector, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A place equipment is kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tracked piece of physical equipment
///
/// History lives in its own table, see [`EquipmentDetail::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub serial_number: String,
    /// Free-form status category ("available", "in_use", "repair", ...)
    pub status: String,
    /// Condition score in `0..=10`
    pub condition: i64,
    pub photo_url: Option<String>,
    pub qr_code_data: Option<String>,
    pub metadata: Option<serde_json::Value>,
    /// Derived text blob, `None` until the first recompute
    pub search_vector: Option<String>,
    pub type_id: i64,
    pub location_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    /// Overwrite every field the patch carries
    pub fn apply(&mut self, patch: &EquipmentPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(serial_number) = &patch.serial_number {
            self.serial_number = serial_number.clone();
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        if let Some(condition) = patch.condition {
            self.condition = condition;
        }
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
        if let Some(qr_code_data) = &patch.qr_code_data {
            self.qr_code_data = Some(qr_code_data.clone());
        }
        if let Some(metadata) = &patch.metadata {
            self.metadata = Some(metadata.clone());
        }
        if let Some(type_id) = patch.type_id {
            self.type_id = type_id;
        }
        if let Some(location_id) = patch.location_id {
            self.location_id = location_id;
        }
    }

    /// Validate the primary fields
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, &self.serial_number, &self.status, self.condition)
    }
}

/// Equipment with its type and location resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDetail {
    #[serde(flatten)]
    pub equipment: Equipment,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub location: Location,
}

impl EquipmentDetail {
    /// Serialize the record with its type and location for the audit trail
    pub fn snapshot(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Payload for creating equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: String,
    pub status: String,
    pub condition: i64,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub qr_code_data: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub type_id: i64,
    pub location_id: i64,
}

impl NewEquipment {
    /// Create a payload with the required fields
    pub fn new(
        name: impl Into<String>,
        serial_number: impl Into<String>,
        status: impl Into<String>,
        condition: i64,
        type_id: i64,
        location_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            serial_number: serial_number.into(),
            status: status.into(),
            condition,
            photo_url: None,
            qr_code_data: None,
            metadata: None,
            type_id,
            location_id,
        }
    }

    /// Attach opaque metadata
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Validate the primary fields
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.name, &self.serial_number, &self.status, self.condition)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub condition: Option<i64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub qr_code_data: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub type_id: Option<i64>,
    #[serde(default)]
    pub location_id: Option<i64>,
}

/// Payload for creating an equipment type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEquipmentType {
    pub name: String,
}

/// Payload for creating a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn validate_fields(name: &str, serial_number: &str, status: &str, condition: i64) -> Result<()> {
    if !(CONDITION_MIN..=CONDITION_MAX).contains(&condition) {
        return Err(Error::ValidationFailed(format!(
            "condition must be between {} and {}, got {}",
            CONDITION_MIN, CONDITION_MAX, condition
        )));
    }

    for (field, value) in [
        ("name", name),
        ("serial_number", serial_number),
        ("status", status),
    ] {
        if value.trim().is_empty() {
            return Err(Error::ValidationFailed(format!("{} must not be empty", field)));
        }
    }

    Ok(())
}
