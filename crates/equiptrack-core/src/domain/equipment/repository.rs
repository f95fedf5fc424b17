//! Equipment repository for database operations
//!
//! Single-entity reads and writes for equipment, types and locations.

use super::entity::{
    Equipment, EquipmentDetail, EquipmentType, Location, NewEquipment, NewEquipmentType,
    NewLocation,
};
use crate::domain::search::fold_case;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Projection shared by every query that returns `EquipmentDetail`
pub(crate) const DETAIL_COLUMNS: &str = r#"
    e.id, e.name, e.serial_number, e.status, e.condition, e.photo_url, e.qr_code_data,
    e.metadata, e.search_vector, e.type_id, e.location_id, e.created_at, e.updated_at,
    t.name AS type_name, t.created_at AS type_created_at, t.updated_at AS type_updated_at,
    l.name AS location_name, l.description AS location_description,
    l.created_at AS location_created_at, l.updated_at AS location_updated_at
"#;

/// Join resolving type and location for `DETAIL_COLUMNS`
pub(crate) const DETAIL_FROM: &str = r#"
    FROM equipments e
    JOIN equipment_types t ON t.id = e.type_id
    JOIN locations l ON l.id = e.location_id
"#;

const EQUIPMENT_COLUMNS: &str = r#"
    id, name, serial_number, status, condition, photo_url, qr_code_data,
    metadata, search_vector, type_id, location_id, created_at, updated_at
"#;

/// Repository for equipment database operations
#[derive(Debug, Clone)]
pub struct EquipmentRepository {
    pool: SqlitePool,
}

impl EquipmentRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========== Types & Locations ==========

    /// Create an equipment type
    pub async fn create_type(&self, new: &NewEquipmentType) -> Result<EquipmentType> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO equipment_types (name, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(&new.name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(EquipmentType {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// List all equipment types
    pub async fn list_types(&self) -> Result<Vec<EquipmentType>> {
        let rows: Vec<TypeRow> = sqlx::query_as(
            "SELECT id, name, created_at, updated_at FROM equipment_types ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(rows.into_iter().map(TypeRow::into_type).collect())
    }

    /// Check whether a type exists
    pub async fn type_exists(&self, id: i64) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM equipment_types WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;
        Ok(count > 0)
    }

    /// Create a location
    pub async fn create_location(&self, new: &NewLocation) -> Result<Location> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO locations (name, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(Location {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// List all locations
    pub async fn list_locations(&self) -> Result<Vec<Location>> {
        let rows: Vec<LocationRow> = sqlx::query_as(
            "SELECT id, name, description, created_at, updated_at FROM locations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(rows.into_iter().map(LocationRow::into_location).collect())
    }

    /// Check whether a location exists
    pub async fn location_exists(&self, id: i64) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locations WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;
        Ok(count > 0)
    }

    // ========== Equipment ==========

    /// Insert equipment and return its id
    ///
    /// The `*_folded` shadow columns are written alongside their sources.
    pub async fn insert(&self, new: &NewEquipment) -> Result<i64> {
        let metadata = new
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO equipments (
                name, serial_number, status, condition, photo_url, qr_code_data,
                metadata, type_id, location_id, created_at, updated_at,
                name_folded, serial_folded
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.serial_number)
        .bind(&new.status)
        .bind(new.condition)
        .bind(&new.photo_url)
        .bind(&new.qr_code_data)
        .bind(&metadata)
        .bind(new.type_id)
        .bind(new.location_id)
        .bind(now)
        .bind(now)
        .bind(fold_case(&new.name))
        .bind(fold_case(&new.serial_number))
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        Ok(result.last_insert_rowid())
    }

    /// Get equipment by id
    pub async fn get(&self, id: i64) -> Result<Option<Equipment>> {
        let sql = format!("SELECT {} FROM equipments WHERE id = ?", EQUIPMENT_COLUMNS);
        let row: Option<EquipmentRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        row.map(EquipmentRow::into_equipment).transpose()
    }

    /// Get equipment with its type and location resolved
    pub async fn get_detail(&self, id: i64) -> Result<Option<EquipmentDetail>> {
        let sql = format!("SELECT {} {} WHERE e.id = ?", DETAIL_COLUMNS, DETAIL_FROM);
        let row: Option<DetailRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        row.map(DetailRow::into_detail).transpose()
    }

    /// Get every equipment record with type and location resolved, id ascending
    pub async fn list_details(&self) -> Result<Vec<EquipmentDetail>> {
        let sql = format!("SELECT {} {} ORDER BY e.id", DETAIL_COLUMNS, DETAIL_FROM);
        let rows: Vec<DetailRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::DatabaseError)?;

        rows.into_iter().map(DetailRow::into_detail).collect()
    }

    /// Write every primary field of `equipment` back to the store
    ///
    /// `search_vector` and `created_at` are never written here.
    pub async fn update(&self, equipment: &Equipment) -> Result<()> {
        let metadata = equipment
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE equipments SET
                name = ?, serial_number = ?, status = ?, condition = ?,
                photo_url = ?, qr_code_data = ?, metadata = ?,
                type_id = ?, location_id = ?, updated_at = ?,
                name_folded = ?, serial_folded = ?
            WHERE id = ?
            "#,
        )
        .bind(&equipment.name)
        .bind(&equipment.serial_number)
        .bind(&equipment.status)
        .bind(equipment.condition)
        .bind(&equipment.photo_url)
        .bind(&equipment.qr_code_data)
        .bind(&metadata)
        .bind(equipment.type_id)
        .bind(equipment.location_id)
        .bind(Utc::now())
        .bind(fold_case(&equipment.name))
        .bind(fold_case(&equipment.serial_number))
        .bind(equipment.id)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;

        if result.rows_affected() == 0 {
            return Err(Error::EquipmentNotFound(equipment.id));
        }
        Ok(())
    }

    /// Store a recomputed search vector; returns false when the row is gone
    pub async fn set_search_vector(&self, id: i64, vector: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE equipments SET search_vector = ?, search_vector_folded = ? WHERE id = ?",
        )
        .bind(vector)
        .bind(fold_case(vector))
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::DatabaseError)?;
        Ok(result.rows_affected() > 0)
    }
}

// ========== Database Row Types ==========

#[derive(sqlx::FromRow)]
struct TypeRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TypeRow {
    fn into_type(self) -> EquipmentType {
        EquipmentType {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LocationRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LocationRow {
    fn into_location(self) -> Location {
        Location {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EquipmentRow {
    id: i64,
    name: String,
    serial_number: String,
    status: String,
    condition: i64,
    photo_url: Option<String>,
    qr_code_data: Option<String>,
    metadata: Option<String>,
    search_vector: Option<String>,
    type_id: i64,
    location_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EquipmentRow {
    fn into_equipment(self) -> Result<Equipment> {
        let metadata = parse_metadata(self.metadata)?;

        Ok(Equipment {
            id: self.id,
            name: self.name,
            serial_number: self.serial_number,
            status: self.status,
            condition: self.condition,
            photo_url: self.photo_url,
            qr_code_data: self.qr_code_data,
            metadata,
            search_vector: self.search_vector,
            type_id: self.type_id,
            location_id: self.location_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DetailRow {
    id: i64,
    name: String,
    serial_number: String,
    status: String,
    condition: i64,
    photo_url: Option<String>,
    qr_code_data: Option<String>,
    metadata: Option<String>,
    search_vector: Option<String>,
    type_id: i64,
    location_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    type_name: String,
    type_created_at: DateTime<Utc>,
    type_updated_at: DateTime<Utc>,
    location_name: String,
    location_description: Option<String>,
    location_created_at: DateTime<Utc>,
    location_updated_at: DateTime<Utc>,
}

impl DetailRow {
    pub(crate) fn into_detail(self) -> Result<EquipmentDetail> {
        let metadata = parse_metadata(self.metadata)?;

        Ok(EquipmentDetail {
            equipment: Equipment {
                id: self.id,
                name: self.name,
                serial_number: self.serial_number,
                status: self.status,
                condition: self.condition,
                photo_url: self.photo_url,
                qr_code_data: self.qr_code_data,
                metadata,
                search_vector: self.search_vector,
                type_id: self.type_id,
                location_id: self.location_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            equipment_type: EquipmentType {
                id: self.type_id,
                name: self.type_name,
                created_at: self.type_created_at,
                updated_at: self.type_updated_at,
            },
            location: Location {
                id: self.location_id,
                name: self.location_name,
                description: self.location_description,
                created_at: self.location_created_at,
                updated_at: self.location_updated_at,
            },
        })
    }
}

fn parse_metadata(raw: Option<String>) -> Result<Option<serde_json::Value>> {
    raw.map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(Error::Serialization)
}
