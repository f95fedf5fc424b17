//! Database migrations
//!
//! Versioned SQLite schema for the inventory store.
//! Migrations are applied automatically on database connection.

use sqlx::SqlitePool;

use crate::domain::search::fold_case;

/// Current schema version
pub const CURRENT_VERSION: i32 = 4;

const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: Initial schema
const MIGRATION_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS equipment_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS equipments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        serial_number TEXT NOT NULL,
        status TEXT NOT NULL,
        condition INTEGER NOT NULL CHECK (condition BETWEEN 0 AND 10),
        photo_url TEXT,
        qr_code_data TEXT,
        metadata TEXT,
        type_id INTEGER NOT NULL REFERENCES equipment_types(id),
        location_id INTEGER NOT NULL REFERENCES locations(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_equipments_status ON equipments(status);
    CREATE INDEX IF NOT EXISTS idx_equipments_type_id ON equipments(type_id);
    CREATE INDEX IF NOT EXISTS idx_equipments_location_id ON equipments(location_id);

    CREATE TABLE IF NOT EXISTS history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        equipment_id INTEGER NOT NULL REFERENCES equipments(id) ON DELETE CASCADE,
        action TEXT NOT NULL CHECK (action IN ('create', 'update')),
        old TEXT,
        new TEXT NOT NULL,
        actor TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_history_equipment_id ON history(equipment_id);
"#;

/// Migration 2: Derived search vector
const MIGRATION_V2: &str = r#"
    ALTER TABLE equipments ADD COLUMN search_vector TEXT;

    CREATE INDEX IF NOT EXISTS idx_equipments_name_serial ON equipments(name, serial_number);
    CREATE INDEX IF NOT EXISTS idx_equipments_search_vector ON equipments(search_vector);
"#;

/// Migration 3: History is append-only
const MIGRATION_V3: &str = r#"
    CREATE TRIGGER IF NOT EXISTS history_no_update BEFORE UPDATE ON history BEGIN
        SELECT RAISE(ABORT, 'history entries are append-only');
    END;
"#;

/// Migration 4: Case-folded shadow columns for text search
///
/// Filled by `backfill_folded_columns`; SQLite `lower()` only folds ASCII.
const MIGRATION_V4: &str = r#"
    ALTER TABLE equipments ADD COLUMN name_folded TEXT NOT NULL DEFAULT '';
    ALTER TABLE equipments ADD COLUMN serial_folded TEXT NOT NULL DEFAULT '';
    ALTER TABLE equipments ADD COLUMN search_vector_folded TEXT;

    CREATE INDEX IF NOT EXISTS idx_equipments_folded ON equipments(name_folded, serial_folded);
    CREATE INDEX IF NOT EXISTS idx_equipments_search_vector_folded ON equipments(search_vector_folded);
"#;

/// Get the current schema version from the database
async fn get_current_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    let row: Option<(Option<i32>,)> = sqlx::query_as("SELECT MAX(version) FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|(v,)| v).unwrap_or(0))
}

async fn record_migration(pool: &SqlitePool, version: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let current_version = get_current_version(pool).await?;

    tracing::info!(
        current_version = current_version,
        target_version = CURRENT_VERSION,
        "Checking database migrations"
    );

    if current_version >= CURRENT_VERSION {
        tracing::debug!("Database is up to date");
        return Ok(());
    }

    if current_version < 1 {
        tracing::info!("Applying migration v1: Initial inventory schema");
        sqlx::raw_sql(MIGRATION_V1).execute(pool).await?;
        record_migration(pool, 1).await?;
    }

    if current_version < 2 {
        tracing::info!("Applying migration v2: Search vector column and indexes");
        sqlx::raw_sql(MIGRATION_V2).execute(pool).await?;
        record_migration(pool, 2).await?;
    }

    if current_version < 3 {
        tracing::info!("Applying migration v3: Append-only history");
        sqlx::raw_sql(MIGRATION_V3).execute(pool).await?;
        record_migration(pool, 3).await?;
    }

    if current_version < 4 {
        tracing::info!("Applying migration v4: Case-folded search columns");
        sqlx::raw_sql(MIGRATION_V4).execute(pool).await?;
        let backfilled = backfill_folded_columns(pool).await?;
        tracing::info!(rows = backfilled, "Backfilled case-folded columns");
        record_migration(pool, 4).await?;
    }

    tracing::info!("Database migrations completed");
    Ok(())
}

async fn backfill_folded_columns(pool: &SqlitePool) -> anyhow::Result<usize> {
    let rows: Vec<(i64, String, String, Option<String>)> =
        sqlx::query_as("SELECT id, name, serial_number, search_vector FROM equipments")
            .fetch_all(pool)
            .await?;

    for (id, name, serial_number, search_vector) in &rows {
        sqlx::query(
            "UPDATE equipments SET name_folded = ?, serial_folded = ?, search_vector_folded = ? \
             WHERE id = ?",
        )
        .bind(fold_case(name))
        .bind(fold_case(serial_number))
        .bind(search_vector.as_deref().map(fold_case))
        .bind(id)
        .execute(pool)
        .await?;
    }

    Ok(rows.len())
}

/// Get migration status information
pub async fn migration_status(pool: &SqlitePool) -> anyhow::Result<MigrationStatus> {
    let current_version = get_current_version(pool).await?;
    Ok(MigrationStatus {
        current_version,
        target_version: CURRENT_VERSION,
        needs_migration: current_version < CURRENT_VERSION,
    })
}

/// Migration status information
#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationStatus {
    /// Current schema version in the database
    pub current_version: i32,
    /// Target schema version (latest)
    pub target_version: i32,
    /// Whether migrations need to be run
    pub needs_migration: bool,
}
