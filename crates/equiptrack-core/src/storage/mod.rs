//! Storage layer - SQLite
//!
//! Provides database management and migrations for the inventory store.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration
//!
//! # Usage
//!
//! ```ignore
//! use equiptrack_core::storage::{Database, DatabaseConfig};
//!
//! // In-memory database for tests
//! let db = Database::in_memory().await?;
//!
//! // File-backed database
//! let db = Database::new(DatabaseConfig::with_path("inventory.db")).await?;
//! ```

pub mod database;
pub mod migrations;

pub use database::{Database, DatabaseConfig, default_database_path};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
