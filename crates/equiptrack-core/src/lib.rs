//! Equiptrack Core Library
//!
//! This crate provides the core functionality for Equiptrack, including:
//! - Equipment inventory with an audited write path
//! - Search composition (predicates, paging, totals) over SQLite
//! - Search vector maintenance, suggestions and analytics
//! - HTTP API (axum)
//! - Storage (SQLite with versioned migrations)
//! - TOML configuration

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::audit::{AuditAction, AuditRecorder, HistoryEntry};
    pub use crate::domain::equipment::{EquipmentDetail, EquipmentPatch, InventoryService, NewEquipment};
    pub use crate::domain::search::{SearchRequest, SearchService, SearchVectorMaintainer};
    pub use crate::error::{Error, Result};
    pub use crate::storage::{Database, DatabaseConfig};
}
