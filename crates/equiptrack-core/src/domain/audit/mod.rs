//! Audit domain module
//!
//! Immutable history of every equipment create/update.
//!
//! # Architecture
//!
//! - **Entities**: `HistoryEntry`, `AuditAction`
//! - **Repository**: `HistoryRepository`, append and read only
//! - **Service**: `AuditRecorder`, snapshot and append for one mutation

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{AuditAction, HistoryEntry, NewHistoryEntry};
pub use repository::HistoryRepository;
pub use service::AuditRecorder;
