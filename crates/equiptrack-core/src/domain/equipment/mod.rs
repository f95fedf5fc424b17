//! Equipment domain module
//!
//! Equipment records, their types and locations, and the audited write path.
//!
//! # Architecture
//!
//! - **Entities**: `Equipment`, `EquipmentType`, `Location`, `EquipmentDetail`
//! - **Repository**: `EquipmentRepository` for database operations
//! - **Service**: `InventoryService`, write then audit

pub mod entity;
pub mod repository;
pub mod service;

pub use entity::{
    CONDITION_MAX, CONDITION_MIN, Equipment, EquipmentDetail, EquipmentPatch, EquipmentType,
    Location, NewEquipment, NewEquipmentType, NewLocation,
};
pub use repository::EquipmentRepository;
pub use service::InventoryService;
