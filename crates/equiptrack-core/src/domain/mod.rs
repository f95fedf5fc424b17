//! Domain layer
//!
//! Contains the core business logic and domain models.

pub mod audit;
pub mod equipment;
pub mod search;
