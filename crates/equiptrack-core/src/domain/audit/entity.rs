//! Audit trail types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of mutation an entry documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }

    /// Parse from the stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub equipment_id: i64,
    pub action: AuditAction,
    /// Pre-write snapshot; absent on create
    pub old: Option<serde_json::Value>,
    /// Post-write snapshot
    pub new: serde_json::Value,
    /// Identity of the caller (token subject)
    pub actor: String,
    pub created_at: DateTime<Utc>,
}

/// A history entry that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub equipment_id: i64,
    pub action: AuditAction,
    pub old: Option<serde_json::Value>,
    pub new: serde_json::Value,
    pub actor: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip_strings() {
        for action in [AuditAction::Create, AuditAction::Update] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("delete"), None);
        assert_eq!(AuditAction::parse("UPDATE"), None);
    }

    #[test]
    fn test_action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AuditAction::Update).unwrap(),
            "\"update\""
        );
    }
}
