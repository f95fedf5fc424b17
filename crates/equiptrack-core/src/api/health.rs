//! Health endpoint
//!
//! Reports database reachability and schema version.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::storage::Database;

/// Health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

/// Health status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Warning,
    Error,
}

/// Overall health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: String,
}

/// `GET /health`; 503 when any check is in error
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = check(&state.db).await;
    let status = if report.overall_status == HealthStatus::Error {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(report))
}

/// Run all checks against `db`
pub async fn check(db: &Database) -> HealthReport {
    let checks = vec![check_database(db).await, check_schema(db).await];
    let overall_status = checks
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Ok);

    HealthReport {
        overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

async fn check_database(db: &Database) -> HealthCheck {
    match db.health_check().await {
        Ok(()) => HealthCheck {
            name: "Database".to_string(),
            status: HealthStatus::Ok,
            message: Some("Connected and responsive".to_string()),
        },
        Err(e) => HealthCheck {
            name: "Database".to_string(),
            status: HealthStatus::Error,
            message: Some(format!("Query failed: {}", e)),
        },
    }
}

async fn check_schema(db: &Database) -> HealthCheck {
    match db.migration_status().await {
        Ok(status) if status.needs_migration => HealthCheck {
            name: "Schema".to_string(),
            status: HealthStatus::Warning,
            message: Some(format!(
                "At version {}, latest is {}",
                status.current_version, status.target_version
            )),
        },
        Ok(status) => HealthCheck {
            name: "Schema".to_string(),
            status: HealthStatus::Ok,
            message: Some(format!("Version {}", status.current_version)),
        },
        Err(e) => HealthCheck {
            name: "Schema".to_string(),
            status: HealthStatus::Error,
            message: Some(format!("Status unavailable: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fresh_database_is_healthy() {
        let db = Database::in_memory().await.unwrap();
        let report = check(&db).await;

        assert_eq!(report.overall_status, HealthStatus::Ok);
        assert_eq!(report.checks.len(), 2);
    }

    #[tokio::test]
    async fn test_closed_pool_is_error() {
        let db = Database::in_memory().await.unwrap();
        db.close().await;

        let report = check(&db).await;
        assert_eq!(report.overall_status, HealthStatus::Error);
    }
}
