//! Health check payload.

use serde::Serialize;
use utoipa::ToSchema;

/// Whether the storage backend is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Storage answers.
    Ok,
    /// Storage is unreachable.
    Degraded,
}

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current storage status.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Storage answers.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
        }
    }

    /// Storage is unreachable; data routes answer `503` until it recovers.
    pub fn degraded() -> Self {
        Self {
            status: HealthStatus::Degraded,
        }
    }
}
