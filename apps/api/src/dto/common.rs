use serde::Serialize;

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub redis: HealthDependencyStatus,
}

/// Health of a single backing dependency.
#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Generic confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
