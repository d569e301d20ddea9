use chrono::{SecondsFormat, Utc};

use super::checks::check_storage;
use super::*;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let redis = check_storage(&state.history_service).await;

    let ready = redis.status == "ok";
    let status = if ready { "ok" } else { "degraded" };
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            redis,
        }),
    )
}
