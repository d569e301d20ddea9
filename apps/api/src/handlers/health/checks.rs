use baixas_application::WriteOffHistoryService;

use super::*;

pub(super) async fn check_storage(
    history_service: &WriteOffHistoryService,
) -> HealthDependencyStatus {
    match history_service.check_storage().await {
        Ok(()) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(error.to_string()),
        },
    }
}
