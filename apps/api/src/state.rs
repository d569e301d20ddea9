use baixas_application::WriteOffHistoryService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub history_service: WriteOffHistoryService,
}
