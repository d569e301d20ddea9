use std::sync::Arc;

use baixas_application::WriteOffHistoryService;
use baixas_infrastructure::RedisWriteOffHistoryRepository;

use crate::state::AppState;

pub fn build_app_state(redis_client: redis::Client) -> AppState {
    let repository = Arc::new(RedisWriteOffHistoryRepository::new(redis_client));

    AppState {
        history_service: WriteOffHistoryService::new(repository),
    }
}
