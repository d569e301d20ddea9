use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use baixas_application::{WriteOffHistoryRepository, WriteOffHistoryService};
use baixas_core::{AppError, AppResult, CompanyId};
use baixas_domain::{RecordId, RetentionPolicy, WriteOffRecord};
use baixas_infrastructure::InMemoryWriteOffHistoryRepository;
use chrono::Local;
use serde_json::json;

use crate::dto::{CreateWriteOffRecordRequest, QueryWriteOffRecordsRequest, RetentionConfigRequest};
use crate::error::ApiError;
use crate::state::AppState;

use super::{
    create_write_off_record_handler, delete_all_write_off_records_handler,
    delete_write_off_record_handler, get_write_off_record_handler, query_write_off_records_handler,
    retention_config_handler, save_retention_config_handler,
};

struct BrokenWriteOffHistoryRepository;

#[async_trait]
impl WriteOffHistoryRepository for BrokenWriteOffHistoryRepository {
    async fn next_record_id(&self, _company_id: &CompanyId) -> AppResult<RecordId> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn save_record(
        &self,
        _company_id: &CompanyId,
        _record: &WriteOffRecord,
        _ttl_seconds: u64,
    ) -> AppResult<u64> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn find_record(
        &self,
        _company_id: &CompanyId,
        _record_id: RecordId,
    ) -> AppResult<Option<WriteOffRecord>> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn list_records(&self, _company_id: &CompanyId) -> AppResult<Vec<WriteOffRecord>> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn delete_record(
        &self,
        _company_id: &CompanyId,
        _record_id: RecordId,
    ) -> AppResult<bool> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn purge_all(&self) -> AppResult<u64> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn save_retention_policy(
        &self,
        _company_id: &CompanyId,
        _policy: RetentionPolicy,
    ) -> AppResult<()> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn find_retention_policy(
        &self,
        _company_id: &CompanyId,
    ) -> AppResult<Option<RetentionPolicy>> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::Internal("redis unavailable".to_owned()))
    }
}

fn in_memory_state() -> AppState {
    AppState {
        history_service: WriteOffHistoryService::new(Arc::new(
            InMemoryWriteOffHistoryRepository::new(),
        )),
    }
}

fn broken_state() -> AppState {
    AppState {
        history_service: WriteOffHistoryService::new(Arc::new(BrokenWriteOffHistoryRepository)),
    }
}

fn create_request(record_type: &str, event_time: &str) -> CreateWriteOffRecordRequest {
    serde_json::from_value(json!({
        "id_produto": "981",
        "nome_produto": "Leite integral 1L",
        "codigo_produto": "LT-1000",
        "data_acontecimento": event_time,
        "tipo_registro": record_type,
    }))
    .unwrap_or_else(|_| unreachable!())
}

fn status_of(error: ApiError) -> StatusCode {
    error.into_response().status()
}

async fn create(state: &AppState, company_id: &str, request: CreateWriteOffRecordRequest) -> u64 {
    let Ok(Json(created)) = create_write_off_record_handler(
        State(state.clone()),
        Path(company_id.to_owned()),
        Ok(Json(request)),
    )
    .await
    else {
        panic!("record should be created");
    };

    created.id
}

#[tokio::test]
async fn configured_record_round_trips_through_handlers() {
    let state = in_memory_state();

    let config_request: RetentionConfigRequest =
        serde_json::from_value(json!({"dias_expiracao": 10})).unwrap_or_else(|_| unreachable!());
    let saved = save_retention_config_handler(
        State(state.clone()),
        Path("17".to_owned()),
        Ok(Json(config_request)),
    )
    .await;
    let Ok(Json(saved)) = saved else {
        panic!("retention should be saved");
    };
    assert_eq!(saved.dias_expiracao, Some(10));

    let Ok(Json(created)) = create_write_off_record_handler(
        State(state.clone()),
        Path("17".to_owned()),
        Ok(Json(create_request("vencimento", "2026-10-19T09:15:00"))),
    )
    .await
    else {
        panic!("record should be created");
    };
    assert_eq!(created.id, 1);
    assert_eq!(created.message, "write-off record 1 stored");

    let Ok(Json(record)) = get_write_off_record_handler(
        State(state.clone()),
        Path(("17".to_owned(), "1".to_owned())),
    )
    .await
    else {
        panic!("record should be readable");
    };

    assert_eq!(record.id, 1);
    assert_eq!(record.id_produto, "981");
    assert_eq!(record.nome_produto, "Leite integral 1L");
    assert_eq!(record.codigo_produto, "LT-1000");
    assert_eq!(record.data_acontecimento, "2026-10-19T09:15:00");
    assert_eq!(record.tipo_registro, "vencimento");
}

#[tokio::test]
async fn retention_config_is_empty_until_set() {
    let state = in_memory_state();

    let Ok(Json(config)) = retention_config_handler(State(state), Path("17".to_owned())).await
    else {
        panic!("retention lookup should succeed");
    };

    assert_eq!(config.dias_expiracao, None);
    assert_eq!(
        serde_json::to_value(&config).unwrap_or_else(|_| unreachable!()),
        json!({})
    );
}

#[tokio::test]
async fn invalid_retention_is_a_bad_request() {
    let config_request: RetentionConfigRequest =
        serde_json::from_value(json!({"dias_expiracao": 0})).unwrap_or_else(|_| unreachable!());

    let result = save_retention_config_handler(
        State(in_memory_state()),
        Path("17".to_owned()),
        Ok(Json(config_request)),
    )
    .await;

    let Err(error) = result else {
        panic!("zero days should be rejected");
    };
    assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_field_is_a_bad_request_and_stores_nothing() {
    let state = in_memory_state();
    let request: CreateWriteOffRecordRequest = serde_json::from_value(json!({
        "id_produto": "981",
        "codigo_produto": "LT-1000",
        "data_acontecimento": "2026-10-19T09:15:00",
        "tipo_registro": "avaria",
    }))
    .unwrap_or_else(|_| unreachable!());

    let result = create_write_off_record_handler(
        State(state.clone()),
        Path("17".to_owned()),
        Ok(Json(request)),
    )
    .await;
    let Err(error) = result else {
        panic!("missing nome_produto should be rejected");
    };
    assert_eq!(status_of(error), StatusCode::BAD_REQUEST);

    let Ok(Json(history)) = query_write_off_records_handler(
        State(state),
        Path("17".to_owned()),
        Ok(Some(Json(QueryWriteOffRecordsRequest::default()))),
    )
    .await
    else {
        panic!("history should be readable");
    };
    assert!(history.historico_baixas.is_empty());
}

#[tokio::test]
async fn invalid_company_is_a_bad_request() {
    let result = create_write_off_record_handler(
        State(in_memory_state()),
        Path("empresa 17".to_owned()),
        Ok(Json(create_request("avaria", "2026-10-19"))),
    )
    .await;

    let Err(error) = result else {
        panic!("company ids with spaces should be rejected");
    };
    assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_and_malformed_ids_are_not_found() {
    let state = in_memory_state();

    for record_id in ["5", "abc"] {
        let lookup = get_write_off_record_handler(
            State(state.clone()),
            Path(("17".to_owned(), record_id.to_owned())),
        )
        .await;
        let Err(error) = lookup else {
            panic!("record {record_id} should not exist");
        };
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);

        let deletion = delete_write_off_record_handler(
            State(state.clone()),
            Path(("17".to_owned(), record_id.to_owned())),
        )
        .await;
        let Err(error) = deletion else {
            panic!("record {record_id} should not be deletable");
        };
        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn deleted_record_is_no_longer_readable() {
    let state = in_memory_state();
    let id = create(&state, "17", create_request("avaria", "2026-10-19T10:00:00")).await;

    let deletion = delete_write_off_record_handler(
        State(state.clone()),
        Path(("17".to_owned(), id.to_string())),
    )
    .await;
    let Ok(Json(message)) = deletion else {
        panic!("record should be deleted");
    };
    assert_eq!(message.message, "write-off record 1 deleted");

    let lookup =
        get_write_off_record_handler(State(state), Path(("17".to_owned(), id.to_string()))).await;
    assert!(lookup.is_err_and(|error| status_of(error) == StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn reading_filters_by_type_and_period_and_orders_by_time() {
    let state = in_memory_state();
    let today = Local::now().date_naive();
    let today_morning = format!("{today}T08:00:00");
    let today_evening = format!("{today}T18:30:00");

    let first = create(&state, "17", create_request("avaria", &today_morning)).await;
    create(&state, "17", create_request("vencimento", &today_evening)).await;
    create(&state, "17", create_request("avaria", "2001-01-01T12:00:00")).await;
    let fourth = create(&state, "17", create_request("avaria", &today_evening)).await;

    let request: QueryWriteOffRecordsRequest = serde_json::from_value(json!({
        "tipo_registro": "avaria",
        "periodo": "hoje",
        "tipo_ordenacao": "desc",
    }))
    .unwrap_or_else(|_| unreachable!());

    let Ok(Json(history)) = query_write_off_records_handler(
        State(state),
        Path("17".to_owned()),
        Ok(Some(Json(request))),
    )
    .await
    else {
        panic!("history should be readable");
    };

    let ids: Vec<u64> = history
        .historico_baixas
        .iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![fourth, first]);
}

#[tokio::test]
async fn read_without_body_returns_the_whole_history() {
    let state = in_memory_state();
    let first = create(&state, "17", create_request("avaria", "2026-10-19T08:00:00")).await;
    let second = create(&state, "17", create_request("vencimento", "2001-01-01")).await;
    create(&state, "18", create_request("avaria", "2026-10-19T08:00:00")).await;

    let Ok(Json(history)) =
        query_write_off_records_handler(State(state), Path("17".to_owned()), Ok(None)).await
    else {
        panic!("a read without body should succeed");
    };

    let mut ids: Vec<u64> = history
        .historico_baixas
        .iter()
        .map(|record| record.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![first, second]);
}

#[tokio::test]
async fn unknown_sort_order_is_a_bad_request() {
    let request: QueryWriteOffRecordsRequest =
        serde_json::from_value(json!({"tipo_ordenacao": "random"}))
            .unwrap_or_else(|_| unreachable!());

    let result = query_write_off_records_handler(
        State(in_memory_state()),
        Path("17".to_owned()),
        Ok(Some(Json(request))),
    )
    .await;

    assert!(result.is_err_and(|error| status_of(error) == StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn delete_all_clears_every_company() {
    let state = in_memory_state();
    create(&state, "17", create_request("avaria", "2026-10-19")).await;
    create(&state, "18", create_request("avaria", "2026-10-19")).await;

    let Ok(Json(message)) = delete_all_write_off_records_handler(State(state.clone())).await
    else {
        panic!("history should be cleared");
    };
    assert_eq!(message.message, "write-off history deleted");

    for company_id in ["17", "18"] {
        let lookup = get_write_off_record_handler(
            State(state.clone()),
            Path((company_id.to_owned(), "1".to_owned())),
        )
        .await;
        assert!(lookup.is_err_and(|error| status_of(error) == StatusCode::NOT_FOUND));
    }
}

#[tokio::test]
async fn storage_failures_are_internal_errors() {
    let state = broken_state();

    let creation = create_write_off_record_handler(
        State(state.clone()),
        Path("17".to_owned()),
        Ok(Json(create_request("avaria", "2026-10-19"))),
    )
    .await;
    assert!(creation.is_err_and(|error| status_of(error) == StatusCode::INTERNAL_SERVER_ERROR));

    let purge = delete_all_write_off_records_handler(State(state)).await;
    assert!(purge.is_err_and(|error| status_of(error) == StatusCode::INTERNAL_SERVER_ERROR));
}
