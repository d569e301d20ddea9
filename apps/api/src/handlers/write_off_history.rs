use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use baixas_core::{AppError, CompanyId};

use crate::dto::{
    CreateWriteOffRecordRequest, CreatedWriteOffRecordResponse, MessageResponse,
    QueryWriteOffRecordsRequest, RetentionConfigRequest, RetentionConfigResponse,
    WriteOffHistoryResponse, WriteOffRecordResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn save_retention_config_handler(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    payload: Result<Json<RetentionConfigRequest>, JsonRejection>,
) -> ApiResult<Json<RetentionConfigResponse>> {
    let company_id = CompanyId::new(company_id)?;
    let Json(payload) = payload?;

    let policy = state
        .history_service
        .set_retention_policy(&company_id, payload.into_policy()?)
        .await?;

    Ok(Json(RetentionConfigResponse {
        dias_expiracao: Some(policy.ttl_days()),
    }))
}

pub async fn retention_config_handler(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> ApiResult<Json<RetentionConfigResponse>> {
    let company_id = CompanyId::new(company_id)?;

    let policy = state
        .history_service
        .get_retention_policy(&company_id)
        .await?;

    Ok(Json(RetentionConfigResponse {
        dias_expiracao: policy.map(|policy| policy.ttl_days()),
    }))
}

pub async fn create_write_off_record_handler(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    payload: Result<Json<CreateWriteOffRecordRequest>, JsonRejection>,
) -> ApiResult<Json<CreatedWriteOffRecordResponse>> {
    let company_id = CompanyId::new(company_id)?;
    let Json(payload) = payload?;

    let record = state
        .history_service
        .create_record(&company_id, payload.into())
        .await?;
    let id = record.id().value();

    Ok(Json(CreatedWriteOffRecordResponse {
        id,
        message: format!("write-off record {id} stored"),
    }))
}

pub async fn get_write_off_record_handler(
    State(state): State<AppState>,
    Path((company_id, record_id)): Path<(String, String)>,
) -> ApiResult<Json<WriteOffRecordResponse>> {
    let company_id = CompanyId::new(company_id)?;

    let record = state
        .history_service
        .get_record(&company_id, record_id.as_str())
        .await?;

    Ok(Json(WriteOffRecordResponse::from(record)))
}

pub async fn delete_write_off_record_handler(
    State(state): State<AppState>,
    Path((company_id, record_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let company_id = CompanyId::new(company_id)?;

    state
        .history_service
        .delete_record(&company_id, record_id.as_str())
        .await?;

    Ok(Json(MessageResponse {
        message: format!("write-off record {} deleted", record_id.trim()),
    }))
}

pub async fn query_write_off_records_handler(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    payload: Result<Option<Json<QueryWriteOffRecordsRequest>>, JsonRejection>,
) -> ApiResult<Json<WriteOffHistoryResponse>> {
    let company_id = CompanyId::new(company_id)?;
    // No body at all reads the whole history.
    let payload = payload?.map(|Json(payload)| payload).unwrap_or_default();
    let query = payload.into_query()?;

    let records = state
        .history_service
        .query_records(&company_id, &query)
        .await?
        .into_iter()
        .map(WriteOffRecordResponse::from)
        .collect();

    Ok(Json(WriteOffHistoryResponse {
        historico_baixas: records,
    }))
}

pub async fn delete_all_write_off_records_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.history_service.delete_all_records().await {
        return Err(ApiError(AppError::Internal(
            "failed to delete the write-off history".to_owned(),
        )));
    }

    Ok(Json(MessageResponse {
        message: "write-off history deleted".to_owned(),
    }))
}

#[cfg(test)]
mod tests;
