use baixas_core::{AppError, AppResult};
use baixas_domain::{
    PeriodFilter, RetentionPolicy, SortDirection, WriteOffQuery, WriteOffRecordInput,
};
use serde_json::Value;

use super::{CreateWriteOffRecordRequest, QueryWriteOffRecordsRequest, RetentionConfigRequest};

impl RetentionConfigRequest {
    /// Validates the requested number of days.
    pub fn into_policy(self) -> AppResult<RetentionPolicy> {
        let days = match self.dias_expiracao {
            Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
                AppError::Validation(format!(
                    "field 'dias_expiracao' must be a whole number of days, got {number}"
                ))
            })?,
            Some(Value::String(text)) if !text.trim().is_empty() => {
                text.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation(format!(
                        "field 'dias_expiracao' must be a whole number of days, got '{text}'"
                    ))
                })?
            }
            _ => {
                return Err(AppError::Validation(
                    "field 'dias_expiracao' is required".to_owned(),
                ));
            }
        };

        RetentionPolicy::new(days)
    }
}

impl From<CreateWriteOffRecordRequest> for WriteOffRecordInput {
    fn from(value: CreateWriteOffRecordRequest) -> Self {
        Self {
            product_id: transport_text(value.id_produto),
            product_name: transport_text(value.nome_produto),
            product_code: transport_text(value.codigo_produto),
            event_time: transport_text(value.data_acontecimento),
            record_type: transport_text(value.tipo_registro),
        }
    }
}

impl QueryWriteOffRecordsRequest {
    /// Builds the domain query. Unknown periods are ignored; unknown orderings are rejected.
    pub fn into_query(self) -> AppResult<WriteOffQuery> {
        let sort = transport_text(self.tipo_ordenacao)
            .filter(|value| !value.trim().is_empty())
            .map(|value| SortDirection::parse_transport(value.as_str()))
            .transpose()?;

        Ok(WriteOffQuery {
            record_type: transport_text(self.tipo_registro),
            period: transport_text(self.periodo)
                .and_then(|value| PeriodFilter::parse_transport(value.as_str())),
            sort,
        })
    }
}

fn transport_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
