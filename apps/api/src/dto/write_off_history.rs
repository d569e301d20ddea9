use baixas_domain::WriteOffRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod conversions;

/// Incoming payload for setting a company's retention.
#[derive(Debug, Default, Deserialize)]
pub struct RetentionConfigRequest {
    pub dias_expiracao: Option<Value>,
}

/// Company retention. Serializes as `{}` when nothing was configured.
#[derive(Debug, Serialize)]
pub struct RetentionConfigResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dias_expiracao: Option<u32>,
}

/// Incoming payload for recording a write-off.
///
/// Fields accept JSON strings or numbers; any other JSON type counts as missing.
#[derive(Debug, Default, Deserialize)]
pub struct CreateWriteOffRecordRequest {
    pub id_produto: Option<Value>,
    pub nome_produto: Option<Value>,
    pub codigo_produto: Option<Value>,
    pub data_acontecimento: Option<Value>,
    pub tipo_registro: Option<Value>,
}

/// Acknowledgement for a stored write-off.
#[derive(Debug, Serialize)]
pub struct CreatedWriteOffRecordResponse {
    pub id: u64,
    pub message: String,
}

/// Filter and ordering options for reading a company's history.
#[derive(Debug, Default, Deserialize)]
pub struct QueryWriteOffRecordsRequest {
    pub tipo_registro: Option<Value>,
    pub periodo: Option<Value>,
    pub tipo_ordenacao: Option<Value>,
}

/// API representation of a write-off record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOffRecordResponse {
    pub id: u64,
    pub id_produto: String,
    pub nome_produto: String,
    pub codigo_produto: String,
    pub data_acontecimento: String,
    pub tipo_registro: String,
}

/// Filtered history of a company.
#[derive(Debug, Serialize)]
pub struct WriteOffHistoryResponse {
    pub historico_baixas: Vec<WriteOffRecordResponse>,
}

impl From<WriteOffRecord> for WriteOffRecordResponse {
    fn from(value: WriteOffRecord) -> Self {
        Self {
            id: value.id().value(),
            id_produto: value.product_id().as_str().to_owned(),
            nome_produto: value.product_name().as_str().to_owned(),
            codigo_produto: value.product_code().as_str().to_owned(),
            data_acontecimento: value.event_time().as_str().to_owned(),
            tipo_registro: value.record_type().as_str().to_owned(),
        }
    }
}
