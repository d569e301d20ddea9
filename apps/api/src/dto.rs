mod common;
mod write_off_history;

pub use common::{HealthDependencyStatus, HealthResponse, MessageResponse};
pub use write_off_history::{
    CreateWriteOffRecordRequest, CreatedWriteOffRecordResponse, QueryWriteOffRecordsRequest,
    RetentionConfigRequest, RetentionConfigResponse, WriteOffHistoryResponse,
    WriteOffRecordResponse,
};
