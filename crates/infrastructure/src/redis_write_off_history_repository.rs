//! Redis-backed write-off history repository.
//!
//! Key layout:
//! - `history:{company}:counter` serial id counter (INCR)
//! - `history:{company}:{id}` record hash, with expiry
//! - `history_config:{company}` retention hash with field `ttl_days`

use std::collections::HashMap;

use async_trait::async_trait;
use baixas_application::WriteOffHistoryRepository;
use baixas_core::{AppError, AppResult, CompanyId};
use baixas_domain::{
    NewWriteOffRecord, RecordId, RetentionPolicy, WriteOffRecord, WriteOffRecordInput,
};
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tracing::warn;

const RECORD_KEY_PREFIX: &str = "history";
const CONFIG_KEY_PREFIX: &str = "history_config";
const COUNTER_KEY_SUFFIX: &str = "counter";
const TTL_DAYS_FIELD: &str = "ttl_days";

const ID_FIELD: &str = "id";
const PRODUCT_ID_FIELD: &str = "id_produto";
const PRODUCT_NAME_FIELD: &str = "nome_produto";
const PRODUCT_CODE_FIELD: &str = "codigo_produto";
const EVENT_TIME_FIELD: &str = "data_acontecimento";
const RECORD_TYPE_FIELD: &str = "tipo_registro";

const SCAN_BATCH_SIZE: usize = 250;
const DELETE_BATCH_SIZE: usize = 500;

/// Redis implementation of the write-off history repository port.
#[derive(Clone)]
pub struct RedisWriteOffHistoryRepository {
    client: redis::Client,
}

impl RedisWriteOffHistoryRepository {
    /// Creates a repository with a configured Redis client.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

fn counter_key(company_id: &CompanyId) -> String {
    format!("{RECORD_KEY_PREFIX}:{company_id}:{COUNTER_KEY_SUFFIX}")
}

fn record_key(company_id: &CompanyId, record_id: RecordId) -> String {
    format!("{RECORD_KEY_PREFIX}:{company_id}:{record_id}")
}

fn company_record_pattern(company_id: &CompanyId) -> String {
    format!("{RECORD_KEY_PREFIX}:{company_id}:*")
}

fn config_key(company_id: &CompanyId) -> String {
    format!("{CONFIG_KEY_PREFIX}:{company_id}")
}

/// Extracts the record id from a scanned key, skipping the counter key.
fn record_id_from_key(company_id: &CompanyId, key: &str) -> Option<RecordId> {
    let prefix = format!("{RECORD_KEY_PREFIX}:{company_id}:");
    key.strip_prefix(prefix.as_str())
        .filter(|suffix| *suffix != COUNTER_KEY_SUFFIX)
        .and_then(|suffix| suffix.parse::<RecordId>().ok())
}

fn encode_record(record: &WriteOffRecord) -> Vec<(&'static str, String)> {
    vec![
        (ID_FIELD, record.id().to_string()),
        (PRODUCT_ID_FIELD, record.product_id().as_str().to_owned()),
        (PRODUCT_NAME_FIELD, record.product_name().as_str().to_owned()),
        (PRODUCT_CODE_FIELD, record.product_code().as_str().to_owned()),
        (EVENT_TIME_FIELD, record.event_time().as_str().to_owned()),
        (RECORD_TYPE_FIELD, record.record_type().as_str().to_owned()),
    ]
}

fn decode_record(
    record_id: RecordId,
    mut fields: HashMap<String, String>,
) -> AppResult<WriteOffRecord> {
    let input = WriteOffRecordInput {
        product_id: fields.remove(PRODUCT_ID_FIELD),
        product_name: fields.remove(PRODUCT_NAME_FIELD),
        product_code: fields.remove(PRODUCT_CODE_FIELD),
        event_time: fields.remove(EVENT_TIME_FIELD),
        record_type: fields.remove(RECORD_TYPE_FIELD),
    };

    NewWriteOffRecord::new(input)
        .map(|record| record.with_id(record_id))
        .map_err(|error| {
            AppError::Internal(format!(
                "stored write-off record '{record_id}' is invalid: {error}"
            ))
        })
}

/// HSET of every field and EXPIRE of the same key, sent as one MULTI/EXEC block.
fn save_record_pipeline(
    key: &str,
    fields: &[(&'static str, String)],
    ttl_seconds: u64,
) -> redis::Pipeline {
    let mut pipeline = redis::pipe();
    pipeline
        .atomic()
        .cmd("HSET")
        .arg(key)
        .arg(fields)
        .cmd("EXPIRE")
        .arg(key)
        .arg(ttl_seconds);
    pipeline
}

async fn scan_keys(connection: &mut MultiplexedConnection, pattern: &str) -> AppResult<Vec<String>> {
    let mut keys = Vec::new();
    let mut cursor: u64 = 0;

    loop {
        let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_BATCH_SIZE)
            .query_async(&mut *connection)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to scan redis keys '{pattern}': {error}"))
            })?;

        keys.extend(batch);
        if next_cursor == 0 {
            break;
        }
        cursor = next_cursor;
    }

    // SCAN may return a key more than once.
    keys.sort_unstable();
    keys.dedup();
    Ok(keys)
}

#[async_trait]
impl WriteOffHistoryRepository for RedisWriteOffHistoryRepository {
    async fn next_record_id(&self, company_id: &CompanyId) -> AppResult<RecordId> {
        let mut connection = self.connection().await?;

        let next_value: u64 = connection
            .incr(counter_key(company_id), 1_u64)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to reserve write-off record id for company '{company_id}': {error}"
                ))
            })?;

        RecordId::new(next_value)
    }

    async fn save_record(
        &self,
        company_id: &CompanyId,
        record: &WriteOffRecord,
        ttl_seconds: u64,
    ) -> AppResult<u64> {
        let key = record_key(company_id, record.id());
        let fields = encode_record(record);
        let mut connection = self.connection().await?;

        let pipeline = save_record_pipeline(&key, &fields, ttl_seconds);
        let (written_fields, _expiry_applied): (u64, u64) = pipeline
            .query_async(&mut connection)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write write-off record '{key}': {error}"
                ))
            })?;

        Ok(written_fields)
    }

    async fn find_record(
        &self,
        company_id: &CompanyId,
        record_id: RecordId,
    ) -> AppResult<Option<WriteOffRecord>> {
        let key = record_key(company_id, record_id);
        let mut connection = self.connection().await?;

        let fields: HashMap<String, String> =
            connection.hgetall(&key).await.map_err(|error| {
                AppError::Internal(format!("failed to read write-off record '{key}': {error}"))
            })?;

        if fields.is_empty() {
            return Ok(None);
        }

        decode_record(record_id, fields).map(Some)
    }

    async fn list_records(&self, company_id: &CompanyId) -> AppResult<Vec<WriteOffRecord>> {
        let mut connection = self.connection().await?;
        let keys = scan_keys(&mut connection, company_record_pattern(company_id).as_str()).await?;

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(record_id) = record_id_from_key(company_id, key.as_str()) else {
                continue;
            };

            let fields: HashMap<String, String> =
                connection.hgetall(&key).await.map_err(|error| {
                    AppError::Internal(format!(
                        "failed to read write-off record '{key}': {error}"
                    ))
                })?;

            // Expired between SCAN and HGETALL.
            if fields.is_empty() {
                continue;
            }

            match decode_record(record_id, fields) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(
                        error = %error,
                        company_id = %company_id,
                        record_id = %record_id,
                        "skipping unreadable write-off record"
                    );
                }
            }
        }

        Ok(records)
    }

    async fn delete_record(&self, company_id: &CompanyId, record_id: RecordId) -> AppResult<bool> {
        let key = record_key(company_id, record_id);
        let mut connection = self.connection().await?;

        let removed: u64 = connection.del(&key).await.map_err(|error| {
            AppError::Internal(format!("failed to delete write-off record '{key}': {error}"))
        })?;

        Ok(removed > 0)
    }

    async fn purge_all(&self) -> AppResult<u64> {
        let mut connection = self.connection().await?;

        let mut keys = scan_keys(&mut connection, &format!("{RECORD_KEY_PREFIX}:*")).await?;
        keys.extend(scan_keys(&mut connection, &format!("{CONFIG_KEY_PREFIX}:*")).await?);

        let mut removed = 0_u64;
        for batch in keys.chunks(DELETE_BATCH_SIZE) {
            let batch_removed: u64 = connection.del(batch).await.map_err(|error| {
                AppError::Internal(format!("failed to purge write-off history: {error}"))
            })?;
            removed += batch_removed;
        }

        Ok(removed)
    }

    async fn save_retention_policy(
        &self,
        company_id: &CompanyId,
        policy: RetentionPolicy,
    ) -> AppResult<()> {
        let key = config_key(company_id);
        let mut connection = self.connection().await?;

        connection
            .hset::<_, _, _, ()>(&key, TTL_DAYS_FIELD, policy.ttl_days())
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to write retention policy '{key}': {error}"
                ))
            })
    }

    async fn find_retention_policy(
        &self,
        company_id: &CompanyId,
    ) -> AppResult<Option<RetentionPolicy>> {
        let key = config_key(company_id);
        let mut connection = self.connection().await?;

        let ttl_days: Option<i64> =
            connection
                .hget(&key, TTL_DAYS_FIELD)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to read retention policy '{key}': {error}"
                    ))
                })?;

        ttl_days
            .map(|days| {
                RetentionPolicy::new(days).map_err(|error| {
                    AppError::Internal(format!("stored retention policy '{key}' is invalid: {error}"))
                })
            })
            .transpose()
    }

    async fn ping(&self) -> AppResult<()> {
        let mut connection = self.connection().await?;

        let reply: String = connection
            .ping()
            .await
            .map_err(|error| AppError::Internal(format!("redis ping failed: {error}")))?;
        if !reply.eq_ignore_ascii_case("pong") {
            return Err(AppError::Internal(format!(
                "unexpected redis ping response '{reply}'"
            )));
        }

        Ok(())
    }
}
