use std::collections::HashMap;

use async_trait::async_trait;
use baixas_application::WriteOffHistoryRepository;
use baixas_core::{AppError, AppResult, CompanyId};
use baixas_domain::{RecordId, RetentionPolicy, WriteOffRecord};
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// Number of hash fields a stored record occupies in the Redis layout.
const STORED_FIELD_COUNT: u64 = 6;

#[derive(Debug, Clone)]
struct StoredRecord {
    record: WriteOffRecord,
    expires_at: DateTime<Utc>,
}

impl StoredRecord {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// In-memory write-off history repository implementation.
///
/// Expiry is evaluated lazily on reads.
#[derive(Debug, Default)]
pub struct InMemoryWriteOffHistoryRepository {
    counters: RwLock<HashMap<CompanyId, u64>>,
    records: RwLock<HashMap<(CompanyId, RecordId), StoredRecord>>,
    retention_policies: RwLock<HashMap<CompanyId, RetentionPolicy>>,
}

impl InMemoryWriteOffHistoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns when a stored record expires.
    pub async fn expires_at(
        &self,
        company_id: &CompanyId,
        record_id: RecordId,
    ) -> Option<DateTime<Utc>> {
        self.records
            .read()
            .await
            .get(&(company_id.clone(), record_id))
            .map(|stored| stored.expires_at)
    }
}

#[async_trait]
impl WriteOffHistoryRepository for InMemoryWriteOffHistoryRepository {
    async fn next_record_id(&self, company_id: &CompanyId) -> AppResult<RecordId> {
        let mut counters = self.counters.write().await;
        let counter = counters.entry(company_id.clone()).or_insert(0);
        *counter += 1;
        RecordId::new(*counter)
    }

    async fn save_record(
        &self,
        company_id: &CompanyId,
        record: &WriteOffRecord,
        ttl_seconds: u64,
    ) -> AppResult<u64> {
        let ttl_seconds = i64::try_from(ttl_seconds).map_err(|error| {
            AppError::Internal(format!("invalid write-off record expiry: {error}"))
        })?;

        self.records.write().await.insert(
            (company_id.clone(), record.id()),
            StoredRecord {
                record: record.clone(),
                expires_at: Utc::now() + Duration::seconds(ttl_seconds),
            },
        );

        Ok(STORED_FIELD_COUNT)
    }

    async fn find_record(
        &self,
        company_id: &CompanyId,
        record_id: RecordId,
    ) -> AppResult<Option<WriteOffRecord>> {
        let now = Utc::now();
        Ok(self
            .records
            .read()
            .await
            .get(&(company_id.clone(), record_id))
            .filter(|stored| stored.is_live(now))
            .map(|stored| stored.record.clone()))
    }

    async fn list_records(&self, company_id: &CompanyId) -> AppResult<Vec<WriteOffRecord>> {
        let now = Utc::now();
        let records = self.records.read().await;

        let mut values: Vec<WriteOffRecord> = records
            .iter()
            .filter(|((stored_company_id, _), stored)| {
                stored_company_id == company_id && stored.is_live(now)
            })
            .map(|(_, stored)| stored.record.clone())
            .collect();
        values.sort_by_key(WriteOffRecord::id);

        Ok(values)
    }

    async fn delete_record(&self, company_id: &CompanyId, record_id: RecordId) -> AppResult<bool> {
        let now = Utc::now();
        let removed = self
            .records
            .write()
            .await
            .remove(&(company_id.clone(), record_id));

        Ok(removed.is_some_and(|stored| stored.is_live(now)))
    }

    async fn purge_all(&self) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut counters = self.counters.write().await;
        let mut retention_policies = self.retention_policies.write().await;

        let removed = records.len() + counters.len() + retention_policies.len();
        records.clear();
        counters.clear();
        retention_policies.clear();

        u64::try_from(removed)
            .map_err(|error| AppError::Internal(format!("invalid purge count: {error}")))
    }

    async fn save_retention_policy(
        &self,
        company_id: &CompanyId,
        policy: RetentionPolicy,
    ) -> AppResult<()> {
        self.retention_policies
            .write()
            .await
            .insert(company_id.clone(), policy);
        Ok(())
    }

    async fn find_retention_policy(
        &self,
        company_id: &CompanyId,
    ) -> AppResult<Option<RetentionPolicy>> {
        Ok(self
            .retention_policies
            .read()
            .await
            .get(company_id)
            .copied())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
