//! Write-off history application service.

use std::sync::Arc;

use chrono::Local;
use tracing::{error, info};

use baixas_core::{AppError, AppResult, CompanyId};
use baixas_domain::{
    NewWriteOffRecord, RecordId, RetentionPolicy, WriteOffQuery, WriteOffRecord,
    WriteOffRecordInput,
};

use crate::write_off_ports::WriteOffHistoryRepository;

/// Application service for recording and querying write-off events.
#[derive(Clone)]
pub struct WriteOffHistoryService {
    repository: Arc<dyn WriteOffHistoryRepository>,
}

impl WriteOffHistoryService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn WriteOffHistoryRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores a new write-off record.
    ///
    /// The expiry comes from the company's retention policy at the time of
    /// the call and is not revisited when the policy changes later.
    pub async fn create_record(
        &self,
        company_id: &CompanyId,
        input: WriteOffRecordInput,
    ) -> AppResult<WriteOffRecord> {
        let new_record = NewWriteOffRecord::new(input)?;
        let policy = self
            .repository
            .find_retention_policy(company_id)
            .await?
            .unwrap_or_default();

        let record_id = self.repository.next_record_id(company_id).await?;
        let record = new_record.with_id(record_id);

        let written_fields = self
            .repository
            .save_record(company_id, &record, policy.ttl_seconds())
            .await?;
        if written_fields == 0 {
            return Err(AppError::Internal(format!(
                "storage write failure: no fields written for record '{record_id}' of company '{company_id}'"
            )));
        }

        info!(
            company_id = %company_id,
            record_id = %record_id,
            ttl_days = policy.ttl_days(),
            "write-off record stored"
        );

        Ok(record)
    }

    /// Returns one record.
    pub async fn get_record(
        &self,
        company_id: &CompanyId,
        record_id: &str,
    ) -> AppResult<WriteOffRecord> {
        let parsed_id = parse_record_id(company_id, record_id)?;

        self.repository
            .find_record(company_id, parsed_id)
            .await?
            .ok_or_else(|| record_not_found(company_id, record_id))
    }

    /// Returns every live record of the company, unfiltered.
    pub async fn list_records(&self, company_id: &CompanyId) -> AppResult<Vec<WriteOffRecord>> {
        self.repository.list_records(company_id).await
    }

    /// Returns the company's records filtered and sorted relative to today's local date.
    pub async fn query_records(
        &self,
        company_id: &CompanyId,
        query: &WriteOffQuery,
    ) -> AppResult<Vec<WriteOffRecord>> {
        let records = self.list_records(company_id).await?;
        Ok(query.apply(records, Local::now().date_naive()))
    }

    /// Deletes one record.
    pub async fn delete_record(&self, company_id: &CompanyId, record_id: &str) -> AppResult<()> {
        let parsed_id = parse_record_id(company_id, record_id)?;

        if !self.repository.delete_record(company_id, parsed_id).await? {
            return Err(record_not_found(company_id, record_id));
        }

        info!(company_id = %company_id, record_id = %parsed_id, "write-off record deleted");
        Ok(())
    }

    /// Deletes the history of every company, including counters and retention settings.
    ///
    /// Failures are logged and reported as `false`.
    pub async fn delete_all_records(&self) -> bool {
        match self.repository.purge_all().await {
            Ok(removed_keys) => {
                info!(removed_keys, "write-off history purged");
                true
            }
            Err(purge_error) => {
                error!(error = %purge_error, "failed to purge write-off history");
                false
            }
        }
    }

    /// Overwrites the company's retention policy.
    pub async fn set_retention_policy(
        &self,
        company_id: &CompanyId,
        policy: RetentionPolicy,
    ) -> AppResult<RetentionPolicy> {
        self.repository
            .save_retention_policy(company_id, policy)
            .await?;

        info!(
            company_id = %company_id,
            ttl_days = policy.ttl_days(),
            "write-off retention updated"
        );

        Ok(policy)
    }

    /// Returns the company's configured retention policy, if any.
    pub async fn get_retention_policy(
        &self,
        company_id: &CompanyId,
    ) -> AppResult<Option<RetentionPolicy>> {
        self.repository.find_retention_policy(company_id).await
    }

    /// Checks that the history storage answers.
    pub async fn check_storage(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

// Non-numeric ids can never address a stored record.
fn parse_record_id(company_id: &CompanyId, record_id: &str) -> AppResult<RecordId> {
    record_id
        .parse::<RecordId>()
        .map_err(|_| record_not_found(company_id, record_id))
}

fn record_not_found(company_id: &CompanyId, record_id: &str) -> AppError {
    AppError::NotFound(format!(
        "write-off record '{record_id}' not found for company '{company_id}'"
    ))
}
