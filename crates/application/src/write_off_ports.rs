use async_trait::async_trait;

use baixas_core::{AppResult, CompanyId};
use baixas_domain::{RecordId, RetentionPolicy, WriteOffRecord};

/// Repository port for company-scoped write-off history persistence.
///
/// Every operation is a single step against the backing store; no operation
/// spans several records transactionally.
#[async_trait]
pub trait WriteOffHistoryRepository: Send + Sync {
    /// Atomically reserves the next serial id of the company. Ids start at 1
    /// and are never reused.
    async fn next_record_id(&self, company_id: &CompanyId) -> AppResult<RecordId>;

    /// Writes all record fields and sets the record expiry on the same key.
    ///
    /// Returns the number of fields written.
    async fn save_record(
        &self,
        company_id: &CompanyId,
        record: &WriteOffRecord,
        ttl_seconds: u64,
    ) -> AppResult<u64>;

    /// Finds one record.
    async fn find_record(
        &self,
        company_id: &CompanyId,
        record_id: RecordId,
    ) -> AppResult<Option<WriteOffRecord>>;

    /// Lists every live record of the company, in storage enumeration order.
    async fn list_records(&self, company_id: &CompanyId) -> AppResult<Vec<WriteOffRecord>>;

    /// Deletes one record. Returns whether anything was removed.
    async fn delete_record(&self, company_id: &CompanyId, record_id: RecordId) -> AppResult<bool>;

    /// Removes all records, counters and retention settings of every company.
    ///
    /// Returns the number of removed keys.
    async fn purge_all(&self) -> AppResult<u64>;

    /// Overwrites the retention policy of the company.
    async fn save_retention_policy(
        &self,
        company_id: &CompanyId,
        policy: RetentionPolicy,
    ) -> AppResult<()>;

    /// Reads the retention policy of the company, if one was configured.
    async fn find_retention_policy(
        &self,
        company_id: &CompanyId,
    ) -> AppResult<Option<RetentionPolicy>>;

    /// Round-trips the backing store over the same connection path the
    /// record operations use.
    async fn ping(&self) -> AppResult<()>;
}
