use baixas_application::WriteOffHistoryRepository;
use baixas_core::CompanyId;
use baixas_domain::{NewWriteOffRecord, RecordId, RetentionPolicy, WriteOffRecord, WriteOffRecordInput};
use chrono::Utc;

use super::InMemoryWriteOffHistoryRepository;

fn company(value: &str) -> CompanyId {
    CompanyId::new(value).unwrap_or_else(|_| unreachable!())
}

fn record(id: RecordId) -> WriteOffRecord {
    NewWriteOffRecord::new(WriteOffRecordInput {
        product_id: Some("12".to_owned()),
        product_name: Some("Detergente neutro".to_owned()),
        product_code: Some("DN-500".to_owned()),
        event_time: Some("2026-10-19T11:00:00".to_owned()),
        record_type: Some("avaria".to_owned()),
    })
    .map(|record| record.with_id(id))
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn counters_start_at_one_and_are_company_scoped() {
    let repository = InMemoryWriteOffHistoryRepository::new();
    let left = company("1");
    let right = company("2");

    let first = repository.next_record_id(&left).await;
    let second = repository.next_record_id(&left).await;
    let other = repository.next_record_id(&right).await;

    assert_eq!(first.map(|id| id.value()).ok(), Some(1));
    assert_eq!(second.map(|id| id.value()).ok(), Some(2));
    assert_eq!(other.map(|id| id.value()).ok(), Some(1));
}

#[tokio::test]
async fn save_sets_expiry_from_ttl() {
    let repository = InMemoryWriteOffHistoryRepository::new();
    let company_id = company("1");
    let record_id = RecordId::new(1).unwrap_or_else(|_| unreachable!());
    let ttl_seconds = RetentionPolicy::new(5)
        .map(|policy| policy.ttl_seconds())
        .unwrap_or_default();

    let before = Utc::now();
    let written = repository
        .save_record(&company_id, &record(record_id), ttl_seconds)
        .await;
    assert_eq!(written.ok(), Some(6));

    let expires_at = repository.expires_at(&company_id, record_id).await;
    let Some(expires_at) = expires_at else {
        panic!("record should carry an expiry");
    };
    let remaining = (expires_at - before).num_seconds();
    assert!((431_990..=432_010).contains(&remaining), "remaining {remaining}");
}

#[tokio::test]
async fn expired_records_are_not_returned() {
    let repository = InMemoryWriteOffHistoryRepository::new();
    let company_id = company("1");
    let record_id = RecordId::new(1).unwrap_or_else(|_| unreachable!());

    assert!(
        repository
            .save_record(&company_id, &record(record_id), 0)
            .await
            .is_ok()
    );

    assert!(
        repository
            .find_record(&company_id, record_id)
            .await
            .is_ok_and(|found| found.is_none())
    );
    assert!(
        repository
            .list_records(&company_id)
            .await
            .is_ok_and(|records| records.is_empty())
    );
    assert!(
        repository
            .delete_record(&company_id, record_id)
            .await
            .is_ok_and(|removed| !removed)
    );
}

#[tokio::test]
async fn delete_reports_whether_a_record_was_removed() {
    let repository = InMemoryWriteOffHistoryRepository::new();
    let company_id = company("1");
    let record_id = RecordId::new(4).unwrap_or_else(|_| unreachable!());

    assert!(
        repository
            .save_record(&company_id, &record(record_id), 60)
            .await
            .is_ok()
    );

    assert!(
        repository
            .delete_record(&company_id, record_id)
            .await
            .is_ok_and(|removed| removed)
    );
    assert!(
        repository
            .delete_record(&company_id, record_id)
            .await
            .is_ok_and(|removed| !removed)
    );
}

#[tokio::test]
async fn purge_all_clears_records_counters_and_policies() {
    let repository = InMemoryWriteOffHistoryRepository::new();
    let company_id = company("1");

    let record_id = repository
        .next_record_id(&company_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(
        repository
            .save_record(&company_id, &record(record_id), 60)
            .await
            .is_ok()
    );
    assert!(
        repository
            .save_retention_policy(
                &company_id,
                RetentionPolicy::new(9).unwrap_or_else(|_| unreachable!())
            )
            .await
            .is_ok()
    );

    assert_eq!(repository.purge_all().await.ok(), Some(3));
    assert!(
        repository
            .find_retention_policy(&company_id)
            .await
            .is_ok_and(|policy| policy.is_none())
    );
    assert_eq!(
        repository
            .next_record_id(&company_id)
            .await
            .map(|id| id.value())
            .ok(),
        Some(1)
    );
}
