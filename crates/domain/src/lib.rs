//! Domain entities and invariants of the write-off history.

#![forbid(unsafe_code)]

mod query;
mod retention;
mod write_off;

pub use query::{PeriodFilter, SortDirection, WriteOffQuery};
pub use retention::RetentionPolicy;
pub use write_off::{EventTime, NewWriteOffRecord, RecordId, WriteOffRecord, WriteOffRecordInput};
