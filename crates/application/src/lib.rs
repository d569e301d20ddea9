//! Application services and ports.

#![forbid(unsafe_code)]

mod write_off_history_service;
mod write_off_ports;

pub use write_off_history_service::WriteOffHistoryService;
pub use write_off_ports::WriteOffHistoryRepository;
