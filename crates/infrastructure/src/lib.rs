//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_write_off_history_repository;
mod redis_write_off_history_repository;

pub use in_memory_write_off_history_repository::InMemoryWriteOffHistoryRepository;
pub use redis_write_off_history_repository::RedisWriteOffHistoryRepository;
