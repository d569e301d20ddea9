pub mod health;
pub mod write_off_history;
