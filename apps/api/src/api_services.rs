mod redis;
mod state_builder;

pub use redis::build_redis_client;
pub use state_builder::build_app_state;
