use baixas_core::AppError;

pub fn build_redis_client(redis_url: &str) -> Result<redis::Client, AppError> {
    redis::Client::open(redis_url)
        .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))
}

#[cfg(test)]
mod tests {
    use baixas_core::AppError;

    use super::build_redis_client;

    #[test]
    fn accepts_redis_urls() {
        assert!(build_redis_client("redis://127.0.0.1:6379/0").is_ok());
    }

    #[test]
    fn rejects_unsupported_schemes() {
        let result = build_redis_client("postgres://127.0.0.1/history");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
