use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use baixas_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub redis_url: String,
    pub api_host: String,
    pub api_port: u16,
    /// Allowed CORS origin. Any origin is accepted when unset.
    pub frontend_url: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let redis_url = required_non_empty_env("REDIS_URL")?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_owned());
        let api_port = match env::var("API_PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            Err(_) => DEFAULT_API_PORT,
        };

        let frontend_url = env::var("FRONTEND_URL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            redis_url,
            api_host,
            api_port,
            frontend_url,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
