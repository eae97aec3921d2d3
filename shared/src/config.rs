use std::time::Duration;

use tracing::warn;

pub struct Config {
    pub secret_key: String,
    pub token_ttl_hours: i64,
    pub refresh_fraction: f64,
    pub store_timeout: Duration,
    pub data_dir: String,
}

impl Config {
    const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
    const DEFAULT_REFRESH_FRACTION: f64 = 0.2;
    const DEFAULT_STORE_TIMEOUT_SECS: u64 = 100;
    const DEFAULT_DATA_DIR: &str = "./data";

    pub fn from_env() -> Self {
        let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| {
            warn!("SECRET_KEY not set, token issuance will fail until it is configured");
            String::new()
        });
        let token_ttl_hours = std::env::var("TASKDEN_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(Self::DEFAULT_TOKEN_TTL_HOURS);
        let refresh_fraction = std::env::var("TASKDEN_REFRESH_FRACTION")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            // A fraction of the validity window only makes sense in [0, 1]
            .map(|f| f.clamp(0.0, 1.0))
            .unwrap_or(Self::DEFAULT_REFRESH_FRACTION);
        let store_timeout_secs = std::env::var("TASKDEN_STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_STORE_TIMEOUT_SECS);

        Self {
            secret_key,
            token_ttl_hours,
            refresh_fraction,
            store_timeout: Duration::from_secs(store_timeout_secs),
            data_dir: std::env::var("TASKDEN_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string()),
        }
    }

    /// Validity window for issued session tokens.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}
