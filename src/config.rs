use std::time::Duration;

use anyhow::Context;

use crate::schema::RetryPolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub schema_retry: RetryPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("POSTGRES_URI"))
            .context("DATABASE_URL (or POSTGRES_URI) must be set")?;

        let defaults = RetryPolicy::default();
        let schema_retry = RetryPolicy {
            max_attempts: parsed(&lookup, "SCHEMA_INIT_MAX_ATTEMPTS")
                .unwrap_or(defaults.max_attempts),
            delay: parsed(&lookup, "SCHEMA_INIT_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.delay),
        };

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed(&lookup, "APP_PORT").unwrap_or(8086),
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS").unwrap_or(10),
            db_acquire_timeout: parsed(&lookup, "DB_ACQUIRE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(5)),
            schema_retry,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|v| v.trim().parse::<T>().ok())
}
