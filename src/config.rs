use anyhow::{Context, anyhow};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,

    // Attendance backend
    pub backend_url: String,
    pub records_path: String,
    pub backend_timeout: Duration,

    /// Organization time zone used for day boundaries.
    pub org_timezone: Tz,

    // Rate limiting
    pub rate_view_per_min: u32,

    pub api_prefix: String,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} `{raw}`: {e}"))
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let timeout_secs: u64 = parsed(&lookup, "BACKEND_TIMEOUT_SECS", "10")?; // default 10 s

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            backend_url: lookup("BACKEND_URL").context("BACKEND_URL must be set")?,
            records_path: lookup("RECORDS_PATH").unwrap_or_else(|| "/attendance".to_string()),
            backend_timeout: Duration::from_secs(timeout_secs),

            org_timezone: parsed(&lookup, "ORG_TIMEZONE", "UTC")?,

            rate_view_per_min: parsed(&lookup, "RATE_VIEW_PER_MIN", "600")?,

            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            log_level: parsed(&lookup, "LOG_LEVEL", "debug")?,
        })
    }
}
