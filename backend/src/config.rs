//! Service configuration read from the environment.

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FOLIO_URL: &str = "http://127.0.0.1:9130";
pub const DEFAULT_FOLIO_COURSES_PATH: &str = "/coursereserves/courses";
pub const DEFAULT_FOLIO_TENANT: &str = "fs00001011";
pub const DEFAULT_FOLIO_TIMEOUT_MS: u64 = 15000;
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";
pub const DEFAULT_IP_LOOKUP_TIMEOUT_MS: u64 = 4000;
pub const DEFAULT_TRUST_FORWARDED_HEADERS: bool = true;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub folio_url: String,
    pub folio_courses_path: String,
    pub folio_tenant: String,
    pub folio_token: Option<String>,
    pub folio_timeout: Duration,
    pub ip_lookup_url: String,
    pub ip_lookup_timeout: Duration,
    pub campus_ranges_file: Option<PathBuf>,
    /// Read the visitor address from `X-Forwarded-For` / `X-Real-IP`. Only
    /// safe behind a reverse proxy that overwrites those headers.
    pub trust_forwarded_headers: bool,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            folio_url: try_load(&lookup, "FOLIO_URL", DEFAULT_FOLIO_URL.to_string())?
                .trim_end_matches('/')
                .to_string(),
            folio_courses_path: try_load(&lookup, "FOLIO_COURSES_PATH", DEFAULT_FOLIO_COURSES_PATH.to_string())?,
            folio_tenant: try_load(&lookup, "FOLIO_TENANT", DEFAULT_FOLIO_TENANT.to_string())?,
            folio_token: lookup("FOLIO_TOKEN").filter(|t| !t.trim().is_empty()),
            folio_timeout: Duration::from_millis(try_load(&lookup, "FOLIO_TIMEOUT_MS", DEFAULT_FOLIO_TIMEOUT_MS)?),
            ip_lookup_url: try_load(&lookup, "IP_LOOKUP_URL", DEFAULT_IP_LOOKUP_URL.to_string())?,
            ip_lookup_timeout: Duration::from_millis(try_load(
                &lookup,
                "IP_LOOKUP_TIMEOUT_MS",
                DEFAULT_IP_LOOKUP_TIMEOUT_MS,
            )?),
            campus_ranges_file: lookup("CAMPUS_RANGES_FILE").filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            trust_forwarded_headers: try_load(&lookup, "TRUST_FORWARDED_HEADERS", DEFAULT_TRUST_FORWARDED_HEADERS)?,
        })
    }

    pub fn folio_courses_url(&self) -> String {
        format!("{}{}", self.folio_url, self.folio_courses_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            folio_url: DEFAULT_FOLIO_URL.to_string(),
            folio_courses_path: DEFAULT_FOLIO_COURSES_PATH.to_string(),
            folio_tenant: DEFAULT_FOLIO_TENANT.to_string(),
            folio_token: None,
            folio_timeout: Duration::from_millis(DEFAULT_FOLIO_TIMEOUT_MS),
            ip_lookup_url: DEFAULT_IP_LOOKUP_URL.to_string(),
            ip_lookup_timeout: Duration::from_millis(DEFAULT_IP_LOOKUP_TIMEOUT_MS),
            campus_ranges_file: None,
            trust_forwarded_headers: DEFAULT_TRUST_FORWARDED_HEADERS,
        }
    }
}

fn try_load<T: FromStr + Display>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {value:?}"))
}
