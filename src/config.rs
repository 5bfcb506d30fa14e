//! Runtime configuration from environment variables.
//!
//! `main` loads `.env` through dotenvy first, so the same keys work from a
//! file during development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_CATALOG_TTL_SECS: u64 = 10 * 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub backend_url: String,
    /// Form sessions expire after this long without a request
    pub session_idle: Duration,
    /// How long the catalog is cached, and how often it is refreshed
    pub catalog_ttl: Duration,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; bad values fall back to
    /// the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(
            &lookup,
            "LUDICUS_BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        );
        let backend_url = lookup("LUDICUS_BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Self {
            bind_addr,
            backend_url,
            session_idle: Duration::from_secs(parse_or(
                &lookup,
                "LUDICUS_SESSION_IDLE_SECS",
                DEFAULT_SESSION_IDLE_SECS,
            )),
            catalog_ttl: Duration::from_secs(parse_or(
                &lookup,
                "LUDICUS_CATALOG_TTL_SECS",
                DEFAULT_CATALOG_TTL_SECS,
            )),
            http_timeout: Duration::from_secs(parse_or(
                &lookup,
                "LUDICUS_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value {:?} for {}, using default {:?}", raw, key, default);
            default
        }),
        None => default,
    }
}
