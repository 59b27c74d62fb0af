//! Configuration module for environment variable parsing.
//!
//! Everything the receiver needs is read once at startup and then handed to
//! the web layer through [`AppState`](crate::web::AppState).

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tracing::warn;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `LEVEL message`, no timestamps or targets
    #[default]
    Text,
    /// One flattened JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: IpAddr,

    /// Port the HTTP server listens on
    pub port: u16,

    /// Shared secret used to verify `X-Hub-Signature-256`
    pub webhook_secret: Option<String>,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            webhook_secret: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Values that fail to parse fall back to their defaults and are returned
    /// alongside the config, so they can be reported once logging is up.
    pub fn from_env() -> (Self, Vec<InvalidVar>) {
        let defaults = Config::default();
        let mut invalid = Vec::new();

        let config = Config {
            host: parse_var("HOST", defaults.host, &mut invalid),
            port: parse_var("PORT", defaults.port, &mut invalid),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            log_format: parse_var("LOG_FORMAT", defaults.log_format, &mut invalid),
        };

        (config, invalid)
    }

    /// Socket address the server should bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// An environment variable whose value could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVar {
    pub name: &'static str,
    pub value: String,
}

impl InvalidVar {
    /// Log the fallback at warn level.
    pub fn report(&self) {
        warn!(env_var = self.name, value = %self.value, "Invalid value, using default");
    }
}

/// Parse an environment variable, keeping `default` when unset or invalid.
fn parse_var<T: FromStr>(name: &'static str, default: T, invalid: &mut Vec<InvalidVar>) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            invalid.push(InvalidVar { name, value: raw });
            default
        }
    }
}
