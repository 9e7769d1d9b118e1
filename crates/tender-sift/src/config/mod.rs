use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::discovery::{RelevanceConfig, RelevanceMode};

const DEFAULT_UPSTREAM_BASE: &str = "https://www.contractsfinder.service.gov.uk";

const MAX_FETCH_TIMEOUT_SECS: u64 = 600;
const MAX_FETCH_BACKOFF_MS: u64 = 60_000;
const MAX_FETCH_ATTEMPTS: u32 = 10;
const MAX_RESULT_LIMIT: u32 = 1_000;

/// Widest publication window a query may look back over, in days.
pub const MAX_LOOKBACK_DAYS: u32 = 3_650;

/// Local authority areas queried on every run, in merge order.
pub const DEFAULT_JURISDICTIONS: &[&str] = &[
    "Kent",
    "Surrey",
    "Essex",
    "Hampshire",
    "Hertfordshire",
    "West Sussex",
    "East Sussex",
    "Buckinghamshire",
    "Oxfordshire",
    "Berkshire",
];

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub source: SourceConfig,
    pub relevance: RelevanceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            source: SourceConfig::from_env()?,
            relevance: relevance_from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Upstream notice-search settings shared by every jurisdiction query.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub api_base: String,
    pub notice_base: String,
    pub timeout: Duration,
    pub attempts: u32,
    pub backoff: Duration,
    pub result_limit: u32,
    pub lookback_days: u32,
    pub jurisdictions: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_UPSTREAM_BASE.to_string(),
            notice_base: DEFAULT_UPSTREAM_BASE.to_string(),
            timeout: Duration::from_secs(20),
            attempts: 2,
            backoff: Duration::from_millis(500),
            result_limit: 100,
            lookback_days: 30,
            jurisdictions: DEFAULT_JURISDICTIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

impl SourceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base = env::var("TENDER_API_BASE").unwrap_or(defaults.api_base);
        let notice_base = env::var("TENDER_NOTICE_BASE").unwrap_or_else(|_| api_base.clone());

        let timeout_secs = env_number(
            "TENDER_FETCH_TIMEOUT_SECS",
            defaults.timeout.as_secs(),
            1..=MAX_FETCH_TIMEOUT_SECS,
        )?;
        let backoff_ms = env_number(
            "TENDER_FETCH_BACKOFF_MS",
            defaults.backoff.as_millis() as u64,
            0..=MAX_FETCH_BACKOFF_MS,
        )?;
        let attempts = env_number(
            "TENDER_FETCH_ATTEMPTS",
            defaults.attempts,
            1..=MAX_FETCH_ATTEMPTS,
        )?;

        let jurisdictions = match env::var("TENDER_JURISDICTIONS") {
            Ok(raw) => {
                let parsed = split_list(&raw);
                if parsed.is_empty() {
                    return Err(ConfigError::EmptyJurisdictions);
                }
                parsed
            }
            Err(_) => defaults.jurisdictions,
        };

        Ok(Self {
            api_base,
            notice_base,
            timeout: Duration::from_secs(timeout_secs),
            attempts,
            backoff: Duration::from_millis(backoff_ms),
            result_limit: env_number(
                "TENDER_RESULT_LIMIT",
                defaults.result_limit,
                1..=MAX_RESULT_LIMIT,
            )?,
            lookback_days: env_number(
                "TENDER_LOOKBACK_DAYS",
                defaults.lookback_days,
                0..=MAX_LOOKBACK_DAYS,
            )?,
            jurisdictions,
        })
    }
}

fn relevance_from_env() -> Result<RelevanceConfig, ConfigError> {
    let mut relevance = RelevanceConfig::default();

    if let Ok(raw) = env::var("TENDER_CORE_KEYWORDS") {
        relevance.core_keywords = split_list(&raw).into_iter().collect();
    }
    if let Ok(raw) = env::var("TENDER_EXCLUDE_KEYWORDS") {
        relevance.exclude_keywords = split_list(&raw).into_iter().collect();
    }
    if let Ok(raw) = env::var("TENDER_CONTEXT_KEYWORDS") {
        relevance.context_keywords = split_list(&raw).into_iter().collect();
    }
    if let Ok(raw) = env::var("TENDER_RELEVANCE_MODE") {
        relevance.mode =
            RelevanceMode::parse(&raw).ok_or(ConfigError::InvalidRelevanceMode(raw))?;
    }

    if relevance.core_keywords.is_empty() {
        return Err(ConfigError::EmptyCoreKeywords);
    }

    Ok(relevance)
}

fn env_number<T>(key: &'static str, default: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + fmt::Display,
{
    let raw = match env::var(key) {
        Ok(raw) => raw,
        Err(_) => return Ok(default),
    };

    match raw.trim().parse::<T>() {
        Ok(value) if range.contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            key,
            min: range.start().to_string(),
            max: range.end().to_string(),
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber {
        key: &'static str,
        min: String,
        max: String,
    },
    InvalidLogFormat(String),
    InvalidRelevanceMode(String),
    EmptyJurisdictions,
    EmptyCoreKeywords,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, min, max } => {
                write!(f, "{key} must be a whole number from {min} to {max}")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT '{value}' is not one of compact, json")
            }
            ConfigError::InvalidRelevanceMode(value) => write!(
                f,
                "TENDER_RELEVANCE_MODE '{value}' is not one of core, core_and_context"
            ),
            ConfigError::EmptyJurisdictions => {
                write!(f, "TENDER_JURISDICTIONS must name at least one jurisdiction")
            }
            ConfigError::EmptyCoreKeywords => {
                write!(f, "TENDER_CORE_KEYWORDS must contain at least one keyword")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARS: &[&str] = &[
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_FORMAT",
        "TENDER_API_BASE",
        "TENDER_NOTICE_BASE",
        "TENDER_FETCH_TIMEOUT_SECS",
        "TENDER_FETCH_ATTEMPTS",
        "TENDER_FETCH_BACKOFF_MS",
        "TENDER_RESULT_LIMIT",
        "TENDER_LOOKBACK_DAYS",
        "TENDER_JURISDICTIONS",
        "TENDER_CORE_KEYWORDS",
        "TENDER_EXCLUDE_KEYWORDS",
        "TENDER_CONTEXT_KEYWORDS",
        "TENDER_RELEVANCE_MODE",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.source.attempts, 2);
        assert_eq!(config.source.jurisdictions.len(), DEFAULT_JURISDICTIONS.len());
        assert_eq!(config.source.jurisdictions[0], "Kent");
        assert_eq!(config.relevance.mode, RelevanceMode::CoreOnly);
        assert!(config.relevance.core_keywords.contains("adaptation"));
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn keyword_and_jurisdiction_overrides_are_split_and_trimmed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TENDER_JURISDICTIONS", " Leeds , ,York");
        env::set_var("TENDER_CORE_KEYWORDS", "stairlift, wet room");
        env::set_var("TENDER_RELEVANCE_MODE", "core_and_context");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.source.jurisdictions, vec!["Leeds", "York"]);
        assert_eq!(config.relevance.core_keywords.len(), 2);
        assert!(config.relevance.core_keywords.contains("wet room"));
        assert_eq!(config.relevance.mode, RelevanceMode::CoreAndContext);
        reset_env();
    }

    #[test]
    fn rejects_zero_fetch_attempts() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TENDER_FETCH_ATTEMPTS", "0");
        let error = AppConfig::load().expect_err("zero attempts rejected");
        assert!(matches!(
            error,
            ConfigError::InvalidNumber {
                key: "TENDER_FETCH_ATTEMPTS",
                ..
            }
        ));
        reset_env();
    }

    #[test]
    fn rejects_zero_fetch_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TENDER_FETCH_TIMEOUT_SECS", "0");
        let error = AppConfig::load().expect_err("zero timeout rejected");
        assert_eq!(
            error.to_string(),
            "TENDER_FETCH_TIMEOUT_SECS must be a whole number from 1 to 600"
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_relevance_mode() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TENDER_RELEVANCE_MODE", "fuzzy");
        let error = AppConfig::load().expect_err("unknown mode rejected");
        assert!(error.to_string().contains("fuzzy"));
        reset_env();
    }

    #[test]
    fn lookback_window_is_bounded() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        for raw in ["-1", "3651", "9223372036854775807"] {
            reset_env();
            env::set_var("TENDER_LOOKBACK_DAYS", raw);
            let error = AppConfig::load().expect_err("out of range lookback rejected");
            assert_eq!(
                error.to_string(),
                "TENDER_LOOKBACK_DAYS must be a whole number from 0 to 3650"
            );
        }

        reset_env();
        env::set_var("TENDER_LOOKBACK_DAYS", "0");
        let config = AppConfig::load().expect("same-day window allowed");
        assert_eq!(config.source.lookback_days, 0);
        reset_env();
    }

    #[test]
    fn fetch_backoff_allows_zero_but_is_capped() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TENDER_FETCH_BACKOFF_MS", "0");
        let config = AppConfig::load().expect("zero backoff allowed");
        assert_eq!(config.source.backoff, Duration::ZERO);

        env::set_var("TENDER_FETCH_BACKOFF_MS", "18446744073709551615");
        let error = AppConfig::load().expect_err("huge backoff rejected");
        assert_eq!(
            error.to_string(),
            "TENDER_FETCH_BACKOFF_MS must be a whole number from 0 to 60000"
        );
        reset_env();
    }

    #[test]
    fn non_numeric_values_report_the_accepted_range() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TENDER_RESULT_LIMIT", "lots");
        let error = AppConfig::load().expect_err("non-numeric limit rejected");
        assert_eq!(
            error.to_string(),
            "TENDER_RESULT_LIMIT must be a whole number from 1 to 1000"
        );
        reset_env();
    }
}
