use crate::sources::{CandidateQuery, Credentials, JobQuery};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_JOB_LIMIT: u32 = 500;
pub const DEFAULT_CANDIDATE_LIMIT: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

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
    pub recruiting: RecruitingConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            recruiting: RecruitingConfig::from_env()?,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection defaults for the recruiting API.
///
/// Every credential field is optional here: the CLI and the refresh endpoint
/// can supply them at runtime, so a missing value only becomes an error when
/// [`RecruitingConfig::credentials`] is asked for a complete set.
#[derive(Clone)]
pub struct RecruitingConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub customer_id: Option<String>,
    pub job_status: Option<String>,
    pub job_limit: u32,
    pub candidate_limit: u32,
    pub timeout_secs: u64,
}

impl Default for RecruitingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            password: None,
            customer_id: None,
            job_status: None,
            job_limit: DEFAULT_JOB_LIMIT,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RecruitingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: non_empty_var("RECRUITING_BASE_URL"),
            username: non_empty_var("RECRUITING_USERNAME"),
            password: non_empty_var("RECRUITING_PASSWORD"),
            customer_id: non_empty_var("RECRUITING_CUSTOMER_ID"),
            job_status: non_empty_var("RECRUITING_JOB_STATUS"),
            job_limit: numeric_var("RECRUITING_JOB_LIMIT", DEFAULT_JOB_LIMIT)?,
            candidate_limit: numeric_var("RECRUITING_CANDIDATE_LIMIT", DEFAULT_CANDIDATE_LIMIT)?,
            timeout_secs: numeric_var("RECRUITING_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let require = |value: &Option<String>, name: &'static str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or(ConfigError::MissingCredential(name))
        };

        Ok(Credentials::new(
            require(&self.base_url, "RECRUITING_BASE_URL")?,
            require(&self.username, "RECRUITING_USERNAME")?,
            require(&self.password, "RECRUITING_PASSWORD")?,
            require(&self.customer_id, "RECRUITING_CUSTOMER_ID")?,
        ))
    }

    pub fn job_query(&self) -> JobQuery {
        JobQuery {
            status: self.job_status.clone(),
            limit: self.job_limit,
        }
    }

    pub fn candidate_query(&self) -> CandidateQuery {
        CandidateQuery {
            job_id: None,
            limit: self.candidate_limit,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for RecruitingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecruitingConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("customer_id", &self.customer_id)
            .field("job_status", &self.job_status)
            .field("job_limit", &self.job_limit)
            .field("candidate_limit", &self.candidate_limit)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn numeric_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable: name }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
    MissingCredential(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a non-negative integer")
            }
            ConfigError::MissingCredential(variable) => {
                write!(f, "{variable} is required to reach the recruiting API")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::MissingCredential(_) => None,
        }
    }
}
