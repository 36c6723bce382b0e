use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::Duration;

use crate::workflows::intake::DEFAULT_MINIMUM_BANK_STATEMENTS;
use crate::workflows::wizard::DEFAULT_SESSION_IDLE_MINUTES;

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
    pub intake: IntakeConfig,
    pub session: SessionConfig,
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

        let intake = match env::var("WIZARD_MIN_BANK_STATEMENTS") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(value) => IntakeConfig::with_minimum(value)?,
                Err(_) => return Err(ConfigError::InvalidMinimumBankStatements { value: raw }),
            },
            Err(_) => IntakeConfig::default(),
        };

        let idle_minutes = match env::var("WIZARD_SESSION_IDLE_MINUTES") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidSessionIdleMinutes { value: raw }),
            },
            Err(_) => DEFAULT_SESSION_IDLE_MINUTES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            intake,
            session: SessionConfig { idle_minutes },
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
}

/// Submission gate settings for document intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeConfig {
    pub minimum_bank_statements: usize,
}

impl IntakeConfig {
    /// Build a gate with an explicit minimum; zero would make every batch submittable.
    pub fn with_minimum(minimum_bank_statements: usize) -> Result<Self, ConfigError> {
        if minimum_bank_statements == 0 {
            return Err(ConfigError::InvalidMinimumBankStatements {
                value: minimum_bank_statements.to_string(),
            });
        }
        Ok(Self {
            minimum_bank_statements,
        })
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            minimum_bank_statements: DEFAULT_MINIMUM_BANK_STATEMENTS,
        }
    }
}

/// How long an untouched wizard session is kept before it is reclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub idle_minutes: u32,
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::minutes(i64::from(self.idle_minutes))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMinimumBankStatements { value: String },
    InvalidSessionIdleMinutes { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMinimumBankStatements { value } => write!(
                f,
                "WIZARD_MIN_BANK_STATEMENTS must be a positive integer (got '{value}')"
            ),
            ConfigError::InvalidSessionIdleMinutes { value } => write!(
                f,
                "WIZARD_SESSION_IDLE_MINUTES must be a positive integer (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidMinimumBankStatements { .. }
            | ConfigError::InvalidSessionIdleMinutes { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
