//! Configuration management for the bakery back-office server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with BAKERY_ prefix

use chrono::FixedOffset;
use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Telegram delivery channel; reports can still be previewed without it
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Report rendering
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: Option<String>,

    /// Chat that receives the shop's reports
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    /// Token and chat id, when both are set and non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let chat_id = self.chat_id.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
        Some((token, chat_id))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Wall clock used for calendar dates in reports, in whole hours east of UTC
    pub utc_offset_hours: i32,
}

impl ReportConfig {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        shared::offset_from_hours(self.utc_offset_hours).ok_or_else(|| {
            ConfigError::Message(format!(
                "report.utc_offset_hours out of range: {}",
                self.utc_offset_hours
            ))
        })
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BAKERY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("report.utc_offset_hours", shared::VIETNAM_UTC_OFFSET_HOURS)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BAKERY_ prefix)
            .add_source(
                Environment::with_prefix("BAKERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.report.offset()?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: shared::VIETNAM_UTC_OFFSET_HOURS,
        }
    }
}
