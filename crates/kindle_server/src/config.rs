use std::env;

use kindle_engine::MailSettings;
use log::LevelFilter;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mail: MailSettings,
    pub log_level: LevelFilter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5123,
            mail: MailSettings::default(),
            log_level: LevelFilter::Info,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

impl ServerConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to
    /// honour a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let mail = MailSettings {
            smtp_server: var("SMTP_SERVER").unwrap_or(defaults.mail.smtp_server),
            smtp_port: parse_port("SMTP_PORT", var("SMTP_PORT"), defaults.mail.smtp_port)?,
            username: var("SMTP_USERNAME"),
            password: var("SMTP_PASSWORD"),
            kindle_email: var("KINDLE_EMAIL"),
            from_email: var("FROM_EMAIL"),
        };

        let log_level = match var("LOG_LEVEL") {
            None => defaults.log_level,
            Some(raw) => kindle_logging::parse_level(&raw).ok_or(ConfigError::Invalid {
                name: "LOG_LEVEL",
                value: raw,
            })?,
        };

        Ok(Self {
            host: var("SERVER_HOST").unwrap_or(defaults.host),
            port: parse_port("SERVER_PORT", var("SERVER_PORT"), defaults.port)?,
            mail,
            log_level,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_port(name: &'static str, raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
