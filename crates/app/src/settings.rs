//! Handles settings for the application. Configuration is written in
//! `settings.toml`; every option can also be set through the environment
//! with a `LAVISCO_` prefix (e.g. `LAVISCO_SERVER__SECRET_KEY`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    /// Cookie-signing secret, at least 32 bytes.
    pub secret_key: String,
    /// Session lifetime in hours.
    pub session_hours: Option<i64>,
    /// Database connection string, e.g. `sqlite:./lavisco.db?mode=rwc`.
    pub database: String,
}

/// Outbound mail transport. Recognized but not exercised by any in-scope
/// operation.
#[derive(Debug, Deserialize)]
pub struct Mail {
    pub server: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub mail: Option<Mail>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("LAVISCO").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        if settings.server.secret_key.len() < 32 {
            return Err(ConfigError::Message(
                "server.secret_key must be at least 32 bytes".to_string(),
            ));
        }
        Ok(settings)
    }
}
