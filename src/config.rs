use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "NOTES_HUB";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Args {
    pub log_level: String,
    pub port: u16,
    pub backend: BackendKind,
    pub database_host: String,
    pub database_port: u16,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,
    pub token_key: String,
    /// Comma separated.
    pub admin_emails: String,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    Config::builder()
        .set_default("log_level", "info")?
        .set_default("port", 8080)?
        .set_default("backend", "postgres")?
        .set_default("database_host", "localhost")?
        .set_default("database_port", 5432)?
        .set_default("database_name", "notes")?
        .set_default("database_username", "postgres")?
        .set_default("database_password", "")?
        .set_default("token_key", "")?
        .set_default("admin_emails", "")
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Args, handle_errors::Error> {
    builder
        .build()
        .and_then(|config| config.try_deserialize::<Args>())
        .map_err(|e| handle_errors::Error::Configuration(e.to_string()))
}

impl Args {
    /// `setup.toml` if present, then `NOTES_HUB_*` variables (after `.env`).
    pub fn new() -> Result<Args, handle_errors::Error> {
        dotenv::dotenv().ok();
        let builder = defaults()
            .map_err(|e| handle_errors::Error::Configuration(e.to_string()))?
            .add_source(File::with_name("setup").required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));
        finish(builder)
    }

    pub fn db_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.database_username,
            self.database_password,
            self.database_host,
            self.database_port,
            self.database_name
        )
    }

    pub fn admin_emails(&self) -> Vec<String> {
        self.admin_emails
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn log_filter(&self) -> String {
        format!(
            "handle_errors={},notes_hub={},warp={}",
            self.log_level, self.log_level, self.log_level
        )
    }
}
