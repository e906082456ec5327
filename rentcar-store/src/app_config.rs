use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: Option<RedisConfig>,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Offset of the rental office's calendar; decides what "today" is.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_utc_offset() -> i32 {
    7
}

fn default_rate_limit() -> i64 {
    100
}

fn default_currency() -> String {
    "IDR".to_string()
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset(),
            rate_limit_per_minute: default_rate_limit(),
            currency: default_currency(),
        }
    }
}

impl BusinessRules {
    /// Current calendar date at the configured offset
    pub fn today(&self) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        Utc::now().with_timezone(&offset).date_naive()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Expected `aud` claim; audience is not checked when unset.
    pub audience: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub root: String,
    pub public_base_url: String,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    /// Path part of `public_base_url`, where the upload root is served.
    /// `None` when uploads sit at the server root.
    pub fn mount_path(&self) -> Option<String> {
        let base = self.public_base_url.trim_end_matches('/');
        let path = match base.split_once("://") {
            Some((_, rest)) => rest.find('/').map(|i| &rest[i..]),
            None => base.find('/').map(|i| &base[i..]),
        };
        path.filter(|p| p.len() > 1).map(str::to_string)
    }
}

fn default_max_upload() -> usize {
    5 * 1024 * 1024
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `RENTCAR_AUTH__JWT_SECRET=...`
            .add_source(config::Environment::with_prefix("RENTCAR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
