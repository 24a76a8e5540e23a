use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    // Populated from the .env file
    pub database_path: String,
    pub allowed_origins: String,
    pub log_level: String,
    pub admin_allowed_ips: String,
    pub trusted_proxies: String,
    pub render_cache_ttl_secs: u64,
    // From config/default.toml
    pub render_cache_capacity: u64,
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        dotenvy::from_path(env_path).map_err(|e| {
            config::ConfigError::Message(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}",
                env_path.display(),
                e
            ))
        })?;

        let database_path = env::var("DATABASE_PATH").map_err(|_| {
            config::ConfigError::Message(
                "FATAL: Environment variable 'DATABASE_PATH' is not set in your .env file.".to_string(),
            )
        })?;

        if Path::new(&database_path).is_relative() {
            return Err(config::ConfigError::Message(format!(
                "FATAL: The 'DATABASE_PATH' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
                database_path
            )));
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        // An unset allow-list denies every admin request.
        let admin_allowed_ips = env::var("ADMIN_ALLOWED_IPS").unwrap_or_default();
        // X-Forwarded-For is only read from these peers.
        let trusted_proxies = env::var("TRUSTED_PROXIES").unwrap_or_default();

        let render_cache_ttl_secs = match env::var("RENDER_CACHE_TTL_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                config::ConfigError::Message(format!(
                    "FATAL: 'RENDER_CACHE_TTL_SECS' must be a whole number of seconds, got '{}'.",
                    raw
                ))
            })?,
            Err(_) => 300,
        };

        let builder = config::Config::builder()
            .add_source(config::File::new("config/default.toml", config::FileFormat::Toml))
            .set_default("render_cache_capacity", 500)?
            .set_override("database_path", database_path)?
            .set_override("allowed_origins", allowed_origins)?
            .set_override("log_level", log_level)?
            .set_override("admin_allowed_ips", admin_allowed_ips)?
            .set_override("trusted_proxies", trusted_proxies)?
            .set_override("render_cache_ttl_secs", render_cache_ttl_secs as i64)?
            .build()?;

        builder.try_deserialize()
    }

    /// Full path of the document database file.
    pub fn spotlight_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
            .join("spotlight")
            .join("spotlight.db")
    }

    /// Whether `ip` may reach the admin API. `*` admits everyone.
    pub fn is_admin_ip_allowed(&self, ip: &str) -> bool {
        let allowed = self.admin_allowed_ips.trim();
        if allowed == "*" {
            return true;
        }
        list_contains(allowed, ip)
    }

    /// Whether `ip` is a reverse proxy whose `X-Forwarded-For` is believed.
    pub fn is_trusted_proxy(&self, ip: &str) -> bool {
        list_contains(&self.trusted_proxies, ip)
    }
}

fn list_contains(list: &str, ip: &str) -> bool {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .any(|entry| entry == ip)
}
