/// Configuration management for Food Social Service
///
/// Everything is read once from environment variables at startup. A missing
/// `DATABASE_URL` is not an error: the service starts without a store and
/// reports the database as unavailable.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Document database configuration
    pub database: DatabaseConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Actix worker count; `None` uses one per physical core
    pub workers: Option<usize>,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, or `*`
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Mongodb,
    Memory,
}

/// Document database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    /// MongoDB connection string
    pub url: Option<String>,
    /// Database name; falls back to the one in the connection string
    pub name: Option<String>,
}

impl DatabaseConfig {
    pub fn url_is_set(&self) -> bool {
        self.url.is_some()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("PORT", 8000)?,
                workers: parse_optional_env("HTTP_WORKERS")?,
            },
            cors: {
                let allowed_origins =
                    std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                backend: match std::env::var("DATABASE_BACKEND") {
                    Ok(value) => parse_backend(&value)?,
                    Err(_) => DatabaseBackend::Mongodb,
                },
                url: non_empty_env("DATABASE_URL"),
                name: non_empty_env("DATABASE_NAME"),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

fn parse_backend(value: &str) -> Result<DatabaseBackend, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "mongodb" | "mongo" => Ok(DatabaseBackend::Mongodb),
        "memory" => Ok(DatabaseBackend::Memory),
        other => Err(format!(
            "DATABASE_BACKEND must be 'mongodb' or 'memory', got '{}'",
            other
        )),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

fn parse_optional_env<T>(key: &str) -> Result<Option<T>, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty_env(key) {
        Some(val) => val
            .parse()
            .map(Some)
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        None => Ok(None),
    }
}
