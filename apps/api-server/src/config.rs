//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::auth::JwtConfig;
use quill_infra::database::DatabaseConfig;
use quill_infra::storage::S3Config;

use crate::middleware::upload::UploadPolicy;
use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` puts the server in in-memory fallback mode.
    pub database: Option<DatabaseConfig>,
    /// `None` puts uploads in in-memory fallback mode.
    pub s3: Option<S3Config>,
    pub jwt: JwtConfig,
    pub uploads: UploadPolicy,
    pub telemetry: TelemetryConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            s3: S3Config::from_env(),
            jwt: JwtConfig::from_env(),
            uploads: UploadPolicy::from_env(),
            telemetry: TelemetryConfig::from_env(),
            cors_allowed_origins: Self::parse_cors_origins(),
        }
    }

    /// Parse allowed CORS origins from `CORS_ALLOWED_ORIGINS`
    /// (comma-separated). Defaults to the local Vite dev server.
    fn parse_cors_origins() -> Vec<String> {
        match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}
