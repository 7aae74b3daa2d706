//! # API Configuration Module
//!
//! Loads the server configuration from environment variables.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SUPABASE_URL`: Base URL of the identity provider (required)
//! - `SUPABASE_SERVICE_ROLE_KEY`: Service key sent to the identity provider (required)
//! - `OWNER_USER_ID`: Identity-provider user id that becomes an admin on first sign-in

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;
use uuid::Uuid;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the Health Army API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Identity provider base URL, e.g. `https://xyz.supabase.co`
    pub supabase_url: String,

    pub supabase_service_key: String,

    /// External user granted the admin role when their account is created
    pub owner_id: Option<Uuid>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `DATABASE_URL`, `SUPABASE_URL` or `SUPABASE_SERVICE_ROLE_KEY` is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - `OWNER_USER_ID` is set but is not a UUID
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| parse_origins(&origins));

        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS);

        // Identity provider settings
        let supabase_url = env::var("SUPABASE_URL")
            .wrap_err("SUPABASE_URL environment variable must be set")?;
        let supabase_service_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .wrap_err("SUPABASE_SERVICE_ROLE_KEY environment variable must be set")?;

        let owner_id = match env::var("OWNER_USER_ID") {
            Ok(value) if !value.trim().is_empty() => {
                Some(Uuid::parse_str(value.trim()).wrap_err("OWNER_USER_ID must be a UUID")?)
            }
            _ => None,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            supabase_url,
            supabase_service_key,
            owner_id,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unknown names fall back to `INFO`.
pub fn parse_log_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
