//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ECOFEIRA_CATALOG_URL` - Spreadsheet-backed catalog API endpoint
//!
//! ## Optional
//! - `ECOFEIRA_CATALOG_API_KEY` - API key appended as the `key` query parameter
//! - `ECOFEIRA_DATA_DIR` - Directory for persisted favorites/list/history (default: .ecofeira)
//! - `ECOFEIRA_BASE_URL` - Public URL used for share links (default: <https://ecofeira.app>)
//! - `ECOFEIRA_BACKUP_ORIGIN` - Backup partner origin (default: <https://ecofeira-backup.vercel.app>)
//! - `ECOFEIRA_BACKUP_TIMEOUT_SECS` - Seconds to wait for the partner's READY signal (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".ecofeira";
const DEFAULT_BASE_URL: &str = "https://ecofeira.app";
const DEFAULT_BACKUP_ORIGIN: &str = "https://ecofeira-backup.vercel.app";
const DEFAULT_BACKUP_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog data source configuration
    pub catalog: CatalogConfig,
    /// Directory holding the persisted slots
    pub data_dir: PathBuf,
    /// Public base URL for share links
    pub base_url: Url,
    /// Backup partner configuration
    pub backup: BackupConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Catalog data source configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Endpoint serving the spreadsheet tabs as JSON
    pub endpoint: Url,
    /// Optional API key
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Backup partner configuration.
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// The only origin whose messages are accepted
    pub partner_origin: Url,
    /// How long to wait for READY after mounting
    pub handshake_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog = CatalogConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("ECOFEIRA_DATA_DIR", DEFAULT_DATA_DIR));
        let base_url = parse_url(
            "ECOFEIRA_BASE_URL",
            &get_env_or_default("ECOFEIRA_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let backup = BackupConfig::from_env()?;

        Ok(Self {
            catalog,
            data_dir,
            base_url,
            backup,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let endpoint = parse_url(
            "ECOFEIRA_CATALOG_URL",
            &get_required_env("ECOFEIRA_CATALOG_URL")?,
        )?;
        let api_key = get_optional_env("ECOFEIRA_CATALOG_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        Ok(Self { endpoint, api_key })
    }
}

impl BackupConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let partner_origin = parse_origin(
            "ECOFEIRA_BACKUP_ORIGIN",
            &get_env_or_default("ECOFEIRA_BACKUP_ORIGIN", DEFAULT_BACKUP_ORIGIN),
        )?;
        let secs = get_env_or_default("ECOFEIRA_BACKUP_TIMEOUT_SECS", DEFAULT_BACKUP_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ECOFEIRA_BACKUP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            partner_origin,
            handshake_timeout: Duration::from_secs(secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an absolute http(s) URL.
fn parse_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a URL that must be a bare origin (no path, query or fragment).
fn parse_origin(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = parse_url(var_name, value)?;
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be an origin like https://host[:port]".to_string(),
        ));
    }
    Ok(url)
}
