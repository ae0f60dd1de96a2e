//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Remote catalog (required for product commands)
//! - `FIREBASE_PROJECT_ID` - Firebase project hosting the `products` collection
//!
//! ## Optional
//! - `FIREBASE_API_KEY` - Web API key sent with every Firestore request
//! - `FIRESTORE_DATABASE` - Database ID (default: `(default)`)
//! - `FIRESTORE_BASE_URL` - REST endpoint (default: `https://firestore.googleapis.com/v1`)
//! - `BALAJI_HTTP_TIMEOUT_SECS` - Request timeout for remote calls (default: 30)
//! - `BALAJI_DATA_DIR` - Profile directory for locally persisted lists
//!   (default: `<platform local data dir>/balaji`)
//! - `BALAJI_WHATSAPP_NUMBER` - Number inquiries are sent to (default: `+919548114154`)

use std::path::PathBuf;
use std::time::Duration;

use balaji_core::PhoneNumber;
use balaji_core::messaging::BUSINESS_PHONE;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_FIRESTORE_DATABASE: &str = "(default)";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const DATA_DIR_NAME: &str = "balaji";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error("Could not determine a data directory; set BALAJI_DATA_DIR")]
    NoDataDir,
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Directory holding the locally persisted lists
    pub data_dir: PathBuf,
    /// Business number inquiries are addressed to
    pub whatsapp_number: PhoneNumber,
    /// Remote catalog settings; `None` when no project is configured
    pub firestore: Option<FirestoreConfig>,
}

/// Cloud Firestore connection settings.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct FirestoreConfig {
    /// Firebase project ID
    pub project_id: String,
    /// Firestore database ID
    pub database: String,
    /// REST API base URL
    pub base_url: String,
    /// Web API key
    pub api_key: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, the API key looks like
    /// a placeholder, or no data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = match get_optional_env("BALAJI_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_local_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join(DATA_DIR_NAME),
        };

        let whatsapp_number = PhoneNumber::parse(&get_env_or_default(
            "BALAJI_WHATSAPP_NUMBER",
            BUSINESS_PHONE,
        ))
        .map_err(|e| {
            ConfigError::InvalidEnvVar("BALAJI_WHATSAPP_NUMBER".to_string(), e.to_string())
        })?;

        let firestore = FirestoreConfig::from_env()?;

        Ok(Self {
            data_dir,
            whatsapp_number,
            firestore,
        })
    }

    /// The remote catalog settings, required by product operations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when `FIREBASE_PROJECT_ID` was not set.
    pub fn require_firestore(&self) -> Result<&FirestoreConfig, ConfigError> {
        self.firestore
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("FIREBASE_PROJECT_ID".to_string()))
    }
}

impl FirestoreConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(project_id) = get_optional_env("FIREBASE_PROJECT_ID") else {
            return Ok(None);
        };

        let api_key = match get_optional_env("FIREBASE_API_KEY") {
            Some(key) => {
                validate_not_placeholder(&key, "FIREBASE_API_KEY")?;
                Some(SecretString::from(key))
            }
            None => None,
        };

        let timeout_secs = get_env_or_default("BALAJI_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BALAJI_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Some(Self {
            project_id,
            database: get_env_or_default("FIRESTORE_DATABASE", DEFAULT_FIRESTORE_DATABASE),
            base_url: get_env_or_default("FIRESTORE_BASE_URL", DEFAULT_FIRESTORE_BASE_URL),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }))
    }

    /// Settings pointing at an arbitrary endpoint, for emulators and tests.
    #[must_use]
    pub fn for_endpoint(base_url: &str, project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            database: DEFAULT_FIRESTORE_DATABASE.to_string(),
            base_url: base_url.to_string(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Reject values copied verbatim from an example `.env`.
fn validate_not_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
