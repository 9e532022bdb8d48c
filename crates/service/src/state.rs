use std::time::Duration;
use std::{fs, path::PathBuf};

use common::prelude::SecretKey;
use common::sync::{PhaseTimeouts, RetryPolicy, SyncConfig};
use serde::{Deserialize, Serialize};

use crate::content_store::ContentStoreConfig;

pub const APP_NAME: &str = "feedboard";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const KEY_FILE_NAME: &str = "key.pem";
pub const CONTENT_DIR_NAME: &str = "content";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the registry API
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Where uploaded board content is kept
    #[serde(default = "default_content_store")]
    pub content_store: ContentStoreConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

pub fn default_api_port() -> u16 {
    5080
}

fn default_content_store() -> ContentStoreConfig {
    ContentStoreConfig::Local { path: None }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            content_store: default_content_store(),
            sync: SyncSettings::default(),
        }
    }
}

/// Publish protocol tuning as it appears in `config.toml`.
///  Durations are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub stage_timeout_ms: u64,
    pub authenticate_timeout_ms: u64,
    pub commit_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub retry_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub commit_attempts: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncConfig::default().into()
    }
}

impl From<SyncConfig> for SyncSettings {
    fn from(config: SyncConfig) -> Self {
        Self {
            stage_timeout_ms: config.timeouts.stage.as_millis() as u64,
            authenticate_timeout_ms: config.timeouts.authenticate.as_millis() as u64,
            commit_timeout_ms: config.timeouts.commit.as_millis() as u64,
            read_timeout_ms: config.timeouts.read.as_millis() as u64,
            retry_attempts: config.retry.max_attempts,
            initial_backoff_ms: config.retry.initial_backoff.as_millis() as u64,
            max_backoff_ms: config.retry.max_backoff.as_millis() as u64,
            commit_attempts: config.commit_attempts,
        }
    }
}

impl From<SyncSettings> for SyncConfig {
    fn from(settings: SyncSettings) -> Self {
        Self {
            timeouts: PhaseTimeouts {
                stage: Duration::from_millis(settings.stage_timeout_ms),
                authenticate: Duration::from_millis(settings.authenticate_timeout_ms),
                commit: Duration::from_millis(settings.commit_timeout_ms),
                read: Duration::from_millis(settings.read_timeout_ms),
            },
            retry: RetryPolicy {
                max_attempts: settings.retry_attempts,
                initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
                max_backoff: Duration::from_millis(settings.max_backoff_ms),
            },
            commit_attempts: settings.commit_attempts,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the app directory (~/.feedboard)
    pub app_dir: PathBuf,
    /// Path to the SQLite registry database
    pub db_path: PathBuf,
    /// Path to the wallet key PEM file
    pub key_path: PathBuf,
    /// Path to the local content directory
    pub content_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the app directory path (custom or default ~/.feedboard)
    pub fn app_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new app directory with a fresh wallet key
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if app_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&app_dir)?;

        let content_path = app_dir.join(CONTENT_DIR_NAME);
        fs::create_dir_all(&content_path)?;

        let key = SecretKey::generate();
        let key_path = app_dir.join(KEY_FILE_NAME);
        fs::write(&key_path, key.to_pem())?;

        let config = config.unwrap_or_default();
        let config_path = app_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // schema is applied when the service opens it
        let db_path = app_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            app_dir,
            db_path,
            key_path,
            content_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the app directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if !app_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = app_dir.join(DB_FILE_NAME);
        let key_path = app_dir.join(KEY_FILE_NAME);
        let content_path = app_dir.join(CONTENT_DIR_NAME);
        let config_path = app_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !key_path.exists() {
            return Err(StateError::MissingFile(KEY_FILE_NAME.to_string()));
        }
        if !content_path.exists() {
            return Err(StateError::MissingFile(format!("{}/", CONTENT_DIR_NAME)));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            app_dir,
            db_path,
            key_path,
            content_path,
            config_path,
            config,
        })
    }

    /// Load the wallet key from the key file
    pub fn load_key(&self) -> Result<SecretKey, StateError> {
        let pem = fs::read_to_string(&self.key_path)?;
        let key = SecretKey::from_pem(&pem).map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Ok(key)
    }

    /// The configured content store, with a local store defaulting to
    ///  the content directory
    pub fn content_store_config(&self) -> ContentStoreConfig {
        match &self.config.content_store {
            ContentStoreConfig::Local { path: None } => ContentStoreConfig::Local {
                path: Some(self.content_path.clone()),
            },
            other => other.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("feedboard directory not initialized. Run 'feedboard init' first")]
    NotInitialized,

    #[error("feedboard directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
