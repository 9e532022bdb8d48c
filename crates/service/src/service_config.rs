use std::path::PathBuf;

use common::sync::SyncConfig;

use crate::content_store::ContentStoreConfig;
use crate::state::default_api_port;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the registry API
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,
    /// Content storage backend configuration
    pub content_store: ContentStoreConfig,

    // publish protocol tuning
    pub sync: SyncConfig,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    /// Everything in memory, nothing touches disk
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            sqlite_path: None,
            content_store: ContentStoreConfig::Memory,
            sync: SyncConfig::default(),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
