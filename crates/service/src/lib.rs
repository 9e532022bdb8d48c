//! The board registry service: a SQLite-backed registry, an object store for
//!  board content and the HTTP API that runs the publish protocol over them.

pub mod content_store;
pub mod database;
pub mod http_server;
pub mod process;
pub mod service_config;
pub mod service_state;

// App state (configuration, paths)
pub mod state;

pub use content_store::{ContentStoreConfig, ObjectContentStore};
pub use database::Database;
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
