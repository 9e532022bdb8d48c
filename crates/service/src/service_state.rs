use axum::extract::FromRef;

use common::sync::SyncCoordinator;

use crate::content_store::{ContentStoreSetupError, ObjectContentStore};
use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;

/// The publish protocol as the service runs it
pub type Coordinator = SyncCoordinator<Database, ObjectContentStore>;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    coordinator: Coordinator,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let database = match &config.sqlite_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "opening board registry");
                Database::open(path).await?
            }
            None => {
                tracing::warn!("no sqlite path configured, board registry is in memory");
                Database::in_memory().await?
            }
        };

        let content = ObjectContentStore::new(&config.content_store).await?;
        tracing::info!(backend = config.content_store.backend(), "content store ready");

        let coordinator =
            SyncCoordinator::new(database.clone(), content).with_config(config.sync);

        Ok(Self {
            database,
            coordinator,
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn content(&self) -> &ObjectContentStore {
        self.coordinator.store()
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to setup the database: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("failed to setup the content store: {0}")]
    ContentStoreSetupError(#[from] ContentStoreSetupError),
}
