use clap::Args;

use service::state::{default_api_port, AppConfig, AppState, StateError};
use service::ContentStoreConfig;

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the registry API listens on
    #[arg(long, default_value_t = default_api_port())]
    pub api_port: u16,

    /// Keep board content in memory instead of the local content directory
    #[arg(long)]
    pub ephemeral_content: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content_store = if self.ephemeral_content {
            ContentStoreConfig::Memory
        } else {
            ContentStoreConfig::Local { path: None }
        };
        let config = AppConfig {
            api_port: self.api_port,
            content_store,
            ..Default::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let owner = state.load_key()?.public();

        let output = format!(
            "Initialized feedboard directory at: {}\n\
             - Database: {}\n\
             - Key: {}\n\
             - Content: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Wallet: {}",
            state.app_dir.display(),
            state.db_path.display(),
            state.key_path.display(),
            state.content_path.display(),
            state.config_path.display(),
            state.config.api_port,
            owner,
        );

        Ok(output)
    }
}
