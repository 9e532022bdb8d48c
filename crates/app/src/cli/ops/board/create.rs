use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use common::board::{BoardId, INITIAL_VERSION};
use common::linked_data::ContentAddress;
use common::mutation::{MutationRequest, Operation};
use common::sync::CreateBoardRequest;
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::content::UploadRequest;
use service::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// File holding the board's initial content
    #[arg(long)]
    pub file: PathBuf,

    /// Id to register the board under
    #[arg(long, group = "board_identifier")]
    pub board_id: Option<BoardId>,

    /// Derive the board id from this seed and the wallet key instead
    #[arg(long, group = "board_identifier")]
    pub seed: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BoardCreateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("failed to read content: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to sign request: {0}")]
    Sign(String),
    #[error("Either --board-id or --seed must be provided")]
    NoBoardIdentifier,
    #[error("registry stored content at {remote}, expected {local}")]
    AddressMismatch {
        local: ContentAddress,
        remote: ContentAddress,
    },
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Create {
    type Error = BoardCreateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = super::load_wallet(ctx)?;

        let board_id = match (&self.board_id, &self.seed) {
            (Some(id), _) => id.clone(),
            (None, Some(seed)) => BoardId::derive(&key.public(), seed),
            (None, None) => return Err(BoardCreateError::NoBoardIdentifier),
        };

        let content = Bytes::from(tokio::fs::read(&self.file).await?);
        let address = ContentAddress::for_content(&content);

        let signed =
            MutationRequest::sign(&key, Operation::Create, board_id, address, INITIAL_VERSION)
                .map_err(|e| BoardCreateError::Sign(e.to_string()))?;

        let uploaded = ctx.client.call(UploadRequest { content }).await?;
        if uploaded.content_address != address {
            return Err(BoardCreateError::AddressMismatch {
                local: address,
                remote: uploaded.content_address,
            });
        }

        let record = ctx.client.call(CreateBoardRequest::from(signed)).await?;
        Ok(format!("Created board {}", super::describe(&record)))
    }
}
