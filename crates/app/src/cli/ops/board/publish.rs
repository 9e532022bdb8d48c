use std::path::PathBuf;

use bytes::Bytes;
use clap::Args;

use common::board::BoardId;
use common::linked_data::ContentAddress;
use common::mutation::{MutationRequest, Operation};
use common::sync::PublishUpdateRequest;
use service::http_server::api::client::ApiError;
use service::http_server::api::v0::board::GetRequest;
use service::http_server::api::v0::content::UploadRequest;
use service::state::StateError;

#[derive(Args, Debug, Clone)]
pub struct Publish {
    /// Board to publish to
    #[arg(long)]
    pub board_id: BoardId,

    /// File holding the new board content
    #[arg(long)]
    pub file: PathBuf,

    /// Version the update is based on (defaults to the board's current version)
    #[arg(long)]
    pub expected_version: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum BoardPublishError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("failed to read content: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to sign request: {0}")]
    Sign(String),
    #[error("registry stored content at {remote}, expected {local}")]
    AddressMismatch {
        local: ContentAddress,
        remote: ContentAddress,
    },
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Publish {
    type Error = BoardPublishError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let key = super::load_wallet(ctx)?;

        let expected_version = match self.expected_version {
            Some(version) => version,
            None => {
                let current = ctx
                    .client
                    .call(GetRequest {
                        board_id: self.board_id.clone(),
                    })
                    .await?;
                current.version
            }
        };

        let content = Bytes::from(tokio::fs::read(&self.file).await?);
        let address = ContentAddress::for_content(&content);

        let signed = MutationRequest::sign(
            &key,
            Operation::Update,
            self.board_id.clone(),
            address,
            expected_version,
        )
        .map_err(|e| BoardPublishError::Sign(e.to_string()))?;

        let uploaded = ctx.client.call(UploadRequest { content }).await?;
        if uploaded.content_address != address {
            return Err(BoardPublishError::AddressMismatch {
                local: address,
                remote: uploaded.content_address,
            });
        }

        let record = ctx.client.call(PublishUpdateRequest::from(signed)).await?;
        Ok(format!("Published {}", super::describe(&record)))
    }
}
