use clap::{Args, Subcommand};

pub mod create;
pub mod get;
pub mod ls;
pub mod publish;

use common::board::BoardRecord;
use common::crypto::SecretKey;
use service::http_server::api::v0::board::{GetRequest, ListRequest};
use service::state::{AppState, StateError};

use crate::cli::op::{Op, OpContext};

crate::command_enum! {
    (Create, create::Create),
    (Get, GetRequest),
    (Ls, ListRequest),
    (Publish, publish::Publish),
}

pub type BoardCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Board {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[async_trait::async_trait]
impl Op for Board {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

/// The wallet key of the local feedboard directory
fn load_wallet(ctx: &OpContext) -> Result<SecretKey, StateError> {
    AppState::load(ctx.config_path.clone())?.load_key()
}

fn describe(record: &BoardRecord) -> String {
    format!(
        "{}\n  owner:   {}\n  content: {}\n  version: {}\n  created: {}\n  updated: {}",
        record.board_id,
        record.owner,
        record.content_address,
        record.version,
        record.created_at,
        record.updated_at,
    )
}
