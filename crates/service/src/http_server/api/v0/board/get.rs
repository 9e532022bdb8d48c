use axum::extract::rejection::PathRejection;
use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::board::{BoardId, BoardRecord};
use common::sync::SyncError;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::RequestError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetRequest {
    /// Id of the board to look up
    #[arg(long)]
    pub board_id: BoardId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    board_id: Result<Path<BoardId>, PathRejection>,
) -> Result<Response, RequestError> {
    let Path(board_id) = board_id?;

    match state.coordinator().get_board(&board_id).await? {
        Some(record) => Ok((http::StatusCode::OK, Json(record)).into_response()),
        None => Err(SyncError::NotFound(board_id).into()),
    }
}

impl ApiRequest for GetRequest {
    type Response = BoardRecord;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/v0/board/{}", self.board_id))?;
        Ok(client.get(full_url))
    }
}
