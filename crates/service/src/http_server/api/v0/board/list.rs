use axum::extract::rejection::QueryRejection;
use axum::extract::{Json, Query, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::board::BoardRecord;
use common::board_registry::DEFAULT_LIST_LIMIT;
use common::crypto::PublicKey;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::RequestError;
use crate::ServiceState;

/// Boards of one owner, or the most recently created boards overall.
///  An owner filter returns every board of that owner and ignores `limit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {
    /// Only list boards owned by this key (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub owner: Option<PublicKey>,

    /// How many recent boards to list
    #[serde(skip_serializing_if = "Option::is_none")]
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Newest first
    pub boards: Vec<BoardRecord>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    query: Result<Query<ListRequest>, QueryRejection>,
) -> Result<Response, RequestError> {
    let Query(req) = query?;
    let sync = state.coordinator();

    let boards = match req.owner {
        Some(owner) => sync.list_boards_by_owner(&owner).await?,
        None => {
            sync.list_recent_boards(req.limit.unwrap_or(DEFAULT_LIST_LIMIT))
                .await?
        }
    };

    Ok((http::StatusCode::OK, Json(ListResponse { boards })).into_response())
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/board")?;
        Ok(client.get(full_url).query(&self))
    }
}
