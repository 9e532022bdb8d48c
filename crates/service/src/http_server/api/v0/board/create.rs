use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};

use common::board::BoardRecord;
use common::sync::CreateBoardRequest;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::RequestError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    req: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> Result<Response, RequestError> {
    let Json(req) = req?;
    tracing::debug!(board_id = %req.board_id, owner = %req.owner, "create board requested");

    let record = state.coordinator().create_board(req).await?;

    Ok((http::StatusCode::CREATED, Json(record)).into_response())
}

impl ApiRequest for CreateBoardRequest {
    type Response = BoardRecord;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/board")?;
        Ok(client.post(full_url).json(&self))
    }
}
