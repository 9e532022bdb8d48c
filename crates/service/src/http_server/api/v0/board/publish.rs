use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};

use common::board::BoardRecord;
use common::sync::PublishUpdateRequest;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::RequestError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    req: Result<Json<PublishUpdateRequest>, JsonRejection>,
) -> Result<Response, RequestError> {
    let Json(req) = req?;
    tracing::debug!(
        board_id = %req.board_id,
        expected_version = req.expected_version,
        "publish requested"
    );

    let record = state.coordinator().publish_update(req).await?;

    Ok((http::StatusCode::OK, Json(record)).into_response())
}

impl ApiRequest for PublishUpdateRequest {
    type Response = BoardRecord;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/board/publish")?;
        Ok(client.post(full_url).json(&self))
    }
}
