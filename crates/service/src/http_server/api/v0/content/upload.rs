use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::linked_data::ContentAddress;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::RequestError;
use crate::ServiceState;

/// Raw board content, sent as the request body
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub content: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub content_address: ContentAddress,
}

/// Stage content ahead of a create or publish. The returned address is
///  the one the client signs.
pub async fn handler(
    State(state): State<ServiceState>,
    body: Bytes,
) -> Result<Response, RequestError> {
    let content_address = state.coordinator().stage(body).await?;

    Ok((
        http::StatusCode::CREATED,
        Json(UploadResponse { content_address }),
    )
        .into_response())
}

impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/content")?;
        Ok(client
            .post(full_url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(self.content))
    }
}
