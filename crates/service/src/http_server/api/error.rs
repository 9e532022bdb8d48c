use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::sync::SyncError;

/// JSON body of every failed API call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable, machine readable error kind
    pub kind: String,
    pub msg: String,
    /// Set on version conflicts: the version the board is actually at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<u64>,
}

/// A protocol error on its way out as an HTTP response
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct RequestError(#[from] SyncError);

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SyncError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            SyncError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            SyncError::NotFound(_) => StatusCode::NOT_FOUND,
            SyncError::AlreadyExists(_) | SyncError::VersionConflict { .. } => {
                StatusCode::CONFLICT
            }
            SyncError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn malformed(msg: String) -> Self {
        Self(SyncError::MalformedRequest(msg))
    }
}

impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}

impl From<PathRejection> for RequestError {
    fn from(rejection: PathRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for RequestError {
    fn from(rejection: QueryRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, "request rejected");
        }

        let current_version = match &self.0 {
            SyncError::VersionConflict { current, .. } => Some(*current),
            _ => None,
        };
        let body = ErrorBody {
            kind: self.0.kind().to_string(),
            msg: self.0.to_string(),
            current_version,
        };
        (status, Json(body)).into_response()
    }
}
