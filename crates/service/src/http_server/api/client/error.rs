use reqwest::StatusCode;

use crate::http_server::api::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

impl ApiError {
    /// The structured error the service replied with, if any
    pub fn body(&self) -> Option<ErrorBody> {
        match self {
            ApiError::HttpStatus(_, text) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }
}
