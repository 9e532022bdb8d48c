#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::Router;
use http::{Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use common::board::BoardId;
use common::crypto::SecretKey;
use common::linked_data::ContentAddress;
use common::mutation::{MutationRequest, Operation};
use service::http_server::{self, Config};
use service::{ServiceConfig, ServiceState};

/// A router over an all in-memory service
pub async fn setup() -> (Router, ServiceState) {
    let state = ServiceState::from_config(&ServiceConfig::default())
        .await
        .expect("in-memory state");
    let config = Config::new(SocketAddr::from(([127, 0, 0, 1], 0)));
    (http_server::router(&config, state.clone()), state)
}

pub fn board(id: &str) -> BoardId {
    BoardId::new(id).unwrap()
}

pub fn sign(
    key: &SecretKey,
    operation: Operation,
    id: &str,
    address: ContentAddress,
    expected_version: u64,
) -> MutationRequest {
    MutationRequest::sign(key, operation, board(id), address, expected_version).unwrap()
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("accept", "application/json")
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

pub async fn post_json<T: serde::Serialize>(router: &Router, uri: &str, body: &T) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    send(router, request).await
}

pub async fn post_bytes(router: &Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/octet-stream")
        .body(Body::from(body))
        .unwrap();
    send(router, request).await
}

pub async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn expect<T: DeserializeOwned>(response: Response<Body>, status: StatusCode) -> T {
    assert_eq!(response.status(), status);
    json(response).await
}
