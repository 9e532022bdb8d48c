use axum::Router;

pub mod board;
pub mod content;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/board", board::router(state.clone()))
        .nest("/content", content::router(state.clone()))
        .with_state(state)
}
