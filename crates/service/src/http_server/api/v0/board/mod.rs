use axum::routing::{get, post};
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod get;
pub mod list;
pub mod publish;

pub use get::GetRequest;
pub use list::{ListRequest, ListResponse};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list::handler).post(create::handler))
        .route("/publish", post(publish::handler))
        .route("/:board_id", get(get::handler))
        .with_state(state)
}
