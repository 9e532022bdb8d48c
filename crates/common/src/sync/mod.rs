mod config;
mod coordinator;
mod error;
mod request;
mod retry;

pub use config::{
    PhaseTimeouts, SyncConfig, DEFAULT_AUTHENTICATE_TIMEOUT, DEFAULT_COMMIT_ATTEMPTS,
    DEFAULT_COMMIT_TIMEOUT, DEFAULT_READ_TIMEOUT, DEFAULT_STAGE_TIMEOUT,
};
pub use coordinator::SyncCoordinator;
pub use error::{Phase, SyncError};
pub use request::{CreateBoardRequest, PublishUpdateRequest};
pub use retry::{RetryPolicy, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_BACKOFF, DEFAULT_RETRY_ATTEMPTS};
