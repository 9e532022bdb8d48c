use std::time::Duration;

use super::retry::RetryPolicy;

pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_AUTHENTICATE_TIMEOUT: Duration = Duration::from_millis(2_000);
pub const DEFAULT_COMMIT_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(5_000);
/// Conditional updates attempted before an unresolved commit is
///  reported as unavailable
pub const DEFAULT_COMMIT_ATTEMPTS: u32 = 2;

/// Upper bound on each protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimeouts {
    pub stage: Duration,
    pub authenticate: Duration,
    /// Bounds a single conditional update, not the resolution that
    ///  follows a timeout
    pub commit: Duration,
    pub read: Duration,
}

impl Default for PhaseTimeouts {
    fn default() -> Self {
        Self {
            stage: DEFAULT_STAGE_TIMEOUT,
            authenticate: DEFAULT_AUTHENTICATE_TIMEOUT,
            commit: DEFAULT_COMMIT_TIMEOUT,
            read: DEFAULT_READ_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub timeouts: PhaseTimeouts,
    /// Applied to reads and staging only
    pub retry: RetryPolicy,
    pub commit_attempts: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeouts: PhaseTimeouts::default(),
            retry: RetryPolicy::default(),
            commit_attempts: DEFAULT_COMMIT_ATTEMPTS,
        }
    }
}
