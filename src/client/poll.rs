//! Poll-to-completion loop shared by the `wait_for_*` operations.

use super::ClientError;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// How a wait polls the remote side.
///
/// `timeout: None` waits for as long as the remote keeps reporting progress.
/// Cancelling `cancel` aborts the wait at the next check or sleep.
#[derive(Debug, Clone)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl PollOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of a single status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    /// Expected state observed
    Done,
    /// Still converging; carries the observed remote status
    Pending(String),
    /// Terminal failure; carries the observed remote status
    Failed(String),
}

/// PollStatus `uid` until it reports [`PollStatus::Done`], a failure, the deadline
/// elapses, or the wait is cancelled.
pub async fn poll_until<F, Fut>(uid: &str, options: &PollOptions, mut check: F) -> Result<(), ClientError>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<PollStatus, ClientError>> + Send,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        if options.cancel.is_cancelled() {
            return Err(ClientError::Cancelled {
                uid: uid.to_string(),
            });
        }

        attempts += 1;
        match check().await? {
            PollStatus::Done => {
                tracing::debug!(
                    uid,
                    attempts,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Wait completed"
                );
                return Ok(());
            }
            PollStatus::Failed(status) => {
                return Err(ClientError::ProvisioningFailed {
                    uid: uid.to_string(),
                    status,
                });
            }
            PollStatus::Pending(status) => {
                tracing::trace!(uid, attempts, status = %status, "Still waiting");
            }
        }

        let mut sleep_for = options.interval;
        if let Some(timeout) = options.timeout {
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(ClientError::PollTimeout {
                    uid: uid.to_string(),
                    waited_secs: elapsed.as_secs(),
                });
            }
            sleep_for = sleep_for.min(timeout - elapsed);
        }

        tokio::select! {
            _ = options.cancel.cancelled() => {
                return Err(ClientError::Cancelled { uid: uid.to_string() });
            }
            _ = tokio::time::sleep(sleep_for) => {}
        }
    }
}
