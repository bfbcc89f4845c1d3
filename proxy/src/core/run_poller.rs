//! Run-and-poll state machine
//!
//! A run starts `queued`, moves through `in_progress` and settles in a
//! terminal state. [`advance`] is the pure transition; [`RunPoller`] drives it
//! against an [`AssistantApi`] with an injected [`Sleeper`], checking the
//! request's cancellation token before every sleep and every upstream call.

use tokio_util::sync::CancellationToken;

use crate::error::{ProxyError, ProxyResult};
use crate::traits::{AssistantApi, Sleeper};
use crate::types::{PollPolicy, Run, RunStatus};

/// Where the poll loop stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Run still executing after `attempts` status checks
    Pending { run: Run, attempts: u32 },
    /// Run reached a terminal status
    Settled { run: Run, attempts: u32 },
    /// Attempt budget spent while the run was still executing
    Exhausted { attempts: u32, last_status: RunStatus },
}

/// Fold one observed run into the poll state
pub fn advance(run: Run, attempts: u32, policy: &PollPolicy) -> PollState {
    if !run.status.is_pending() {
        PollState::Settled { run, attempts }
    } else if attempts >= policy.max_attempts {
        PollState::Exhausted {
            attempts,
            last_status: run.status,
        }
    } else {
        PollState::Pending { run, attempts }
    }
}

/// Drives [`advance`] against the assistant provider
pub struct RunPoller<'a, A, S> {
    api: &'a A,
    sleeper: &'a S,
    policy: PollPolicy,
}

impl<'a, A, S> RunPoller<'a, A, S>
where
    A: AssistantApi,
    S: Sleeper,
{
    pub fn new(api: &'a A, sleeper: &'a S, policy: PollPolicy) -> Self {
        Self { api, sleeper, policy }
    }

    /// Poll `run` until it settles. Returns the settled run whatever its
    /// status; the caller decides what a non-completed status means.
    pub async fn wait(&self, thread_id: &str, run: Run, cancel: &CancellationToken) -> ProxyResult<Run> {
        let mut state = advance(run, 0, &self.policy);

        loop {
            match state {
                PollState::Settled { run, attempts } => {
                    tracing::debug!(run_id = %run.id, status = %run.status, attempts, "Run settled");
                    return Ok(run);
                }
                PollState::Exhausted { attempts, last_status } => {
                    tracing::warn!(thread_id, attempts, status = %last_status, "Run still pending after poll budget");
                    return Err(ProxyError::UpstreamTimeout { attempts });
                }
                PollState::Pending { run, attempts } => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ProxyError::Cancelled),
                        _ = self.sleeper.sleep(self.policy.interval) => {}
                    }

                    let observed = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ProxyError::Cancelled),
                        result = self.api.retrieve_run(thread_id, &run.id) => result?,
                    };

                    state = advance(observed, attempts + 1, &self.policy);
                }
            }
        }
    }
}
