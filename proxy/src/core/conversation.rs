//! Conversation protocol: session creation and the message exchange
//!
//! Stateless per request. Each exchange appends exactly one user message to
//! the upstream thread and expects exactly one assistant reply; retries from
//! the client produce duplicate turns because the provider dedupes nothing.

use std::sync::Arc;

use shared::{Component, MessageReply, Role, component_error, component_info};
use tokio_util::sync::CancellationToken;

use crate::core::run_poller::RunPoller;
use crate::error::{ProxyError, ProxyResult};
use crate::traits::{AssistantApi, Sleeper};
use crate::types::{MessageContent, PollPolicy, ThreadMessage, ValidatedMessage};

/// Conversation proxy over an assistant provider
pub struct ConversationService<A, S> {
    assistant: Arc<A>,
    sleeper: Arc<S>,
    poll_policy: PollPolicy,
}

impl<A, S> ConversationService<A, S>
where
    A: AssistantApi,
    S: Sleeper,
{
    pub fn new(assistant: Arc<A>, sleeper: Arc<S>, poll_policy: PollPolicy) -> Self {
        Self {
            assistant,
            sleeper,
            poll_policy,
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.poll_policy
    }

    /// Create a new upstream thread
    pub async fn create_session(&self) -> ProxyResult<String> {
        let session_id = self
            .assistant
            .create_thread()
            .await
            .map_err(ProxyError::from_session_upstream)?;

        component_info!(Component::current(), session_id = %session_id, "Session created");
        Ok(session_id)
    }

    /// Append the user turn, run the assistant and return its reply
    pub async fn exchange(&self, request: ValidatedMessage, cancel: &CancellationToken) -> ProxyResult<MessageReply> {
        let session_id = if request.has_local_session() {
            // The widget fell back to a local handle; give it a real thread
            let upgraded = self.assistant.create_thread().await?;
            component_info!(
                Component::current(),
                local_session = %request.session_id,
                session_id = %upgraded,
                "Replaced local session handle with upstream thread"
            );
            upgraded
        } else {
            request.session_id.clone()
        };

        self.assistant.add_user_message(&session_id, &request.message).await?;
        let run = self.assistant.create_run(&session_id).await?;

        let poller = RunPoller::new(self.assistant.as_ref(), self.sleeper.as_ref(), self.poll_policy);
        let run = poller.wait(&session_id, run, cancel).await?;

        if !run.status.is_completed() {
            let detail = run.failure_detail();
            component_error!(
                Component::current(),
                session_id = %session_id,
                run_id = %run.id,
                status = %run.status,
                detail = %detail,
                "Assistant run did not complete"
            );
            return Err(ProxyError::UpstreamFailure {
                status: run.status,
                detail,
            });
        }

        let latest = self.assistant.latest_message(&session_id).await?;
        let message = extract_assistant_text(latest)?;

        Ok(MessageReply { message, session_id })
    }
}

/// The newest thread message must be an assistant message whose first
/// content part is text
pub fn extract_assistant_text(message: Option<ThreadMessage>) -> ProxyResult<String> {
    let message = message.ok_or_else(|| ProxyError::MalformedUpstreamResponse {
        reason: "thread has no messages".to_string(),
    })?;

    if message.role != Role::Assistant {
        return Err(ProxyError::MalformedUpstreamResponse {
            reason: format!("latest message {} has role {}", message.id, message.role),
        });
    }

    match message.content.into_iter().next() {
        Some(MessageContent::Text { text }) => Ok(text.value),
        Some(MessageContent::Other) => Err(ProxyError::MalformedUpstreamResponse {
            reason: format!("latest message {} is not text", message.id),
        }),
        None => Err(ProxyError::MalformedUpstreamResponse {
            reason: format!("latest message {} has no content", message.id),
        }),
    }
}
