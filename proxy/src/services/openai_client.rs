//! Assistants API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{UpstreamError, UpstreamResult};
use crate::traits::AssistantApi;
use crate::types::{AssistantCredentials, Run, ThreadMessage};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const ASSISTANTS_BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<ThreadMessage>,
}

/// Real assistant client talking to the Assistants REST API
pub struct RealAssistantClient {
    client: Client,
    base_url: String,
    credentials: Option<AssistantCredentials>,
}

impl RealAssistantClient {
    /// Without credentials every call fails with `AuthenticationFailed`
    pub fn new(base_url: impl Into<String>, credentials: Option<AssistantCredentials>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> UpstreamResult<&AssistantCredentials> {
        self.credentials.as_ref().ok_or(UpstreamError::AuthenticationFailed)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> UpstreamResult<RequestBuilder> {
        let credentials = self.credentials()?;
        Ok(request
            .bearer_auth(&credentials.api_key)
            .header(ASSISTANTS_BETA_HEADER.0, ASSISTANTS_BETA_HEADER.1))
    }

    async fn send(&self, request: RequestBuilder) -> UpstreamResult<Response> {
        let response = self
            .authorized(request)?
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        match status {
            401 | 403 => Err(UpstreamError::AuthenticationFailed),
            429 => Err(UpstreamError::RateLimitExceeded),
            _ => {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(status, body = %body, "Assistant provider returned an error");
                Err(UpstreamError::Http { status, body })
            }
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> UpstreamResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl AssistantApi for RealAssistantClient {
    async fn create_thread(&self) -> UpstreamResult<String> {
        let request = self.client.post(self.url("/threads")).json(&serde_json::json!({}));
        let thread: ThreadObject = self.send_json(request).await?;
        Ok(thread.id)
    }

    async fn add_user_message(&self, thread_id: &str, content: &str) -> UpstreamResult<()> {
        let request = self
            .client
            .post(self.url(&format!("/threads/{thread_id}/messages")))
            .json(&serde_json::json!({
                "role": "user",
                "content": content
            }));
        self.send(request).await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str) -> UpstreamResult<Run> {
        let assistant_id = self.credentials()?.assistant_id.clone();
        let request = self
            .client
            .post(self.url(&format!("/threads/{thread_id}/runs")))
            .json(&serde_json::json!({ "assistant_id": assistant_id }));
        self.send_json(request).await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> UpstreamResult<Run> {
        let request = self.client.get(self.url(&format!("/threads/{thread_id}/runs/{run_id}")));
        self.send_json(request).await
    }

    async fn latest_message(&self, thread_id: &str) -> UpstreamResult<Option<ThreadMessage>> {
        let request = self
            .client
            .get(self.url(&format!("/threads/{thread_id}/messages")))
            .query(&[("limit", "1"), ("order", "desc")]);
        let list: MessageList = self.send_json(request).await?;
        Ok(list.data.into_iter().next())
    }
}
