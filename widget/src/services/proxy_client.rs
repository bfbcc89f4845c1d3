//! HTTP client for the backend proxy

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{ErrorBody, MessageReply, MessageRequest, SessionCreated};

use crate::error::{WidgetError, WidgetResult};
use crate::traits::ProxyApi;

/// Covers the proxy's own poll budget plus some slack
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

pub struct HttpProxyClient {
    client: Client,
    base_url: String,
}

impl HttpProxyClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> WidgetResult<T> {
        let status = response.status();
        if !status.is_success() {
            // Error bodies are `{ error }`; anything else is reported by status alone
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(WidgetError::Proxy {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| WidgetError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ProxyApi for HttpProxyClient {
    async fn create_session(&self) -> WidgetResult<String> {
        let response = self
            .client
            .post(format!("{}/api/sessions", self.base_url))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| WidgetError::Network(e.to_string()))?;

        let created: SessionCreated = Self::parse(response).await?;
        Ok(created.session_id)
    }

    async fn send_message(&self, session_id: &str, message: &str) -> WidgetResult<MessageReply> {
        let response = self
            .client
            .post(format!("{}/api/messages", self.base_url))
            .json(&MessageRequest::new(session_id, message))
            .send()
            .await
            .map_err(|e| WidgetError::Network(e.to_string()))?;

        Self::parse(response).await
    }
}
