//! Service trait definitions for dependency injection

use async_trait::async_trait;
use shared::MessageReply;

use crate::error::WidgetResult;
use crate::types::ExportDocument;

/// The widget's view of the backend proxy
#[mockall::automock]
#[async_trait]
pub trait ProxyApi: Send + Sync {
    /// Ask the proxy for a new conversation session
    async fn create_session(&self) -> WidgetResult<String>;

    /// Send one user message and wait for the assistant's reply
    async fn send_message(&self, session_id: &str, message: &str) -> WidgetResult<MessageReply>;
}

/// Persistent string key/value storage with no expiry
#[mockall::automock]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> WidgetResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> WidgetResult<()>;

    fn remove(&self, key: &str) -> WidgetResult<()>;
}

/// Destination for conversation exports
#[mockall::automock]
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Save the export locally; returns where it was written
    async fn save(&self, document: &ExportDocument) -> WidgetResult<String>;

    /// POST the export to an external webhook
    async fn forward(&self, url: &str, document: &ExportDocument) -> WidgetResult<()>;
}
