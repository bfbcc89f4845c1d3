//! Widget configuration and its query-parameter codec
//!
//! The configurator serialises a [`WidgetConfig`] to JSON, URI-component
//! encodes it and base64-encodes the result; the embed script reads it back
//! from the `config` query parameter. Decoding never fails hard: an absent or
//! corrupt parameter yields [`WidgetConfig::default`], and fields missing from
//! an otherwise valid object take their default values.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::errors::{SharedError, SharedResult};

/// Name of the query parameter carrying the encoded config
pub const CONFIG_QUERY_PARAM: &str = "config";

/// Colour scheme of the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Immutable widget settings produced by the configurator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub widget_title: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub placeholder_text: String,
    pub footer_text: String,
    pub theme: Theme,
    pub api_url: String,
    pub enable_logging: bool,
    pub enable_export: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n8n_webhook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            widget_title: "Chat Assistant".to_string(),
            primary_color: "#9333ea".to_string(),
            secondary_color: "#f3e8ff".to_string(),
            text_color: "#ffffff".to_string(),
            placeholder_text: "Ask me anything...".to_string(),
            footer_text: "Powered by AI Chat Widget".to_string(),
            theme: Theme::Light,
            api_url: "http://localhost:3000".to_string(),
            enable_logging: true,
            enable_export: false,
            n8n_webhook: None,
            welcome_message: None,
        }
    }
}

impl WidgetConfig {
    /// Encode as the `config` query parameter value
    pub fn encode(&self) -> SharedResult<String> {
        let json = serde_json::to_string(self).map_err(|e| SharedError::SerializationError {
            message: e.to_string(),
        })?;
        let component = urlencoding::encode(&json);
        Ok(STANDARD.encode(component.as_bytes()))
    }

    /// Strict decoding of a `config` query parameter value
    pub fn decode(encoded: &str) -> SharedResult<Self> {
        // Query-string decoding turns an unescaped '+' into a space
        let normalized: String = encoded.trim().replace(' ', "+");
        let bytes = STANDARD
            .decode(normalized.as_bytes())
            .map_err(|e| SharedError::InvalidEncoding { message: e.to_string() })?;
        let component = String::from_utf8(bytes).map_err(|_| SharedError::InvalidUtf8)?;
        let json = urlencoding::decode(&component).map_err(|_| SharedError::InvalidUtf8)?;
        serde_json::from_str(&json).map_err(|e| SharedError::DeserializationError {
            message: e.to_string(),
        })
    }

    /// Lenient decoding: absent or corrupt input yields the defaults
    pub fn from_query_param(encoded: Option<&str>) -> Self {
        match encoded {
            None => Self::default(),
            Some(value) => match Self::decode(value) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to decode widget config, using defaults");
                    Self::default()
                }
            },
        }
    }

    /// Read the `config` parameter from an embed script URL
    pub fn from_script_url(script_url: &str) -> Self {
        let param = Url::parse(script_url).ok().and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == CONFIG_QUERY_PARAM)
                .map(|(_, value)| value.into_owned())
        });
        Self::from_query_param(param.as_deref())
    }

    /// Greeting shown when the conversation log is empty
    pub fn welcome_text(&self) -> String {
        match &self.welcome_message {
            Some(message) if !message.trim().is_empty() => message.clone(),
            _ => format!("Hi! I'm {}. How can I help you today?", self.widget_title),
        }
    }

    /// Validated outbound webhook target, if one is configured
    pub fn webhook_url(&self) -> Option<Url> {
        self.n8n_webhook
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| Url::parse(raw).ok())
            .filter(|url| matches!(url.scheme(), "http" | "https"))
    }
}
