//! Core shared types and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global component identity for this process
static COMPONENT: OnceLock<Component> = OnceLock::new();

/// Which side of the system the current process is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Component {
    /// Backend proxy in front of the assistant provider
    #[default]
    Proxy,
    /// Embedded chat widget runtime
    Widget,
}

impl Component {
    /// Initialize the global component identity as the proxy
    pub fn init_proxy() -> Component {
        *COMPONENT.get_or_init(|| Component::Proxy)
    }

    /// Initialize the global component identity as the widget
    pub fn init_widget() -> Component {
        *COMPONENT.get_or_init(|| Component::Widget)
    }

    /// Get the global component identity, defaulting to the proxy when
    /// nothing has been initialized yet (unit tests)
    pub fn current() -> Component {
        COMPONENT.get().copied().unwrap_or_default()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Proxy => write!(f, "proxy"),
            Component::Widget => write!(f, "widget"),
        }
    }
}

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in the widget's conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_display() {
        assert_eq!(Component::Proxy.to_string(), "proxy");
        assert_eq!(Component::Widget.to_string(), "widget");
    }

    #[test]
    fn test_turn_serializes_lowercase_role() {
        let turn = Turn::assistant("Hi there", Utc::now());
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "Hi there");

        let parsed: Turn = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, turn);
    }
}
