//! Environment-based assistant credentials
//!
//! ## Configuration Sources
//! Credentials are loaded from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! Environment variables take precedence over .env file values.
//!
//! ## Required Keys
//! - `OPENAI_API_KEY`: assistant provider access key
//! - `OPENAI_ASSISTANT_ID`: id of the assistant every run is started with

use async_trait::async_trait;

use crate::traits::{CredentialSource, MissingCredentials};
use crate::types::AssistantCredentials;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ASSISTANT_ID_VAR: &str = "OPENAI_ASSISTANT_ID";

/// Credential source backed by environment variables
pub struct RealCredentialSource {
    load_dotenv: bool,
}

impl RealCredentialSource {
    pub fn new() -> Self {
        Self { load_dotenv: true }
    }

    /// Skip `.env` loading and read only the process environment
    pub fn without_dotenv() -> Self {
        Self { load_dotenv: false }
    }

    fn read_var(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.trim().is_empty())
    }
}

impl Default for RealCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialSource for RealCredentialSource {
    async fn load(&self) -> Result<AssistantCredentials, MissingCredentials> {
        if self.load_dotenv {
            // A missing .env file is fine
            let _ = dotenv::dotenv();
        }

        let api_key = Self::read_var(API_KEY_VAR);
        let assistant_id = Self::read_var(ASSISTANT_ID_VAR);

        match (api_key, assistant_id) {
            (Some(api_key), Some(assistant_id)) => Ok(AssistantCredentials { api_key, assistant_id }),
            (api_key, assistant_id) => {
                let mut keys = Vec::new();
                if api_key.is_none() {
                    keys.push(API_KEY_VAR.to_string());
                }
                if assistant_id.is_none() {
                    keys.push(ASSISTANT_ID_VAR.to_string());
                }
                Err(MissingCredentials { keys })
            }
        }
    }
}
