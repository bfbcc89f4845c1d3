//! Backend proxy for the embeddable chat widget
//!
//! Keeps the assistant provider's credentials server side, rate limits each
//! client and turns the provider's asynchronous run model into a single
//! request/response exchange.

pub mod config;
pub mod core;
pub mod error;
pub mod proxy_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::{Args, ProxyConfig};
pub use error::{ProxyError, ProxyResult, UpstreamError, UpstreamResult};
pub use proxy_impl::ProxyServer;
pub use state::AppState;
pub use types::*;

// Re-export trait definitions
pub use traits::{AssistantApi, Clock, CredentialSource, MissingCredentials, Sleeper};

// Re-export service implementations
pub use services::{RealAssistantClient, RealCredentialSource, SystemClock, TokioSleeper};
