//! Tests for proxy services
//!
//! The assistant client is exercised against a local mock HTTP server; the
//! sweeper against a manually advanced clock.

pub mod credentials;
pub mod openai_client;
pub mod sweeper;
