//! HTTP surface of the proxy

pub mod client_key;
pub mod handlers;

pub use client_key::{client_ip, message_key, session_key};
pub use handlers::{create_session, create_thread, health_check, send_message};
