//! HTTP contract between the widget and the proxy
//!
//! - `POST /api/sessions` answers [`SessionCreated`]
//! - `POST /api/messages` takes [`MessageRequest`] and answers [`MessageReply`]
//! - every failure answers [`ErrorBody`]

pub mod api;

pub use api::{ErrorBody, MessageReply, MessageRequest, SessionCreated, ThreadCreated};
