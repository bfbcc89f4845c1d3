//! Embeddable chat widget
//!
//! Holds the conversation state, caches the session handle and log per
//! proxy URL, and talks to the backend proxy. The state machine in
//! [`core`] is pure; [`runtime`] executes the effects it requests.

pub mod core;
pub mod error;
pub mod render;
pub mod runtime;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use error::{WidgetError, WidgetResult};
pub use runtime::WidgetRuntime;
pub use types::*;

// Re-export trait definitions
pub use traits::{ExportSink, KeyValueStore, ProxyApi};

// Re-export service implementations
pub use services::{FileExportSink, HttpProxyClient, JsonFileStore, MemoryStore};
