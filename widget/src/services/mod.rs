//! Widget services implementations

pub mod export_sink;
pub mod proxy_client;
pub mod storage;

#[cfg(test)]
pub mod tests;

pub use export_sink::*;
pub use proxy_client::*;
pub use storage::*;
