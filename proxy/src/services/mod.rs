//! Proxy services implementations

pub mod clock;
pub mod credentials;
pub mod openai_client;
pub mod sweeper;

#[cfg(test)]
pub mod tests;

pub use clock::*;
pub use credentials::*;
pub use openai_client::*;
pub use sweeper::*;
