//! Pure widget logic

pub mod export;
pub mod state_machine;
pub mod storage_keys;

pub use export::build_export;
pub use state_machine::{local_session_id, transition};
pub use storage_keys::StorageKeys;
