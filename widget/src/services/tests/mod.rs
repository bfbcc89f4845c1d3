//! Tests for widget services
//!
//! HTTP services run against a local mock server; file-backed services use
//! temporary directories.

pub mod storage;
