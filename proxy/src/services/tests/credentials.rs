//! Tests for RealCredentialSource
//!
//! Environment variables are process wide, so every case runs inside one
//! test to avoid racing other tests.

use crate::services::{API_KEY_VAR, ASSISTANT_ID_VAR, RealCredentialSource};
use crate::traits::CredentialSource;

#[tokio::test]
async fn test_credentials_from_environment() {
    let source = RealCredentialSource::without_dotenv();

    // SAFETY: no other test in this crate touches these variables
    unsafe {
        std::env::remove_var(API_KEY_VAR);
        std::env::remove_var(ASSISTANT_ID_VAR);
    }
    let missing = source.load().await.unwrap_err();
    assert_eq!(missing.keys, vec![API_KEY_VAR.to_string(), ASSISTANT_ID_VAR.to_string()]);

    unsafe {
        std::env::set_var(API_KEY_VAR, "sk-test");
        std::env::set_var(ASSISTANT_ID_VAR, "   ");
    }
    let missing = source.load().await.unwrap_err();
    assert_eq!(missing.keys, vec![ASSISTANT_ID_VAR.to_string()]);
    assert!(missing.to_string().contains(ASSISTANT_ID_VAR));

    unsafe {
        std::env::set_var(ASSISTANT_ID_VAR, "asst_123");
    }
    let credentials = source.load().await.unwrap();
    assert_eq!(credentials.api_key, "sk-test");
    assert_eq!(credentials.assistant_id, "asst_123");
    assert!(!format!("{credentials:?}").contains("sk-test"));

    unsafe {
        std::env::remove_var(API_KEY_VAR);
        std::env::remove_var(ASSISTANT_ID_VAR);
    }
}
