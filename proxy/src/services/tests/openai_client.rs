//! Tests for RealAssistantClient

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::error::{ProxyError, UpstreamError};
use crate::services::RealAssistantClient;
use crate::traits::AssistantApi;
use crate::types::{AssistantCredentials, MessageContent, RunStatus};
use shared::Role;

fn credentials() -> AssistantCredentials {
    AssistantCredentials {
        api_key: "sk-test".to_string(),
        assistant_id: "asst_123".to_string(),
    }
}

async fn client() -> (MockServer, RealAssistantClient) {
    let server = MockServer::start().await;
    let client = RealAssistantClient::new(server.uri(), Some(credentials()));
    (server, client)
}

#[tokio::test]
async fn test_create_thread_sends_auth_and_beta_headers() {
    let (server, client) = client().await;

    Mock::given(method("POST"))
        .and(path("/threads"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("openai-beta", "assistants=v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "thread_abc",
            "object": "thread"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.create_thread().await.unwrap(), "thread_abc");
}

#[tokio::test]
async fn test_add_user_message_posts_role_and_content() {
    let (server, client) = client().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread_abc/messages"))
        .and(body_json(json!({ "role": "user", "content": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
        .expect(1)
        .mount(&server)
        .await;

    client.add_user_message("thread_abc", "Hello").await.unwrap();
}

#[tokio::test]
async fn test_create_run_uses_configured_assistant() {
    let (server, client) = client().await;

    Mock::given(method("POST"))
        .and(path("/threads/thread_abc/runs"))
        .and(body_json(json!({ "assistant_id": "asst_123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "object": "thread.run",
            "status": "queued"
        })))
        .mount(&server)
        .await;

    let run = client.create_run("thread_abc").await.unwrap();
    assert_eq!(run.id, "run_1");
    assert_eq!(run.status, RunStatus::Queued);
}

#[tokio::test]
async fn test_retrieve_run_reads_status_and_error() {
    let (server, client) = client().await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_abc/runs/run_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "run_1",
            "status": "failed",
            "last_error": { "code": "server_error", "message": "Something went wrong" }
        })))
        .mount(&server)
        .await;

    let run = client.retrieve_run("thread_abc", "run_1").await.unwrap();
    assert_eq!(run.status, RunStatus::Failed);
    assert_eq!(run.failure_detail(), "server_error: Something went wrong");
}

#[tokio::test]
async fn test_latest_message_requests_newest_first() {
    let (server, client) = client().await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_abc/messages"))
        .and(query_param("limit", "1"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{
                "id": "msg_2",
                "role": "assistant",
                "content": [{ "type": "text", "text": { "value": "Hi there", "annotations": [] } }]
            }]
        })))
        .mount(&server)
        .await;

    let message = client.latest_message("thread_abc").await.unwrap().unwrap();
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.content, vec![MessageContent::text("Hi there")]);
}

#[tokio::test]
async fn test_latest_message_empty_thread() {
    let (server, client) = client().await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_abc/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    assert!(client.latest_message("thread_abc").await.unwrap().is_none());
}

#[tokio::test]
async fn test_status_mapping() {
    let (server, client) = client().await;

    Mock::given(method("POST"))
        .and(path("/threads"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/threads"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/threads"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    assert_eq!(client.create_thread().await, Err(UpstreamError::AuthenticationFailed));
    assert_eq!(client.create_thread().await, Err(UpstreamError::RateLimitExceeded));
    assert_eq!(
        client.create_thread().await,
        Err(UpstreamError::Http {
            status: 500,
            body: "upstream exploded".to_string()
        })
    );
}

#[tokio::test]
async fn test_unparseable_body_is_invalid_response() {
    let (server, client) = client().await;

    Mock::given(method("POST"))
        .and(path("/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(client.create_thread().await, Err(UpstreamError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unexpected_message_role_surfaces_as_malformed_response() {
    let (server, client) = client().await;

    Mock::given(method("GET"))
        .and(path("/threads/thread_abc/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "msg_9",
                "role": "system",
                "content": [{ "type": "text", "text": { "value": "internal", "annotations": [] } }]
            }]
        })))
        .mount(&server)
        .await;

    let error = client.latest_message("thread_abc").await.unwrap_err();
    assert!(matches!(error, UpstreamError::InvalidResponse(_)));

    let error = ProxyError::from(error);
    assert!(matches!(error, ProxyError::MalformedUpstreamResponse { .. }));
    assert_eq!(error.public_message(), "Received an unexpected response from the assistant");
}

#[tokio::test]
async fn test_missing_credentials_never_reach_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = RealAssistantClient::new(server.uri(), None);
    assert!(!client.has_credentials());
    assert_eq!(client.create_thread().await, Err(UpstreamError::AuthenticationFailed));
    assert_eq!(client.create_run("thread_abc").await, Err(UpstreamError::AuthenticationFailed));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = RealAssistantClient::new("http://127.0.0.1:9", Some(credentials()));
    assert!(matches!(client.create_thread().await, Err(UpstreamError::Network(_))));
}
