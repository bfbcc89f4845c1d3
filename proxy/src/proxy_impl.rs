//! Main proxy server implementation
//!
//! Wires the conversation service, the rate limiter and the HTTP routes
//! together using dependency injection over the assistant client and sleeper.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use shared::{Component, component_info, logging};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::core::{ConversationService, RateLimiter};
use crate::error::{ProxyError, ProxyResult};
use crate::services::spawn_rate_limit_sweeper;
use crate::state::AppState;
use crate::traits::{AssistantApi, Clock, Sleeper};
use crate::web::{create_session, create_thread, health_check, send_message};

/// Request bodies above this size are rejected before parsing
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Proxy server with dependency injection
pub struct ProxyServer<A, S> {
    state: AppState<A, S>,
    bind_address: SocketAddr,
    sweep_interval: Duration,
}

impl<A, S> ProxyServer<A, S>
where
    A: AssistantApi + 'static,
    S: Sleeper + 'static,
{
    /// Create a new proxy server
    pub fn new(config: &ProxyConfig, assistant: Arc<A>, sleeper: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let conversation = ConversationService::new(assistant, sleeper, config.poll_policy);

        let state = AppState {
            conversation: Arc::new(conversation),
            rate_limiter: Arc::new(RateLimiter::new(clock)),
            rate_limits: config.rate_limits,
            max_message_chars: config.max_message_chars,
            shutdown: CancellationToken::new(),
            started_at: Instant::now(),
        };

        Self {
            state,
            bind_address: config.bind_address,
            sweep_interval: config.sweep_interval,
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/api/sessions", post(create_session::<A, S>))
            .route("/api/threads", post(create_thread::<A, S>))
            .route("/api/messages", post(send_message::<A, S>))
            .route("/health", get(health_check::<A, S>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    // The widget is embedded on arbitrary third-party origins
                    .layer(CorsLayer::permissive())
                    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Cancelling this token stops the server and every in-flight poll
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
    }

    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        self.state.rate_limiter.clone()
    }

    /// Bind and serve until the shutdown token is cancelled
    pub async fn run(&self) -> ProxyResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|e| ProxyError::ServerStartup(format!("Failed to bind to {}: {}", self.bind_address, e)))?;

        let sweeper = spawn_rate_limit_sweeper(
            self.state.rate_limiter.clone(),
            self.sweep_interval,
            self.state.shutdown.clone(),
        );

        logging::log_success(
            Component::current(),
            &format!("Proxy listening on http://{}", self.bind_address),
        );

        let shutdown = self.state.shutdown.clone();
        let served = axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;

        // A serve error must still stop the sweeper
        self.state.shutdown.cancel();
        if let Err(e) = sweeper.await {
            component_info!(Component::current(), error = %e, "Sweeper task ended abnormally");
        }

        served.map_err(ProxyError::IoError)
    }
}
