//! Proxy configuration
//!
//! Every setting is a command line flag with an environment fallback.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::core::MAX_MESSAGE_CHARS;
use crate::error::{ProxyError, ProxyResult};
use crate::services::{DEFAULT_BASE_URL, DEFAULT_SWEEP_INTERVAL};
use crate::types::{PollPolicy, RateBudget, RateLimits};

/// Command line arguments for the proxy binary
#[derive(Parser, Debug, Clone)]
#[command(name = "proxy")]
#[command(about = "Backend proxy between the chat widget and the assistant provider")]
pub struct Args {
    /// Bind host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Assistants API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub upstream_url: String,

    /// Session creations allowed per client per window
    #[arg(long, env = "SESSION_RATE_LIMIT", default_value = "100")]
    pub session_limit: u32,

    /// Messages allowed per client per window
    #[arg(long, env = "MESSAGE_RATE_LIMIT", default_value = "30")]
    pub message_limit: u32,

    /// Rate limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value = "60")]
    pub window_secs: u64,

    /// Interval between sweeps of expired rate limit records, in seconds
    #[arg(long, env = "RATE_LIMIT_SWEEP_SECS", default_value = "60")]
    pub sweep_secs: u64,

    /// Delay between run status checks, in milliseconds
    #[arg(long, env = "POLL_INTERVAL_MS", default_value = "500")]
    pub poll_interval_ms: u64,

    /// Run status checks before giving up
    #[arg(long, env = "POLL_MAX_ATTEMPTS", default_value = "60")]
    pub poll_max_attempts: u32,

    /// Maximum message length in characters
    #[arg(long, env = "MAX_MESSAGE_CHARS", default_value = "4000")]
    pub max_message_chars: usize,
}

/// Resolved proxy settings
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    pub bind_address: SocketAddr,
    pub log_level: String,
    pub upstream_url: String,
    pub rate_limits: RateLimits,
    pub sweep_interval: Duration,
    pub poll_policy: PollPolicy,
    pub max_message_chars: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: "info".to_string(),
            upstream_url: DEFAULT_BASE_URL.to_string(),
            rate_limits: RateLimits::default(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            poll_policy: PollPolicy::default(),
            max_message_chars: MAX_MESSAGE_CHARS,
        }
    }
}

impl TryFrom<Args> for ProxyConfig {
    type Error = ProxyError;

    fn try_from(args: Args) -> ProxyResult<Self> {
        let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
            .parse()
            .map_err(|e| ProxyError::config(format!("Invalid bind address {}:{}: {}", args.host, args.port, e)))?;

        if args.window_secs == 0 {
            return Err(ProxyError::config("Rate limit window must be at least one second"));
        }
        if args.sweep_secs == 0 {
            return Err(ProxyError::config("Sweep interval must be at least one second"));
        }
        if args.poll_max_attempts == 0 {
            return Err(ProxyError::config("Poll attempt cap must be positive"));
        }
        if args.max_message_chars == 0 {
            return Err(ProxyError::config("Message length cap must be positive"));
        }

        let window = Duration::from_secs(args.window_secs);

        Ok(Self {
            bind_address,
            log_level: args.log_level,
            upstream_url: args.upstream_url,
            rate_limits: RateLimits {
                sessions: RateBudget {
                    limit: args.session_limit,
                    window,
                },
                messages: RateBudget {
                    limit: args.message_limit,
                    window,
                },
            },
            sweep_interval: Duration::from_secs(args.sweep_secs),
            poll_policy: PollPolicy {
                interval: Duration::from_millis(args.poll_interval_ms),
                max_attempts: args.poll_max_attempts,
            },
            max_message_chars: args.max_message_chars,
        })
    }
}
