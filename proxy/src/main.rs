//! Proxy entry point

use std::sync::Arc;

use clap::Parser;
use shared::{Component, component_info, component_warn, logging};

use proxy::{
    Args, CredentialSource, ProxyConfig, ProxyResult, ProxyServer, RealAssistantClient, RealCredentialSource,
    SystemClock, TokioSleeper,
};

#[tokio::main]
async fn main() -> ProxyResult<()> {
    // Load .env before clap reads environment fallbacks
    let _ = dotenv::dotenv();
    let args = Args::parse();

    Component::init_proxy();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = ProxyConfig::try_from(args)?;
    logging::log_startup(Component::current(), &format!("assistant proxy on {}", config.bind_address));

    // Missing credentials do not abort startup; requests answer 401 instead
    let credentials = match RealCredentialSource::new().load().await {
        Ok(credentials) => {
            component_info!(
                Component::current(),
                assistant_id = %credentials.assistant_id,
                "Assistant credentials loaded"
            );
            Some(credentials)
        }
        Err(missing) => {
            component_warn!(Component::current(), "⚠️ {}; requests will be rejected", missing);
            None
        }
    };

    let assistant = Arc::new(RealAssistantClient::new(config.upstream_url.clone(), credentials));
    let server = ProxyServer::new(&config, assistant, Arc::new(TokioSleeper), Arc::new(SystemClock));

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logging::log_shutdown(Component::current(), "received Ctrl+C");
            shutdown.cancel();
        }
    });

    if let Err(e) = server.run().await {
        logging::log_error(Component::current(), "Proxy server", &e);
        return Err(e);
    }

    component_info!(Component::current(), "Proxy stopped");
    Ok(())
}
