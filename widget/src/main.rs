//! Terminal host for the chat widget
//!
//! Reads lines from stdin. Plain lines are sent as messages; `/theme`,
//! `/toggle`, `/dismiss`, `/reset`, `/export [text|json]` and `/quit` map to
//! the matching widget events.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use shared::{Component, WidgetConfig, component_warn, logging};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use widget::{
    Event, ExportFormat, ExportSink, FileExportSink, HttpProxyClient, JsonFileStore, KeyValueStore, MemoryStore,
    ProxyApi, WidgetRuntime,
};

#[derive(Parser, Debug)]
#[command(name = "widget")]
#[command(about = "Chat widget running in the terminal")]
struct Args {
    /// Encoded widget configuration (the `config` query parameter value)
    #[arg(long, env = "WIDGET_CONFIG")]
    config: Option<String>,

    /// Embed script URL carrying a `config` query parameter
    #[arg(long, conflicts_with = "config")]
    script_url: Option<String>,

    /// Override the proxy URL from the configuration
    #[arg(long, env = "WIDGET_API_URL")]
    api_url: Option<String>,

    /// JSON file used as persistent storage (in-memory when omitted)
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Directory receiving conversation exports
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Disable ANSI colours
    #[arg(long)]
    no_color: bool,
}

enum Command {
    Event(Event),
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Command::Event(Event::Submit(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "exit"), _) => Command::Quit,
        (Some("theme"), _) => Command::Event(Event::ToggleTheme),
        (Some("toggle"), _) => Command::Event(Event::ToggleWindow),
        (Some("dismiss"), _) => Command::Event(Event::DismissError),
        (Some("reset"), _) => Command::Event(Event::ResetSession),
        (Some("export"), format) => match format.map(str::parse::<ExportFormat>).unwrap_or(Ok(ExportFormat::Text)) {
            Ok(format) => Command::Event(Event::ExportRequested(format)),
            Err(e) => Command::Unknown(e),
        },
        _ => Command::Unknown(format!("unknown command '{trimmed}'")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    Component::init_widget();
    logging::init_tracing_with_level(Some(&args.log_level));

    let mut config = match (&args.config, &args.script_url) {
        (_, Some(script_url)) => WidgetConfig::from_script_url(script_url),
        (config, None) => WidgetConfig::from_query_param(config.as_deref()),
    };
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }

    let store: Arc<dyn KeyValueStore> = match &args.storage {
        Some(path) => Arc::new(
            JsonFileStore::open(path).with_context(|| format!("opening storage file {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    };

    let proxy = Arc::new(HttpProxyClient::new(config.api_url.clone()));
    let exports = Arc::new(FileExportSink::new(args.export_dir));
    let color = !args.no_color;

    let mut runtime = WidgetRuntime::new(config, proxy, exports, store);
    runtime.mount();
    runtime.dispatch(Event::ToggleWindow);

    let stdin = BufReader::new(tokio::io::stdin());
    run_session(&mut runtime, stdin, &mut std::io::stdout(), color).await?;

    logging::log_shutdown(Component::current(), "input closed");
    Ok(())
}

/// Render, then feed input lines and effect outcomes to the runtime as they
/// arrive. Input stays live while effects are in flight; the state machine
/// itself ignores submits during a send.
async fn run_session<P, E, R>(
    runtime: &mut WidgetRuntime<P, E>,
    input: R,
    out: &mut impl Write,
    color: bool,
) -> anyhow::Result<()>
where
    P: ProxyApi + 'static,
    E: ExportSink + 'static,
    R: AsyncBufRead + Unpin,
{
    write!(out, "{}", runtime.render(color))?;

    let mut lines = input.lines();
    loop {
        let busy = runtime.in_flight() > 0;
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading input")? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Unknown(message) => {
                        component_warn!(Component::current(), "{}", message);
                        continue;
                    }
                    Command::Event(event) => runtime.dispatch(event),
                }
            }
            _ = runtime.step(), if busy => {}
        }
        write!(out, "{}", runtime.render(color))?;
    }

    Ok(())
}
