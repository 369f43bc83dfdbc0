use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use fhircast_sdk::{ClientConfig, FhircastClient, SessionUpdate};

pub mod output;

use output::{OutputConfig, UpdateStats};

/// FHIRcast command line client
///
/// Discovers what a hub supports, subscribes to a topic over a WebSocket
/// channel and prints the notifications the hub sends. Parameters given on
/// the command line are remembered for the next run.
#[derive(Parser, Debug)]
#[command(name = "fhircast-client")]
#[command(about = "FHIRcast hub client - discover, subscribe and follow notifications")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Root URL of the FHIRcast hub
    #[arg(long, global = true)]
    pub hub_url: Option<String>,

    /// Topic (session identifier) to subscribe to
    #[arg(short, long, global = true)]
    pub topic: Option<String>,

    /// Bearer token sent to the hub
    #[arg(long, global = true)]
    pub bearer_token: Option<String>,

    /// Settings file (default: platform config directory)
    #[arg(long, global = true)]
    pub settings_file: Option<PathBuf>,

    /// Hub request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    pub request_timeout: u64,

    /// WebSocket connect timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    pub connect_timeout: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the hub's well-known configuration
    Discover,

    /// Subscribe and print notifications until interrupted or disconnected
    Listen {
        /// Requested lease in seconds (0 or less: let the hub decide)
        #[arg(short, long)]
        lease_seconds: Option<i64>,

        /// Name reported to the hub
        #[arg(long)]
        subscriber_name: Option<String>,

        /// Comma-separated events to subscribe to (must be supported by the hub)
        #[arg(short, long, value_delimiter = ',')]
        events: Vec<String>,

        /// Subscribe to every supported event
        #[arg(long, conflicts_with = "events")]
        all_events: bool,

        /// Stop after this many event messages
        #[arg(long)]
        max_events: Option<u64>,

        /// Keep at most this many events in the session history
        #[arg(long)]
        history_limit: Option<usize>,

        /// Print full context resources as JSON
        #[arg(long)]
        show_resources: bool,
    },

    /// Show the stored settings
    Settings {
        /// Switch between light and dark visual mode
        #[arg(long)]
        toggle_visual_mode: bool,
    },
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(anyhow::anyhow!("Request timeout must be positive"));
        }

        if self.connect_timeout == 0 {
            return Err(anyhow::anyhow!("Connect timeout must be positive"));
        }

        if let Command::Listen {
            max_events: Some(0),
            ..
        } = self.command
        {
            return Err(anyhow::anyhow!("Max events must be at least 1"));
        }

        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                    self.log_level
                ));
            }
        }

        Ok(())
    }

    /// Override arguments with FHIRCAST_* environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(hub_url) = std::env::var("FHIRCAST_HUB_URL") {
            self.hub_url = Some(hub_url);
        }

        if let Ok(topic) = std::env::var("FHIRCAST_TOPIC") {
            self.topic = Some(topic);
        }

        if let Ok(token) = std::env::var("FHIRCAST_BEARER_TOKEN") {
            self.bearer_token = Some(token);
        }

        if let Ok(path) = std::env::var("FHIRCAST_SETTINGS_FILE") {
            self.settings_file = Some(PathBuf::from(path));
        }

        if let Ok(timeout) = std::env::var("FHIRCAST_REQUEST_TIMEOUT") {
            self.request_timeout = timeout
                .parse()
                .context("Invalid FHIRCAST_REQUEST_TIMEOUT environment variable")?;
        }

        if let Ok(timeout) = std::env::var("FHIRCAST_CONNECT_TIMEOUT") {
            self.connect_timeout = timeout
                .parse()
                .context("Invalid FHIRCAST_CONNECT_TIMEOUT environment variable")?;
        }

        if let Ok(log_level) = std::env::var("FHIRCAST_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Command::Listen { lease_seconds, .. } = &mut self.command {
            if let Ok(lease) = std::env::var("FHIRCAST_LEASE_SECONDS") {
                *lease_seconds = Some(
                    lease
                        .parse()
                        .context("Invalid FHIRCAST_LEASE_SECONDS environment variable")?,
                );
            }
        }

        Ok(())
    }

    /// Client configuration for these arguments
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .with_request_timeout(Duration::from_secs(self.request_timeout))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout));

        if let Some(path) = &self.settings_file {
            config = config.with_settings_path(path.clone());
        }

        if let Command::Listen {
            history_limit: Some(limit),
            ..
        } = self.command
        {
            config = config.with_event_history_limit(limit);
        }

        config
    }
}

/// Initialize tracing/logging with the specified log level
fn init_tracing(log_level: &str) {
    let filter = match log_level.to_lowercase().as_str() {
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Print help information about environment variables
fn print_env_help() {
    println!("Environment Variables:");
    println!("  FHIRCAST_HUB_URL            Root URL of the hub");
    println!("  FHIRCAST_TOPIC              Topic to subscribe to");
    println!("  FHIRCAST_BEARER_TOKEN       Bearer token sent to the hub");
    println!("  FHIRCAST_LEASE_SECONDS      Requested lease in seconds (listen)");
    println!("  FHIRCAST_SETTINGS_FILE      Settings file location");
    println!("  FHIRCAST_REQUEST_TIMEOUT    Hub request timeout in seconds (default: 10)");
    println!("  FHIRCAST_CONNECT_TIMEOUT    WebSocket connect timeout in seconds (default: 10)");
    println!("  FHIRCAST_LOG_LEVEL          Log level (default: info)");
    println!("  RUST_LOG                    Overrides the log filter entirely");
    println!();
}

/// Apply the connection parameters given on the command line
fn apply_overrides(client: &mut FhircastClient, args: &Args) {
    let params = client.parameters_mut();

    if let Some(hub_url) = &args.hub_url {
        params.hub_url = hub_url.clone();
    }
    if let Some(topic) = &args.topic {
        params.topic = topic.clone();
    }
    if let Some(token) = &args.bearer_token {
        params.bearer_token = token.clone();
    }

    if let Command::Listen {
        lease_seconds,
        subscriber_name,
        ..
    } = &args.command
    {
        if let Some(lease) = lease_seconds {
            params.lease_seconds = *lease;
        }
        if let Some(name) = subscriber_name {
            params.subscriber_name = name.clone();
        }
    }
}

async fn run_discover(client: &mut FhircastClient) -> Result<()> {
    let capabilities = client
        .load_capabilities()
        .await
        .context("Failed to load the hub's well-known configuration")?;

    println!("{}", capabilities.to_pretty_json());
    println!();
    println!("{}", output::format_selection(&client.parameters().events));
    Ok(())
}

async fn run_listen(
    client: &mut FhircastClient,
    events: &[String],
    all_events: bool,
    max_events: Option<u64>,
    output: &OutputConfig,
) -> Result<()> {
    client
        .load_capabilities()
        .await
        .context("Failed to load the hub's well-known configuration")?;

    let selection = &mut client.parameters_mut().events;
    if all_events {
        selection.set_all(true);
    } else if !events.is_empty() {
        selection.set_all(false);
        for event in events {
            if !selection.set(event.trim(), true) {
                warn!("Hub does not support event '{}', skipping", event.trim());
            }
        }
    }

    if !client.parameters().events.has_selection() {
        warn!("No events selected; the hub decides what to send");
    }

    let address = client
        .subscribe()
        .await
        .context("Failed to subscribe to the hub")?;
    info!("Listening on {} (press Ctrl+C to stop)", address);

    let mut stats = UpdateStats::default();
    loop {
        tokio::select! {
            update = client.next_update() => {
                let Some(update) = update else {
                    break;
                };
                stats.update(&update);
                output::print_update(&update, output);

                if matches!(update, SessionUpdate::Disconnected(_)) {
                    break;
                }
                if max_events.is_some_and(|max| stats.events >= max) {
                    info!("Received {} event(s), stopping", stats.events);
                    let _ = client.unsubscribe().await;
                    client.disconnect();
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, unsubscribing");
                let _ = client.unsubscribe().await;
                client.disconnect();
                break;
            }
        }
    }

    info!("{}", stats.summary());
    info!(
        "Session history: {} event(s), {} discarded frame(s)",
        client.session().history().event_count(),
        client.session().discarded_frames()
    );
    Ok(())
}

fn run_settings(client: &mut FhircastClient, toggle: bool) {
    if toggle {
        client.toggle_visual_mode();
    }

    if !client.store().is_available() {
        warn!("Settings store is unavailable; nothing is persisted");
    }
    println!("{}", output::format_settings(client.parameters(), client.visual_mode()));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let mut args = Args::parse();
    if let Err(e) = args.apply_env().and_then(|_| args.validate()) {
        eprintln!("Configuration error: {}", e);
        print_env_help();
        std::process::exit(1);
    }

    init_tracing(&args.log_level);

    let mut client = FhircastClient::new(args.client_config())
        .context("Failed to create FHIRcast client")?;
    apply_overrides(&mut client, &args);

    match &args.command {
        Command::Discover => run_discover(&mut client).await,
        Command::Listen {
            events,
            all_events,
            max_events,
            show_resources,
            ..
        } => {
            let output = OutputConfig {
                show_resources: *show_resources,
            };
            run_listen(&mut client, events, *all_events, *max_events, &output).await
        }
        Command::Settings { toggle_visual_mode } => {
            run_settings(&mut client, *toggle_visual_mode);
            Ok(())
        }
    }
}
