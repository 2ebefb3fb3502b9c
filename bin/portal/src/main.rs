//! Portal - community portal list browser and fixture backend.
//!
//! # Usage
//!
//! ```bash
//! # Serve the fixture GraphQL backend
//! portal serve --port 4000
//!
//! # Browse a list from a running backend
//! PORTAL_ENDPOINT=http://localhost:4000/graphql portal browse opportunities --community neo88
//!
//! # Browse against an in-process fixture backend
//! portal browse reservations --community neo88 --user neo88-user-0 --embedded
//! ```

mod browse;
mod scroll;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal_client::{
    ClientConfig, GraphQlClient, Memberships, Opportunities, Reservations, Tickets, Transactions,
    Wallets,
};
use portal_core::metrics::init_metrics;
use portal_core::models::TenantScope;
use portal_core::ports::OpportunityFilter;
use portal_graphql::{ServerConfig, bind, build_schema, serve_listener, serve_with_shutdown};
use portal_presenters::{Locale, PresenterConfig};
use portal_storage::{FixtureConfig, seed};

use crate::browse::{BrowseOptions, BrowseSummary, browse};

/// Portal CLI - community portal lists.
#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(about = "Community portal list browser and fixture GraphQL backend")]
#[command(version)]
struct Cli {
    /// Prometheus metrics port.
    #[arg(long, env = "METRICS_PORT", global = true)]
    metrics_port: Option<u16>,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS", global = true)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the fixture GraphQL backend.
    Serve(ServeArgs),
    /// Page through one resource with a simulated scroll.
    Browse(BrowseArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Bind address.
    #[arg(long, env = "GRAPHQL_HOST", default_value = "0.0.0.0")]
    host: String,

    /// GraphQL server port.
    #[arg(long, env = "GRAPHQL_PORT", default_value = "4000")]
    port: u16,

    /// Disable the GraphiQL playground.
    #[arg(long)]
    no_playground: bool,

    /// Seeded rows per resource per community.
    #[arg(long, env = "FIXTURE_ROWS", default_value = "45")]
    rows: usize,
}

#[derive(Args, Debug)]
struct BrowseArgs {
    /// Resource to list.
    #[arg(value_enum)]
    resource: ResourceKind,

    /// Community to scope the list to.
    #[arg(long, env = "PORTAL_COMMUNITY")]
    community: String,

    /// Narrow user-owned resources to this user.
    #[arg(long, env = "PORTAL_USER")]
    user: Option<String>,

    /// GraphQL endpoint.
    #[arg(
        long,
        env = "PORTAL_ENDPOINT",
        default_value = "http://localhost:4000/graphql",
        conflicts_with = "embedded"
    )]
    endpoint: String,

    /// Start an in-process fixture backend and browse it.
    #[arg(long)]
    embedded: bool,

    /// Bearer token for the endpoint.
    #[arg(long, env = "PORTAL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Page size (clamped to 1..=100).
    #[arg(long, default_value = "20")]
    page_size: i32,

    /// Keyword filter (opportunities only).
    #[arg(long)]
    keyword: Option<String>,

    /// Simulated scroll pace in milliseconds.
    #[arg(long, default_value = "300")]
    scroll_interval_ms: u64,

    /// Stop after this many items.
    #[arg(long)]
    max_items: Option<usize>,

    /// Extra attempts for the first page.
    #[arg(long, default_value = "2")]
    retries: u32,

    /// Request timeout in seconds.
    #[arg(long, env = "PORTAL_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// Display language.
    #[arg(long, env = "PORTAL_LOCALE", default_value = "en")]
    locale: Locale,

    /// Display offset from UTC in minutes.
    #[arg(long, env = "PORTAL_UTC_OFFSET_MINUTES", default_value = "540", allow_hyphen_values = true)]
    utc_offset_minutes: i32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ResourceKind {
    Opportunities,
    Reservations,
    Transactions,
    Memberships,
    Tickets,
    Wallets,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    // Prometheus metrics exporter (optional - failures don't crash the app)
    let metrics_enabled = match cli.metrics_port {
        Some(port) => start_metrics(port),
        None => false,
    };

    match cli.command {
        Command::Serve(args) => run_serve(args, metrics_enabled).await,
        Command::Browse(args) => run_browse(args).await,
    }
}

fn start_metrics(port: u16) -> bool {
    match format!("0.0.0.0:{}", port).parse::<std::net::SocketAddr>() {
        Ok(metrics_addr) => match PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
        {
            Ok(()) => {
                init_metrics();
                true
            }
            Err(e) => {
                warn!("⚠️  Failed to start metrics exporter: {}. Continuing without metrics.", e);
                false
            }
        },
        Err(e) => {
            warn!("⚠️  Invalid metrics address: {}. Continuing without metrics.", e);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 🗄️ SERVE
// ─────────────────────────────────────────────────────────────────────────────

async fn run_serve(args: ServeArgs, metrics_enabled: bool) -> Result<()> {
    info!("🚀 Starting portal fixture backend");

    let fixtures = FixtureConfig {
        rows_per_resource: args.rows,
        ..Default::default()
    };
    let schema = build_schema(Arc::new(seed(&fixtures)));

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        enable_playground: !args.no_playground,
    };
    let port = config.port;

    info!("✅ Portal backend ready");
    info!("   ⚡ GraphQL:  http://localhost:{}/graphql", port);
    info!("   🏘️  Communities: {}", fixtures.communities.join(", "));
    if metrics_enabled {
        info!("   📊 Metrics:  enabled");
    } else {
        info!("   📊 Metrics:  disabled");
    }
    info!("   Press Ctrl+C to stop");

    serve_with_shutdown(schema, config, shutdown_signal())
        .instrument(info_span!("graphql"))
        .await
        .context("GraphQL server failed")?;

    info!("🛑 Shutdown complete");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// 📜 BROWSE
// ─────────────────────────────────────────────────────────────────────────────

async fn run_browse(args: BrowseArgs) -> Result<()> {
    if args.community.trim().is_empty() {
        bail!("--community must not be empty");
    }

    // Optional in-process backend on an ephemeral port
    let mut embedded: Option<(oneshot::Sender<()>, tokio::task::JoinHandle<()>)> = None;
    let endpoint = if args.embedded {
        let schema = build_schema(Arc::new(seed(&FixtureConfig::default())));
        let listener = bind(&ServerConfig::ephemeral())
            .await
            .context("Failed to bind embedded backend")?;
        let addr = listener.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(
            async move {
                let stop = async move {
                    let _ = rx.await;
                };
                if let Err(e) = serve_listener(schema, listener, false, stop).await {
                    error!(error = %e, "❌ Embedded backend error");
                }
                debug!("Embedded backend stopped");
            }
            .instrument(info_span!("embedded")),
        );
        embedded = Some((tx, handle));
        info!("🧪 Embedded fixture backend on {}", addr);
        format!("http://{}/graphql", addr)
    } else {
        args.endpoint.clone()
    };
    debug!(endpoint = %mask_password(&endpoint), "GraphQL endpoint");

    let client = Arc::new(
        GraphQlClient::new(ClientConfig {
            endpoint,
            timeout: Duration::from_secs(args.timeout_secs),
            bearer_token: args.token.clone(),
        })
        .context("Failed to build GraphQL client")?,
    );

    let scope = match &args.user {
        Some(user) => TenantScope::community(args.community.as_str()).with_user(user.as_str()),
        None => TenantScope::community(args.community.as_str()),
    };
    let options = BrowseOptions {
        page_size: args.page_size,
        scroll_interval: Duration::from_millis(args.scroll_interval_ms),
        max_items: args.max_items,
        retries: args.retries,
        presenter: PresenterConfig {
            locale: args.locale,
            utc_offset_minutes: args.utc_offset_minutes,
        },
    };

    let stop = shutdown_signal();
    let result = match args.resource {
        ResourceKind::Opportunities => {
            let filter = OpportunityFilter {
                keyword: args.keyword.clone(),
                ..Default::default()
            };
            browse::<Opportunities, _>(client, scope, filter, &options, stop).await
        }
        ResourceKind::Reservations => {
            browse::<Reservations, _>(client, scope, Default::default(), &options, stop).await
        }
        ResourceKind::Transactions => {
            browse::<Transactions, _>(client, scope, Default::default(), &options, stop).await
        }
        ResourceKind::Memberships => {
            browse::<Memberships, _>(client, scope, Default::default(), &options, stop).await
        }
        ResourceKind::Tickets => {
            browse::<Tickets, _>(client, scope, Default::default(), &options, stop).await
        }
        ResourceKind::Wallets => {
            browse::<Wallets, _>(client, scope, Default::default(), &options, stop).await
        }
    };

    if let Some((tx, handle)) = embedded {
        let _ = tx.send(());
        match tokio::time::timeout(Duration::from_secs(10), handle).await {
            Ok(_) => debug!("Embedded backend joined"),
            Err(_) => warn!("⚠️  Embedded backend shutdown timed out"),
        }
    }

    let summary: BrowseSummary = result?;
    info!(
        edges = summary.edges,
        rendered = summary.rendered,
        total = ?summary.total_count,
        loads = summary.sentinel.loads,
        "✅ Browse complete"
    );
    Ok(())
}

/// Initialize tracing subscriber.
///
/// Logs go to stderr so stdout carries only presented rows.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Mask credentials in an endpoint URL for logging.
fn mask_password(url_str: &str) -> String {
    match url::Url::parse(url_str) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "❌ Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "❌ Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
