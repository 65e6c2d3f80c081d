//! suyan-host - SuYan input method server
//!
//! Entry point for the long-lived server process: loads `config.yaml`,
//! starts the clipboard pipeline, and accepts IPC connections from the
//! platform text-service client over a named pipe.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use suyan_host::clipboard::{ClipboardController, ClipboardEvent};
use suyan_host::config::Config;
use suyan_host::ipc::server::{serve_connection, EngineSessionFactory};
use suyan_host::session::engine::{EngineSession, NullEngine};
use suyan_host::session::registry::SessionRegistry;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for suyan-host.
#[derive(Parser, Debug)]
#[command(name = "suyan-host")]
#[command(version, about = "SuYan input method server", long_about = None)]
pub struct Args {
    /// Data directory holding config.yaml, clipboard.db, and clipboard assets.
    #[arg(long, env = "SUYAN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (pretty|json|compact).
    #[arg(long, default_value = "pretty")]
    pub log_format: String,
}

struct NullEngineFactory;

impl EngineSessionFactory for NullEngineFactory {
    fn create(&self) -> Box<dyn EngineSession> {
        Box::new(NullEngine)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_date = env!("BUILD_DATE"),
        "starting suyan-host"
    );

    let data_dir = match &args.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create data directory: {}", dir.display()))?;
            dir.clone()
        }
        None => suyan_host::config::data_dir()?,
    };

    let config_path = data_dir.join("config.yaml");
    let config = Config::load(&config_path)
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to load config.yaml, using defaults");
            Config::default()
        })
        .with_data_dir(&data_dir);
    info!(data_dir = %data_dir.display(), "configuration loaded");

    let registry = Arc::new(SessionRegistry::new());
    let factory: Arc<dyn EngineSessionFactory> = Arc::new(NullEngineFactory);

    let clipboard_dir = data_dir.clone();
    let clipboard_config = config.clipboard.clone();
    let clipboard_logger: Box<dyn Fn(ClipboardEvent) + Send + Sync> =
        Box::new(|event| debug!(?event, "clipboard event"));
    let _clipboard = ClipboardController::spawn(
        &clipboard_dir,
        clipboard_config,
        Box::new(suyan_host::clipboard::monitor::NullMonitor::new()),
        vec![clipboard_logger],
    )
    .context("failed to start clipboard pipeline")?;

    #[cfg(windows)]
    {
        run_pipe_server(registry, factory).await?;
    }

    #[cfg(not(windows))]
    {
        let _ = (registry, factory);
        warn!("named-pipe IPC is only implemented for windows; idling until shutdown signal");
    }

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received, exiting");

    Ok(())
}

#[cfg(windows)]
async fn run_pipe_server(
    registry: Arc<SessionRegistry>,
    factory: Arc<dyn EngineSessionFactory>,
) -> Result<()> {
    use suyan_host::ipc::transport::named_pipe::create_pipe_instance;
    use suyan_host::ipc::transport::FramedConnection;

    let mut first = true;
    loop {
        let server = create_pipe_instance(first).context("failed to create named pipe instance")?;
        first = false;

        server
            .connect()
            .await
            .context("failed to accept named pipe connection")?;

        let registry = registry.clone();
        let factory = factory.clone();
        tokio::spawn(async move {
            let shutdown = serve_connection(FramedConnection::new(server), registry, factory).await;
            if shutdown {
                info!("shutdown requested over ipc");
                std::process::exit(0);
            }
        });
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let log_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("suyan_host={log_level},warn")));

    match args.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

#[allow(dead_code)]
fn log_startup_error(err: &anyhow::Error) {
    error!("{}", suyan_host::utils::format_user_error(err));
}
