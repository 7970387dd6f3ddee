use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wallpaper_agent::{
    application::{
        dto::{BlobInfo, Upload},
        ports::{ActivePointer, BlobBackend, HostsError, HostsFile},
        retention::RetentionSweeper,
        use_cases::{ContentStore, HostsReconciler, UsageTracker},
    },
    config::LogFormat,
    domain::value_objects::BlobId,
    infrastructure::{
        hosts::FsHostsFile, persistence::PostgresBlobBackend, pointer::FileActivePointer,
    },
    Config,
};

/// Exit status when the hosts file needs elevated rights (EX_NOPERM)
const EXIT_NO_PERMISSION: u8 = 77;

#[derive(Parser)]
#[command(name = "wallpaper-agent", version, about = "Wallpaper agent core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the retention sweeper until Ctrl-C
    Run,
    /// Run a single retention sweep
    Sweep,
    /// Store an image
    Put {
        file: PathBuf,
        #[arg(long)]
        mime: Option<String>,
    },
    /// Write a stored image to a file
    Get { id: BlobId, out: PathBuf },
    /// Show metadata of a stored image
    Info { id: BlobId },
    /// Delete a stored image
    Delete { id: BlobId },
    /// Manage the hosts-file blocklist
    Hosts {
        #[command(subcommand)]
        command: HostsCommand,
    },
}

#[derive(Subcommand)]
enum HostsCommand {
    /// Redirect domains to the blocking address
    Block {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// Remove every hosts line mentioning the domains
    Unblock {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// List blocked domains
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(config.log_format);

    match execute(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(HostsError::PermissionDenied { path }) = e.downcast_ref::<HostsError>() {
                eprintln!(
                    "Permission denied on {}. Re-run as administrator (Windows) or root (sudo).",
                    path.display()
                );
                return ExitCode::from(EXIT_NO_PERMISSION);
            }
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn execute(command: Command, config: Config) -> Result<()> {
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    match command {
        Command::Hosts { command } => execute_hosts(command, &config).await,
        Command::Run => run_until_ctrl_c(build_sweeper(&config).await?).await,
        Command::Sweep => {
            let report = build_sweeper(&config)
                .await?
                .sweep_once()
                .await
                .context("Retention sweep failed")?;
            println!("{}", report.summary());
            for e in &report.errors {
                println!("  {}", e);
            }
            Ok(())
        }
        Command::Put { file, mime } => {
            let store = ContentStore::new(open_backend(&config).await?);
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut upload = Upload::new(data);
            if let Some(mime) = mime {
                upload = upload.with_mime_type(mime);
            }
            if let Some(name) = file.file_name() {
                upload = upload.with_original_name(name.to_string_lossy());
            }

            let outcome = store.put(upload).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Get { id, out } => {
            let store = ContentStore::new(open_backend(&config).await?);
            let content = store.get(&id).await?;
            tokio::fs::write(&out, &content.data)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(%id, bytes = content.data.len(), out = %out.display(), "Blob written");
            Ok(())
        }
        Command::Info { id } => {
            let store = ContentStore::new(open_backend(&config).await?);
            let record = store.info(&id).await?;
            println!("{}", serde_json::to_string_pretty(&BlobInfo::from(&record))?);
            Ok(())
        }
        Command::Delete { id } => {
            let store = ContentStore::new(open_backend(&config).await?);
            store.delete(&id).await?;
            println!("Deleted {}", id);
            Ok(())
        }
    }
}

async fn execute_hosts(command: HostsCommand, config: &Config) -> Result<()> {
    let file: Arc<dyn HostsFile> = Arc::new(FsHostsFile::new(&config.hosts_path));
    let reconciler = HostsReconciler::new(file, config.redirect_ip);

    match command {
        HostsCommand::Block { domains } => {
            let added = reconciler.block(&domains).await?;
            println!("Blocked {} new domain(s)", added);
        }
        HostsCommand::Unblock { domains } => {
            let removed = reconciler.unblock(&domains).await?;
            println!("Removed {} line(s)", removed);
        }
        HostsCommand::List => {
            for host in reconciler.list().await? {
                println!("{}", host);
            }
        }
    }
    Ok(())
}

async fn build_sweeper(config: &Config) -> Result<Arc<RetentionSweeper>> {
    let backend = open_backend(config).await?;
    let store = Arc::new(ContentStore::new(Arc::clone(&backend)));
    let pointer: Arc<dyn ActivePointer> = Arc::new(FileActivePointer::in_dir(&config.state_dir));
    let tracker = Arc::new(UsageTracker::new(Arc::clone(&backend), pointer));
    Ok(Arc::new(RetentionSweeper::new(
        backend,
        store,
        tracker,
        config.retention(),
    )))
}

async fn open_backend(config: &Config) -> Result<Arc<dyn BlobBackend>> {
    let pool = connect(config).await?;
    Ok(Arc::new(PostgresBlobBackend::new(pool)))
}

async fn connect(config: &Config) -> Result<PgPool> {
    info!("Connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    info!("Running database migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

async fn run_until_ctrl_c(sweeper: Arc<RetentionSweeper>) -> Result<()> {
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(Arc::clone(&sweeper).run(shutdown.clone()));
    info!(
        days_to_keep = sweeper.config().retention_days,
        "Wallpaper agent running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutdown requested");
    shutdown.cancel();
    handle.await.context("Retention sweeper task panicked")?;
    Ok(())
}
