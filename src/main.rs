use ago_backup::cli::{Cli, Commands};
use ago_backup::config::{load_config_or_default, BackupConfig};
use ago_backup::core::backup::{InterruptAction, ShutdownHandle};
use ago_backup::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Loaded up front for logging; commands that need it report a load error
    let loaded = load_config_or_default(cli.config_path(), cli.config_is_explicit());

    let (log_level, logging_config) = match &loaded {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            Default::default(),
        ),
    };

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "ago-backup - ArcGIS Online content backup"
    );

    // Graceful shutdown only applies while items are exporting
    let (shutdown_tx, shutdown) = ShutdownHandle::channel();
    let observer = shutdown.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C)");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            tracing::info!("Received SIGINT (Ctrl+C)");
        }

        if observer.interrupt_action() == InterruptAction::ExitNow {
            eprintln!("\nInterrupted");
            process::exit(130);
        }

        tracing::info!("Initiating graceful shutdown...");
        eprintln!("\n⚠️  Shutdown signal received, finishing the current item...");
        eprintln!("   Press Ctrl+C again to exit immediately");
        let _ = shutdown_tx.send(true);

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt received, exiting");
            process::exit(130);
        }
    });

    let exit_code = match execute_command(&cli, loaded, shutdown).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    loaded: ago_backup::domain::Result<BackupConfig>,
    shutdown: ShutdownHandle,
) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => return args.execute().await,
        Commands::ValidateConfig(args) => {
            return args
                .execute(cli.config_path(), cli.config_is_explicit())
                .await
        }
        _ => {}
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("❌ {e}");
            return Ok(2);
        }
    };

    match &cli.command {
        Commands::Backup(args) => args.execute(&config, shutdown).await,
        Commands::BackupIds(args) => args.execute(&config, shutdown).await,
        Commands::List(args) => args.execute(&config).await,
        Commands::ValidateConfig(_) | Commands::Init(_) => Ok(0),
    }
}
