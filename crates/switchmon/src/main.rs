mod cli;
mod error;
mod output;
mod server;

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use switchmon_config::ConfigError;
use switchmon_core::Controller;

use crate::cli::{Cli, Command, LogFormat, ServeArgs};
use crate::error::CliError;
use crate::server::AppState;

#[tokio::main]
async fn main() {
    // .env first so env-backed flags can come from it
    let dotenv = switchmon_config::load_dotenv();

    let cli = Cli::parse();
    init_tracing(cli.global.verbose, cli.global.log_format);

    if let Err(err) = run(cli, dotenv).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, format: LogFormat) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli, dotenv: Result<Option<PathBuf>, ConfigError>) -> Result<(), CliError> {
    if let Some(path) = dotenv? {
        debug!(path = %path.display(), "loaded .env");
    }
    let config_file = cli.global.config.as_deref();

    match cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    {
        Command::Serve(args) => serve(config_file, args).await,

        Command::Devices => {
            let controller = build_controller(config_file)?;
            controller.refresh_devices().await?;
            let listing = output::device_listing_json(&controller.devices_snapshot())?;
            println!("{listing}");
            Ok(())
        }

        Command::Status => {
            let controller = build_controller(config_file)?;
            controller.refresh_devices().await?;
            let report = controller
                .sensor_readings(&controller.fetch_context())
                .await;
            print!("{}", output::status_lines(&report));
            if !report.errors.is_empty() {
                warn!(failures = report.errors.len(), "some devices returned no reading");
            }
            Ok(())
        }

        // Needs no credentials
        Command::Config => {
            let settings = switchmon_config::load_settings(config_file)?;
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

fn build_controller(config_file: Option<&Path>) -> Result<Controller, CliError> {
    let config = switchmon_config::load(config_file)?;
    Ok(Controller::new(config.to_controller_config()?)?)
}

/// Run the exporter until Ctrl-C or SIGTERM.
async fn serve(config_file: Option<&Path>, args: ServeArgs) -> Result<(), CliError> {
    let config = switchmon_config::load(config_file)?;
    let mut listen = config.settings.listen.clone();
    if let Some(host) = args.host {
        listen.host = host;
    }
    if let Some(port) = args.port {
        listen.port = port;
    }

    let controller = Controller::new(config.to_controller_config()?)?;
    let state = AppState::new(controller.clone(), config.settings.exposition_options())?;

    let listener = TcpListener::bind((listen.host.as_str(), listen.port))
        .await
        .map_err(|source| CliError::Bind {
            addr: format!("{}:{}", listen.host, listen.port),
            source,
        })?;

    controller.start().await;

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let result = server::serve(listener, state, shutdown).await;
    controller.shutdown().await;
    info!("switchmon stopped");
    result.map_err(CliError::from)
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
    shutdown.cancel();
}
