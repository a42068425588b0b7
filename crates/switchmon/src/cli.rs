//! Clap derive structures for the `switchmon` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// switchmon -- SwitchBot sensor exporter
#[derive(Debug, Parser)]
#[command(
    name = "switchmon",
    version,
    about = "Export SwitchBot temperature and humidity readings",
    long_about = "Polls the SwitchBot cloud API and serves the device listing as JSON\n\
        and sensor readings as Prometheus gauges.\n\n\
        Credentials are read from SWITCHBOT_TOKEN and SWITCHBOT_SECRET\n\
        (a .env file in the working directory is honored).",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to a TOML config file
    #[arg(long, short = 'c', env = "SWITCHMON_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP exporter (default)
    Serve(ServeArgs),

    /// Refresh the device list and print it as JSON
    #[command(alias = "dev")]
    Devices,

    /// Print the current reading of every sensor device
    Status,

    /// Print the effective settings as TOML (credentials omitted)
    Config,
}

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Listen address (overrides listen.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides listen.port)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["switchmon"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_overrides_and_globals() {
        let cli =
            Cli::try_parse_from(["switchmon", "serve", "--port", "9100", "-vv", "--log-format", "json"])
                .unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.log_format, LogFormat::Json);
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(9100));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
