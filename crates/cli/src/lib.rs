pub mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use restock_core::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "restock",
    about = "Deterministic inventory reorder toolkit",
    long_about = "Compute recommended order quantities and replay inventory levels from \
                  configured policy parameters.",
    after_help = "Examples:\n  restock recommend --json\n  restock recommend --daily-usage 50 --pending-line PO-1001=12\n  restock replay --num-days 14\n  restock config"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Path to a restock.toml config file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute the recommended order quantity for the configured item")]
    Recommend(commands::recommend::RecommendArgs),
    #[command(about = "Replay inventory day by day under the configured reorder rules")]
    Replay(commands::replay::ReplayArgs),
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.config.as_deref());

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(cli.config.as_deref(), &args),
        Command::Replay(args) => commands::replay::run(cli.config.as_deref(), &args),
        Command::Config => commands::config::run(cli.config.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

// Logging comes up before command dispatch. A broken config still gets
// readable output, so loader failures fall back to the defaults here and are
// reported by the command itself.
fn init_logging(config_path: Option<&Path>) {
    use tracing::Level;

    let logging = AppConfig::load(LoadOptions {
        config_path: config_path.map(Path::to_path_buf),
        ..LoadOptions::default()
    })
    .map(|config| config.logging)
    .unwrap_or_else(|_| AppConfig::default().logging);

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let _ = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
