// crates/skillswap-cli/src/main.rs
//
// CLI entrypoint for the SkillSwap registry.
//
// Provides subcommands for initializing local state, managing the wallet,
// listing and searching shared skills, submitting and rating skills, and
// an interactive shell that streams transaction and activity events.

mod commands;
mod config;
mod context;
mod output;

use clap::{Parser, Subcommand};
use commands::learn::LearnCmd;
use commands::list::ListCmd;
use commands::rate::RateCmd;
use commands::submit::SubmitCmd;
use commands::wallet::WalletCmd;
use config::{expand_tilde, CliConfig};
use context::Context;
use output::OutputFormat;

/// SkillSwap CLI: share skills, rate them, find someone to learn from.
#[derive(Parser, Debug)]
#[command(
    name = "skillswap",
    version = "0.1.0",
    about = "SkillSwap registry CLI for sharing and rating skills"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.skillswap/config.toml")]
    config: String,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the config file, data directory, and a wallet.
    Init,

    /// Wallet management: create, show.
    #[command(subcommand)]
    Wallet(WalletCmd),

    /// List shared skills, optionally searched and filtered.
    List(ListCmd),

    /// Per-category statistics.
    Stats,

    /// Share a new skill.
    Submit(SubmitCmd),

    /// Rate a shared skill from 1 to 5 stars.
    Rate(RateCmd),

    /// Ask to learn a shared skill.
    Learn(LearnCmd),

    /// Interactive session with live status and activity.
    Shell,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);

    // Load configuration from TOML file, falling back to defaults if the file
    // is not found.
    let (config, load_error) = match CliConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (CliConfig::default(), Some(e.to_string())),
    };

    // Initialize tracing subscriber for structured logging. RUST_LOG wins
    // over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match load_error {
        None => tracing::debug!("Loaded configuration from {}", config_path),
        Some(e) => tracing::debug!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let ctx = Context::new(config, format);

    match &cli.command {
        Commands::Init => commands::init::run(&ctx, &config_path).await?,
        Commands::Wallet(cmd) => commands::wallet::run(&ctx, cmd).await?,
        Commands::List(cmd) => commands::list::run(&ctx, cmd).await?,
        Commands::Stats => commands::stats::run(&ctx).await?,
        Commands::Submit(cmd) => commands::submit::run(&ctx, cmd).await?,
        Commands::Rate(cmd) => commands::rate::run(&ctx, cmd).await?,
        Commands::Learn(cmd) => commands::learn::run(&ctx, cmd).await?,
        Commands::Shell => commands::shell::run(&ctx).await?,
    }

    Ok(())
}
