use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::context::AppContext;
use commands::submit::ModelEntry;

#[derive(Parser)]
#[command(name = "posm-survey")]
#[command(about = "POSM survey client - record point-of-sale material at retail stores", long_about = None)]
struct Cli {
    /// Directory holding config.toml and session.json
    #[arg(long, global = true, env = "POSM_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Backend origin, overrides the configuration
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cached session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Check the cached session against the server
    Verify,
    /// Sign out and wipe cached credentials
    Logout,
    /// Search stores by name or id
    Stores { query: String },
    /// Search model names
    Models { query: String },
    /// Record and submit a survey
    Submit {
        /// Store id, or a query that matches exactly one store
        #[arg(long)]
        store: String,

        /// `model=X100;posm=all;image=shelf.jpg[;qty=2][;source=camera]`,
        /// `posm` takes `all` or comma-separated POSM codes
        #[arg(long = "entry", required = true)]
        entries: Vec<ModelEntry>,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store a session issued by the login page (JSON with accessToken,
    /// refreshToken and user)
    Import { file: PathBuf },
    /// Print the signed-in user
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.config_dir.as_deref(), cli.base_url)?;
    init_tracing(&ctx.config.log_level, ctx.config.log_json);
    tracing::debug!(base_url = %ctx.config.base_url, "configuration loaded");

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Import { file } => commands::session::import(&ctx, &file).await?,
            SessionAction::Show => commands::session::show(&ctx).await?,
        },
        Commands::Verify => commands::session::verify(&ctx).await?,
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Stores { query } => commands::search::stores(&ctx, &query).await?,
        Commands::Models { query } => commands::search::models(&ctx, &query).await?,
        Commands::Submit { store, entries } => {
            commands::submit::run(&ctx, &store, &entries).await?
        }
    }

    Ok(())
}

/// Logs go to stderr so command output stays pipeable. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
