//! Strata Sentinel CLI
//!
//! Terminal front end for the risk-gated edit workflow:
//! - Browse the model catalog
//! - Submit an edit for risk scoring
//! - Approve or cancel escalated edits with the local signer

use clap::{Parser, Subcommand};
use sentinel_client::CatalogClient;
use sentinel_types::ScoringEndpoint;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{catalog, edit};
use config::SentinelConfig;
use error::CliResult;

/// Sentinel CLI application
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Strata Sentinel - risk-gated edits for BIM models", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SENTINEL_CONFIG")]
    config: Option<String>,

    /// Scoring and catalog service URL
    #[arg(short, long, env = "SENTINEL_ENDPOINT")]
    endpoint: Option<String>,

    /// Scoring endpoint to post edits to
    #[arg(long, value_enum)]
    scoring: Option<ScoringArg>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ScoringArg {
    EditComponent,
    RecordDecision,
}

impl From<ScoringArg> for ScoringEndpoint {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::EditComponent => ScoringEndpoint::EditComponent,
            ScoringArg::RecordDecision => ScoringEndpoint::RecordDecision,
        }
    }
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// List catalog models
    Models {
        /// Only models in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// List model categories
    Categories,

    /// Submit an edit and route it by risk
    Edit(edit::EditArgs),

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let mut config = SentinelConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.service.base_url = endpoint;
    }
    if let Some(scoring) = cli.scoring {
        config.service.endpoint = scoring.into();
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    match cli.command {
        Commands::Models { category } => {
            let client = CatalogClient::new(
                &config.service.base_url,
                config.service.request_timeout(),
            )?;
            catalog::models(&client, category.as_deref(), cli.output).await
        }
        Commands::Categories => {
            let client = CatalogClient::new(
                &config.service.base_url,
                config.service.request_timeout(),
            )?;
            catalog::categories(&client, cli.output).await
        }
        Commands::Edit(args) => edit::execute(args, &config, cli.output).await,
        Commands::Config => {
            let mut shown = config.clone();
            if shown.signer.seed_hex.is_some() {
                shown.signer.seed_hex = Some("<redacted>".into());
            }
            output::print_json(&shown)
        }
    }
}
