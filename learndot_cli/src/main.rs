mod commands;
mod output;
mod validation;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use learndot_api::{Client, Stage, Throttle};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "learndot")]
#[command(about = "Search, count, create and update Learndot records")]
struct Cli {
    /// Backend stage: production, staging or sandbox
    #[arg(long, default_value = "production", global = true)]
    stage: String,

    /// Output format: json or compact
    #[arg(long, default_value = "json", global = true)]
    output: String,

    /// Log outgoing requests and response statuses
    #[arg(long, global = true)]
    debug: bool,

    /// Skip the pause after each request
    #[arg(long, global = true)]
    no_throttle: bool,

    /// Abort an operation (all pages included) after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Override the stage's base URL
    #[arg(long, global = true, hide = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search an entity, fetching every page unless --page is given
    Search(commands::search::SearchArgs),
    /// Count records matching the conditions
    Count(commands::count::CountArgs),
    /// Create a record
    Create(commands::create::CreateArgs),
    /// Update a record by id
    Update(commands::update::UpdateArgs),
    /// Fetch a single record by id
    Get(commands::get::GetArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let directive = if cli.debug {
        "learndot_api=debug"
    } else {
        "learndot_api=warn"
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    let format = match cli.output.as_str() {
        "compact" => OutputFormat::Compact,
        _ => OutputFormat::Json,
    };

    let stage: Stage = cli.stage.parse()?;
    let mut builder = Client::builder()
        .stage(stage)
        .with_dispatch(tracing::Dispatch::new(subscriber));
    if let Some(ref base_url) = cli.base_url {
        builder = builder.base_url(base_url);
    }
    if cli.no_throttle {
        builder = builder.throttle(Throttle::None);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.operation_timeout(Duration::from_secs(secs));
    }
    let client = builder
        .build()
        .with_context(|| format!("failed to configure the {} client", stage))?;

    match &cli.command {
        Commands::Search(args) => commands::search::run(args, &client, &format).await?,
        Commands::Count(args) => commands::count::run(args, &client).await?,
        Commands::Create(args) => commands::create::run(args, &client, &format).await?,
        Commands::Update(args) => commands::update::run(args, &client, &format).await?,
        Commands::Get(args) => commands::get::run(args, &client, &format).await?,
    }

    Ok(())
}
