use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::ClientOptions;

/// NGA dataset catalog CLI tool
#[derive(Parser)]
#[command(name = "nga-hub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Upstream search endpoint
    #[arg(short, long, env = "NGA_HUB_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Upstream timeout in seconds
    #[arg(short, long, env = "NGA_HUB_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    /// Render creation times in the local time zone instead of UTC
    #[arg(short, long, global = true)]
    local_time: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the NGA datasets and print their summaries
    Datasets {
        /// Print the full response envelope as JSON
        #[arg(short, long, conflicts_with = "csv")]
        json: bool,

        /// Print one CSV row per dataset
        #[arg(short, long)]
        csv: bool,
    },

    /// Print the upstream search URL
    Url,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = ClientOptions {
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
        local_time: cli.local_time,
    };

    match cli.command {
        Commands::Datasets { json, csv } => commands::datasets::run(options, json, csv).await,
        Commands::Url => commands::url::run(options),
    }
}
