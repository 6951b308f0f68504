//! Instance Advisor CLI
//!
//! A command-line tool for requesting instance recommendations, building
//! catalog files and inspecting a running advisor.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{catalog, recommend, rules, status};
use std::path::PathBuf;

/// Instance Advisor CLI
#[derive(Parser)]
#[command(name = "ia")]
#[command(author, version, about = "CLI for Instance Advisor", long_about = None)]
pub struct Cli {
    /// Advisor API URL (overrides the config file)
    #[arg(long, env = "IA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format (overrides the config file)
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend instances for a project
    Recommend(recommend::RecommendArgs),

    /// Build and inspect catalog files
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Inspect rule tables
    #[command(subcommand)]
    Rules(RulesCommands),

    /// Show health and readiness of a running advisor
    Status,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Transform a raw provider feed into a catalog file
    Ingest {
        /// Raw feed (JSON array of instance objects)
        #[arg(long, short)]
        input: PathBuf,

        /// Catalog file to write
        #[arg(long, short, default_value = "catalog.json")]
        output: PathBuf,

        /// Source label stored in the catalog (defaults to the input path)
        #[arg(long)]
        source: Option<String>,
    },

    /// List instances meeting minimum vCPU and RAM
    Query {
        /// Catalog file
        #[arg(long, default_value = "catalog.json")]
        catalog: PathBuf,

        #[arg(long, default_value_t = 0)]
        min_vcpu: u32,

        /// Minimum RAM in GB
        #[arg(long, default_value_t = 0)]
        min_ram: u32,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// Print the rule tables in effect
    Show {
        /// Rule table override file (built-in tables if omitted)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;

    let api_url = cli
        .api_url
        .or(config.api_url)
        .unwrap_or_else(|| config::DEFAULT_API_URL.to_string());
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(output::OutputFormat::parse))
        .unwrap_or_default();

    match cli.command {
        Commands::Recommend(args) => {
            recommend::recommend(&api_url, args, format).await?;
        }
        Commands::Catalog(catalog_cmd) => match catalog_cmd {
            CatalogCommands::Ingest {
                input,
                output,
                source,
            } => {
                catalog::ingest(&input, &output, source, format)?;
            }
            CatalogCommands::Query {
                catalog: path,
                min_vcpu,
                min_ram,
            } => {
                catalog::query(&path, min_vcpu, min_ram, format)?;
            }
        },
        Commands::Rules(RulesCommands::Show { rules: path }) => {
            rules::show(path.as_deref(), format)?;
        }
        Commands::Status => {
            let client = client::ApiClient::new(&api_url)?;
            status::show_status(&client, format).await?;
        }
    }

    Ok(())
}
