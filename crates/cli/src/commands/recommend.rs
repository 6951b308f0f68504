//! `ia recommend`: ask for instance recommendations

use advisor_lib::{
    DbSize, InMemoryCatalog, NetworkPreference, Priority, ProjectDescription, Recommendation,
    Recommender, StoragePreference, TrafficLevel,
};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::Tabled;

use super::load_rules;
use crate::client::{ApiClient, RecommendReply};
use crate::output::{
    color_score, format_cost, format_optional, format_ram, print_info, print_json, print_table,
    print_warning, OutputFormat,
};

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Application type (blog_portfolio, ecommerce, interactive_app,
    /// data_analytics, booking_system) or "custom"
    pub app_type: String,

    /// Feature tag for custom projects (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Expected traffic (low, medium, high, viral)
    #[arg(long)]
    pub traffic: Option<TrafficLevel>,

    /// Database size (small, medium, large)
    #[arg(long)]
    pub db_size: Option<DbSize>,

    /// Cost/performance priority (cost, balanced, performance)
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Required storage (any, ssd, nvme_ssd)
    #[arg(long)]
    pub storage: Option<StoragePreference>,

    /// Required network tier (any, medium, high)
    #[arg(long)]
    pub network: Option<NetworkPreference>,

    /// Recommend offline from this catalog file instead of the API
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Rule table override for offline recommendations
    #[arg(long, requires = "catalog")]
    pub rules: Option<PathBuf>,

    /// Show at most this many results
    #[arg(long)]
    pub limit: Option<usize>,
}

impl RecommendArgs {
    pub fn description(&self) -> ProjectDescription {
        ProjectDescription {
            app_type: Some(self.app_type.clone()),
            custom_tags: self.tags.clone(),
            traffic: self.traffic,
            db_size: self.db_size,
            priority: self.priority,
            storage_type: self.storage,
            network_performance: self.network,
        }
    }
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Instance")]
    name: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "vCPU")]
    vcpu: u32,
    #[tabled(rename = "RAM")]
    ram: String,
    #[tabled(rename = "Network (Gbps)")]
    network: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Cost/month")]
    cost: String,
    #[tabled(rename = "Score")]
    score: String,
}

pub async fn recommend(api_url: &str, args: RecommendArgs, format: OutputFormat) -> Result<()> {
    let desc = args.description();

    let reply = match &args.catalog {
        Some(catalog_path) => {
            let catalog = InMemoryCatalog::from_file(catalog_path)
                .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
            let rules = load_rules(args.rules.as_deref())?;
            let recommender = Recommender::new(Arc::new(rules), Arc::new(catalog));
            RecommendReply::from_local(recommender.recommend(&desc))?
        }
        None => ApiClient::new(api_url)?.recommend(&desc).await?,
    };

    match reply {
        RecommendReply::Recommended(mut rec) => {
            if let Some(limit) = args.limit {
                rec.results.truncate(limit);
            }
            match format {
                OutputFormat::Json => print_json(&rec)?,
                OutputFormat::Table => print_recommendation(&rec),
            }
            Ok(())
        }
        RecommendReply::Rejected(err) => {
            if format == OutputFormat::Json {
                print_json(&err)?;
            } else {
                print_warning(&err.error);
            }
            anyhow::bail!(
                "No recommendation ({})",
                err.code.as_deref().unwrap_or("unknown")
            )
        }
    }
}

fn print_recommendation(rec: &Recommendation) {
    print_info(&rec.explanation);
    println!();

    let best = rec.results.first().map(|r| r.score).unwrap_or_default();
    let rows: Vec<ResultRow> = rec
        .results
        .iter()
        .enumerate()
        .map(|(i, r)| ResultRow {
            rank: i + 1,
            name: r.instance.name.clone(),
            provider: r.instance.provider.clone(),
            vcpu: r.instance.vcpu,
            ram: format_ram(r.instance.ram),
            network: format_optional(r.instance.network_gbps),
            storage: format_optional(r.instance.storage_type.as_deref()),
            cost: format_cost(r.instance.cost_per_month),
            score: color_score(r.score, best),
        })
        .collect();
    let shown = rows.len();
    print_table(rows, "No instances to show");
    println!("\nShowing {} configurations", shown);

    if rec.suggestions.is_empty() {
        return;
    }
    println!("\n{}", "Suggested services".bold());
    for suggestion in &rec.suggestions {
        println!("\n  {}", suggestion.title.cyan().bold());
        println!("  {}", suggestion.description);
        println!("  {} {}", "Options:".dimmed(), suggestion.services.join(", "));
    }
}
