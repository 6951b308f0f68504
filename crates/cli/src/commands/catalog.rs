//! `ia catalog`: build and inspect catalog files

use advisor_lib::catalog::{ingest_file, CatalogRepository, InMemoryCatalog};
use anyhow::{Context, Result};
use std::path::Path;
use tabled::Tabled;

use crate::output::{
    format_cost, format_optional, format_ram, print_json, print_success, print_table,
    print_warning, OutputFormat,
};

#[derive(Tabled)]
struct InstanceRow {
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
}

/// Transform a raw provider feed into a catalog file
pub fn ingest(input: &Path, output: &Path, source: Option<String>, format: OutputFormat) -> Result<()> {
    let report = ingest_file(input, output, source)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "output": output.display().to_string(),
            "ingested": report.ingested,
            "skipped": report.skipped,
        }))?,
        OutputFormat::Table => {
            print_success(&format!(
                "Wrote {} instances to {}",
                report.ingested,
                output.display()
            ));
            if report.skipped > 0 {
                print_warning(&format!("Skipped {} incomplete feed entries", report.skipped));
            }
        }
    }

    Ok(())
}

/// List catalog instances meeting minimum vCPU and RAM
pub fn query(catalog_path: &Path, min_vcpu: u32, min_ram: u32, format: OutputFormat) -> Result<()> {
    let catalog = InMemoryCatalog::from_file(catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    let instances = catalog.query(min_vcpu, min_ram)?;

    match format {
        OutputFormat::Json => print_json(&instances)?,
        OutputFormat::Table => {
            let rows: Vec<InstanceRow> = instances
                .iter()
                .map(|inst| InstanceRow {
                    name: inst.name.clone(),
                    provider: inst.provider.clone(),
                    vcpu: inst.vcpu,
                    ram: format_ram(inst.ram),
                    network: format_optional(inst.network_gbps),
                    storage: format_optional(inst.storage_type.as_deref()),
                    cost: format_cost(inst.cost_per_month),
                })
                .collect();
            print_table(rows, "No instances meet these minimums");
            println!(
                "\n{} of {} instances",
                instances.len(),
                catalog.instance_count()
            );
        }
    }

    Ok(())
}
