//! `ia rules show`: print the active rule tables

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tabled::Tabled;

use super::load_rules;
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct ArchetypeRow {
    #[tabled(rename = "Archetype")]
    archetype: String,
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Base vCPU")]
    base_vcpu: f64,
    #[tabled(rename = "Base RAM (GB)")]
    base_ram: f64,
    #[tabled(rename = "Tags")]
    tags: String,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Triggers")]
    triggers: String,
}

pub fn show(rules_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let rules = load_rules(rules_path)?;

    if format == OutputFormat::Json {
        return print_json(&rules);
    }

    let rows: Vec<ArchetypeRow> = rules
        .archetypes
        .iter()
        .map(|(archetype, profile)| ArchetypeRow {
            archetype: archetype.to_string(),
            workload: profile.workload_pattern.label().to_string(),
            base_vcpu: profile.base_vcpu,
            base_ram: profile.base_ram,
            tags: rules.canonical_tags(*archetype).join(", "),
        })
        .collect();
    println!("{}", "Archetypes".bold());
    print_table(rows, "No archetypes defined");

    let t = &rules.traffic_multipliers;
    println!("\n{}", "Traffic multipliers (vCPU x / RAM x)".bold());
    for (level, m) in [("low", t.low), ("medium", t.medium), ("high", t.high), ("viral", t.viral)] {
        println!("  {:<8} {} / {}", level, m.vcpu, m.ram);
    }

    let b = &rules.db_size_ram_bonus;
    println!("\n{}", "Database RAM bonus (GB)".bold());
    println!("  small {}  medium {}  large {}", b.small, b.medium, b.large);

    let rows: Vec<ServiceRow> = rules
        .services
        .iter()
        .map(|rule| {
            let triggers = &rule.triggers;
            let mut parts = Vec::new();
            if let Some(tags) = &triggers.tags {
                parts.push(format!("tags: {}", tags.join(", ")));
            }
            if let Some(sizes) = &triggers.db_size {
                let sizes: Vec<_> = sizes.iter().map(|s| s.as_str()).collect();
                parts.push(format!("db_size: {}", sizes.join(", ")));
            }
            if let Some(levels) = &triggers.traffic {
                let levels: Vec<_> = levels.iter().map(|l| l.as_str()).collect();
                parts.push(format!("traffic: {}", levels.join(", ")));
            }
            ServiceRow {
                key: rule.key.clone(),
                title: rule.title.clone(),
                triggers: parts.join("; "),
            }
        })
        .collect();
    println!("\n{}", "Service rules".bold());
    print_table(rows, "No service rules defined");

    Ok(())
}
