//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table, or a notice when there are none
pub fn print_table<T: Tabled>(rows: Vec<T>, empty_message: &str) {
    if rows.is_empty() {
        print_warning(empty_message);
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Monthly cost in USD
pub fn format_cost(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// RAM in GB, without a fraction when whole
pub fn format_ram(gb: f64) -> String {
    if gb.fract() == 0.0 {
        format!("{:.0} GB", gb)
    } else {
        format!("{:.2} GB", gb)
    }
}

pub fn format_optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Color a health status
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "ready" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" | "not ready" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Color a recommendation score relative to the best score in the set
pub fn color_score(score: f64, best: f64) -> String {
    let formatted = format!("{:.4}", score);
    if best <= 0.0 || score >= best * 0.95 {
        formatted.green().to_string()
    } else if score >= best * 0.8 {
        formatted.yellow().to_string()
    } else {
        formatted.normal().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_names() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("TABLE"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_format_ram() {
        assert_eq!(format_ram(8.0), "8 GB");
        assert_eq!(format_ram(0.5), "0.50 GB");
    }

    #[test]
    fn test_format_cost_and_optional() {
        assert_eq!(format_cost(70.08), "$70.08");
        assert_eq!(format_optional(Some(25.0)), "25");
        assert_eq!(format_optional::<f64>(None), "-");
    }
}
