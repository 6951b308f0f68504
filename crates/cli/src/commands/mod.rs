//! Subcommand implementations

pub mod catalog;
pub mod recommend;
pub mod rules;
pub mod status;

use advisor_lib::RuleTables;
use anyhow::{Context, Result};
use std::path::Path;

/// Built-in rule tables, or the override file when one is given
pub fn load_rules(path: Option<&Path>) -> Result<RuleTables> {
    match path {
        Some(path) => RuleTables::from_file(path)
            .with_context(|| format!("Failed to load rule tables from {}", path.display())),
        None => Ok(RuleTables::default()),
    }
}
