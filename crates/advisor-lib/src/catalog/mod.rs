//! Instance catalog access
//!
//! The engine only needs one query: every instance with at least a given
//! vCPU count and RAM. [`CatalogRepository`] is that seam;
//! [`InMemoryCatalog`] serves it from a catalog file produced by
//! [`ingest`].

pub mod ingest;


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::InstanceRecord;

pub use ingest::{category_suitability, ingest_feed, ingest_file, IngestReport, HOURS_PER_MONTH};

/// Errors from catalog loading and querying
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to access catalog at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog record '{name}': {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Trait for catalog implementations
pub trait CatalogRepository: Send + Sync {
    /// All instances with `vcpu >= min_vcpu` and `ram >= min_ram`, in catalog order
    fn query(&self, min_vcpu: u32, min_ram: u32) -> CatalogResult<Vec<InstanceRecord>>;

    /// Number of instances the catalog holds
    fn instance_count(&self) -> usize;
}

/// On-disk catalog written by ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub instances: Vec<InstanceRecord>,
}

impl CatalogFile {
    pub fn new(instances: Vec<InstanceRecord>, source: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            instances,
        }
    }

    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> CatalogResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reject records that would break the scorer's capacity ratios
pub fn validate_record(record: &InstanceRecord) -> CatalogResult<()> {
    let reason = if record.vcpu == 0 {
        "vcpu must be positive"
    } else if !(record.ram > 0.0) {
        "ram must be positive"
    } else if !record.cost_per_month.is_finite() {
        "cost_per_month must be finite"
    } else {
        return Ok(());
    };

    Err(CatalogError::InvalidRecord {
        name: record.name.clone(),
        reason: reason.to_string(),
    })
}

/// Catalog held in memory, read-only after construction
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    instances: Vec<InstanceRecord>,
}

impl InMemoryCatalog {
    pub fn new(instances: Vec<InstanceRecord>) -> CatalogResult<Self> {
        for record in &instances {
            validate_record(record)?;
        }
        Ok(Self { instances })
    }

    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let file = CatalogFile::load(path)?;
        tracing::debug!(
            path = %path.display(),
            generated_at = %file.generated_at,
            instances = file.instances.len(),
            "Read catalog file"
        );
        Self::new(file.instances)
    }

    pub fn instances(&self) -> &[InstanceRecord] {
        &self.instances
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn query(&self, min_vcpu: u32, min_ram: u32) -> CatalogResult<Vec<InstanceRecord>> {
        let min_ram = f64::from(min_ram);
        Ok(self
            .instances
            .iter()
            .filter(|inst| inst.vcpu >= min_vcpu && inst.ram >= min_ram)
            .cloned()
            .collect())
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }
}
