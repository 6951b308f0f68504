//! One-time transform of a raw provider feed into a catalog file

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

use super::{validate_record, CatalogFile};
use crate::models::{InstanceRecord, Suitability};

/// Hours used to turn an hourly price into a monthly cost
pub const HOURS_PER_MONTH: f64 = 730.0;

const UNKNOWN_PROVIDER: &str = "unknown";

/// A positive whole number, whether written as `2` or `2.0`
fn whole_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// One object of the raw provider feed, read field by field
struct FeedEntry<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> FeedEntry<'a> {
    fn required<T>(&self, key: &str, read: fn(&Value) -> Option<T>) -> Option<T> {
        self.fields.get(key).and_then(read)
    }

    /// Absent, null and mistyped values all read as `None`
    fn optional<T>(&self, key: &str, read: fn(&Value) -> Option<T>) -> Option<T> {
        let value = self.fields.get(key).filter(|v| !v.is_null())?;
        let parsed = read(value);
        if parsed.is_none() {
            debug!(index = self.index, field = key, value = %value, "Ignoring mistyped feed field");
        }
        parsed
    }

    fn into_record(self) -> std::result::Result<InstanceRecord, &'static str> {
        let name = self
            .required("instance_id", text)
            .filter(|id| !id.is_empty())
            .ok_or("missing instance_id")?;
        let vcpu = self
            .required("vcpus", whole_count)
            .ok_or("missing or non-integral vcpus")?;
        let ram = self
            .required("memory_gb", Value::as_f64)
            .ok_or("missing memory_gb")?;

        let suitability = self
            .optional("category", text)
            .map(|category| category_suitability(&category))
            .unwrap_or_default();
        let hourly = self
            .optional("hourly_on_demand_price_usd", Value::as_f64)
            .unwrap_or(0.0);

        Ok(InstanceRecord {
            name,
            provider: self
                .optional("provider", text)
                .unwrap_or_else(|| UNKNOWN_PROVIDER.to_string()),
            cost_per_month: hourly * HOURS_PER_MONTH,
            vcpu,
            ram,
            network_gbps: self.optional("network_performance_gbps", Value::as_f64),
            storage_type: self.optional("storage_type", text),
            storage_gb: self.optional("storage_size_gb", Value::as_f64),
            suitability,
        })
    }
}

/// Coarse suitability vector for a provider category label
pub fn category_suitability(category: &str) -> Suitability {
    let category = category.to_lowercase();
    let (web_serving, database, caching, analytics) = if category.contains("general purpose") {
        (1.0, 0.8, 0.7, 0.5)
    } else if category.contains("compute optimized") {
        (1.2, 0.6, 0.6, 1.0)
    } else if category.contains("memory optimized") {
        (0.8, 1.2, 1.1, 0.7)
    } else {
        return Suitability::default();
    };

    Suitability {
        web_serving,
        database,
        caching,
        analytics,
    }
}

/// Counts from one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
}

/// Convert feed entries into catalog records.
///
/// Entries that are not objects, lack an id/vCPU/memory field, or carry
/// non-positive capacity are skipped and counted.
pub fn ingest_feed(entries: &[Value]) -> (Vec<InstanceRecord>, IngestReport) {
    let mut records = Vec::with_capacity(entries.len());
    let mut report = IngestReport::default();

    for (index, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_object() else {
            debug!(index, "Skipping non-object feed entry");
            report.skipped += 1;
            continue;
        };

        let record = match (FeedEntry { index, fields }).into_record() {
            Ok(record) => record,
            Err(reason) => {
                debug!(index, reason, "Skipping incomplete feed entry");
                report.skipped += 1;
                continue;
            }
        };

        if let Err(e) = validate_record(&record) {
            debug!(index, error = %e, "Skipping invalid feed entry");
            report.skipped += 1;
            continue;
        }

        records.push(record);
        report.ingested += 1;
    }

    (records, report)
}

/// Read a raw feed (JSON array) and write the catalog file, replacing any
/// existing one
pub fn ingest_file(input: &Path, output: &Path, source: Option<String>) -> Result<IngestReport> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read provider feed {}", input.display()))?;
    let entries: Vec<Value> =
        serde_json::from_str(&content).context("Provider feed must be a JSON array")?;

    let (records, report) = ingest_feed(&entries);

    let source = source.or_else(|| Some(input.display().to_string()));
    CatalogFile::new(records, source)
        .save(output)
        .context("Failed to write catalog file")?;

    info!(
        event = "catalog_ingested",
        input = %input.display(),
        output = %output.display(),
        ingested = report.ingested,
        skipped = report.skipped,
        "Ingested provider feed"
    );

    Ok(report)
}
