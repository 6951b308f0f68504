//! Rule tables driving requirement translation, scoring and suggestions
//!
//! The tables are hand-authored and fixed. They are built once at startup,
//! either from the built-in defaults or from a JSON override file whose
//! missing sections fall back to the defaults, then shared read-only.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{
    Archetype, DbSize, Priority, PriorityWeights, SuitabilityCategory, SuitabilityFocus,
    TrafficLevel, WorkloadPattern,
};

/// Errors raised while loading or validating rule tables
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rule tables from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule tables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no profile defined for archetype '{0}'")]
    MissingProfile(Archetype),

    #[error("invalid rule table: {0}")]
    Invalid(String),
}

pub type RulesResult<T> = Result<T, RulesError>;

/// Baseline resources and suitability focus for an archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    pub workload_pattern: WorkloadPattern,
    pub base_vcpu: f64,
    pub base_ram: f64,
    pub suitability_focus: SuitabilityFocus,
}

/// Canonical tag set of an archetype, used for classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeTags {
    pub archetype: Archetype,
    pub tags: Vec<String>,
}

/// vCPU and RAM scaling for one traffic level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficMultiplier {
    pub vcpu: f64,
    pub ram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficMultipliers {
    pub low: TrafficMultiplier,
    pub medium: TrafficMultiplier,
    pub high: TrafficMultiplier,
    pub viral: TrafficMultiplier,
}

/// Extra RAM (GB) added per database size tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbSizeRamBonus {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeightTable {
    pub cost: PriorityWeights,
    pub balanced: PriorityWeights,
    pub performance: PriorityWeights,
}

/// Conditions under which a service rule fires. Any one is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTriggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_size: Option<Vec<DbSize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Vec<TrafficLevel>>,
}

/// Ancillary service suggested when its triggers match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRule {
    pub key: String,
    pub title: String,
    pub description: String,
    pub services: Vec<String>,
    #[serde(default)]
    pub triggers: ServiceTriggers,
}

/// Process-wide, read-only rule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    pub archetypes: BTreeMap<Archetype, ArchetypeProfile>,
    /// Ordered: classification ties go to the earliest entry
    pub archetype_tags: Vec<ArchetypeTags>,
    pub traffic_multipliers: TrafficMultipliers,
    pub db_size_ram_bonus: DbSizeRamBonus,
    pub priority_weights: PriorityWeightTable,
    /// Ordered: suggestions are returned in this order
    pub services: Vec<ServiceRule>,
}

impl RuleTables {
    /// Load rule tables from a JSON file and validate them
    pub fn from_file(path: &Path) -> RulesResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> RulesResult<Self> {
        let tables: RuleTables = serde_json::from_str(content)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Check the invariants the translator and scorer rely on
    pub fn validate(&self) -> RulesResult<()> {
        for archetype in Archetype::ALL {
            let profile = self.profile(*archetype)?;
            if !(profile.base_vcpu > 0.0 && profile.base_ram > 0.0) {
                return Err(RulesError::Invalid(format!(
                    "baseline resources for '{}' must be positive",
                    archetype
                )));
            }
            if profile.suitability_focus.values().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(RulesError::Invalid(format!(
                    "suitability focus for '{}' must be non-negative",
                    archetype
                )));
            }
        }

        for level in TrafficLevel::ALL {
            let mult = self.traffic_multiplier(*level);
            if !(mult.vcpu > 0.0 && mult.ram > 0.0) {
                return Err(RulesError::Invalid(format!(
                    "traffic multiplier for '{}' must be positive",
                    level
                )));
            }
        }

        for size in DbSize::ALL {
            if !(self.db_ram_bonus(*size) >= 0.0) {
                return Err(RulesError::Invalid(format!(
                    "RAM bonus for '{}' databases must be non-negative",
                    size
                )));
            }
        }

        for priority in Priority::ALL {
            let weights = self.priority_weights(*priority);
            if !(weights.cost >= 0.0 && weights.perf >= 0.0) {
                return Err(RulesError::Invalid(format!(
                    "weights for '{}' priority must be non-negative",
                    priority
                )));
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.archetype_tags {
            if !seen.insert(entry.archetype) {
                return Err(RulesError::Invalid(format!(
                    "archetype '{}' listed twice in tag table",
                    entry.archetype
                )));
            }
        }

        let mut keys = HashSet::new();
        for rule in &self.services {
            if rule.key.is_empty() || !keys.insert(rule.key.as_str()) {
                return Err(RulesError::Invalid(format!(
                    "service rule key '{}' is empty or duplicated",
                    rule.key
                )));
            }
        }

        Ok(())
    }

    pub fn profile(&self, archetype: Archetype) -> RulesResult<&ArchetypeProfile> {
        self.archetypes
            .get(&archetype)
            .ok_or(RulesError::MissingProfile(archetype))
    }

    /// Canonical tags of an archetype; empty when the tag table omits it
    pub fn canonical_tags(&self, archetype: Archetype) -> &[String] {
        self.archetype_tags
            .iter()
            .find(|entry| entry.archetype == archetype)
            .map(|entry| entry.tags.as_slice())
            .unwrap_or(&[])
    }

    pub fn traffic_multiplier(&self, level: TrafficLevel) -> TrafficMultiplier {
        let table = &self.traffic_multipliers;
        match level {
            TrafficLevel::Low => table.low,
            TrafficLevel::Medium => table.medium,
            TrafficLevel::High => table.high,
            TrafficLevel::Viral => table.viral,
        }
    }

    pub fn db_ram_bonus(&self, size: DbSize) -> f64 {
        let table = &self.db_size_ram_bonus;
        match size {
            DbSize::Small => table.small,
            DbSize::Medium => table.medium,
            DbSize::Large => table.large,
        }
    }

    pub fn priority_weights(&self, priority: Priority) -> PriorityWeights {
        let table = &self.priority_weights;
        match priority {
            Priority::Cost => table.cost,
            Priority::Balanced => table.balanced,
            Priority::Performance => table.performance,
        }
    }
}

fn profile(
    workload_pattern: WorkloadPattern,
    base_vcpu: f64,
    base_ram: f64,
    focus: &[(SuitabilityCategory, f64)],
) -> ArchetypeProfile {
    ArchetypeProfile {
        workload_pattern,
        base_vcpu,
        base_ram,
        suitability_focus: focus.iter().copied().collect(),
    }
}

fn tags(archetype: Archetype, tags: &[&str]) -> ArchetypeTags {
    ArchetypeTags {
        archetype,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        use SuitabilityCategory::*;
        use WorkloadPattern::*;

        let archetypes = BTreeMap::from([
            (
                Archetype::BlogPortfolio,
                profile(StatelessWebTier, 1.0, 1.0, &[(WebServing, 1.2), (Database, 0.8)]),
            ),
            (
                Archetype::Ecommerce,
                profile(
                    StatelessWebTier,
                    2.0,
                    4.0,
                    &[(WebServing, 1.2), (Database, 1.1), (Caching, 1.0)],
                ),
            ),
            (
                Archetype::InteractiveApp,
                profile(
                    MemoryIntensive,
                    2.0,
                    8.0,
                    &[(Database, 1.2), (Caching, 1.1), (WebServing, 0.8)],
                ),
            ),
            (
                Archetype::DataAnalytics,
                profile(ComputeIntensive, 4.0, 8.0, &[(Analytics, 1.5), (Database, 0.8)]),
            ),
            (
                Archetype::BookingSystem,
                profile(
                    MemoryIntensive,
                    4.0,
                    16.0,
                    &[(Database, 1.5), (Caching, 1.0), (WebServing, 0.7)],
                ),
            ),
        ]);

        let archetype_tags = vec![
            tags(Archetype::Ecommerce, &["payments", "search", "user_images", "read_heavy"]),
            tags(Archetype::BookingSystem, &["payments", "real_time", "write_heavy", "search"]),
            tags(Archetype::InteractiveApp, &["logins", "real_time", "uploads", "write_heavy"]),
            tags(Archetype::DataAnalytics, &["datasets", "compute_heavy", "read_heavy"]),
            tags(Archetype::BlogPortfolio, &["text_content", "read_heavy", "uploads"]),
        ];

        let services = vec![
            ServiceRule {
                key: "cdn_storage".to_string(),
                title: "Content Delivery & Storage".to_string(),
                description: "For applications with significant user uploads or static content, \
                    using a dedicated Object Storage service (like AWS S3, Google Cloud Storage) \
                    combined with a Content Delivery Network (CDN) is highly recommended. This \
                    offloads traffic from your main server, improves global load times, and \
                    provides scalable, cost-effective storage."
                    .to_string(),
                services: strings(&[
                    "AWS S3",
                    "Google Cloud Storage",
                    "Azure Blob Storage",
                    "Cloudflare",
                    "Fastly",
                ]),
                triggers: ServiceTriggers {
                    tags: Some(strings(&["user_images", "uploads", "datasets", "text_content"])),
                    ..Default::default()
                },
            },
            ServiceRule {
                key: "managed_database".to_string(),
                title: "Managed Database".to_string(),
                description: "As your database grows, managing it yourself becomes complex. A \
                    managed database service (like AWS RDS, Google Cloud SQL) handles backups, \
                    scaling, and maintenance for you, ensuring high availability and durability. \
                    This is crucial for business-critical applications."
                    .to_string(),
                services: strings(&[
                    "AWS RDS",
                    "Google Cloud SQL",
                    "Azure SQL Database",
                    "DigitalOcean Managed Databases",
                ]),
                triggers: ServiceTriggers {
                    tags: Some(strings(&["write_heavy", "read_heavy"])),
                    db_size: Some(vec![DbSize::Medium, DbSize::Large]),
                    traffic: None,
                },
            },
            ServiceRule {
                key: "load_balancer".to_string(),
                title: "Load Balancing & Scaling".to_string(),
                description: "To handle high or unpredictable traffic, a load balancer \
                    distributes incoming requests across multiple server instances. This \
                    prevents any single server from being overwhelmed and is the foundation for \
                    a high-availability, scalable architecture. Most cloud providers offer \
                    managed load balancers and auto-scaling groups."
                    .to_string(),
                services: strings(&[
                    "AWS ELB",
                    "Google Cloud Load Balancing",
                    "Azure Load Balancer",
                    "Nginx",
                    "HAProxy",
                ]),
                triggers: ServiceTriggers {
                    traffic: Some(vec![TrafficLevel::High, TrafficLevel::Viral]),
                    ..Default::default()
                },
            },
            ServiceRule {
                key: "payments".to_string(),
                title: "Payment Gateway".to_string(),
                description: "For e-commerce or any application processing payments, \
                    integrating a dedicated payment gateway is essential for security and \
                    compliance. These services handle the complexity of credit card processing \
                    and fraud detection."
                    .to_string(),
                services: strings(&["Stripe", "PayPal", "Braintree", "Adyen"]),
                triggers: ServiceTriggers {
                    tags: Some(strings(&["payments"])),
                    ..Default::default()
                },
            },
            ServiceRule {
                key: "real_time".to_string(),
                title: "Real-time Communication".to_string(),
                description: "For applications requiring real-time features like live chat, \
                    notifications, or collaborative editing, using a dedicated service can \
                    simplify development and ensure scalability."
                    .to_string(),
                services: strings(&["Pusher", "Ably", "Firebase Realtime Database"]),
                triggers: ServiceTriggers {
                    tags: Some(strings(&["real_time"])),
                    ..Default::default()
                },
            },
        ];

        Self {
            archetypes,
            archetype_tags,
            traffic_multipliers: TrafficMultipliers {
                low: TrafficMultiplier { vcpu: 1.0, ram: 1.0 },
                medium: TrafficMultiplier { vcpu: 1.5, ram: 2.0 },
                high: TrafficMultiplier { vcpu: 2.5, ram: 4.0 },
                viral: TrafficMultiplier { vcpu: 4.0, ram: 6.0 },
            },
            db_size_ram_bonus: DbSizeRamBonus {
                small: 2.0,
                medium: 8.0,
                large: 16.0,
            },
            priority_weights: PriorityWeightTable {
                cost: PriorityWeights { cost: 1.8, perf: 0.6 },
                balanced: PriorityWeights { cost: 1.0, perf: 1.0 },
                performance: PriorityWeights { cost: 0.5, perf: 1.8 },
            },
            services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables_validate() {
        RuleTables::default().validate().unwrap();
    }

    #[test]
    fn test_every_archetype_has_canonical_tags() {
        let rules = RuleTables::default();
        for archetype in Archetype::ALL {
            assert!(!rules.canonical_tags(*archetype).is_empty());
        }
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let rules = RuleTables::from_json(
            r#"{"db_size_ram_bonus": {"small": 4, "medium": 10, "large": 20}}"#,
        )
        .unwrap();
        assert_eq!(rules.db_ram_bonus(DbSize::Small), 4.0);
        assert_eq!(
            rules.traffic_multiplier(TrafficLevel::High),
            TrafficMultiplier { vcpu: 2.5, ram: 4.0 }
        );
        assert_eq!(rules.services.len(), 5);
    }

    #[test]
    fn test_missing_profile_rejected() {
        let mut rules = RuleTables::default();
        rules.archetypes.remove(&Archetype::BookingSystem);
        assert!(matches!(
            rules.validate(),
            Err(RulesError::MissingProfile(Archetype::BookingSystem))
        ));
    }

    #[test]
    fn test_negative_bonus_rejected() {
        let mut rules = RuleTables::default();
        rules.db_size_ram_bonus.large = -1.0;
        assert!(matches!(rules.validate(), Err(RulesError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_service_key_rejected() {
        let mut rules = RuleTables::default();
        let dup = rules.services[0].clone();
        rules.services.push(dup);
        assert!(matches!(rules.validate(), Err(RulesError::Invalid(_))));
    }

    #[test]
    fn test_serialized_defaults_load_back() {
        let json = serde_json::to_string_pretty(&RuleTables::default()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = RuleTables::from_file(file.path()).unwrap();
        assert_eq!(loaded.archetype_tags[0].archetype, Archetype::Ecommerce);
        assert_eq!(
            loaded.profile(Archetype::InteractiveApp).unwrap().workload_pattern,
            WorkloadPattern::MemoryIntensive
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RuleTables::from_file(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rules.json"));
    }
}
