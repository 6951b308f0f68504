//! Core data models for the instance advisor
//!
//! Request vocabulary (traffic level, database size, priority, hardware
//! preferences), catalog records, and the shapes returned to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{RecommendError, RecommendResult};

/// Error returned when a request token does not name a known value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{token}', expected one of: {expected}")]
pub struct ParseTokenError {
    pub kind: &'static str,
    pub token: String,
    pub expected: String,
}

/// Implements `as_str`, `Display` and `FromStr` for a unit enum whose
/// wire tokens are its snake_case names.
macro_rules! token_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $token:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseTokenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err(ParseTokenError {
                        kind: $kind,
                        token: s.to_string(),
                        expected: [$($token),+].join(", "),
                    }),
                }
            }
        }
    };
}

/// Canonical application category with a baseline resource profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    BlogPortfolio,
    Ecommerce,
    InteractiveApp,
    DataAnalytics,
    BookingSystem,
}

token_enum!(Archetype, "application type", {
    BlogPortfolio => "blog_portfolio",
    Ecommerce => "ecommerce",
    InteractiveApp => "interactive_app",
    DataAnalytics => "data_analytics",
    BookingSystem => "booking_system",
});

impl Archetype {
    /// Human-readable name used in explanations ("data analytics")
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// Expected request volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLevel {
    #[default]
    Low,
    Medium,
    High,
    Viral,
}

token_enum!(TrafficLevel, "traffic level", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Viral => "viral",
});

/// Database size tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbSize {
    #[default]
    Small,
    Medium,
    Large,
}

token_enum!(DbSize, "database size", {
    Small => "small",
    Medium => "medium",
    Large => "large",
});

/// Optimization priority selecting the cost/performance weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Cost,
    #[default]
    Balanced,
    Performance,
}

token_enum!(Priority, "priority", {
    Cost => "cost",
    Balanced => "balanced",
    Performance => "performance",
});

/// Required storage technology
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoragePreference {
    #[default]
    Any,
    Ssd,
    NvmeSsd,
}

token_enum!(StoragePreference, "storage type", {
    Any => "any",
    Ssd => "ssd",
    NvmeSsd => "nvme_ssd",
});

/// Required network tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkPreference {
    #[default]
    Any,
    Medium,
    High,
}

token_enum!(NetworkPreference, "network performance", {
    Any => "any",
    Medium => "medium",
    High => "high",
});

/// Coarse workload classification driving CPU/RAM weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadPattern {
    #[serde(rename = "Stateless Web Tier")]
    StatelessWebTier,
    #[serde(rename = "Memory Intensive")]
    MemoryIntensive,
    #[serde(rename = "Compute Intensive")]
    ComputeIntensive,
}

impl WorkloadPattern {
    pub fn label(&self) -> &'static str {
        match self {
            WorkloadPattern::StatelessWebTier => "Stateless Web Tier",
            WorkloadPattern::MemoryIntensive => "Memory Intensive",
            WorkloadPattern::ComputeIntensive => "Compute Intensive",
        }
    }

    pub fn is_memory_bound(&self) -> bool {
        self.label().contains("Memory")
    }
}

impl fmt::Display for WorkloadPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Instance category an archetype can lean on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityCategory {
    WebServing,
    Database,
    Caching,
    Analytics,
}

/// Weighted vector over suitability categories
pub type SuitabilityFocus = BTreeMap<SuitabilityCategory, f64>;

/// Per-category suitability scores of a catalog instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Suitability {
    #[serde(default)]
    pub web_serving: f64,
    #[serde(default)]
    pub database: f64,
    #[serde(default)]
    pub caching: f64,
    #[serde(default)]
    pub analytics: f64,
}

impl Suitability {
    pub fn get(&self, category: SuitabilityCategory) -> f64 {
        match category {
            SuitabilityCategory::WebServing => self.web_serving,
            SuitabilityCategory::Database => self.database,
            SuitabilityCategory::Caching => self.caching,
            SuitabilityCategory::Analytics => self.analytics,
        }
    }
}

/// Project description submitted by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescription {
    /// Archetype token, or "custom" to infer one from `custom_tags`
    #[serde(default)]
    pub app_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub custom_tags: Vec<String>,
    #[serde(default)]
    pub traffic: Option<TrafficLevel>,
    #[serde(default)]
    pub db_size: Option<DbSize>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub storage_type: Option<StoragePreference>,
    #[serde(default)]
    pub network_performance: Option<NetworkPreference>,
}

/// An explicit `null` tag list means no tags
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Token selecting archetype inference from tags
pub const CUSTOM_APP_TYPE: &str = "custom";

/// How the caller identified their archetype
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchetypeRequest {
    Known(Archetype),
    Custom(Vec<String>),
}

impl ProjectDescription {
    pub fn for_app_type(app_type: impl Into<String>) -> Self {
        Self {
            app_type: Some(app_type.into()),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_traffic(mut self, traffic: TrafficLevel) -> Self {
        self.traffic = Some(traffic);
        self
    }

    pub fn with_db_size(mut self, db_size: DbSize) -> Self {
        self.db_size = Some(db_size);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_storage(mut self, storage: StoragePreference) -> Self {
        self.storage_type = Some(storage);
        self
    }

    pub fn with_network(mut self, network: NetworkPreference) -> Self {
        self.network_performance = Some(network);
        self
    }

    /// Resolve the archetype field, rejecting missing or unknown tokens
    pub fn archetype_request(&self) -> RecommendResult<ArchetypeRequest> {
        let token = match self.app_type.as_deref() {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(RecommendError::InvalidInput(
                    "Application type is a required field.".to_string(),
                ))
            }
        };

        if token == CUSTOM_APP_TYPE {
            return Ok(ArchetypeRequest::Custom(self.custom_tags.clone()));
        }

        token
            .parse::<Archetype>()
            .map(ArchetypeRequest::Known)
            .map_err(|e| RecommendError::InvalidInput(e.to_string()))
    }

    pub fn traffic_level(&self) -> TrafficLevel {
        self.traffic.unwrap_or_default()
    }

    pub fn db_size_tier(&self) -> DbSize {
        self.db_size.unwrap_or_default()
    }
}

/// Cost and performance weights for a priority mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub cost: f64,
    pub perf: f64,
}

/// Concrete resource requirement derived from a project description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRequirement {
    pub min_vcpu: u32,
    pub min_ram: u32,
    pub workload_pattern: WorkloadPattern,
    pub suitability_focus: SuitabilityFocus,
    pub priority: Priority,
    pub weights: PriorityWeights,
    pub archetype: Archetype,
    pub traffic: TrafficLevel,
    pub storage_type: StoragePreference,
    pub network_performance: NetworkPreference,
}

/// Catalog entry for a purchasable instance type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub cost_per_month: f64,
    pub vcpu: u32,
    /// Memory in GB
    pub ram: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_gbps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_gb: Option<f64>,
    #[serde(flatten)]
    pub suitability: Suitability,
}

/// Individual score components, kept for display and debugging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub cpu_fit: f64,
    pub ram_fit: f64,
    pub performance: f64,
    pub cost: f64,
    pub suitability: f64,
}

/// Catalog instance paired with its computed fitness score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInstance {
    #[serde(flatten)]
    pub instance: InstanceRecord,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Ancillary infrastructure suggested alongside the instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSuggestion {
    pub title: String,
    pub description: String,
    pub services: Vec<String>,
}

/// Successful recommendation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub results: Vec<ScoredInstance>,
    pub explanation: String,
    pub suggestions: Vec<ServiceSuggestion>,
    /// Requirement the results were computed for; not part of the wire shape
    #[serde(skip)]
    pub requirement: Option<ResolvedRequirement>,
}

/// Why no instance could be recommended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatch {
    /// Nothing in the catalog meets the minimum vCPU/RAM
    Capacity { min_vcpu: u32, min_ram: u32 },
    /// Capacity candidates exist but fail storage/network constraints
    Technical {
        candidates: usize,
        storage_type: StoragePreference,
        network_performance: NetworkPreference,
    },
}

impl NoMatch {
    pub fn code(&self) -> &'static str {
        match self {
            NoMatch::Capacity { .. } => "no_capacity_match",
            NoMatch::Technical { .. } => "no_technical_match",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            NoMatch::Capacity { .. } => {
                "No cloud instances found that match your minimum CPU/RAM requirements. \
                 Please try selecting a less demanding project type or scale."
            }
            NoMatch::Technical { .. } => {
                "No instances found matching your specific technical criteria \
                 (e.g., storage type). Try broadening your search."
            }
        }
    }
}

/// Result of one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendOutcome {
    Recommended(Recommendation),
    NoMatch(NoMatch),
}

/// Error body returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
        }
    }
}

impl From<&NoMatch> for ErrorResponse {
    fn from(no_match: &NoMatch) -> Self {
        Self::new(no_match.message(), no_match.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_app_type_is_invalid_input() {
        let desc = ProjectDescription::default();
        let err = desc.archetype_request().unwrap_err();
        assert!(matches!(err, RecommendError::InvalidInput(_)));

        let empty = ProjectDescription::for_app_type("");
        assert!(matches!(
            empty.archetype_request(),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_app_type_names_token() {
        let desc = ProjectDescription::for_app_type("mainframe");
        match desc.archetype_request() {
            Err(RecommendError::InvalidInput(msg)) => assert!(msg.contains("mainframe")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_app_type_carries_tags() {
        let desc = ProjectDescription::for_app_type("custom").with_tags(["payments", "search"]);
        assert_eq!(
            desc.archetype_request().unwrap(),
            ArchetypeRequest::Custom(vec!["payments".to_string(), "search".to_string()])
        );
    }

    #[test]
    fn test_project_description_defaults_from_json() {
        let desc: ProjectDescription =
            serde_json::from_str(r#"{"app_type": "ecommerce"}"#).unwrap();
        assert_eq!(desc.traffic_level(), TrafficLevel::Low);
        assert_eq!(desc.db_size_tier(), DbSize::Small);
        assert!(desc.custom_tags.is_empty());
        assert_eq!(desc.priority.unwrap_or_default(), Priority::Balanced);
        assert_eq!(desc.storage_type.unwrap_or_default(), StoragePreference::Any);
    }

    #[test]
    fn test_null_custom_tags_mean_no_tags() {
        let desc: ProjectDescription =
            serde_json::from_str(r#"{"app_type": "custom", "custom_tags": null}"#).unwrap();
        assert!(desc.custom_tags.is_empty());
        assert_eq!(desc.archetype_request().unwrap(), ArchetypeRequest::Custom(Vec::new()));

        let bad = serde_json::from_str::<ProjectDescription>(r#"{"app_type": "custom", "custom_tags": "payments"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_token_round_trip_through_from_str() {
        for level in TrafficLevel::ALL {
            assert_eq!(level.as_str().parse::<TrafficLevel>().unwrap(), *level);
        }
        assert!("extreme".parse::<TrafficLevel>().is_err());
        assert_eq!("nvme_ssd".parse::<StoragePreference>().unwrap(), StoragePreference::NvmeSsd);
    }

    #[test]
    fn test_instance_record_missing_suitability_defaults_to_zero() {
        let json = r#"{"name": "m5.large", "provider": "aws", "cost_per_month": 70.0,
                       "vcpu": 2, "ram": 8, "web_serving": 1.0}"#;
        let record: InstanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.suitability.web_serving, 1.0);
        assert_eq!(record.suitability.analytics, 0.0);
        assert!(record.network_gbps.is_none());
    }

    #[test]
    fn test_scored_instance_serializes_flat() {
        let scored = ScoredInstance {
            instance: InstanceRecord {
                name: "c5.xlarge".to_string(),
                provider: "aws".to_string(),
                cost_per_month: 124.1,
                vcpu: 4,
                ram: 8.0,
                network_gbps: Some(10.0),
                storage_type: Some("EBS only".to_string()),
                storage_gb: None,
                suitability: Suitability::default(),
            },
            score: 1.25,
            breakdown: ScoreBreakdown {
                cpu_fit: 1.0,
                ram_fit: 1.0,
                performance: 1.0,
                cost: 1.0,
                suitability: 0.5,
            },
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["name"], "c5.xlarge");
        assert_eq!(value["score"], 1.25);
        assert_eq!(value["web_serving"], 0.0);
    }

    #[test]
    fn test_no_match_codes_differ() {
        let capacity = NoMatch::Capacity { min_vcpu: 64, min_ram: 512 };
        let technical = NoMatch::Technical {
            candidates: 3,
            storage_type: StoragePreference::NvmeSsd,
            network_performance: NetworkPreference::Any,
        };
        assert_ne!(capacity.code(), technical.code());
        assert_ne!(capacity.message(), technical.message());
        assert_eq!(ErrorResponse::from(&capacity).code.as_deref(), Some("no_capacity_match"));
    }
}
