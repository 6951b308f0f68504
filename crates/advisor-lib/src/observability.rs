//! Observability for the advisor service
//!
//! Provides:
//! - Prometheus metrics (request latency, outcomes, catalog size, candidate counts)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Histogram, IntCounterVec,
    IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

use crate::error::RecommendError;
use crate::models::{NoMatch, Recommendation};

/// Histogram buckets for request latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Buckets for the number of instances surviving the filter
const CANDIDATE_BUCKETS: &[f64] = &[0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0];

/// Outcome labels for `instance_advisor_recommendations_total`
pub mod outcomes {
    pub const RECOMMENDED: &str = "recommended";
    pub const NO_CAPACITY_MATCH: &str = "no_capacity_match";
    pub const NO_TECHNICAL_MATCH: &str = "no_technical_match";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

static GLOBAL_METRICS: OnceLock<AdvisorMetricsInner> = OnceLock::new();

struct AdvisorMetricsInner {
    recommend_latency_seconds: Histogram,
    recommendations_total: IntCounterVec,
    catalog_instances: IntGauge,
    eligible_candidates: Histogram,
}

impl AdvisorMetricsInner {
    fn new() -> Self {
        Self {
            recommend_latency_seconds: register_histogram!(
                "instance_advisor_recommend_latency_seconds",
                "Time spent producing one recommendation",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register recommend_latency_seconds"),

            recommendations_total: register_int_counter_vec!(
                "instance_advisor_recommendations_total",
                "Recommendation requests by outcome",
                &["outcome"]
            )
            .expect("Failed to register recommendations_total"),

            catalog_instances: register_int_gauge!(
                "instance_advisor_catalog_instances",
                "Number of instances in the loaded catalog"
            )
            .expect("Failed to register catalog_instances"),

            eligible_candidates: register_histogram!(
                "instance_advisor_eligible_candidates",
                "Instances left after capacity and technical filtering",
                CANDIDATE_BUCKETS.to_vec()
            )
            .expect("Failed to register eligible_candidates"),
        }
    }
}

/// Handle to the process-wide advisor metrics.
///
/// Clones share the same underlying collectors in the default registry.
#[derive(Clone)]
pub struct AdvisorMetrics {
    inner: &'static AdvisorMetricsInner,
}

impl Default for AdvisorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorMetrics {
    pub fn new() -> Self {
        Self {
            inner: GLOBAL_METRICS.get_or_init(AdvisorMetricsInner::new),
        }
    }

    pub fn observe_recommend_latency(&self, duration_secs: f64) {
        self.inner.recommend_latency_seconds.observe(duration_secs);
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.inner
            .recommendations_total
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.inner
            .recommendations_total
            .with_label_values(&[outcome])
            .get()
    }

    pub fn set_catalog_instances(&self, count: usize) {
        self.inner.catalog_instances.set(count as i64);
    }

    pub fn observe_eligible_candidates(&self, count: usize) {
        self.inner.eligible_candidates.observe(count as f64);
    }
}

/// Structured logger for advisor events
#[derive(Clone)]
pub struct StructuredLogger {
    instance_name: String,
}

impl StructuredLogger {
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
        }
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn log_startup(&self, version: &str, catalog_instances: usize, rules_source: &str) {
        info!(
            event = "advisor_started",
            instance = %self.instance_name,
            advisor_version = %version,
            catalog_instances = catalog_instances,
            rules_source = %rules_source,
            "Instance advisor started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "advisor_shutdown",
            instance = %self.instance_name,
            reason = %reason,
            "Instance advisor shutting down"
        );
    }

    pub fn log_catalog_loaded(&self, path: &str, instances: usize) {
        if instances == 0 {
            warn!(
                event = "catalog_loaded",
                instance = %self.instance_name,
                path = %path,
                instances = 0,
                "Loaded an empty catalog, every request will report no match"
            );
        } else {
            info!(
                event = "catalog_loaded",
                instance = %self.instance_name,
                path = %path,
                instances = instances,
                "Loaded instance catalog"
            );
        }
    }

    pub fn log_recommendation(&self, recommendation: &Recommendation, latency_secs: f64) {
        let requirement = recommendation.requirement.as_ref();
        info!(
            event = "recommendation_generated",
            instance = %self.instance_name,
            archetype = ?requirement.map(|r| r.archetype.as_str()),
            min_vcpu = ?requirement.map(|r| r.min_vcpu),
            min_ram = ?requirement.map(|r| r.min_ram),
            results = recommendation.results.len(),
            top = ?recommendation.results.first().map(|r| r.instance.name.as_str()),
            suggestions = recommendation.suggestions.len(),
            latency_secs = latency_secs,
            "Generated instance recommendation"
        );
    }

    pub fn log_no_match(&self, no_match: &NoMatch) {
        match no_match {
            NoMatch::Capacity { min_vcpu, min_ram } => info!(
                event = "recommendation_no_match",
                instance = %self.instance_name,
                code = no_match.code(),
                min_vcpu = *min_vcpu,
                min_ram = *min_ram,
                "No instance meets the capacity requirement"
            ),
            NoMatch::Technical {
                candidates,
                storage_type,
                network_performance,
            } => info!(
                event = "recommendation_no_match",
                instance = %self.instance_name,
                code = no_match.code(),
                candidates = *candidates,
                storage_type = %storage_type,
                network_performance = %network_performance,
                "No capacity candidate meets the technical constraints"
            ),
        }
    }

    /// Full error detail stays in the log; callers only see the generic message
    pub fn log_internal_error(&self, err: &RecommendError) {
        error!(
            event = "recommendation_failed",
            instance = %self.instance_name,
            error = %err,
            "Recommendation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handles_share_registry() {
        let metrics = AdvisorMetrics::new();
        let clone = AdvisorMetrics::new();

        let before = metrics.outcome_count(outcomes::NO_TECHNICAL_MATCH);
        clone.record_outcome(outcomes::NO_TECHNICAL_MATCH);
        assert_eq!(metrics.outcome_count(outcomes::NO_TECHNICAL_MATCH), before + 1);

        metrics.observe_recommend_latency(0.002);
        metrics.set_catalog_instances(42);
        metrics.observe_eligible_candidates(7);
    }

    #[test]
    fn test_metrics_exposed_in_default_registry() {
        let metrics = AdvisorMetrics::new();
        metrics.record_outcome(outcomes::RECOMMENDED);

        let names: Vec<String> = prometheus::gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"instance_advisor_recommendations_total".to_string()));
        assert!(names.contains(&"instance_advisor_catalog_instances".to_string()));
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("advisor-0");
        assert_eq!(logger.instance_name(), "advisor-0");
        logger.log_no_match(&NoMatch::Capacity {
            min_vcpu: 16,
            min_ram: 98,
        });
    }
}
