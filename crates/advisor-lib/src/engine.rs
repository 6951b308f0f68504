//! End-to-end recommendation pipeline
//!
//! translate -> query -> filter -> score -> rank, with service suggestions
//! computed alongside.

use std::sync::Arc;
use tracing::debug;

use crate::catalog::CatalogRepository;
use crate::error::RecommendResult;
use crate::filter::filter_eligible;
use crate::models::{NoMatch, ProjectDescription, Recommendation, RecommendOutcome, ResolvedRequirement};
use crate::rules::RuleTables;
use crate::scoring::{rank, CostRange, ScoringEngine};
use crate::suggestions::SuggestionEngine;
use crate::translator::RequirementTranslator;

/// Recommends catalog instances for project descriptions.
///
/// Cheap to clone; the rule tables and catalog are shared.
#[derive(Clone)]
pub struct Recommender {
    rules: Arc<RuleTables>,
    catalog: Arc<dyn CatalogRepository>,
}

impl Recommender {
    pub fn new(rules: Arc<RuleTables>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { rules, catalog }
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    pub fn catalog(&self) -> &dyn CatalogRepository {
        self.catalog.as_ref()
    }

    /// Run the full pipeline for one request.
    ///
    /// Invalid input fails before the catalog is queried. Empty candidate
    /// sets are reported as [`RecommendOutcome::NoMatch`], not errors.
    pub fn recommend(&self, desc: &ProjectDescription) -> RecommendResult<RecommendOutcome> {
        let requirement = RequirementTranslator::new(&self.rules).translate(desc)?;
        debug!(
            archetype = %requirement.archetype,
            min_vcpu = requirement.min_vcpu,
            min_ram = requirement.min_ram,
            priority = %requirement.priority,
            "Resolved requirement"
        );

        let candidates = self
            .catalog
            .query(requirement.min_vcpu, requirement.min_ram)?;
        if candidates.is_empty() {
            return Ok(RecommendOutcome::NoMatch(NoMatch::Capacity {
                min_vcpu: requirement.min_vcpu,
                min_ram: requirement.min_ram,
            }));
        }

        let candidate_count = candidates.len();
        let eligible = filter_eligible(candidates, &requirement);
        debug!(candidates = candidate_count, eligible = eligible.len(), "Filtered candidates");

        let Some(cost_range) = CostRange::from_instances(&eligible) else {
            return Ok(RecommendOutcome::NoMatch(NoMatch::Technical {
                candidates: candidate_count,
                storage_type: requirement.storage_type,
                network_performance: requirement.network_performance,
            }));
        };

        let results = rank(ScoringEngine::new(&requirement, cost_range).score_all(eligible));
        let suggestions = SuggestionEngine::new(&self.rules).suggest(desc, requirement.archetype);

        Ok(RecommendOutcome::Recommended(Recommendation {
            results,
            explanation: explain(&requirement),
            suggestions,
            requirement: Some(requirement),
        }))
    }
}

fn explain(requirement: &ResolvedRequirement) -> String {
    format!(
        "Based on your project's features, we identified it as a '{}' workload, \
         scaled for '{}' traffic. Below are all suitable configurations, sorted by \
         our recommendation score.",
        requirement.archetype.display_name(),
        requirement.traffic
    )
}
