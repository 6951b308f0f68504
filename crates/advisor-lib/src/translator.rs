//! Translation of a project description into concrete resource thresholds

use crate::classifier::classify;
use crate::error::RecommendResult;
use crate::models::{ArchetypeRequest, ProjectDescription, ResolvedRequirement};
use crate::rules::RuleTables;

/// Converts fuzzy project descriptions into resolved requirements
pub struct RequirementTranslator<'a> {
    rules: &'a RuleTables,
}

impl<'a> RequirementTranslator<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// Resolve the archetype, scale its baseline by traffic and add the
    /// database RAM bonus. Both minimums are rounded up.
    pub fn translate(&self, desc: &ProjectDescription) -> RecommendResult<ResolvedRequirement> {
        let archetype = match desc.archetype_request()? {
            ArchetypeRequest::Known(archetype) => archetype,
            ArchetypeRequest::Custom(tags) => classify(self.rules, tags.as_slice()),
        };

        let profile = self.rules.profile(archetype)?;
        let traffic = desc.traffic_level();
        let multiplier = self.rules.traffic_multiplier(traffic);
        let ram_bonus = self.rules.db_ram_bonus(desc.db_size_tier());

        let priority = desc.priority.unwrap_or_default();

        Ok(ResolvedRequirement {
            min_vcpu: ceil_units(profile.base_vcpu * multiplier.vcpu),
            min_ram: ceil_units(profile.base_ram * multiplier.ram + ram_bonus),
            workload_pattern: profile.workload_pattern,
            suitability_focus: profile.suitability_focus.clone(),
            priority,
            weights: self.rules.priority_weights(priority),
            archetype,
            traffic,
            storage_type: desc.storage_type.unwrap_or_default(),
            network_performance: desc.network_performance.unwrap_or_default(),
        })
    }
}

/// Round a resource amount up to whole units, never below zero
fn ceil_units(value: f64) -> u32 {
    value.max(0.0).ceil() as u32
}
