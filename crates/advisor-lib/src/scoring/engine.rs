//! Composite fitness scoring of eligible candidates

use super::fit::{fit_score, overkill_ratio, FitRegime};
use crate::models::{
    InstanceRecord, ResolvedRequirement, ScoreBreakdown, ScoredInstance, WorkloadPattern,
};

/// Starting suitability before category contributions
pub const SUITABILITY_BASE: f64 = 0.5;

/// Divisor applied to each category contribution
pub const SUITABILITY_DIVISOR: f64 = 4.0;

const SUITABILITY_CAP: f64 = 1.0;

/// Monthly cost bounds over the eligible set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
}

impl CostRange {
    /// Bounds of `instances`, or `None` for an empty set
    pub fn from_instances(instances: &[InstanceRecord]) -> Option<Self> {
        let mut costs = instances.iter().map(|inst| inst.cost_per_month);
        let first = costs.next()?;
        Some(costs.fold(Self { min: first, max: first }, |range, cost| Self {
            min: range.min.min(cost),
            max: range.max.max(cost),
        }))
    }

    /// 1.0 for the cheapest candidate, 0.0 for the most expensive.
    /// Every candidate scores 1.0 when all costs are equal.
    pub fn normalize(&self, cost: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            1.0
        } else {
            1.0 - (cost - self.min) / span
        }
    }
}

/// (cpu, ram) weights of the performance score
fn resource_weights(pattern: WorkloadPattern) -> (f64, f64) {
    if pattern.is_memory_bound() {
        (0.4, 0.6)
    } else {
        (0.6, 0.4)
    }
}

/// Scores candidates against one resolved requirement
pub struct ScoringEngine<'a> {
    requirement: &'a ResolvedRequirement,
    cost_range: CostRange,
    regime: FitRegime,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(requirement: &'a ResolvedRequirement, cost_range: CostRange) -> Self {
        Self {
            requirement,
            cost_range,
            regime: FitRegime::for_weights(&requirement.weights),
        }
    }

    /// Score a single instance, wrapping it with its score
    pub fn score(&self, instance: InstanceRecord) -> ScoredInstance {
        let req = self.requirement;

        let cpu_ratio = overkill_ratio(f64::from(instance.vcpu), req.min_vcpu);
        let ram_ratio = overkill_ratio(instance.ram, req.min_ram);
        let cpu_fit = fit_score(cpu_ratio, self.regime);
        let ram_fit = fit_score(ram_ratio, self.regime);

        let (cpu_weight, ram_weight) = resource_weights(req.workload_pattern);
        let performance = cpu_fit * cpu_weight + ram_fit * ram_weight;

        let suitability = req
            .suitability_focus
            .iter()
            .fold(SUITABILITY_BASE, |acc, (category, weight)| {
                acc + instance.suitability.get(*category) * weight / SUITABILITY_DIVISOR
            })
            .min(SUITABILITY_CAP);

        let cost = self.cost_range.normalize(instance.cost_per_month);

        let score = (performance * req.weights.perf + cost * req.weights.cost) * suitability;

        ScoredInstance {
            instance,
            score,
            breakdown: ScoreBreakdown {
                cpu_fit,
                ram_fit,
                performance,
                cost,
                suitability,
            },
        }
    }

    pub fn score_all(&self, instances: Vec<InstanceRecord>) -> Vec<ScoredInstance> {
        instances.into_iter().map(|inst| self.score(inst)).collect()
    }
}
