//! Hard technical constraints the catalog query cannot express

use crate::models::{InstanceRecord, NetworkPreference, ResolvedRequirement, StoragePreference};

/// Minimum throughput for the "medium" network tier (Gbps)
pub const MEDIUM_NETWORK_GBPS: f64 = 10.0;

/// Minimum throughput for the "high" network tier (Gbps)
pub const HIGH_NETWORK_GBPS: f64 = 25.0;

fn storage_marker(pref: StoragePreference) -> Option<&'static str> {
    match pref {
        StoragePreference::Any => None,
        StoragePreference::Ssd => Some("ssd"),
        StoragePreference::NvmeSsd => Some("nvme"),
    }
}

fn network_floor(pref: NetworkPreference) -> Option<f64> {
    match pref {
        NetworkPreference::Any => None,
        NetworkPreference::Medium => Some(MEDIUM_NETWORK_GBPS),
        NetworkPreference::High => Some(HIGH_NETWORK_GBPS),
    }
}

/// Check an instance against storage and network preferences
pub fn is_eligible(
    instance: &InstanceRecord,
    storage: StoragePreference,
    network: NetworkPreference,
) -> bool {
    if let Some(marker) = storage_marker(storage) {
        let label = instance
            .storage_type
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if !label.contains(marker) {
            return false;
        }
    }

    if let Some(floor) = network_floor(network) {
        if instance.network_gbps.unwrap_or(0.0) < floor {
            return false;
        }
    }

    true
}

/// Keep the candidates satisfying the requirement's hard constraints, in order
pub fn filter_eligible(
    candidates: Vec<InstanceRecord>,
    requirement: &ResolvedRequirement,
) -> Vec<InstanceRecord> {
    candidates
        .into_iter()
        .filter(|inst| {
            is_eligible(inst, requirement.storage_type, requirement.network_performance)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Suitability;

    fn instance(name: &str, storage: Option<&str>, network: Option<f64>) -> InstanceRecord {
        InstanceRecord {
            name: name.to_string(),
            provider: "aws".to_string(),
            cost_per_month: 100.0,
            vcpu: 4,
            ram: 16.0,
            network_gbps: network,
            storage_type: storage.map(str::to_string),
            storage_gb: None,
            suitability: Suitability::default(),
        }
    }

    #[test]
    fn test_any_imposes_nothing() {
        let inst = instance("bare", None, None);
        assert!(is_eligible(&inst, StoragePreference::Any, NetworkPreference::Any));
    }

    #[test]
    fn test_ssd_match_is_case_insensitive() {
        let inst = instance("a", Some("2 x 300 NVMe SSD"), None);
        assert!(is_eligible(&inst, StoragePreference::Ssd, NetworkPreference::Any));
        assert!(is_eligible(&inst, StoragePreference::NvmeSsd, NetworkPreference::Any));

        let ebs = instance("b", Some("EBS only"), None);
        assert!(!is_eligible(&ebs, StoragePreference::Ssd, NetworkPreference::Any));
    }

    #[test]
    fn test_plain_ssd_fails_nvme() {
        let inst = instance("a", Some("1 x 75 SSD"), None);
        assert!(is_eligible(&inst, StoragePreference::Ssd, NetworkPreference::Any));
        assert!(!is_eligible(&inst, StoragePreference::NvmeSsd, NetworkPreference::Any));
    }

    #[test]
    fn test_missing_storage_label_fails_constraint() {
        let inst = instance("a", None, Some(50.0));
        assert!(!is_eligible(&inst, StoragePreference::Ssd, NetworkPreference::Any));
    }

    #[test]
    fn test_network_thresholds_are_inclusive() {
        let ten = instance("ten", None, Some(10.0));
        let twenty_five = instance("25", None, Some(25.0));
        let missing = instance("none", None, None);

        assert!(is_eligible(&ten, StoragePreference::Any, NetworkPreference::Medium));
        assert!(!is_eligible(&ten, StoragePreference::Any, NetworkPreference::High));
        assert!(is_eligible(&twenty_five, StoragePreference::Any, NetworkPreference::High));
        assert!(!is_eligible(&missing, StoragePreference::Any, NetworkPreference::Medium));
    }

    #[test]
    fn test_filter_preserves_order_and_may_be_empty() {
        use crate::models::ProjectDescription;
        use crate::rules::RuleTables;
        use crate::translator::RequirementTranslator;

        let rules = RuleTables::default();
        let req = RequirementTranslator::new(&rules)
            .translate(
                &ProjectDescription::for_app_type("ecommerce")
                    .with_network(NetworkPreference::Medium),
            )
            .unwrap();

        let candidates = vec![
            instance("slow", None, Some(5.0)),
            instance("fast-1", None, Some(12.5)),
            instance("fast-2", None, Some(25.0)),
        ];
        let names: Vec<_> = filter_eligible(candidates, &req)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["fast-1", "fast-2"]);

        let none = filter_eligible(vec![instance("slow", None, Some(1.0))], &req);
        assert!(none.is_empty());
    }
}
