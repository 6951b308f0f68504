//! Ancillary infrastructure suggestions from trigger rules

use std::collections::HashSet;

use crate::models::{Archetype, DbSize, ProjectDescription, ServiceSuggestion, TrafficLevel};
use crate::rules::{RuleTables, ServiceRule, ServiceTriggers};

impl ServiceTriggers {
    /// True when any trigger matches, checked tags first, then database
    /// size, then traffic
    pub fn matches(
        &self,
        tags: &HashSet<&str>,
        db_size: Option<DbSize>,
        traffic: Option<TrafficLevel>,
    ) -> bool {
        let by_tags = || {
            self.tags
                .as_ref()
                .is_some_and(|wanted| wanted.iter().any(|t| tags.contains(t.as_str())))
        };
        let by_db_size = || {
            self.db_size
                .as_ref()
                .zip(db_size)
                .is_some_and(|(sizes, size)| sizes.contains(&size))
        };
        let by_traffic = || {
            self.traffic
                .as_ref()
                .zip(traffic)
                .is_some_and(|(levels, level)| levels.contains(&level))
        };

        by_tags() || by_db_size() || by_traffic()
    }
}

impl From<&ServiceRule> for ServiceSuggestion {
    fn from(rule: &ServiceRule) -> Self {
        Self {
            title: rule.title.clone(),
            description: rule.description.clone(),
            services: rule.services.clone(),
        }
    }
}

/// Evaluates service rules against a project
pub struct SuggestionEngine<'a> {
    rules: &'a RuleTables,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// Triggered suggestions in rule-table order, each rule at most once.
    ///
    /// The effective tag set is the caller's tags plus the canonical tags
    /// of the resolved archetype. Database size and traffic are matched
    /// against what the caller actually sent.
    pub fn suggest(&self, desc: &ProjectDescription, archetype: Archetype) -> Vec<ServiceSuggestion> {
        let tags: HashSet<&str> = desc
            .custom_tags
            .iter()
            .chain(self.rules.canonical_tags(archetype))
            .map(String::as_str)
            .collect();

        let mut fired = HashSet::new();
        self.rules
            .services
            .iter()
            .filter(|rule| rule.triggers.matches(&tags, desc.db_size, desc.traffic))
            .filter(|rule| fired.insert(rule.key.as_str()))
            .map(ServiceSuggestion::from)
            .collect()
    }
}
