//! Archetype inference from free-form project tags

use std::collections::HashSet;

use crate::models::Archetype;
use crate::rules::RuleTables;

/// Archetype used when the caller supplies no tags at all
pub const EMPTY_TAGS_ARCHETYPE: Archetype = Archetype::BlogPortfolio;

/// Archetype used when tags are given but none overlap a canonical set
pub const NO_OVERLAP_ARCHETYPE: Archetype = Archetype::InteractiveApp;

/// Pick the archetype whose canonical tag set overlaps `tags` the most.
///
/// Ties go to the earliest archetype in the rule tables' tag order.
pub fn classify<S: AsRef<str>>(rules: &RuleTables, tags: &[S]) -> Archetype {
    if tags.is_empty() {
        return EMPTY_TAGS_ARCHETYPE;
    }

    let wanted: HashSet<&str> = tags.iter().map(AsRef::as_ref).collect();

    let mut best: Option<(Archetype, usize)> = None;
    for entry in &rules.archetype_tags {
        let canonical: HashSet<&str> = entry.tags.iter().map(String::as_str).collect();
        let overlap = canonical.intersection(&wanted).count();
        if best.map_or(true, |(_, top)| overlap > top) {
            best = Some((entry.archetype, overlap));
        }
    }

    match best {
        Some((archetype, overlap)) if overlap > 0 => archetype,
        _ => NO_OVERLAP_ARCHETYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> RuleTables {
        RuleTables::default()
    }

    #[test]
    fn test_empty_tags_use_lowest_resource_default() {
        let empty: [&str; 0] = [];
        assert_eq!(classify(&rules(), &empty), Archetype::BlogPortfolio);
    }

    #[test]
    fn test_no_overlap_uses_different_default() {
        assert_eq!(classify(&rules(), &["blockchain", "vr"]), Archetype::InteractiveApp);
        assert_ne!(EMPTY_TAGS_ARCHETYPE, NO_OVERLAP_ARCHETYPE);
    }

    #[test]
    fn test_payments_and_search_match_ecommerce() {
        // booking_system also overlaps on both tags; ecommerce is listed first
        assert_eq!(classify(&rules(), &["payments", "search"]), Archetype::Ecommerce);
    }

    #[test]
    fn test_highest_overlap_wins() {
        let tags = ["logins", "real_time", "uploads"];
        assert_eq!(classify(&rules(), &tags), Archetype::InteractiveApp);

        let tags = ["datasets", "compute_heavy"];
        assert_eq!(classify(&rules(), &tags), Archetype::DataAnalytics);

        let tags = ["payments", "real_time", "write_heavy"];
        assert_eq!(classify(&rules(), &tags), Archetype::BookingSystem);
    }

    #[test]
    fn test_duplicate_tags_count_once() {
        let tags = ["text_content", "text_content", "text_content"];
        assert_eq!(classify(&rules(), &tags), Archetype::BlogPortfolio);

        // a single read_heavy tag ties three archetypes; first listed wins
        let tags = ["read_heavy", "read_heavy"];
        assert_eq!(classify(&rules(), &tags), Archetype::Ecommerce);
    }

    #[test]
    fn test_empty_tag_table_falls_back() {
        let mut rules = rules();
        rules.archetype_tags.clear();
        assert_eq!(classify(&rules, &["payments"]), NO_OVERLAP_ARCHETYPE);
    }
}
