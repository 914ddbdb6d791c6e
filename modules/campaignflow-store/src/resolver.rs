//! Topic resolver — the deduplication policy for intake.
//!
//! Exact matches strictly precede substring matches and the two tiers are
//! never merged: a re-phrased-but-identical topic resolves to the existing
//! campaign alone, while a genuinely new query still surfaces loosely
//! related ongoing campaigns.

use campaignflow_common::Campaign;

fn normalize(topic: &str) -> String {
    topic.trim().to_lowercase()
}

/// Two-tier match over `campaigns`: tier one is exact equality of normalized
/// topics; tier two (only when tier one is empty) is substring containment
/// of the normalized query in the normalized topic.
pub fn find_by_topic(campaigns: Vec<Campaign>, query: &str) -> Vec<Campaign> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut exact = Vec::new();
    let mut partial = Vec::new();

    for campaign in campaigns {
        let topic = normalize(&campaign.topic);
        if topic == needle {
            exact.push(campaign);
        } else if topic.contains(&needle) {
            partial.push(campaign);
        }
    }

    if exact.is_empty() {
        partial
    } else {
        exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(topic: &str) -> Campaign {
        Campaign::new(topic, None, None)
    }

    #[test]
    fn exact_tier_excludes_partial_matches() {
        let campaigns = vec![campaign("Cats"), campaign("Cats and Dogs")];
        let found = find_by_topic(campaigns, "cats");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].topic, "Cats");
    }

    #[test]
    fn substring_tier_reached_only_without_exact_match() {
        let campaigns = vec![campaign("Cats"), campaign("Cats and Dogs")];
        let found = find_by_topic(campaigns, "dog");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].topic, "Cats and Dogs");
    }

    #[test]
    fn normalization_trims_and_case_folds_both_sides() {
        let campaigns = vec![campaign("  Electric Vehicles  ")];
        let found = find_by_topic(campaigns, "electric vehicles");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn no_match_returns_empty() {
        let campaigns = vec![campaign("Cats")];
        assert!(find_by_topic(campaigns, "quantum computing").is_empty());
    }

    #[test]
    fn empty_query_matches_nothing() {
        let campaigns = vec![campaign("Cats")];
        assert!(find_by_topic(campaigns, "   ").is_empty());
    }
}
