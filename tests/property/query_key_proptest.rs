//! Property-based tests for query key prefix matching

use proptest::prelude::*;

use chatlink::client::QueryKey;

fn key(segments: &[String]) -> QueryKey {
    segments[1..]
        .iter()
        .fold(QueryKey::new(segments[0].clone()), |key, s| key.with(s))
}

proptest! {
    #[test]
    fn test_key_matches_its_prefixes(segments in prop::collection::vec("[a-z]{1,6}", 1..5)) {
        let full = key(&segments);
        for len in 1..=segments.len() {
            prop_assert!(full.starts_with(&key(&segments[..len])));
        }
    }

    #[test]
    fn test_partial_segment_is_not_a_prefix(resource in "[a-z]{2,8}", param in "[a-z0-9]{1,6}") {
        let full = QueryKey::new(resource.clone()).with(&param);
        let truncated = QueryKey::new(resource[..resource.len() - 1].to_string());
        prop_assert!(!full.starts_with(&truncated));
    }
}
