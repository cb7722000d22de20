//! Property-based tests using proptest
//!
//! These tests verify locator parsing, resource pattern splitting and
//! matching semantics using randomized inputs.

use arnscan::arn::{split_resource, Matcher};
use arnscan::{Arn, Config, Query, Registry};
use proptest::prelude::*;
use std::sync::Arc;

/// Literal-safe token (no regex metacharacters, no separators)
fn arb_token() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,12}"
}

fn arb_choices() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_token(), 0..20)
}

proptest! {
    /// Wildcard keeps every candidate, in order
    #[test]
    fn wildcard_matches_all(choices in arb_choices()) {
        let matcher = Matcher::new("*").unwrap();
        prop_assert_eq!(matcher.filter(&choices), choices);
    }

    /// Matching never adds or reorders candidates
    #[test]
    fn matches_are_ordered_subset(choices in arb_choices(), pattern in "[a-z0-9]{1,3}") {
        let matcher = Matcher::new(&pattern).unwrap();
        let matched = matcher.filter(&choices);

        let mut remaining = choices.iter();
        for m in &matched {
            prop_assert!(remaining.any(|c| c == m));
        }
    }

    /// A literal pattern matches exactly the candidates containing it
    #[test]
    fn literal_is_substring_search(choices in arb_choices(), pattern in "[a-z0-9]{1,3}") {
        let matcher = Matcher::new(&pattern).unwrap();
        let expected: Vec<String> = choices
            .iter()
            .filter(|c| c.contains(pattern.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(matcher.filter(&choices), expected);
    }

    /// `type/id` splits at the first slash
    #[test]
    fn slash_split(resource_type in arb_token(), id in "[a-zA-Z0-9:/._-]{0,20}") {
        let pattern = format!("{}/{}", resource_type, id);
        let split = split_resource(&pattern);
        prop_assert_eq!(split.resource_type, resource_type.as_str());
        prop_assert_eq!(split.resource_id, Some(id.as_str()));
    }

    /// `type:id` splits at the first colon when there is no slash
    #[test]
    fn colon_split(resource_type in arb_token(), id in "[a-zA-Z0-9:._-]{0,20}") {
        let pattern = format!("{}:{}", resource_type, id);
        let split = split_resource(&pattern);
        prop_assert_eq!(split.resource_type, resource_type.as_str());
        prop_assert_eq!(split.resource_id, Some(id.as_str()));
    }

    /// Partial locators are padded with wildcards
    #[test]
    fn partial_locators_are_padded(tokens in prop::collection::vec(arb_token(), 1..=6)) {
        let locator = tokens.join(":");
        let arn = Arn::new(&locator, Arc::new(Registry::new()), &Config::default()).unwrap();

        let mut expected = tokens.clone();
        expected.resize(6, "*".to_string());
        prop_assert_eq!(arn.to_string(), expected.join(":"));
    }

    /// Valid dot paths always compile
    #[test]
    fn dot_paths_compile(segments in prop::collection::vec("[A-Za-z_][A-Za-z0-9_]{0,8}", 1..5)) {
        let path = segments.join(".");
        let query = Query::compile(&path).unwrap();
        prop_assert_eq!(query.to_string(), path);
    }
}
