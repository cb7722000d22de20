//! Resource level pattern splitting

/// The resource token of a locator, split into type and id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern<'a> {
    pub resource_type: &'a str,
    pub resource_id: Option<&'a str>,
}

/// Split `type/id` or `type:id`; `/` wins when both are present
pub fn split_resource(pattern: &str) -> ResourcePattern<'_> {
    let split = pattern.split_once('/').or_else(|| pattern.split_once(':'));

    match split {
        Some((resource_type, resource_id)) => ResourcePattern {
            resource_type,
            resource_id: Some(resource_id),
        },
        None => ResourcePattern {
            resource_type: pattern,
            resource_id: None,
        },
    }
}
