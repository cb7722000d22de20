//! Region candidates per service
//!
//! Some services only run in a subset of regions, and global services
//! (IAM, Route 53) carry an empty region in their ARNs.

/// All known regions
pub const ALL_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "sa-east-1",
];

const LIMITED_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
];

const NO_REGION: &[&str] = &[""];

const LAMBDA_REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "ap-northeast-1"];

const SERVICE_REGIONS: &[(&str, &[&str])] = &[
    ("redshift", LIMITED_REGIONS),
    ("glacier", LIMITED_REGIONS),
    ("kinesis", LIMITED_REGIONS),
    ("iam", NO_REGION),
    ("route53", NO_REGION),
    ("lambda", LAMBDA_REGIONS),
];

/// Regions a service is available in
pub fn regions_for_service(service: &str) -> &'static [&'static str] {
    SERVICE_REGIONS
        .iter()
        .find(|(name, _)| *name == service)
        .map(|(_, regions)| *regions)
        .unwrap_or(ALL_REGIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_service_uses_table() {
        assert_eq!(regions_for_service("lambda"), LAMBDA_REGIONS);
        assert_eq!(regions_for_service("redshift").len(), 6);
        assert!(!regions_for_service("kinesis").contains(&"us-west-1"));
    }

    #[test]
    fn test_global_service_has_empty_region() {
        assert_eq!(regions_for_service("iam"), &[""]);
        assert_eq!(regions_for_service("route53"), &[""]);
    }

    #[test]
    fn test_unknown_service_gets_all_regions() {
        assert_eq!(regions_for_service("ec2"), ALL_REGIONS);
        assert_eq!(regions_for_service(""), ALL_REGIONS);
    }
}
