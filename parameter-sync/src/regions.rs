use std::fmt;

/// Commercial regions where Parameter Store is published.
pub const SSM_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-southeast-5",
    "ap-southeast-7",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "mx-central-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableRegions(Vec<String>);

impl AvailableRegions {
    pub fn new(regions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut regions: Vec<String> = regions
            .into_iter()
            .map(|r| r.into().trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        regions.sort();
        regions.dedup();
        Self(regions)
    }

    /// Parses a comma-separated list, e.g. `eu-west-1,us-east-1`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, region: &str) -> bool {
        self.0.iter().any(|r| r == region)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for AvailableRegions {
    fn default() -> Self {
        Self::new(SSM_REGIONS.iter().copied())
    }
}

impl fmt::Display for AvailableRegions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contains_common_regions() {
        let regions = AvailableRegions::default();
        assert!(regions.contains("us-east-1"));
        assert!(regions.contains("eu-west-1"));
        assert!(!regions.contains("mars-north-1"));
    }

    #[test]
    fn test_parse_trims_and_dedups() {
        let regions = AvailableRegions::parse(" eu-west-1, us-east-1 ,,eu-west-1");
        assert_eq!(regions.as_slice(), &["eu-west-1", "us-east-1"]);
        assert_eq!(regions.to_string(), "eu-west-1, us-east-1");
    }
}
