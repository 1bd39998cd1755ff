//! Plan policy — the ACL/confirmation contract consulted by planner and
//! executor.

use serde::{Deserialize, Serialize};

/// Access-control and confirmation requirements attached to a plan.
///
/// `confirmation_level` is compared, never combined, against a
/// caller-supplied level; there is no implicit elevation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPolicy {
    /// Capability tags a step's tool must intersect under strict ACL.
    #[serde(default)]
    pub acl_tags: Vec<String>,
    /// Minimum confirmation level the caller must supply.
    #[serde(default)]
    pub confirmation_level: u8,
}

impl PlanPolicy {
    pub fn new(acl_tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            acl_tags: acl_tags.into_iter().map(Into::into).collect(),
            confirmation_level: 0,
        }
    }

    pub fn with_confirmation_level(mut self, level: u8) -> Self {
        self.confirmation_level = level;
        self
    }

    /// Whether the caller's level is insufficient for this plan.
    pub fn requires_confirmation(&self, provided_level: u8) -> bool {
        provided_level < self.confirmation_level
    }

    /// Whether a tool's ACL tag satisfies this policy.
    ///
    /// An empty tag set grants everything (the rule declared no ACL).
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.acl_tags.is_empty() || self.acl_tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_confirmation_compares_only() {
        let policy = PlanPolicy::new(["fs.write"]).with_confirmation_level(1);
        assert!(policy.requires_confirmation(0));
        assert!(!policy.requires_confirmation(1));
        assert!(!policy.requires_confirmation(2));
    }

    #[test]
    fn test_zero_level_never_requires_confirmation() {
        let policy = PlanPolicy::new(["fs.read"]);
        assert!(!policy.requires_confirmation(0));
    }

    #[test]
    fn test_allows_tag() {
        let policy = PlanPolicy::new(["fs.read", "system"]);
        assert!(policy.allows_tag("fs.read"));
        assert!(!policy.allows_tag("fs.write"));
    }

    #[test]
    fn test_empty_tags_allow_everything() {
        let policy = PlanPolicy::default();
        assert!(policy.allows_tag("fs.write"));
    }
}
