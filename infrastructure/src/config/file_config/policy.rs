//! Risk policy configuration from TOML (`[policy]` section)

use super::issues::{ConfigIssue, ConfigIssueCode};
use conductor_domain::{ExposureLimits, PolicyConfig};
use serde::{Deserialize, Serialize};

/// Raw policy configuration from TOML
///
/// ```toml
/// [policy]
/// allowlist = ["0x00000000000000000000000000000000000000b2"]
/// slippage_bps_limit = 50
/// max_ltv = 0.70
/// max_position_share = 0.20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    pub allowlist: Vec<String>,
    pub slippage_bps_limit: u32,
    pub max_ltv: f64,
    pub max_position_share: f64,
}

impl Default for FilePolicyConfig {
    fn default() -> Self {
        let defaults = PolicyConfig::default();
        let exposure = ExposureLimits::default();
        Self {
            allowlist: defaults.allowlist,
            slippage_bps_limit: defaults.slippage_bps_limit,
            max_ltv: exposure.max_ltv,
            max_position_share: exposure.max_position_share,
        }
    }
}

impl FilePolicyConfig {
    pub fn to_policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            allowlist: self.allowlist.clone(),
            slippage_bps_limit: self.slippage_bps_limit,
        }
    }

    pub fn exposure_limits(&self) -> ExposureLimits {
        ExposureLimits {
            max_ltv: self.max_ltv,
            max_position_share: self.max_position_share,
        }
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.slippage_bps_limit == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "policy.slippage_bps_limit".to_string(),
                    value: "0".to_string(),
                },
                "policy.slippage_bps_limit is 0: every request with slippage will be rejected",
            ));
        }
        for (field, value) in [
            ("policy.max_ltv", self.max_ltv),
            ("policy.max_position_share", self.max_position_share),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                        value: value.to_string(),
                    },
                    format!("{}: {} is outside 0.0..=1.0", field, value),
                ));
            }
        }
        if self.allowlist.iter().any(|a| a.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "policy.allowlist".to_string(),
                    value: String::new(),
                },
                "policy.allowlist: entries cannot be empty",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_config() {
        assert_eq!(
            FilePolicyConfig::default().to_policy_config(),
            PolicyConfig::default()
        );
        assert_eq!(
            FilePolicyConfig::default().exposure_limits(),
            ExposureLimits::default()
        );
    }

    #[test]
    fn test_validate_ranges() {
        let config = FilePolicyConfig {
            slippage_bps_limit: 0,
            max_ltv: 1.5,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(!issues[0].is_error());
        assert!(issues[1].is_error());
        assert!(issues[1].message.contains("policy.max_ltv"));
    }
}
