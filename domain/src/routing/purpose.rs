//! Routing purpose value object

use serde::{Deserialize, Serialize};

/// A named routing category used to pick a provider order.
///
/// Unknown names are kept as `Other` and resolve to the fallback order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoutingPurpose {
    Planning,
    Coding,
    Reviewing,
    Fallback,
    Other(String),
}

impl RoutingPurpose {
    pub const KNOWN: [RoutingPurpose; 4] = [
        RoutingPurpose::Planning,
        RoutingPurpose::Coding,
        RoutingPurpose::Reviewing,
        RoutingPurpose::Fallback,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RoutingPurpose::Planning => "planning",
            RoutingPurpose::Coding => "coding",
            RoutingPurpose::Reviewing => "reviewing",
            RoutingPurpose::Fallback => "fallback",
            RoutingPurpose::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RoutingPurpose::Other(_))
    }

    /// Built-in provider order for this purpose.
    pub fn default_order(&self) -> &'static [&'static str] {
        match self {
            RoutingPurpose::Planning => &["openai", "anthropic", "gemini", "mistral", "grok", "mock"],
            RoutingPurpose::Coding => &["mistral", "openai", "deepseek", "mock"],
            RoutingPurpose::Reviewing => &["anthropic", "openai", "gemini", "mock"],
            RoutingPurpose::Fallback | RoutingPurpose::Other(_) => &["mock"],
        }
    }
}

impl From<&str> for RoutingPurpose {
    fn from(s: &str) -> Self {
        match s {
            "planning" => RoutingPurpose::Planning,
            "coding" => RoutingPurpose::Coding,
            "reviewing" => RoutingPurpose::Reviewing,
            "fallback" => RoutingPurpose::Fallback,
            other => RoutingPurpose::Other(other.to_string()),
        }
    }
}

impl From<String> for RoutingPurpose {
    fn from(s: String) -> Self {
        RoutingPurpose::from(s.as_str())
    }
}

impl From<RoutingPurpose> for String {
    fn from(purpose: RoutingPurpose) -> Self {
        purpose.as_str().to_string()
    }
}

impl std::fmt::Display for RoutingPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_orders() {
        assert_eq!(RoutingPurpose::Planning.default_order()[0], "openai");
        assert_eq!(RoutingPurpose::Coding.default_order()[0], "mistral");
        assert_eq!(RoutingPurpose::Reviewing.default_order()[0], "anthropic");
        assert_eq!(RoutingPurpose::Fallback.default_order(), &["mock"]);
    }

    #[test]
    fn test_unknown_purpose_uses_fallback_order() {
        let purpose = RoutingPurpose::from("summarizing");
        assert!(!purpose.is_known());
        assert_eq!(purpose.default_order(), RoutingPurpose::Fallback.default_order());
        assert_eq!(purpose.as_str(), "summarizing");
    }

    #[test]
    fn test_every_known_order_ends_with_mock() {
        for purpose in RoutingPurpose::KNOWN {
            assert_eq!(purpose.default_order().last(), Some(&"mock"));
        }
    }
}
