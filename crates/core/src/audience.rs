//! Campaign audience selectors.

use serde::{Deserialize, Serialize};

use crate::validate::Issues;

/// Which subscribers a campaign targets.
///
/// Wire shape: `{"type": "all"}`, `{"type": "subscribed"}`,
/// `{"type": "interest", "value": "documentary"}`,
/// `{"type": "source", "value": "footer"}`. Unknown types are rejected at
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AudienceFilter {
    /// Every subscriber row, including unsubscribed ones.
    All,
    /// Currently subscribed only. The default for campaign sends.
    Subscribed,
    /// Subscribed and interested in `value`.
    Interest { value: String },
    /// Subscribed and acquired via `value`.
    Source { value: String },
}

impl AudienceFilter {
    /// Validate selector contents (the tag itself is enforced by serde).
    pub fn validate_into(&self, issues: &mut Issues) {
        match self {
            AudienceFilter::Interest { value } | AudienceFilter::Source { value } => {
                if value.trim().is_empty() {
                    issues.push("filter.value", "is required for this filter type");
                }
            }
            AudienceFilter::All | AudienceFilter::Subscribed => {}
        }
    }
}

impl Default for AudienceFilter {
    fn default() -> Self {
        AudienceFilter::Subscribed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_shapes() {
        let cases = [
            (serde_json::json!({"type": "all"}), AudienceFilter::All),
            (
                serde_json::json!({"type": "subscribed"}),
                AudienceFilter::Subscribed,
            ),
            (
                serde_json::json!({"type": "interest", "value": "documentary"}),
                AudienceFilter::Interest {
                    value: "documentary".to_string(),
                },
            ),
            (
                serde_json::json!({"type": "source", "value": "footer"}),
                AudienceFilter::Source {
                    value: "footer".to_string(),
                },
            ),
        ];
        for (raw, expected) in cases {
            let parsed: AudienceFilter = serde_json::from_value(raw.clone()).expect("valid");
            assert_eq!(parsed, expected);
            assert_eq!(serde_json::to_value(&parsed).expect("serializable"), raw);
        }
    }

    #[test]
    fn rejects_unknown_filter_type() {
        let result: Result<AudienceFilter, _> =
            serde_json::from_value(serde_json::json!({"type": "everyone"}));
        assert!(result.is_err());
    }

    #[test]
    fn empty_interest_value_is_an_issue() {
        let filter = AudienceFilter::Interest {
            value: "  ".to_string(),
        };
        let mut issues = Issues::new();
        filter.validate_into(&mut issues);
        assert!(!issues.is_empty());
    }
}
