//! Response models for the marketplace backend API.

use serde::{Deserialize, Serialize};

/// Top-level industry vertical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Industry {
    pub id: u64,
    pub slug: String,
    pub name: String,
    /// Number of published knowledge items under the industry.
    #[serde(default)]
    pub knowledge_count: u64,
}

/// Topic nested under an industry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Topic {
    pub id: u64,
    pub slug: String,
    pub name: String,
}

/// Industry detail with its topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryDetail {
    pub industry: Industry,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// Published knowledge item (report, insight, data set, manual, course).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knowledge {
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub paid: bool,
}

/// Country lookup row used by onboarding forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub iso2: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_kind_uses_wire_name() {
        let raw = r#"{"slug":"energy-outlook","type":"report","title":"Energy Outlook"}"#;
        let item: Knowledge = serde_json::from_str(raw).expect("deserializes");
        assert_eq!(item.kind, "report");
        assert!(!item.paid);
        assert!(item.summary.is_none());
    }

    #[test]
    fn industry_defaults_missing_counts() {
        let raw = r#"{"id":3,"slug":"energy","name":"Energy"}"#;
        let industry: Industry = serde_json::from_str(raw).expect("deserializes");
        assert_eq!(industry.knowledge_count, 0);
    }
}
