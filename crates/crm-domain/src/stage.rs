//! Pipeline Stage Entity
//!
//! A named step in a sales pipeline. Stages belong to one company and are
//! shown in `order`, which the server keeps dense (0..N-1).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Stage category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageCategory {
    #[default]
    Open,
    Won,
    Lost,
}

impl StageCategory {
    pub const ALL: [StageCategory; 3] = [StageCategory::Open, StageCategory::Won, StageCategory::Lost];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageCategory::Open => "open",
            StageCategory::Won => "won",
            StageCategory::Lost => "lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageCategory::Open => "Open",
            StageCategory::Won => "Won",
            StageCategory::Lost => "Lost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A pipeline stage as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub order: i32,
    #[serde(default)]
    pub category: StageCategory,
    /// Win probability, 0-100
    #[serde(default)]
    pub probability: u8,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex color, e.g. "#4caf50"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub auto_advance: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Stage {
    pub fn new(id: impl Into<String>, company_id: impl Into<String>, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            company_id: company_id.into(),
            name: name.into(),
            order,
            category: StageCategory::Open,
            probability: 0,
            is_active: true,
            is_default: false,
            description: None,
            color: None,
            auto_advance: false,
            auto_advance_days: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Default stages can be neither dragged nor deleted
    pub fn is_locked(&self) -> bool {
        self.is_default
    }

    /// Update body carrying the stage's current editable fields
    pub fn to_input(&self) -> StageInput {
        StageInput {
            name: self.name.clone(),
            category: self.category,
            probability: self.probability,
            is_active: self.is_active,
            description: self.description.clone(),
            color: self.color.clone(),
            auto_advance: self.auto_advance,
            auto_advance_days: self.auto_advance_days,
        }
    }
}

impl Entity for Stage {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Active/inactive filter for the stage list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    /// Value for the `isActive` query parameter, if any
    pub fn as_query(&self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(true),
            StatusFilter::Inactive => Some(false),
        }
    }

    pub fn matches(&self, is_active: bool) -> bool {
        self.as_query().map_or(true, |wanted| wanted == is_active)
    }
}

/// Create/update body for a stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInput {
    pub name: String,
    pub category: StageCategory,
    pub probability: u8,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub auto_advance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_advance_days: Option<u32>,
}

/// One `{id, order}` pair of a reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: String,
    pub order: i32,
}

/// PATCH body for the reorder endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub stages: Vec<ReorderEntry>,
}

impl ReorderRequest {
    pub fn from_stages(stages: &[Stage]) -> Self {
        Self {
            stages: stages
                .iter()
                .map(|s| ReorderEntry { id: s.id.clone(), order: s.order })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_deserializes_camel_case() {
        let json = r#"{
            "id": "s1",
            "companyId": "c1",
            "name": "Qualified",
            "order": 2,
            "category": "won",
            "probability": 80,
            "isActive": false,
            "isDefault": true,
            "autoAdvance": true,
            "autoAdvanceDays": 7,
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let stage: Stage = serde_json::from_str(json).unwrap();
        assert_eq!(stage.company_id, "c1");
        assert_eq!(stage.category, StageCategory::Won);
        assert_eq!(stage.probability, 80);
        assert!(!stage.is_active);
        assert!(stage.is_locked());
        assert_eq!(stage.auto_advance_days, Some(7));
        assert!(stage.created_at.is_some());
    }

    #[test]
    fn test_stage_defaults_for_missing_fields() {
        let stage: Stage = serde_json::from_str(r#"{"id":"s","companyId":"c","name":"New","order":0}"#).unwrap();
        assert!(stage.is_active);
        assert!(!stage.is_default);
        assert_eq!(stage.category, StageCategory::Open);
    }

    #[test]
    fn test_reorder_request_shape() {
        let stages = vec![Stage::new("a", "c", "A", 0), Stage::new("b", "c", "B", 1)];
        let body = serde_json::to_value(ReorderRequest::from_stages(&stages)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"stages": [{"id": "a", "order": 0}, {"id": "b", "order": 1}]})
        );
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(false));
        assert!(StatusFilter::Active.matches(true));
        assert!(!StatusFilter::Active.matches(false));
        assert!(StatusFilter::Inactive.matches(false));
        assert_eq!(StatusFilter::parse("inactive"), Some(StatusFilter::Inactive));
    }
}
