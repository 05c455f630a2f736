//! Lead Entity
//!
//! A prospective customer tracked until it is converted into a contact/deal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;

/// Lead lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Converted,
    Lost,
    /// Also what statuses this console does not know decode to
    // (must be the last variant for `#[serde(other)]`)
    #[default]
    #[serde(other)]
    New,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    /// Converted and lost leads are closed
    pub fn is_convertible(&self) -> bool {
        !matches!(self, LeadStatus::Converted | LeadStatus::Lost)
    }
}

/// Where a lead came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Website,
    Referral,
    SocialMedia,
    Email,
    ColdCall,
    Event,
    #[default]
    #[serde(other)]
    Other,
}

impl LeadSource {
    pub const ALL: [LeadSource; 7] = [
        LeadSource::Website,
        LeadSource::Referral,
        LeadSource::SocialMedia,
        LeadSource::Email,
        LeadSource::ColdCall,
        LeadSource::Event,
        LeadSource::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::Referral => "referral",
            LeadSource::SocialMedia => "social_media",
            LeadSource::Email => "email",
            LeadSource::ColdCall => "cold_call",
            LeadSource::Event => "event",
            LeadSource::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadSource::Website => "Website",
            LeadSource::Referral => "Referral",
            LeadSource::SocialMedia => "Social media",
            LeadSource::Email => "Email",
            LeadSource::ColdCall => "Cold call",
            LeadSource::Event => "Event",
            LeadSource::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

/// A lead as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub company_id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub source: LeadSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Entity for Lead {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Create body for a lead
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub status: LeadStatus,
    pub source: LeadSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_deserializes() {
        let json = r#"{
            "id": "l1",
            "companyId": "c1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "status": "negotiation",
            "source": "cold_call",
            "budget": 1200.5,
            "createdAt": "2024-05-02T08:30:00Z"
        }"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.full_name(), "Ada Lovelace");
        assert_eq!(lead.status, LeadStatus::Negotiation);
        assert_eq!(lead.source, LeadSource::ColdCall);
        assert_eq!(lead.score, None);
        assert_eq!(lead.budget, Some(1200.5));
    }

    #[test]
    fn test_unknown_source_falls_back_to_other() {
        let json = r#"{"id":"l","companyId":"c","firstName":"A","source":"trade_show","createdAt":"2024-01-01T00:00:00Z"}"#;
        let lead: Lead = serde_json::from_str(json).unwrap();
        assert_eq!(lead.source, LeadSource::Other);
    }

    #[test]
    fn test_unknown_status_and_missing_timestamp_still_decode() {
        let json = r#"[
            {"id":"l1","companyId":"c","firstName":"A","status":"archived"},
            {"id":"l2","companyId":"c","firstName":"B","status":"lost","createdAt":"2024-01-01T00:00:00Z"}
        ]"#;
        let leads: Vec<Lead> = serde_json::from_str(json).unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].status, LeadStatus::New);
        assert_eq!(leads[0].created_at, None);
        assert_eq!(leads[1].status, LeadStatus::Lost);
        assert!(leads[1].created_at.is_some());
    }

    #[test]
    fn test_convertible_statuses() {
        assert!(LeadStatus::Qualified.is_convertible());
        assert!(!LeadStatus::Converted.is_convertible());
        assert!(!LeadStatus::Lost.is_convertible());
    }
}
