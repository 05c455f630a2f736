//! Form Validation
//!
//! Drafts hold raw form text. `validate` either yields the typed request body
//! or a field -> message map for the form's helper texts. The server still
//! has the final word; these checks only spare a round trip.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::lead::{LeadInput, LeadSource, LeadStatus};
use crate::stage::{Stage, StageCategory, StageInput};

pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// Field -> message map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9\s\-()]+$").expect("valid phone regex"))
}

/// 7 to 20 characters in total, a leading `+` included
fn is_phone(s: &str) -> bool {
    (7..=20).contains(&s.chars().count()) && phone_regex().is_match(s)
}

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid color regex"))
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

// ========================
// Stage Form
// ========================

pub mod stage_fields {
    pub const NAME: &str = "name";
    pub const CATEGORY: &str = "category";
    pub const PROBABILITY: &str = "probability";
    pub const AUTO_ADVANCE_DAYS: &str = "autoAdvanceDays";
    pub const COLOR: &str = "color";
    pub const DESCRIPTION: &str = "description";
}

/// Raw add/edit stage form
#[derive(Debug, Clone, PartialEq)]
pub struct StageDraft {
    pub name: String,
    pub category: String,
    pub probability: String,
    pub is_active: bool,
    pub description: String,
    pub color: String,
    pub auto_advance: bool,
    pub auto_advance_days: String,
}

impl Default for StageDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: StageCategory::Open.as_str().to_string(),
            probability: "0".to_string(),
            is_active: true,
            description: String::new(),
            color: String::new(),
            auto_advance: false,
            auto_advance_days: String::new(),
        }
    }
}

impl StageDraft {
    /// Prefill the edit dialog
    pub fn from_stage(stage: &Stage) -> Self {
        Self {
            name: stage.name.clone(),
            category: stage.category.as_str().to_string(),
            probability: stage.probability.to_string(),
            is_active: stage.is_active,
            description: stage.description.clone().unwrap_or_default(),
            color: stage.color.clone().unwrap_or_default(),
            auto_advance: stage.auto_advance,
            auto_advance_days: stage.auto_advance_days.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<StageInput, FieldErrors> {
        use stage_fields::*;
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.insert(NAME, "Stage name is required");
        } else if name.chars().count() > NAME_MAX {
            errors.insert(NAME, format!("Stage name must be at most {} characters", NAME_MAX));
        }

        let category = StageCategory::parse(self.category.trim());
        if category.is_none() {
            errors.insert(CATEGORY, "Choose a category");
        }

        let probability = match self.probability.trim() {
            "" => {
                errors.insert(PROBABILITY, "Probability is required");
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(p) if (0..=100).contains(&p) => Some(p as u8),
                Ok(_) => {
                    errors.insert(PROBABILITY, "Probability must be between 0 and 100");
                    None
                }
                Err(_) => {
                    errors.insert(PROBABILITY, "Probability must be a whole number");
                    None
                }
            },
        };

        let auto_advance_days = if self.auto_advance {
            match self.auto_advance_days.trim() {
                "" => {
                    errors.insert(AUTO_ADVANCE_DAYS, "Days are required when auto-advance is on");
                    None
                }
                raw => match raw.parse::<u32>() {
                    Ok(d) if d > 0 => Some(d),
                    _ => {
                        errors.insert(AUTO_ADVANCE_DAYS, "Days must be a positive whole number");
                        None
                    }
                },
            }
        } else {
            None
        };

        let color = non_empty(&self.color);
        if color.as_deref().is_some_and(|c| !color_regex().is_match(c)) {
            errors.insert(COLOR, "Color must look like #1a2b3c");
        }

        let description = non_empty(&self.description);
        if description.as_deref().is_some_and(|d| d.chars().count() > DESCRIPTION_MAX) {
            errors.insert(DESCRIPTION, format!("Description must be at most {} characters", DESCRIPTION_MAX));
        }

        errors.into_result(|| StageInput {
            name,
            category: category.unwrap_or_default(),
            probability: probability.unwrap_or_default(),
            is_active: self.is_active,
            description,
            color,
            auto_advance: self.auto_advance,
            auto_advance_days,
        })
    }
}

// ========================
// Lead Form
// ========================

pub mod lead_fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const BUDGET: &str = "budget";
    pub const SCORE: &str = "score";
}

/// Raw create lead form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub status: LeadStatus,
    pub source: LeadSource,
    pub score: String,
    pub budget: String,
}

impl LeadDraft {
    pub fn validate(&self) -> Result<LeadInput, FieldErrors> {
        use lead_fields::*;
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.trim().to_string();
        if first_name.is_empty() {
            errors.insert(FIRST_NAME, "First name is required");
        }
        let last_name = self.last_name.trim().to_string();
        if last_name.is_empty() {
            errors.insert(LAST_NAME, "Last name is required");
        }

        let email = self.email.trim().to_string();
        if email.is_empty() {
            errors.insert(EMAIL, "Email is required");
        } else if !email_regex().is_match(&email) {
            errors.insert(EMAIL, "Enter a valid email address");
        }

        let phone = non_empty(&self.phone);
        if phone.as_deref().is_some_and(|p| !is_phone(p)) {
            errors.insert(PHONE, "Enter a valid phone number");
        }

        let budget = match non_empty(&self.budget) {
            None => None,
            Some(raw) => match raw.parse::<f64>() {
                Ok(b) if b.is_finite() && b >= 0.0 => Some(b),
                _ => {
                    errors.insert(BUDGET, "Budget must be a non-negative number");
                    None
                }
            },
        };

        let score = match non_empty(&self.score) {
            None => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(s) if (0..=100).contains(&s) => Some(s as u8),
                _ => {
                    errors.insert(SCORE, "Score must be a whole number between 0 and 100");
                    None
                }
            },
        };

        errors.into_result(|| LeadInput {
            first_name,
            last_name,
            email,
            phone,
            company: non_empty(&self.company),
            status: self.status,
            source: self.source,
            score,
            budget,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_stage() -> StageDraft {
        StageDraft {
            name: "Proposal sent".to_string(),
            probability: "60".to_string(),
            ..Default::default()
        }
    }

    fn valid_lead() -> LeadDraft {
        LeadDraft {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@navy.example".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_stage() {
        let input = valid_stage().validate().unwrap();
        assert_eq!(input.name, "Proposal sent");
        assert_eq!(input.probability, 60);
        assert_eq!(input.category, StageCategory::Open);
        assert_eq!(input.auto_advance_days, None);
        assert_eq!(input.color, None);
    }

    #[test]
    fn test_probability_out_of_range() {
        let draft = StageDraft { probability: "150".to_string(), ..valid_stage() };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get(stage_fields::PROBABILITY), Some("Probability must be between 0 and 100"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_probability_not_numeric() {
        let draft = StageDraft { probability: "high".to_string(), ..valid_stage() };
        assert!(draft.validate().unwrap_err().contains(stage_fields::PROBABILITY));
        let draft = StageDraft { probability: " ".to_string(), ..valid_stage() };
        assert!(draft.validate().unwrap_err().contains(stage_fields::PROBABILITY));
    }

    #[test]
    fn test_auto_advance_requires_days() {
        let draft = StageDraft { auto_advance: true, ..valid_stage() };
        let errors = draft.validate().unwrap_err();
        assert!(errors.contains(stage_fields::AUTO_ADVANCE_DAYS));

        let draft = StageDraft { auto_advance: true, auto_advance_days: "0".to_string(), ..valid_stage() };
        assert!(draft.validate().unwrap_err().contains(stage_fields::AUTO_ADVANCE_DAYS));

        let draft = StageDraft { auto_advance: true, auto_advance_days: "5".to_string(), ..valid_stage() };
        assert_eq!(draft.validate().unwrap().auto_advance_days, Some(5));
    }

    #[test]
    fn test_days_ignored_when_auto_advance_off() {
        let draft = StageDraft { auto_advance_days: "junk".to_string(), ..valid_stage() };
        assert_eq!(draft.validate().unwrap().auto_advance_days, None);
    }

    #[test]
    fn test_stage_name_and_color() {
        let draft = StageDraft { name: "   ".to_string(), color: "red".to_string(), ..valid_stage() };
        let errors = draft.validate().unwrap_err();
        assert!(errors.contains(stage_fields::NAME));
        assert!(errors.contains(stage_fields::COLOR));

        let draft = StageDraft { name: "x".repeat(NAME_MAX + 1), ..valid_stage() };
        assert!(draft.validate().unwrap_err().contains(stage_fields::NAME));

        let draft = StageDraft { color: "#A0b1C2".to_string(), ..valid_stage() };
        assert_eq!(draft.validate().unwrap().color.as_deref(), Some("#A0b1C2"));
    }

    #[test]
    fn test_unknown_category() {
        let draft = StageDraft { category: "pending".to_string(), ..valid_stage() };
        assert!(draft.validate().unwrap_err().contains(stage_fields::CATEGORY));
    }

    #[test]
    fn test_draft_from_stage_round_trips_through_validation() {
        let mut stage = Stage::new("s1", "c1", "Negotiation", 3);
        stage.probability = 75;
        stage.auto_advance = true;
        stage.auto_advance_days = Some(14);
        let input = StageDraft::from_stage(&stage).validate().unwrap();
        assert_eq!(input, stage.to_input());
    }

    #[test]
    fn test_valid_lead() {
        let draft = LeadDraft {
            phone: "+1 (555) 010-2030".to_string(),
            budget: "2500".to_string(),
            score: "40".to_string(),
            company: "  ".to_string(),
            ..valid_lead()
        };
        let input = draft.validate().unwrap();
        assert_eq!(input.phone.as_deref(), Some("+1 (555) 010-2030"));
        assert_eq!(input.budget, Some(2500.0));
        assert_eq!(input.score, Some(40));
        assert_eq!(input.company, None);
    }

    #[test]
    fn test_lead_email_and_phone_format() {
        let draft = LeadDraft { email: "grace@".to_string(), phone: "call me".to_string(), ..valid_lead() };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.get(lead_fields::EMAIL), Some("Enter a valid email address"));
        assert!(errors.contains(lead_fields::PHONE));
    }

    #[test]
    fn test_phone_length_counts_the_plus() {
        let twenty = format!("+{}", "1".repeat(19));
        let ok = LeadDraft { phone: twenty, ..valid_lead() };
        assert!(ok.validate().is_ok());

        let twenty_one = format!("+{}", "1".repeat(20));
        let too_long = LeadDraft { phone: twenty_one, ..valid_lead() };
        assert!(too_long.validate().unwrap_err().contains(lead_fields::PHONE));

        let too_short = LeadDraft { phone: "+12345".to_string(), ..valid_lead() };
        assert!(too_short.validate().unwrap_err().contains(lead_fields::PHONE));
    }

    #[test]
    fn test_lead_required_fields_and_ranges() {
        let draft = LeadDraft { budget: "-5".to_string(), score: "101".to_string(), ..Default::default() };
        let errors = draft.validate().unwrap_err();
        for field in [lead_fields::FIRST_NAME, lead_fields::LAST_NAME, lead_fields::EMAIL, lead_fields::BUDGET, lead_fields::SCORE] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }
}
