//! REST Endpoints
//!
//! Paths and query strings for every call the console makes.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

use crate::lead::{LeadSource, LeadStatus};
use crate::stage::StageCategory;

const STAGES: &str = "/api/pipeline-stages";
const LEADS: &str = "/api/leads";

/// Unreserved characters (RFC 3986) stay as they are in path segments
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

fn with_query(path: &str, pairs: &[(&str, Option<String>)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
    }
    let query = serializer.finish();
    if query.is_empty() { path.to_string() } else { format!("{}?{}", path, query) }
}

/// Prefix a path with the configured API origin ("" = same origin)
pub fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

// ========================
// Stages
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct StageQuery {
    pub company_id: String,
    pub category: Option<StageCategory>,
    pub is_active: Option<bool>,
}

impl StageQuery {
    pub fn company(company_id: impl Into<String>) -> Self {
        Self { company_id: company_id.into(), category: None, is_active: None }
    }
}

pub fn list_stages(query: &StageQuery) -> String {
    with_query(
        STAGES,
        &[
            ("companyId", Some(query.company_id.clone())),
            ("category", query.category.map(|c| c.as_str().to_string())),
            ("isActive", query.is_active.map(|a| a.to_string())),
        ],
    )
}

pub fn create_stage(company_id: &str) -> String {
    with_query(STAGES, &[("companyId", Some(company_id.to_string()))])
}

/// PUT and DELETE target
pub fn stage(id: &str) -> String {
    format!("{}/{}", STAGES, segment(id))
}

pub fn reorder_stages(company_id: &str) -> String {
    with_query(&format!("{}/reorder", STAGES), &[("companyId", Some(company_id.to_string()))])
}

// ========================
// Leads
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct LeadQuery {
    pub company_id: String,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl LeadQuery {
    pub fn company(company_id: impl Into<String>) -> Self {
        Self { company_id: company_id.into(), status: None, source: None, search: None, limit: None }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

pub fn list_leads(query: &LeadQuery) -> String {
    with_query(
        LEADS,
        &[
            ("companyId", Some(query.company_id.clone())),
            ("status", query.status.map(|s| s.as_str().to_string())),
            ("source", query.source.map(|s| s.as_str().to_string())),
            ("search", query.search.clone().filter(|s| !s.trim().is_empty())),
            ("limit", query.limit.map(|l| l.to_string())),
        ],
    )
}

pub fn create_lead(company_id: &str) -> String {
    with_query(LEADS, &[("companyId", Some(company_id.to_string()))])
}

pub fn convert_lead(id: &str) -> String {
    format!("{}/{}/convert", LEADS, segment(id))
}
