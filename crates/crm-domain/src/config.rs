//! Runtime Configuration
//!
//! The console is served as static files, so its settings come from the page
//! URL query string, e.g. `/?companyId=acme&pageSize=25`.

use thiserror::Error;
use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("No company selected (missing `companyId` in the page URL)")]
    MissingCompany,
    #[error("Invalid value {value:?} for `{key}`")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API origin, empty for same-origin requests
    pub api_base: String,
    /// Tenant every request is scoped to
    pub company_id: String,
    pub page_size: usize,
    pub search_debounce_ms: u32,
    pub notice_timeout_ms: u32,
    pub lead_fetch_limit: u32,
}

impl AppConfig {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const DEFAULT_DEBOUNCE_MS: u32 = 500;
    pub const DEFAULT_NOTICE_MS: u32 = 4000;
    pub const DEFAULT_LEAD_LIMIT: u32 = 200;

    pub fn for_company(company_id: impl Into<String>) -> Self {
        Self {
            api_base: String::new(),
            company_id: company_id.into(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            search_debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
            notice_timeout_ms: Self::DEFAULT_NOTICE_MS,
            lead_fetch_limit: Self::DEFAULT_LEAD_LIMIT,
        }
    }

    /// Parse `location.search` (with or without the leading `?`)
    pub fn from_query(search: &str) -> Result<Self, ConfigError> {
        let raw = search.trim_start_matches('?');
        let mut company_id = None;
        let mut config = Self::for_company(String::new());

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let value = value.trim().to_string();
            match key.as_ref() {
                "companyId" => company_id = Some(value).filter(|v| !v.is_empty()),
                "apiBase" => config.api_base = value,
                "pageSize" => config.page_size = parse_positive("pageSize", &value)? as usize,
                "debounceMs" => config.search_debounce_ms = parse_number("debounceMs", &value)?,
                "noticeMs" => config.notice_timeout_ms = parse_positive("noticeMs", &value)?,
                "leadLimit" => config.lead_fetch_limit = parse_positive("leadLimit", &value)?,
                _ => {}
            }
        }

        config.company_id = company_id.ok_or(ConfigError::MissingCompany)?;
        Ok(config)
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value: value.to_string() })
}

fn parse_positive(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    match parse_number(key, value)? {
        0 => Err(ConfigError::Invalid { key, value: value.to_string() }),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_query("?companyId=acme").unwrap();
        assert_eq!(config, AppConfig::for_company("acme"));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce_ms, 500);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_query(
            "companyId=acme%20inc&apiBase=https%3A%2F%2Fapi.example.com&pageSize=25&debounceMs=0&noticeMs=2500&leadLimit=50&tab=leads",
        )
        .unwrap();
        assert_eq!(config.company_id, "acme inc");
        assert_eq!(config.api_base, "https://api.example.com");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.search_debounce_ms, 0);
        assert_eq!(config.notice_timeout_ms, 2500);
        assert_eq!(config.lead_fetch_limit, 50);
    }

    #[test]
    fn test_missing_company() {
        assert_eq!(AppConfig::from_query(""), Err(ConfigError::MissingCompany));
        assert_eq!(AppConfig::from_query("?companyId="), Err(ConfigError::MissingCompany));
    }

    #[test]
    fn test_invalid_numbers() {
        assert_eq!(
            AppConfig::from_query("?companyId=a&pageSize=0"),
            Err(ConfigError::Invalid { key: "pageSize", value: "0".to_string() })
        );
        assert!(AppConfig::from_query("?companyId=a&debounceMs=soon").is_err());
    }
}
