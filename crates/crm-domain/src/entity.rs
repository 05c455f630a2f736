//! Core Entity Trait
//!
//! Contract shared by every record the console lists.

use serde::Deserialize;

/// Core trait for all listed records
pub trait Entity: Clone {
    /// Returns the record's server-assigned identifier
    fn id(&self) -> &str;
}

/// List response body.
///
/// Endpoints answer either with a bare array or with an object wrapping it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Envelope {
        #[serde(alias = "stages", alias = "leads")]
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Envelope { data } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_accepts_bare_array() {
        let listing: Listing<u32> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(listing.into_items(), vec![1, 2, 3]);
    }

    #[test]
    fn test_listing_accepts_envelopes() {
        let listing: Listing<u32> = serde_json::from_str(r#"{"stages":[4,5]}"#).unwrap();
        assert_eq!(listing.into_items(), vec![4, 5]);

        let listing: Listing<u32> = serde_json::from_str(r#"{"data":[],"total":0}"#).unwrap();
        assert!(listing.into_items().is_empty());
    }
}
