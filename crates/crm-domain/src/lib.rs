//! CRM Domain Layer
//!
//! Everything the console needs that does not touch the DOM:
//! - entities and wire payloads (stages, leads)
//! - the optimistic reorder protocol and other mutation commands
//! - filter/sort/paginate over in-memory lists
//! - form validation
//! - endpoint paths and response classification
//! - runtime configuration

mod entity;
mod stage;
mod lead;
mod error;

pub mod config;
pub mod endpoints;
pub mod query;
pub mod reorder;
pub mod validation;
pub mod commands;


pub use entity::{Entity, Listing};
pub use stage::{ReorderEntry, ReorderRequest, Stage, StageCategory, StageInput, StatusFilter};
pub use lead::{Lead, LeadInput, LeadSource, LeadStatus};
pub use error::{classify_response, decode_response, encode_body, ApiError, ApiResult};

/// Where the browser is sent when the session is gone.
pub const LOGIN_PATH: &str = "/auth/login";
