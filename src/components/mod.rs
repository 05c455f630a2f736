//! UI Components
//!
//! Reusable Leptos components.

mod delete_confirm_button;
mod form_field;
mod lead_form;
mod lead_table;
mod log_panel;
mod pagination;
mod search_input;
mod snackbar;
mod sort_header;
mod stage_board;
mod stage_form;
mod tab_bar;

pub use delete_confirm_button::DeleteConfirmButton;
pub use form_field::FormField;
pub use lead_form::LeadForm;
pub use lead_table::LeadTable;
pub use log_panel::LogPanel;
pub use pagination::Pagination;
pub use search_input::SearchInput;
pub use snackbar::Snackbar;
pub use sort_header::SortHeader;
pub use stage_board::StageBoard;
pub use stage_form::StageForm;
pub use tab_bar::{Tab, TabBar};
