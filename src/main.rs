//! CRM Console Frontend Entry Point

mod api;
mod app;
mod components;
mod context;
mod store;

use app::App;
use leptos::prelude::*;
use tracing::level_filters::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    let logs = match rolling_logger::init_logger("crm-console", rolling_logger::DEFAULT_CAPACITY, LevelFilter::DEBUG) {
        Ok(handle) => Some(handle),
        Err(err) => {
            web_sys::console::warn_1(&format!("logger not installed: {}", err).into());
            None
        }
    };
    mount_to_body(move || {
        if let Some(handle) = logs.clone() {
            provide_context(handle);
        }
        view! { <App /> }
    });
}
