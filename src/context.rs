//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crm_domain::commands::Notice;
use crm_domain::config::{AppConfig, ConfigError};
use crm_domain::LOGIN_PATH;

use crate::api::HttpApi;

/// Read configuration from the page URL
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let search = web_sys::window()
        .and_then(|win| win.location().search().ok())
        .unwrap_or_default();
    AppConfig::from_query(&search)
}

/// App-wide state provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<AppConfig>,
    /// Current snackbar notice with a sequence number - read
    pub notice: ReadSignal<Option<(u64, Notice)>>,
    /// Current snackbar notice - write
    set_notice: WriteSignal<Option<(u64, Notice)>>,
    /// Set once a 401 is seen; screens stop rendering - read
    pub session_expired: ReadSignal<bool>,
    /// Set once a 401 is seen - write
    set_session_expired: WriteSignal<bool>,
    next_notice: StoredValue<u64>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let (notice, set_notice) = signal(None);
        let (session_expired, set_session_expired) = signal(false);
        Self {
            config: StoredValue::new(config),
            notice,
            set_notice,
            session_expired,
            set_session_expired,
            next_notice: StoredValue::new(0),
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn api(&self) -> HttpApi {
        self.config.with_value(|c| HttpApi::new(c.api_base.clone()))
    }

    /// Show a notice, replacing the current one
    pub fn notify(&self, notice: Notice) {
        self.next_notice.update_value(|n| *n += 1);
        let seq = self.next_notice.get_value();
        self.set_notice.set(Some((seq, notice)));
    }

    /// Hide the notice if it is still the one numbered `seq`
    pub fn dismiss(&self, seq: u64) {
        if self.notice.get_untracked().is_some_and(|(current, _)| current == seq) {
            self.set_notice.set(None);
        }
    }

    /// Leave the app for the login page
    pub fn expire_session(&self) {
        if self.session_expired.get_untracked() {
            return;
        }
        tracing::warn!("session expired, redirecting to login");
        self.set_session_expired.set(true);
        self.set_notice.set(None);
        if let Some(win) = web_sys::window() {
            let _ = win.location().set_href(LOGIN_PATH);
        }
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
