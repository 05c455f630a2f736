//! CRM Console App
//!
//! Tab bar over the two screens, plus the snackbar and log panel.

use leptos::prelude::*;

use crate::components::{LeadTable, LogPanel, Snackbar, StageBoard, Tab, TabBar};
use crate::context::{load_config, AppContext};

#[component]
pub fn App() -> impl IntoView {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "cannot start console");
            return view! {
                <div class="app-error">
                    <h1>"CRM Console"</h1>
                    <p>{err.to_string()}</p>
                </div>
            }
            .into_any();
        }
    };
    tracing::info!(company = %config.company_id, api_base = %config.api_base, "starting console");

    let ctx = AppContext::new(config);
    provide_context(ctx);

    let (tab, set_tab) = signal(Tab::Stages);

    view! {
        <Show when=move || !ctx.session_expired.get()>
            <div class="app-layout">
                <TabBar current=tab set_current=set_tab />
                <main class="main-content">
                    {move || match tab.get() {
                        Tab::Stages => view! { <StageBoard /> }.into_any(),
                        Tab::Leads => view! { <LeadTable /> }.into_any(),
                    }}
                </main>
                <LogPanel />
                <Snackbar />
            </div>
        </Show>
    }
    .into_any()
}
