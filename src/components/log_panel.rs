//! Log Panel Component
//!
//! Collapsible view of the recent in-memory log lines.

use leptos::prelude::*;
use rolling_logger::LogHandle;

#[component]
pub fn LogPanel() -> impl IntoView {
    // Nothing to show when the logger could not be installed
    let Some(logs) = use_context::<LogHandle>() else {
        return ().into_any();
    };
    let logs = StoredValue::new(logs);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let refresh = move || set_lines.set(logs.with_value(|l| l.recent_lines()));
    let clear = move || {
        logs.with_value(|l| l.clear());
        set_lines.set(Vec::new());
    };

    view! {
        <details class="log-panel" on:toggle=move |_| refresh()>
            <summary>"Recent log"</summary>
            <div class="log-actions">
                <button class="edit-btn" on:click=move |_| refresh()>"Refresh"</button>
                <button class="edit-btn" on:click=move |_| clear()>"Clear"</button>
            </div>
            <Show
                when=move || !lines.get().is_empty()
                fallback=|| view! { <p class="empty-state">"No log lines."</p> }
            >
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </Show>
        </details>
    }
    .into_any()
}
