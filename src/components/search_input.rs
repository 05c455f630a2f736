//! Search Input Component
//!
//! Text box that reports its value only after typing pauses.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SearchInput(
    #[prop(into)] on_search: Callback<String>,
    debounce_ms: u32,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let (text, set_text) = signal(String::new());
    let keystroke = StoredValue::new(0u64);

    let on_input = move |ev| {
        let value = event_target_value(&ev);
        set_text.set(value.clone());
        keystroke.update_value(|k| *k += 1);
        let mine = keystroke.get_value();
        if debounce_ms == 0 {
            on_search.run(value);
            return;
        }
        spawn_local(async move {
            TimeoutFuture::new(debounce_ms).await;
            // Superseded by a later keystroke, or the input is gone
            if keystroke.try_get_value() == Some(mine) {
                on_search.run(value);
            }
        });
    };

    view! {
        <input
            type="search"
            class="search-input"
            placeholder=placeholder
            prop:value=move || text.get()
            on:input=on_input
        />
    }
}
