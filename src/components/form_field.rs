//! Form Field Helpers
//!
//! Labelled field wrapper showing the validation message for one key.

use leptos::prelude::*;

use crm_domain::validation::FieldErrors;

#[component]
pub fn FormField(
    label: &'static str,
    field: &'static str,
    errors: ReadSignal<FieldErrors>,
    children: Children,
) -> impl IntoView {
    let message = move || errors.with(|e| e.get(field).map(str::to_string));

    view! {
        <label class=move || if message().is_some() { "form-field invalid" } else { "form-field" }>
            <span class="field-label">{label}</span>
            {children()}
            {move || message().map(|m| view! { <span class="field-error">{m}</span> })}
        </label>
    }
}
