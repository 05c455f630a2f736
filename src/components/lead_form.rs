//! Lead Form Component

use leptos::prelude::*;

use crm_domain::validation::{lead_fields, FieldErrors, LeadDraft};
use crm_domain::{LeadSource, LeadStatus};

use crate::components::FormField;

/// Create lead dialog
#[component]
pub fn LeadForm(
    errors: ReadSignal<FieldErrors>,
    saving: ReadSignal<bool>,
    #[prop(into)] on_submit: Callback<LeadDraft>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let draft = RwSignal::new(LeadDraft::default());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(draft.get_untracked());
    };

    // Plain text inputs differ only in label, key and draft field
    let text_input = move |label: &'static str, field: &'static str, kind: &'static str, get: fn(&LeadDraft) -> &String, set: fn(&mut LeadDraft, String)| {
        view! {
            <FormField label=label field=field errors=errors>
                <input
                    type=kind
                    prop:value=move || draft.with(|d| get(d).clone())
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                />
            </FormField>
        }
    };

    view! {
        <div class="dialog-backdrop">
            <form class="dialog lead-form" on:submit=submit>
                <h2>"New lead"</h2>

                {text_input("First name", lead_fields::FIRST_NAME, "text", |d| &d.first_name, |d, v| d.first_name = v)}
                {text_input("Last name", lead_fields::LAST_NAME, "text", |d| &d.last_name, |d, v| d.last_name = v)}
                {text_input("Email", lead_fields::EMAIL, "email", |d| &d.email, |d, v| d.email = v)}
                {text_input("Phone", lead_fields::PHONE, "tel", |d| &d.phone, |d, v| d.phone = v)}
                {text_input("Company", "company", "text", |d| &d.company, |d, v| d.company = v)}

                <label class="form-field">
                    <span class="field-label">"Status"</span>
                    <select on:change=move |ev| {
                        if let Some(s) = LeadStatus::parse(&event_target_value(&ev)) {
                            draft.update(|d| d.status = s);
                        }
                    }>
                        {LeadStatus::ALL.into_iter().map(|s| view! {
                            <option value=s.as_str() selected=move || draft.with(|d| d.status == s)>{s.label()}</option>
                        }).collect_view()}
                    </select>
                </label>

                <label class="form-field">
                    <span class="field-label">"Source"</span>
                    <select on:change=move |ev| {
                        if let Some(s) = LeadSource::parse(&event_target_value(&ev)) {
                            draft.update(|d| d.source = s);
                        }
                    }>
                        {LeadSource::ALL.into_iter().map(|s| view! {
                            <option value=s.as_str() selected=move || draft.with(|d| d.source == s)>{s.label()}</option>
                        }).collect_view()}
                    </select>
                </label>

                {text_input("Score (0-100)", lead_fields::SCORE, "number", |d| &d.score, |d, v| d.score = v)}
                {text_input("Budget", lead_fields::BUDGET, "number", |d| &d.budget, |d, v| d.budget = v)}

                <div class="dialog-actions">
                    <button type="button" class="cancel-btn" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Create" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
