//! Stage Form Component
//!
//! Add/edit dialog. Submitting hands the raw draft to the board, which
//! validates it and reports field errors back through `errors`.

use leptos::prelude::*;

use crm_domain::validation::{stage_fields, FieldErrors, StageDraft};
use crm_domain::StageCategory;

use crate::components::FormField;

#[component]
pub fn StageForm(
    initial: StageDraft,
    creating: bool,
    errors: ReadSignal<FieldErrors>,
    saving: ReadSignal<bool>,
    #[prop(into)] on_submit: Callback<StageDraft>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let draft = RwSignal::new(initial);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(draft.get_untracked());
    };

    view! {
        <div class="dialog-backdrop">
            <form class="dialog stage-form" on:submit=submit>
                <h2>{if creating { "Add stage" } else { "Edit stage" }}</h2>

                <FormField label="Name" field=stage_fields::NAME errors=errors>
                    <input
                        type="text"
                        prop:value=move || draft.with(|d| d.name.clone())
                        on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                    />
                </FormField>

                <FormField label="Category" field=stage_fields::CATEGORY errors=errors>
                    <select on:change=move |ev| draft.update(|d| d.category = event_target_value(&ev))>
                        {StageCategory::ALL.into_iter().map(|c| view! {
                            <option
                                value=c.as_str()
                                selected=move || draft.with(|d| d.category == c.as_str())
                            >
                                {c.label()}
                            </option>
                        }).collect_view()}
                    </select>
                </FormField>

                <FormField label="Win probability (%)" field=stage_fields::PROBABILITY errors=errors>
                    <input
                        type="number"
                        min="0"
                        max="100"
                        prop:value=move || draft.with(|d| d.probability.clone())
                        on:input=move |ev| draft.update(|d| d.probability = event_target_value(&ev))
                    />
                </FormField>

                <FormField label="Color" field=stage_fields::COLOR errors=errors>
                    <input
                        type="text"
                        placeholder="#3b82f6"
                        prop:value=move || draft.with(|d| d.color.clone())
                        on:input=move |ev| draft.update(|d| d.color = event_target_value(&ev))
                    />
                </FormField>

                <FormField label="Description" field=stage_fields::DESCRIPTION errors=errors>
                    <textarea
                        rows="3"
                        prop:value=move || draft.with(|d| d.description.clone())
                        on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                    ></textarea>
                </FormField>

                <label class="checkbox-field">
                    <input
                        type="checkbox"
                        prop:checked=move || draft.with(|d| d.is_active)
                        on:change=move |ev| draft.update(|d| d.is_active = event_target_checked(&ev))
                    />
                    "Active"
                </label>

                <label class="checkbox-field">
                    <input
                        type="checkbox"
                        prop:checked=move || draft.with(|d| d.auto_advance)
                        on:change=move |ev| draft.update(|d| d.auto_advance = event_target_checked(&ev))
                    />
                    "Auto-advance"
                </label>

                <Show when=move || draft.with(|d| d.auto_advance)>
                    <FormField label="Advance after (days)" field=stage_fields::AUTO_ADVANCE_DAYS errors=errors>
                        <input
                            type="number"
                            min="1"
                            prop:value=move || draft.with(|d| d.auto_advance_days.clone())
                            on:input=move |ev| draft.update(|d| d.auto_advance_days = event_target_value(&ev))
                        />
                    </FormField>
                </Show>

                <div class="dialog-actions">
                    <button type="button" class="cancel-btn" on:click=move |_| on_cancel.run(())>"Cancel"</button>
                    <button type="submit" class="primary-btn" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else if creating { "Create" } else { "Save" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
