//! Stage Board Component
//!
//! Pipeline stage list with filters, sortable columns and drag-to-reorder.
//! Uses leptos-dragdrop; each row targets the gap above or below itself.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crm_domain::commands::{self, Outcome};
use crm_domain::endpoints::StageQuery;
use crm_domain::query::{derive_view, drag_enabled, SortState, StageFilter, StageSortKey};
use crm_domain::validation::{FieldErrors, StageDraft};
use crm_domain::{Stage, StageCategory, StatusFilter};

use crate::api::HttpApi;
use crate::components::{DeleteConfirmButton, SearchInput, SortHeader, StageForm};
use crate::context::use_app_context;
use crate::store::{StageBoardState, StageBoardStateStoreFields, StageSink};

use leptos_dragdrop::*;

/// Everything a stage command needs
#[derive(Clone)]
struct StageDeps {
    api: HttpApi,
    sink: StageSink,
    query: StageQuery,
}

/// Open add/edit dialog
#[derive(Clone, Debug, PartialEq)]
struct StageDialog {
    /// `None` when creating
    editing: Option<String>,
    draft: StageDraft,
}

fn status_label(status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::All => "All",
        StatusFilter::Active => "Active",
        StatusFilter::Inactive => "Inactive",
    }
}

#[component]
pub fn StageBoard() -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();

    let store = Store::new(StageBoardState::default());
    let deps = StoredValue::new(StageDeps {
        api: ctx.api(),
        sink: StageSink::new(store, ctx),
        query: StageQuery::company(config.company_id.clone()),
    });

    // Filters and sort
    let (search, set_search) = signal(String::new());
    let (category, set_category) = signal(None::<StageCategory>);
    let (status, set_status) = signal(StatusFilter::All);
    let (sort, set_sort) = signal(SortState::new(StageSortKey::Order));

    // Dialog
    let (dialog, set_dialog) = signal(None::<StageDialog>);
    let (form_errors, set_form_errors) = signal(FieldErrors::new());
    let (saving, set_saving) = signal(false);

    let filter = Memo::new(move |_| StageFilter {
        search: search.get(),
        category: category.get(),
        status: status.get(),
    });

    let visible = Memo::new(move |_| {
        let stages = store.stages().get();
        let filter = filter.get();
        derive_view(&stages, |s| filter.matches(s), Some(&sort.get()), None).items
    });

    let can_drag = Memo::new(move |_| drag_enabled(&sort.get()));

    // Initial load
    Effect::new(move |_| {
        let deps = deps.get_value();
        spawn_local(async move {
            let _ = commands::refresh_stages(&deps.api, &deps.sink, &deps.query).await;
        });
    });

    // Drop: indices are positions in the rendered (filtered, sorted) list
    let dnd = create_dnd_signals();
    bind_global_mouseup(dnd, move |from, to| {
        let Some(view) = visible.try_get_untracked() else { return };
        let deps = deps.get_value();
        tracing::debug!(from, to, "stage dropped");
        spawn_local(async move {
            commands::commit_reorder(&deps.api, &deps.sink, &deps.query, &view, from, to).await;
        });
    });

    let toggle_active = move |id: String| {
        let deps = deps.get_value();
        spawn_local(async move {
            commands::toggle_stage_active(&deps.api, &deps.sink, &deps.query, &id).await;
        });
    };

    let delete = move |id: String| {
        let deps = deps.get_value();
        spawn_local(async move {
            commands::delete_stage(&deps.api, &deps.sink, &deps.query, &id).await;
        });
    };

    let open_dialog = move |editing: Option<&Stage>| {
        set_form_errors.set(FieldErrors::new());
        set_dialog.set(Some(StageDialog {
            editing: editing.map(|s| s.id.clone()),
            draft: editing.map(StageDraft::from_stage).unwrap_or_default(),
        }));
    };

    let submit = Callback::new(move |draft: StageDraft| {
        let Some(editing) = dialog.get_untracked().map(|d| d.editing) else { return };
        let deps = deps.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let outcome = commands::save_stage(&deps.api, &deps.sink, &deps.query, editing.as_deref(), &draft).await;
            set_saving.set(false);
            match outcome {
                Outcome::Saved => set_dialog.set(None),
                Outcome::Invalid(errors) => set_form_errors.set(errors),
                // Dialog stays open so the user can retry
                _ => {}
            }
        });
    });

    let on_sort = Callback::new(move |key: StageSortKey| set_sort.update(|s| *s = s.clicked(key)));

    let empty_text = move || {
        if store.stages().read().is_empty() {
            "No stages yet. Add the first one."
        } else {
            "No stages match the current filters."
        }
    };

    view! {
        <section class="stage-board">
            <header class="board-header">
                <h1>"Pipeline stages"</h1>
                <button class="primary-btn" on:click=move |_| open_dialog(None)>"+ Add stage"</button>
            </header>

            <div class="filter-bar">
                <SearchInput
                    placeholder="Search stages..."
                    debounce_ms=config.search_debounce_ms
                    on_search=move |text: String| set_search.set(text)
                />
                <select
                    class="filter-select"
                    on:change=move |ev| set_category.set(StageCategory::parse(&event_target_value(&ev)))
                >
                    <option value="" selected=move || category.get().is_none()>"All categories"</option>
                    {StageCategory::ALL.into_iter().map(|c| view! {
                        <option value=c.as_str() selected=move || category.get() == Some(c)>{c.label()}</option>
                    }).collect_view()}
                </select>
                <select
                    class="filter-select"
                    on:change=move |ev| set_status.set(StatusFilter::parse(&event_target_value(&ev)).unwrap_or_default())
                >
                    {StatusFilter::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str() selected=move || status.get() == s>{status_label(s)}</option>
                    }).collect_view()}
                </select>
            </div>

            <Show when=move || !can_drag.get()>
                <p class="hint">"Sort by order (ascending) to reorder stages by dragging."</p>
            </Show>

            <table class="data-table stage-table" on:mouseleave=make_on_mouseleave(dnd)>
                <thead>
                    <tr>
                        <th class="handle-col"></th>
                        <SortHeader label="Order" key=StageSortKey::Order sort=sort on_sort=on_sort />
                        <SortHeader label="Name" key=StageSortKey::Name sort=sort on_sort=on_sort />
                        <SortHeader label="Category" key=StageSortKey::Category sort=sort on_sort=on_sort />
                        <SortHeader label="Probability" key=StageSortKey::Probability sort=sort on_sort=on_sort />
                        <th>"Active"</th>
                        <th class="actions-col"></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || visible.get().into_iter().enumerate()
                        key=|(index, stage)| {
                            (
                                *index,
                                stage.id.clone(),
                                stage.name.clone(),
                                stage.order,
                                stage.category,
                                stage.probability,
                                stage.is_active,
                                stage.is_default,
                                stage.color.clone(),
                            )
                        }
                        children=move |(index, stage)| {
                            let locked = stage.is_locked();
                            let active = stage.is_active;
                            let draggable = move || can_drag.get() && !locked;
                            let is_dragging = move || dnd.dragging_read.get() == Some(index);
                            let drop_before = move || dnd.drop_slot_read.get() == Some(index);
                            let drop_after = move || dnd.drop_slot_read.get() == Some(index + 1);

                            let row_class = move || {
                                let mut c = String::from("stage-row");
                                if !active { c.push_str(" inactive"); }
                                if draggable() { c.push_str(" draggable"); }
                                if is_dragging() { c.push_str(" dragging"); }
                                if drop_before() { c.push_str(" drop-before"); }
                                if drop_after() { c.push_str(" drop-after"); }
                                c
                            };

                            let toggle_id = stage.id.clone();
                            let delete_id = stage.id.clone();
                            let edit_stage = stage.clone();
                            let swatch = stage.color.clone().unwrap_or_else(|| "transparent".to_string());

                            view! {
                                <tr
                                    class=row_class
                                    on:mousedown=make_on_mousedown(dnd, index, draggable)
                                    on:mousemove=make_on_row_mousemove(dnd, index)
                                >
                                    <td class="handle-col">
                                        {move || if draggable() { "⋮⋮" } else { "" }}
                                    </td>
                                    <td>{stage.order}</td>
                                    <td>
                                        <span class="color-swatch" style=format!("background:{}", swatch)></span>
                                        {stage.name.clone()}
                                        {locked.then(|| view! { <span class="badge">"default"</span> })}
                                    </td>
                                    <td>{stage.category.label()}</td>
                                    <td>{format!("{}%", stage.probability)}</td>
                                    <td>
                                        <input
                                            type="checkbox"
                                            prop:checked=active
                                            on:change=move |_| toggle_active(toggle_id.clone())
                                        />
                                    </td>
                                    <td class="actions-col">
                                        <button class="edit-btn" on:click=move |_| open_dialog(Some(&edit_stage))>"Edit"</button>
                                        <DeleteConfirmButton
                                            disabled=locked
                                            title=if locked { "Default stages cannot be deleted" } else { "" }
                                            on_confirm=move |_| delete(delete_id.clone())
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                    // Gap after the last row
                    <tr
                        class=move || {
                            let last = visible.get().len();
                            if dnd.is_dragging() && dnd.drop_slot_read.get() == Some(last) {
                                "drop-tail active"
                            } else {
                                "drop-tail"
                            }
                        }
                        on:mouseenter=move |ev| make_on_slot_mouseenter(dnd, visible.get_untracked().len())(ev)
                    >
                        <td colspan="7"></td>
                    </tr>
                </tbody>
            </table>

            <Show when=move || store.loading().get()>
                <p class="loading">"Loading stages..."</p>
            </Show>
            <Show when=move || store.loaded().get() && !store.loading().get() && visible.get().is_empty()>
                <p class="empty-state">{empty_text}</p>
            </Show>
            <p class="item-count">
                {move || format!("{} of {} stages", visible.get().len(), store.stages().read().len())}
            </p>

            {move || dialog.get().map(|d| {
                let creating = d.editing.is_none();
                view! {
                <StageForm
                    initial=d.draft
                    creating=creating
                    errors=form_errors
                    saving=saving
                    on_submit=submit
                    on_cancel=move |_| set_dialog.set(None)
                />
                }
            })}
        </section>
    }
}
