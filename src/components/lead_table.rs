//! Lead Table Component
//!
//! Paginated lead list. Search, filters, sort and paging all run on the
//! fetched collection; the server is asked once per refresh.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crm_domain::commands::{self, Outcome};
use crm_domain::endpoints::LeadQuery;
use crm_domain::query::{derive_view, LeadFilter, LeadSortKey, Page, SortDirection, SortState};
use crm_domain::validation::{FieldErrors, LeadDraft};
use crm_domain::{Lead, LeadSource, LeadStatus};

use crate::api::HttpApi;
use crate::components::{LeadForm, Pagination, SearchInput, SortHeader};
use crate::context::use_app_context;
use crate::store::{LeadSink, LeadsState, LeadsStateStoreFields};

#[derive(Clone)]
struct LeadDeps {
    api: HttpApi,
    sink: LeadSink,
    query: LeadQuery,
}

fn format_budget(budget: Option<f64>) -> String {
    budget.map(|b| format!("${:.2}", b)).unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn LeadTable() -> impl IntoView {
    let ctx = use_app_context();
    let config = ctx.config();
    let page_size = config.page_size;

    let store = Store::new(LeadsState::default());
    let deps = StoredValue::new(LeadDeps {
        api: ctx.api(),
        sink: LeadSink::new(store, ctx),
        query: LeadQuery::company(config.company_id.clone()).with_limit(config.lead_fetch_limit),
    });

    let (search, set_search) = signal(String::new());
    let (status, set_status) = signal(None::<LeadStatus>);
    let (source, set_source) = signal(None::<LeadSource>);
    let (sort, set_sort) = signal(SortState { key: LeadSortKey::CreatedAt, direction: SortDirection::Desc });
    let (page, set_page) = signal(0usize);

    let (creating, set_creating) = signal(false);
    let (form_errors, set_form_errors) = signal(FieldErrors::new());
    let (saving, set_saving) = signal(false);

    let view_state = Memo::new(move |_| {
        let filter = LeadFilter { search: search.get(), status: status.get(), source: source.get() };
        let leads = store.leads().get();
        derive_view(
            &leads,
            |l| filter.matches(l),
            Some(&sort.get()),
            Some(Page { index: page.get(), size: page_size }),
        )
    });

    // Initial load
    Effect::new(move |_| {
        let deps = deps.get_value();
        spawn_local(async move {
            let _ = commands::refresh_leads(&deps.api, &deps.sink, &deps.query).await;
        });
    });

    let convert = move |id: String| {
        let deps = deps.get_value();
        spawn_local(async move {
            commands::convert_lead(&deps.api, &deps.sink, &deps.query, &id).await;
        });
    };

    let submit = Callback::new(move |draft: LeadDraft| {
        let deps = deps.get_value();
        set_saving.set(true);
        spawn_local(async move {
            let outcome = commands::create_lead(&deps.api, &deps.sink, &deps.query, &draft).await;
            set_saving.set(false);
            match outcome {
                Outcome::Saved => set_creating.set(false),
                Outcome::Invalid(errors) => set_form_errors.set(errors),
                _ => {}
            }
        });
    });

    let on_sort = Callback::new(move |key: LeadSortKey| set_sort.update(|s| *s = s.clicked(key)));

    view! {
        <section class="lead-table">
            <header class="board-header">
                <h1>"Leads"</h1>
                <button
                    class="primary-btn"
                    on:click=move |_| {
                        set_form_errors.set(FieldErrors::new());
                        set_creating.set(true);
                    }
                >
                    "+ New lead"
                </button>
            </header>

            <div class="filter-bar">
                <SearchInput
                    placeholder="Search name, email or company..."
                    debounce_ms=config.search_debounce_ms
                    on_search=move |text: String| {
                        set_search.set(text);
                        set_page.set(0);
                    }
                />
                <select
                    class="filter-select"
                    on:change=move |ev| {
                        set_status.set(LeadStatus::parse(&event_target_value(&ev)));
                        set_page.set(0);
                    }
                >
                    <option value="">"All statuses"</option>
                    {LeadStatus::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str()>{s.label()}</option>
                    }).collect_view()}
                </select>
                <select
                    class="filter-select"
                    on:change=move |ev| {
                        set_source.set(LeadSource::parse(&event_target_value(&ev)));
                        set_page.set(0);
                    }
                >
                    <option value="">"All sources"</option>
                    {LeadSource::ALL.into_iter().map(|s| view! {
                        <option value=s.as_str()>{s.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            <table class="data-table">
                <thead>
                    <tr>
                        <SortHeader label="Name" key=LeadSortKey::Name sort=sort on_sort=on_sort />
                        <th>"Email"</th>
                        <SortHeader label="Company" key=LeadSortKey::Company sort=sort on_sort=on_sort />
                        <SortHeader label="Status" key=LeadSortKey::Status sort=sort on_sort=on_sort />
                        <SortHeader label="Source" key=LeadSortKey::Source sort=sort on_sort=on_sort />
                        <SortHeader label="Score" key=LeadSortKey::Score sort=sort on_sort=on_sort />
                        <SortHeader label="Budget" key=LeadSortKey::Budget sort=sort on_sort=on_sort />
                        <SortHeader label="Created" key=LeadSortKey::CreatedAt sort=sort on_sort=on_sort />
                        <th class="actions-col"></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || view_state.get().items
                        key=|lead: &Lead| {
                            (
                                lead.id.clone(),
                                lead.full_name(),
                                lead.email.clone(),
                                lead.company.clone(),
                                lead.status,
                                lead.source,
                                lead.score,
                                lead.budget.map(f64::to_bits),
                            )
                        }
                        children=move |lead: Lead| {
                            let id = lead.id.clone();
                            let convertible = lead.status.is_convertible();
                            view! {
                                <tr>
                                    <td>{lead.full_name()}</td>
                                    <td>{lead.email.clone()}</td>
                                    <td>{lead.company.clone().unwrap_or_default()}</td>
                                    <td>
                                        <span class=format!("status-badge {}", lead.status.as_str())>{lead.status.label()}</span>
                                    </td>
                                    <td>{lead.source.label()}</td>
                                    <td>{lead.score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())}</td>
                                    <td>{format_budget(lead.budget)}</td>
                                    <td>{lead.created_at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "-".to_string())}</td>
                                    <td class="actions-col">
                                        {convertible.then(|| view! {
                                            <button class="convert-btn" on:click=move |_| convert(id.clone())>"Convert"</button>
                                        })}
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <Show when=move || store.loading().get()>
                <p class="loading">"Loading leads..."</p>
            </Show>
            <Show when=move || store.loaded().get() && !store.loading().get() && view_state.with(|v| v.is_empty())>
                <p class="empty-state">"No leads found."</p>
            </Show>

            <Pagination
                page=Signal::derive(move || view_state.with(|v| v.page))
                page_count=Signal::derive(move || view_state.with(|v| v.page_count))
                label=Signal::derive(move || view_state.with(|v| v.range_label(page_size)))
                on_change=move |p: usize| set_page.set(p)
            />

            <Show when=move || creating.get()>
                <LeadForm
                    errors=form_errors
                    saving=saving
                    on_submit=submit
                    on_cancel=move |_| set_creating.set(false)
                />
            </Show>
        </section>
    }
}
