//! Sortable Column Header Component

use leptos::prelude::*;

use crm_domain::query::SortState;

/// Header cell that sorts by `key` when clicked, showing ▲/▼ when active
#[component]
pub fn SortHeader<K>(
    label: &'static str,
    key: K,
    sort: ReadSignal<SortState<K>>,
    #[prop(into)] on_sort: Callback<K>,
) -> impl IntoView
where
    K: Copy + PartialEq + Send + Sync + 'static,
{
    let is_active = move || sort.get().key == key;

    view! {
        <th
            class=move || if is_active() { "sortable sorted" } else { "sortable" }
            on:click=move |_| on_sort.run(key)
        >
            {label}
            <span class="sort-indicator">{move || sort.get().indicator(key)}</span>
        </th>
    }
}
