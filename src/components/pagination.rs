//! Pagination Component

use leptos::prelude::*;

#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<usize>,
    #[prop(into)] page_count: Signal<usize>,
    #[prop(into)] label: Signal<String>,
    #[prop(into)] on_change: Callback<usize>,
) -> impl IntoView {
    let has_prev = move || page.get() > 0;
    let has_next = move || page.get() + 1 < page_count.get();

    view! {
        <div class="pagination">
            <button
                class="page-btn"
                disabled=move || !has_prev()
                on:click=move |_| on_change.run(page.get_untracked().saturating_sub(1))
            >
                "‹ Prev"
            </button>
            <span class="page-label">
                {move || label.get()}
                " · page " {move || page.get() + 1} " of " {move || page_count.get()}
            </span>
            <button
                class="page-btn"
                disabled=move || !has_next()
                on:click=move |_| on_change.run(page.get_untracked() + 1)
            >
                "Next ›"
            </button>
        </div>
    }
}
