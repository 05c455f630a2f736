//! Tab Bar Component
//!
//! Switches between the two screens.

use leptos::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Stages,
    Leads,
}

impl Tab {
    const ALL: [Tab; 2] = [Tab::Stages, Tab::Leads];

    fn label(self) -> &'static str {
        match self {
            Tab::Stages => "Pipeline stages",
            Tab::Leads => "Leads",
        }
    }
}

#[component]
pub fn TabBar(
    current: ReadSignal<Tab>,
    set_current: WriteSignal<Tab>,
) -> impl IntoView {
    view! {
        <nav class="tab-bar">
            {Tab::ALL.into_iter().map(|tab| {
                let is_active = move || current.get() == tab;
                view! {
                    <button
                        class=move || if is_active() { "tab active" } else { "tab" }
                        on:click=move |_| set_current.set(tab)
                    >
                        {tab.label()}
                    </button>
                }
            }).collect_view()}
        </nav>
    }
}
