//! Snackbar Component
//!
//! Shows the latest notice; hides itself after the configured timeout.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crm_domain::commands::NoticeKind;

use crate::context::use_app_context;

#[component]
pub fn Snackbar() -> impl IntoView {
    let ctx = use_app_context();
    let timeout_ms = ctx.config().notice_timeout_ms;

    // Each new notice schedules its own hide; a newer one makes it a no-op
    Effect::new(move |_| {
        if let Some((seq, _)) = ctx.notice.get() {
            spawn_local(async move {
                TimeoutFuture::new(timeout_ms).await;
                ctx.dismiss(seq);
            });
        }
    });

    move || {
        ctx.notice.get().map(|(seq, notice)| {
            let class = match notice.kind {
                NoticeKind::Success => "snackbar success",
                NoticeKind::Error => "snackbar error",
            };
            view! {
                <div class=class role="status">
                    <span class="snackbar-message">{notice.message}</span>
                    <button class="snackbar-close" on:click=move |_| ctx.dismiss(seq)>"×"</button>
                </div>
            }
        })
    }
}
