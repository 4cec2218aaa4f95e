//! Recent optimizations fetched from the backend.

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::use_app;
use crate::workflow::optimization::{self, OptimizationSummary, HISTORY_LIMIT};

/// Lists the latest optimizations and reloads whenever `refresh` changes.
/// Clicking an entry hands its original query to `on_pick`.
#[component]
pub fn HistoryPanel(refresh: ReadSignal<u32>, on_pick: Callback<String>) -> impl IntoView {
    let ctx = use_app();
    let (items, set_items) = signal::<Option<Vec<OptimizationSummary>>>(None);
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    Effect::new(move |_| {
        refresh.track();
        if ctx.display_name.get_untracked().is_none() {
            return;
        }
        set_loading.set(true);
        let backend = ctx.backend();
        spawn_local(async move {
            match optimization::recent(&backend, HISTORY_LIMIT).await {
                Ok(list) => {
                    set_items.set(Some(list));
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(ctx.report(e))),
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="history-panel">
            <h4 class="history-title">"Recent Optimizations"</h4>
            {move || {
                if loading.get() {
                    view! { <p class="history-loading">"Loading history..."</p> }.into_any()
                } else if let Some(err) = error.get() {
                    view! { <p class="history-error">{err}</p> }.into_any()
                } else {
                    match items.get() {
                        Some(list) if !list.is_empty() => view! {
                            <ul class="history-list">
                                {list.into_iter().map(|item| {
                                    let query = item.user_query.clone();
                                    view! {
                                        <li class="history-item">
                                            <button
                                                class="btn btn-link history-query"
                                                on:click=move |_| on_pick.run(query.clone())
                                            >
                                                {item.user_query}
                                            </button>
                                            <span class="history-technique">{item.technique}</span>
                                        </li>
                                    }
                                }).collect::<Vec<_>>()}
                            </ul>
                        }.into_any(),
                        _ => view! { <p class="history-empty">"No optimizations yet."</p> }.into_any(),
                    }
                }
            }}
        </div>
    }
}
