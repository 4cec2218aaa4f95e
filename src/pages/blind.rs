use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::use_app;
use crate::components::copy_button::CopyButton;
use crate::config::keys;
use crate::pages::{ErrorBanner, FieldError, FormErrors};
use crate::workflow::blind::{self, persist_choice, BlindPhase, BlindSession, DEFAULT_VERSIONS};

#[component]
pub fn BlindResultsPage() -> impl IntoView {
    let ctx = use_app();

    let query = RwSignal::new(ctx.recall(keys::OPTIMIZED_OUTPUT).unwrap_or_default());
    let (versions, set_versions) = signal(DEFAULT_VERSIONS);

    let session = RwSignal::new(None::<BlindSession>);
    let (is_generating, set_is_generating) = signal(false);
    let (is_saving, set_is_saving) = signal(false);
    let (choice_status, set_choice_status) = signal::<Option<String>>(None);
    let errors = FormErrors::new();

    let do_generate = move |_| {
        errors.clear();
        set_choice_status.set(None);
        session.set(None);
        let text = query.get();
        let count = versions.get();
        set_is_generating.set(true);
        spawn_local(async move {
            let backend = ctx.backend();
            match blind::generate(&backend, &text, count).await {
                Ok(s) => session.set(Some(s)),
                Err(e) => errors.report(&ctx, e),
            }
            set_is_generating.set(false);
        });
    };

    let choose = move |index: usize| {
        let mut claimed = None;
        session.update(|s| {
            if let Some(s) = s.as_mut() {
                claimed = Some(s.begin_selection(index));
            }
        });
        let claim = match claimed {
            Some(Ok(Some(claim))) => claim,
            Some(Ok(None)) | None => return,
            Some(Err(e)) => {
                errors.report(&ctx, e);
                return;
            }
        };
        set_is_saving.set(true);
        spawn_local(async move {
            let backend = ctx.backend();
            let result = persist_choice(&backend, &claim).await;
            let mut current = false;
            session.update(|s| {
                if let Some(s) = s.as_mut() {
                    current = s.finish_selection(&claim);
                }
            });
            // A regenerated session gets no status from the old choice.
            match result {
                Ok(()) if current => {
                    set_choice_status.set(Some("Your choice has been saved.".to_string()))
                }
                Ok(()) => {}
                Err(e) if current => set_choice_status.set(Some(ctx.report(e))),
                Err(e) => {
                    ctx.report(e);
                }
            }
            set_is_saving.set(false);
        });
    };

    view! {
        <div class="page blind-page">
            <h2>"Blind Results"</h2>
            <p class="page-description">
                "Answer the same query with several models, pick the best answer without knowing which model wrote it, then see who is who."
            </p>

            <section class="form-container">
                <ErrorBanner errors=errors />
                <div class="form-group">
                    <label for="blind-query">"User Query"</label>
                    <textarea
                        id="blind-query"
                        class="input"
                        rows="5"
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    ></textarea>
                    <FieldError errors=errors field="user_query" />
                </div>
                <div class="form-group">
                    <label for="num-versions">"Number of Versions"</label>
                    <input
                        id="num-versions"
                        type="number"
                        min="2"
                        max="4"
                        class="input"
                        prop:value=move || versions.get().to_string()
                        on:input=move |ev| {
                            set_versions.set(event_target_value(&ev).parse().unwrap_or(0));
                        }
                    />
                    <FieldError errors=errors field="num_versions" />
                </div>
                <button
                    class="btn btn-primary"
                    on:click=do_generate
                    disabled=move || is_generating.get()
                >
                    {move || if is_generating.get() { "Generating..." } else { "Generate" }}
                </button>
            </section>

            <FieldError errors=errors field="selection" />
            {move || {
                let phase = session.with(|s| s.as_ref().map_or(BlindPhase::Collecting, BlindSession::phase));
                let hint = match phase {
                    BlindPhase::Collecting => return None,
                    BlindPhase::Generated => {
                        "Pick the answer you like best. The models are revealed after you choose."
                    }
                    BlindPhase::Selected => "Selection recorded.",
                };
                Some(view! { <p class="blind-hint">{hint}</p> })
            }}
            <div class="candidate-grid">
                {move || {
                    let views = session.with(|s| s.as_ref().map(BlindSession::views).unwrap_or_default());
                    views
                        .into_iter()
                        .map(|candidate| {
                            let index = candidate.index;
                            let response = candidate.response.clone();
                            view! {
                                <div class="candidate-card" class:candidate-chosen=candidate.chosen>
                                    <div class="result-header">
                                        <h3>{candidate.label}</h3>
                                        <CopyButton text=response title="Copy response" />
                                    </div>
                                    <pre class="result-text">{candidate.response}</pre>
                                    <button
                                        class="btn btn-secondary"
                                        on:click=move |_| choose(index)
                                        disabled=move || {
                                            is_saving.get()
                                                || session.with(|s| {
                                                    s.as_ref().is_none_or(|s| s.phase() != BlindPhase::Generated)
                                                })
                                        }
                                    >
                                        {if candidate.chosen { "Chosen" } else { "Choose this one" }}
                                    </button>
                                </div>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </div>
            {move || choice_status.get().map(|msg| view! {
                <span class="status-text">{msg}</span>
            })}
        </div>
    }
}
