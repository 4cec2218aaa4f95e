use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::types::Verdict;
use crate::app::use_app;
use crate::catalog;
use crate::components::copy_button::CopyButton;
use crate::components::model_picker::ModelPicker;
use crate::config::keys;
use crate::error::ClientError;
use crate::pages::{ErrorBanner, FieldError, FormErrors};
use crate::workflow::comparison::{self, persist_verdict, ComparisonInput, ComparisonRecord};

#[component]
pub fn ComparePage() -> impl IntoView {
    let ctx = use_app();

    let user_query = RwSignal::new(String::new());
    let optimized_query = RwSignal::new(ctx.recall(keys::OPTIMIZED_OUTPUT).unwrap_or_default());
    let provider = RwSignal::new(catalog::DEFAULT_PROVIDER.to_string());
    let model = RwSignal::new(catalog::default_model(catalog::DEFAULT_PROVIDER).to_string());

    let record = RwSignal::new(None::<ComparisonRecord>);
    let (is_comparing, set_is_comparing) = signal(false);
    let (verdict_status, set_verdict_status) = signal::<Option<String>>(None);
    let errors = FormErrors::new();

    let do_compare = move |_| {
        errors.clear();
        set_verdict_status.set(None);
        let input = ComparisonInput {
            user_query: user_query.get(),
            optimized_query: optimized_query.get(),
            provider: provider.get(),
            model: model.get(),
        };
        set_is_comparing.set(true);
        spawn_local(async move {
            let backend = ctx.backend();
            match comparison::compare(&backend, &input).await {
                Ok(r) => record.set(Some(r)),
                Err(e) => {
                    if !e.is_validation() {
                        record.set(None);
                    }
                    errors.report(&ctx, e);
                }
            }
            set_is_comparing.set(false);
        });
    };

    let choose = move |verdict: Verdict| {
        let mut claimed = None;
        record.update(|r| {
            claimed = Some(match r.as_mut() {
                Some(r) => r.begin_verdict(verdict),
                None => Err(ClientError::MissingReference("No comparison found or missing ID.")),
            });
        });
        let id = match claimed {
            Some(Ok(id)) => id,
            Some(Err(ClientError::VerdictAlreadyRecorded)) | None => return,
            Some(Err(e)) => {
                set_verdict_status.set(Some(ctx.report(e)));
                return;
            }
        };
        set_verdict_status.set(None);
        spawn_local(async move {
            let backend = ctx.backend();
            let result = persist_verdict(&backend, &id, verdict).await;
            let mut current = false;
            record.update(|r| {
                if let Some(r) = r.as_mut() {
                    current = r.finish_verdict(&id, result.is_ok());
                }
            });
            if !current {
                if let Err(e) = result {
                    ctx.report(e);
                }
                return;
            }
            match result {
                Ok(()) => set_verdict_status.set(Some(format!(
                    "Verdict saved: the optimized query did {}.",
                    verdict_phrase(verdict)
                ))),
                Err(e) => set_verdict_status.set(Some(ctx.report(e))),
            }
        });
    };

    let default_text = Signal::derive(move || {
        record
            .with(|r| r.as_ref().and_then(|r| r.default_response.clone()))
            .unwrap_or_default()
    });
    let optimized_text = Signal::derive(move || {
        record
            .with(|r| r.as_ref().and_then(|r| r.optimized_response.clone()))
            .unwrap_or_default()
    });

    view! {
        <div class="page compare-page">
            <h2>"Compare"</h2>
            <p class="page-description">
                "Send the original and the optimized query to the same model and judge the answers."
            </p>

            <section class="form-container">
                <ModelPicker provider=provider model=model />
                <ErrorBanner errors=errors />

                <div class="columns-wrapper">
                    <div class="form-group">
                        <label for="user-query">"User Query"</label>
                        <textarea
                            id="user-query"
                            class="input"
                            rows="5"
                            prop:value=move || user_query.get()
                            on:input=move |ev| user_query.set(event_target_value(&ev))
                        ></textarea>
                        <FieldError errors=errors field="user_query" />
                    </div>
                    <div class="form-group">
                        <label for="optimized-query">"Optimized Query"</label>
                        <textarea
                            id="optimized-query"
                            class="input"
                            rows="5"
                            prop:value=move || optimized_query.get()
                            on:input=move |ev| optimized_query.set(event_target_value(&ev))
                        ></textarea>
                        <FieldError errors=errors field="optimized_query" />
                    </div>
                </div>

                <button
                    class="btn btn-primary"
                    on:click=do_compare
                    disabled=move || is_comparing.get()
                >
                    {move || if is_comparing.get() { "Comparing..." } else { "Compare" }}
                </button>
            </section>

            <Show when=move || record.with(|r| r.is_some())>
                <section class="result-panel">
                    <div class="columns-wrapper">
                        <div class="response-column">
                            <div class="result-header">
                                <h3>"Default Response"</h3>
                                <CopyButton text=default_text title="Copy default response" />
                            </div>
                            <pre class="result-text">
                                {move || record.with(|r| response_or_placeholder(
                                    r.as_ref().and_then(|r| r.default_response.as_deref()),
                                ))}
                            </pre>
                        </div>
                        <div class="response-column">
                            <div class="result-header">
                                <h3>"Optimized Response"</h3>
                                <CopyButton text=optimized_text title="Copy optimized response" />
                            </div>
                            <pre class="result-text">
                                {move || record.with(|r| response_or_placeholder(
                                    r.as_ref().and_then(|r| r.optimized_response.as_deref()),
                                ))}
                            </pre>
                        </div>
                    </div>

                    <div class="verdict-actions">
                        <span class="verdict-prompt">"How did the optimized query do?"</span>
                        {Verdict::ALL
                            .into_iter()
                            .map(|verdict| view! {
                                <button
                                    class="btn btn-secondary"
                                    class:btn-selected=move || record.with(|r| {
                                        r.as_ref().is_some_and(|r| r.verdict == Some(verdict))
                                    })
                                    on:click=move |_| choose(verdict)
                                    disabled=move || record.with(|r| {
                                        !r.as_ref().is_some_and(|r| r.can_submit_verdict())
                                    })
                                >
                                    {verdict.label()}
                                </button>
                            })
                            .collect::<Vec<_>>()}
                    </div>
                    {move || {
                        if record.with(|r| r.as_ref().is_some_and(|r| r.is_submitting())) {
                            Some(view! { <span class="status-text">"Saving verdict..."</span> }.into_any())
                        } else {
                            verdict_status.get().map(|msg| view! {
                                <span class="status-text">{msg}</span>
                            }.into_any())
                        }
                    }}
                </section>
            </Show>
        </div>
    }
}

fn verdict_phrase(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Worse => "worse",
        Verdict::Tie => "about the same",
        Verdict::Better => "better",
    }
}

fn response_or_placeholder(response: Option<&str>) -> String {
    response
        .map(str::to_string)
        .unwrap_or_else(|| "No response returned.".to_string())
}
