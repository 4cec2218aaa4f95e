use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::types::display_value;
use crate::app::use_app;
use crate::catalog::{self, TECHNIQUES};
use crate::components::choice_select::ChoiceSelect;
use crate::components::copy_button::CopyButton;
use crate::components::history_panel::HistoryPanel;
use crate::components::model_picker::ModelPicker;
use crate::config::keys;
use crate::pages::{ErrorBanner, FieldError, FormErrors};
use crate::workflow::optimization::{
    self, persist_augmentation, Augmentation, OptimizationInput, OptimizationRecord,
    DEFAULT_ITERATIONS,
};

#[component]
pub fn OptimizationPage() -> impl IntoView {
    let ctx = use_app();

    // Form state
    let query = RwSignal::new(String::new());
    let provider = RwSignal::new(catalog::DEFAULT_PROVIDER.to_string());
    let model = RwSignal::new(catalog::default_model(catalog::DEFAULT_PROVIDER).to_string());
    let technique = RwSignal::new(catalog::DEFAULT_TECHNIQUE.to_string());
    let (iterations, set_iterations) = signal(DEFAULT_ITERATIONS);

    // Result state
    let record = RwSignal::new(None::<OptimizationRecord>);
    let (is_optimizing, set_is_optimizing) = signal(false);
    let (history_refresh, set_history_refresh) = signal(0u32);
    let errors = FormErrors::new();

    let do_optimize = move |_| {
        errors.clear();
        let input = OptimizationInput {
            user_query: query.get(),
            provider: provider.get(),
            model: model.get(),
            technique: technique.get(),
            iterations: iterations.get(),
        };
        set_is_optimizing.set(true);
        spawn_local(async move {
            let backend = ctx.backend();
            match optimization::optimize(&backend, &input).await {
                Ok(r) => {
                    ctx.remember(keys::OPTIMIZED_OUTPUT, &r.final_optimized_query);
                    record.set(Some(r));
                    set_history_refresh.update(|n| *n += 1);
                }
                Err(e) => errors.report(&ctx, e),
            }
            set_is_optimizing.set(false);
        });
    };

    // Flag and text change synchronously here. The save runs afterwards and
    // is undone if it fails, unless the record was replaced meanwhile.
    let augment = move |kind: Augmentation| {
        let mut pending = None;
        record.update(|r| {
            if let Some(r) = r.as_mut() {
                pending = r.begin_augmentation(kind);
            }
        });
        let Some(pending) = pending else {
            return;
        };
        errors.clear();
        spawn_local(async move {
            let backend = ctx.backend();
            let result = persist_augmentation(&backend, &pending).await;
            let mut current = false;
            record.update(|r| {
                if let Some(r) = r.as_mut() {
                    current = r.finish_augmentation(&pending, result.is_ok());
                }
            });
            match result {
                Ok(()) if current => ctx.remember(keys::OPTIMIZED_OUTPUT, &pending.text),
                Ok(()) => {}
                Err(e) if current => errors.report(&ctx, e),
                Err(e) => {
                    ctx.report(e);
                }
            }
        });
    };

    let pick_from_history = Callback::new(move |q: String| query.set(q));
    let final_text = Signal::derive(move || {
        record
            .get()
            .map(|r| r.final_optimized_query)
            .unwrap_or_default()
    });

    view! {
        <div class="page optimization-page">
            <h2>"Optimization"</h2>
            <p class="page-description">
                "Rewrite a query with a prompting technique, then refine it with an expert persona or an emotional stimulus."
            </p>

            <div class="columns-wrapper">
                <section class="form-container">
                    <ModelPicker provider=provider model=model />
                    <ChoiceSelect
                        id="technique"
                        label="Technique"
                        choices=Signal::stored(TECHNIQUES)
                        value=technique
                    />
                    <div class="form-group">
                        <label for="iterations">"Number of Iterations"</label>
                        <input
                            id="iterations"
                            type="number"
                            min="3"
                            max="5"
                            class="input"
                            prop:value=move || iterations.get().to_string()
                            on:input=move |ev| {
                                set_iterations.set(event_target_value(&ev).parse().unwrap_or(0));
                            }
                        />
                        <FieldError errors=errors field="iterations" />
                    </div>
                    <HistoryPanel refresh=history_refresh on_pick=pick_from_history />
                </section>

                <section class="user-query">
                    <ErrorBanner errors=errors />
                    <div class="form-group">
                        <label for="user-query">"User Query"</label>
                        <textarea
                            id="user-query"
                            class="input"
                            rows="5"
                            placeholder="Enter text to optimize..."
                            prop:value=move || query.get()
                            on:input=move |ev| query.set(event_target_value(&ev))
                        ></textarea>
                        <FieldError errors=errors field="user_query" />
                    </div>

                    <button
                        class="btn btn-primary"
                        on:click=do_optimize
                        disabled=move || is_optimizing.get()
                    >
                        {move || if is_optimizing.get() { "Optimizing..." } else { "Optimize" }}
                    </button>

                    <Show when=move || record.with(|r| r.is_some())>
                        <div class="result-panel">
                            <div class="result-header">
                                <h3>"Final Optimized Query"</h3>
                                <CopyButton text=final_text title="Copy optimized query" />
                            </div>
                            <pre class="result-text">{move || final_text.get()}</pre>

                            <div class="augment-actions">
                                <button
                                    class="btn btn-secondary"
                                    on:click=move |_| augment(Augmentation::ExpertPersona)
                                    disabled=move || record.with(|r| {
                                        !r.as_ref().is_some_and(|r| r.can_augment(Augmentation::ExpertPersona))
                                    })
                                >
                                    {move || if record.with(|r| r.as_ref().is_some_and(|r| r.expert_added)) {
                                        "Expert persona added"
                                    } else {
                                        "Add expert persona"
                                    }}
                                </button>
                                <button
                                    class="btn btn-secondary"
                                    on:click=move |_| augment(Augmentation::EmotionalStimulus)
                                    disabled=move || record.with(|r| {
                                        !r.as_ref().is_some_and(|r| r.can_augment(Augmentation::EmotionalStimulus))
                                    })
                                >
                                    {move || if record.with(|r| r.as_ref().is_some_and(|r| r.emotional_added)) {
                                        "Emotional stimulus added"
                                    } else {
                                        "Add emotional stimulus"
                                    }}
                                </button>
                                <a href="/compare" class="btn btn-link">"Compare"</a>
                                <a href="/blind" class="btn btn-link">"Blind test"</a>
                                {move || {
                                    record
                                        .with(|r| r.as_ref().is_some_and(|r| r.is_pending()))
                                        .then(|| view! { <span class="status-text">"Saving..."</span> })
                                }}
                            </div>

                            {move || {
                                record
                                    .get()
                                    .and_then(|r| r.raw_output)
                                    .map(|raw| view! {
                                        <details class="raw-output">
                                            <summary>"Raw Optimization Output"</summary>
                                            <pre>{display_value(&raw)}</pre>
                                        </details>
                                    })
                            }}
                        </div>
                    </Show>
                </section>
            </div>
        </div>
    }
}
