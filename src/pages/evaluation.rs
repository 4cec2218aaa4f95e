use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::app::use_app;
use crate::catalog::{self, EVALUATION_METHODS};
use crate::components::choice_select::ChoiceSelect;
use crate::components::copy_button::CopyButton;
use crate::components::model_picker::ModelPicker;
use crate::config::keys;
use crate::pages::{ErrorBanner, FieldError, FormErrors};
use crate::workflow::evaluation::{self, EvaluationInput, EvaluationRecord};

#[component]
pub fn EvaluationPage() -> impl IntoView {
    let ctx = use_app();

    let query = RwSignal::new(ctx.recall(keys::OPTIMIZED_OUTPUT).unwrap_or_default());
    let provider = RwSignal::new(catalog::DEFAULT_PROVIDER.to_string());
    let model = RwSignal::new(catalog::default_model(catalog::DEFAULT_PROVIDER).to_string());
    let method = RwSignal::new(EVALUATION_METHODS[0].value.to_string());

    let record = RwSignal::new(None::<EvaluationRecord>);
    let (is_evaluating, set_is_evaluating) = signal(false);
    let errors = FormErrors::new();

    let do_evaluate = move |_| {
        errors.clear();
        let input = EvaluationInput {
            user_query: query.get(),
            provider: provider.get(),
            model: model.get(),
            method: method.get(),
        };
        set_is_evaluating.set(true);
        spawn_local(async move {
            let backend = ctx.backend();
            match evaluation::evaluate(&backend, &input).await {
                Ok(r) => record.set(Some(r)),
                Err(e) => errors.report(&ctx, e),
            }
            set_is_evaluating.set(false);
        });
    };

    let reasons_text = Signal::derive(move || {
        record
            .with(|r| r.as_ref().map(EvaluationRecord::reasons_text))
            .unwrap_or_default()
    });

    view! {
        <div class="page evaluation-page">
            <h2>"Evaluation"</h2>
            <p class="page-description">"Have a model rate a prompt and explain the rating."</p>

            <div class="columns-wrapper">
                <section class="form-container">
                    <ModelPicker provider=provider model=model />
                    <ChoiceSelect
                        id="evaluation-method"
                        label="Evaluation Method"
                        choices=Signal::stored(EVALUATION_METHODS)
                        value=method
                    />
                </section>

                <section class="user-query">
                    <ErrorBanner errors=errors />
                    <div class="form-group">
                        <label for="evaluation-query">"User Query"</label>
                        <textarea
                            id="evaluation-query"
                            class="input"
                            rows="5"
                            prop:value=move || query.get()
                            on:input=move |ev| query.set(event_target_value(&ev))
                        ></textarea>
                        <FieldError errors=errors field="user_query" />
                    </div>
                    <button
                        class="btn btn-primary"
                        on:click=do_evaluate
                        disabled=move || is_evaluating.get()
                    >
                        {move || if is_evaluating.get() { "Evaluating..." } else { "Evaluate" }}
                    </button>

                    {move || record.get().map(|r| view! {
                        <div class="result-panel">
                            <div class="result-header">
                                <h3>"Rating"</h3>
                                <span class="rating">
                                    {r.rating.clone().unwrap_or_else(|| "Not rated".to_string())}
                                </span>
                            </div>
                            <div class="result-header">
                                <h3>"Reasons"</h3>
                                <CopyButton text=reasons_text title="Copy reasons" />
                            </div>
                            {if r.reasons.is_empty() {
                                view! { <p class="history-empty">"No reasons given."</p> }.into_any()
                            } else {
                                view! {
                                    <ul class="reasons-list">
                                        {r.reasons
                                            .iter()
                                            .map(|reason| view! { <li>{reason.clone()}</li> })
                                            .collect::<Vec<_>>()}
                                    </ul>
                                }.into_any()
                            }}
                        </div>
                    })}
                </section>
            </div>
        </div>
    }
}
