use leptos::prelude::*;

use crate::catalog::{default_model, models_for, PROVIDERS};
use crate::components::choice_select::ChoiceSelect;

/// Provider and model dropdowns. Switching provider resets the model to that
/// provider's first entry.
#[component]
pub fn ModelPicker(provider: RwSignal<String>, model: RwSignal<String>) -> impl IntoView {
    let models = Signal::derive(move || models_for(&provider.get()));
    let reset_model = Callback::new(move |p: String| {
        model.set(default_model(&p).to_string());
    });

    view! {
        <ChoiceSelect
            id="provider"
            label="AI client"
            choices=Signal::stored(PROVIDERS)
            value=provider
            on_change=reset_model
        />
        <ChoiceSelect id="model" label="Model" choices=models value=model />
    }
}
