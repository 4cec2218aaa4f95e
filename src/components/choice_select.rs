use leptos::prelude::*;

use crate::catalog::Choice;

/// A labelled native `<select>` over a static list of choices.
#[component]
pub fn ChoiceSelect(
    /// Element id, also used by the label.
    id: &'static str,
    label: &'static str,
    /// Available choices; may change reactively (e.g. models per provider).
    #[prop(into)]
    choices: Signal<&'static [Choice]>,
    value: RwSignal<String>,
    /// Invoked with the new value after `value` is updated.
    #[prop(optional)]
    on_change: Option<Callback<String>>,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label for=id>{label}</label>
            <select
                id=id
                class="input"
                on:change=move |ev| {
                    let selected = event_target_value(&ev);
                    value.set(selected.clone());
                    if let Some(cb) = on_change {
                        cb.run(selected);
                    }
                }
            >
                {move || {
                    choices
                        .get()
                        .iter()
                        .map(|c| {
                            let v = c.value;
                            view! {
                                <option value=v selected=move || value.get() == v>{c.label}</option>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </select>
        </div>
    }
}
