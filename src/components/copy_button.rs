use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen_futures::{spawn_local, JsFuture};

async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window available")?;
    let promise: js_sys::Promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| format!("{:?}", e))
}

#[component]
pub fn CopyButton(
    /// Text placed on the clipboard when clicked.
    #[prop(into)]
    text: Signal<String>,
    /// Tooltip, e.g. "Copy optimized query".
    title: &'static str,
) -> impl IntoView {
    let (status, set_status) = signal::<Option<&'static str>>(None);

    let copy = move |_| {
        let value = text.get_untracked();
        spawn_local(async move {
            match copy_to_clipboard(&value).await {
                Ok(()) => set_status.set(Some("Copied")),
                Err(e) => {
                    warn!("Copy failed: {}", e);
                    set_status.set(Some("Copy failed"));
                }
            }
        });
    };

    view! {
        <button class="btn btn-small btn-secondary" title=title on:click=copy>
            {move || status.get().unwrap_or("Copy")}
        </button>
    }
}
