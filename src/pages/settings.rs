use leptos::prelude::*;

use crate::app::use_app;
use crate::config::{keys, normalize_base_url, AppConfig};
use crate::theme::{Theme, ThemeContext};

#[component]
pub fn SettingsPage() -> impl IntoView {
    let ctx = use_app();
    let theme_ctx = expect_context::<ThemeContext>();

    let (api_url, set_api_url) = signal(ctx.api_base_url.get_untracked());
    let (url_status, set_url_status) = signal::<Option<String>>(None);

    let save_api_url = move |_| {
        let url = normalize_base_url(&api_url.get());
        if let Err(e) = ctx.prefs.set(keys::API_BASE_URL, &url) {
            set_url_status.set(Some(format!("Failed to save: {}", e)));
            return;
        }
        // An empty field falls back to the build-time default.
        let effective = if url.is_empty() {
            normalize_base_url(&AppConfig::default().api_base_url)
        } else {
            url
        };
        set_api_url.set(effective.clone());
        ctx.api_base_url.set(effective);
        set_url_status.set(Some("API URL saved".to_string()));
    };

    let change_theme = move |ev: leptos::ev::Event| {
        let theme = Theme::parse(&event_target_value(&ev));
        theme_ctx.set_theme.set(theme);
        ctx.remember(keys::THEME, theme.as_str());
    };

    view! {
        <div class="page settings-page">
            <h2>"Settings"</h2>

            <section class="settings-section">
                <h3>"Backend"</h3>
                <p class="section-description">"Address of the PromptLab API server."</p>

                <div class="form-group">
                    <label for="api-url">"API URL"</label>
                    <div class="input-row">
                        <input
                            id="api-url"
                            type="text"
                            placeholder="http://localhost:8000"
                            class="input"
                            prop:value=move || api_url.get()
                            on:input=move |ev| {
                                set_api_url.set(event_target_value(&ev));
                            }
                        />
                        <button class="btn btn-save" on:click=save_api_url>"Save"</button>
                    </div>
                    <Show when=move || url_status.get().is_some()>
                        <span class="status-text">{move || url_status.get().unwrap_or_default()}</span>
                    </Show>
                </div>
            </section>

            <section class="settings-section">
                <h3>"Appearance"</h3>
                <div class="form-group">
                    <label for="theme">"Theme"</label>
                    <select id="theme" class="input" on:change=change_theme>
                        {Theme::ALL
                            .into_iter()
                            .map(|t| view! {
                                <option
                                    value=t.as_str()
                                    selected=move || theme_ctx.theme.get() == t
                                >
                                    {theme_label(t)}
                                </option>
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </div>
            </section>
        </div>
    }
}

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
        Theme::System => "Follow system",
    }
}
