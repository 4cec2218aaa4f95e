use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::app::use_app;
use crate::pages::{ErrorBanner, FieldError, FormErrors};
use crate::workflow::account;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let errors = FormErrors::new();

    let do_login = move |_| {
        errors.clear();
        set_is_loading.set(true);
        let email = email.get();
        let password = password.get();
        let navigate = navigate.clone();
        spawn_local(async move {
            let backend = ctx.backend();
            match account::login(&backend, &ctx.session, &email, &password).await {
                Ok(session) => {
                    ctx.display_name.set(Some(session.display_name));
                    ctx.session_expired.set(false);
                    set_password.set(String::new());
                    navigate("/optimize", Default::default());
                }
                Err(e) => errors.report(&ctx, e),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="page login-page">
            <div class="card auth-card">
                <h2>"Welcome Back!"</h2>
                <ErrorBanner errors=errors />

                <div class="form-group">
                    <label for="email">"Email Address"</label>
                    <input
                        id="email"
                        type="email"
                        class="input"
                        placeholder="user@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <FieldError errors=errors field="email" />
                </div>

                <div class="form-group">
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        class="input input-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    <FieldError errors=errors field="password" />
                </div>

                <button
                    class="btn btn-primary"
                    on:click=do_login
                    disabled=move || is_loading.get()
                >
                    {move || if is_loading.get() { "Logging in..." } else { "Log In" }}
                </button>
                <a href="/register" class="btn btn-link">"Sign Up"</a>
            </div>
        </div>
    }
}
