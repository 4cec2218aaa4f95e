use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::app::use_app;
use crate::pages::{ErrorBanner, FieldError, FormErrors};
use crate::workflow::account;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();

    let (full_name, set_full_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let errors = FormErrors::new();

    let do_register = move |_| {
        errors.clear();
        set_is_loading.set(true);
        let (name, mail, pass) = (full_name.get(), email.get(), password.get());
        let navigate = navigate.clone();
        spawn_local(async move {
            let backend = ctx.backend();
            match account::register(&backend, &name, &mail, &pass).await {
                Ok(()) => navigate("/", Default::default()),
                Err(e) => errors.report(&ctx, e),
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <div class="page register-page">
            <div class="card auth-card">
                <h2>"Create Your Account"</h2>
                <ErrorBanner errors=errors />

                <div class="form-group">
                    <label for="fullname">"Full Name"</label>
                    <input
                        id="fullname"
                        type="text"
                        class="input"
                        prop:value=move || full_name.get()
                        on:input=move |ev| set_full_name.set(event_target_value(&ev))
                    />
                    <FieldError errors=errors field="full_name" />
                </div>

                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        class="input"
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
                    on:click=do_register
                    disabled=move || is_loading.get()
                >
                    {move || if is_loading.get() { "Creating account..." } else { "Sign Up" }}
                </button>
                <a href="/" class="btn btn-link">"Back to login"</a>
            </div>
        </div>
    }
}
