use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::use_app;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app();
    let navigate = use_navigate();

    let logout = move |_| {
        ctx.logout();
        navigate("/", Default::default());
    };

    view! {
        <nav class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"PromptLab"</h1>
                <p class="sidebar-subtitle">"Prompt Optimization Workbench"</p>
            </div>
            {move || {
                if let Some(name) = ctx.display_name.get() {
                    let greeting = if name.is_empty() { "Hello".to_string() } else { format!("Hello, {}", name) };
                    view! { <p class="sidebar-greeting">{greeting}</p> }.into_any()
                } else if ctx.session_expired.get() {
                    view! {
                        <p class="sidebar-greeting status-error">
                            "Session expired. " <a href="/">"Log in again"</a>
                        </p>
                    }.into_any()
                } else {
                    view! { <p class="sidebar-greeting">"Not logged in"</p> }.into_any()
                }
            }}
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="/optimize" class="nav-link">"Optimization"</a>
                </li>
                <li class="nav-item">
                    <a href="/evaluate" class="nav-link">"Evaluation"</a>
                </li>
                <li class="nav-item">
                    <a href="/compare" class="nav-link">"Compare"</a>
                </li>
                <li class="nav-item">
                    <a href="/blind" class="nav-link">"Blind Results"</a>
                </li>
                <li class="nav-item">
                    <a href="/settings" class="nav-link">"Settings"</a>
                </li>
            </ul>
            <button
                class="btn btn-secondary sidebar-logout"
                on:click=logout
                style:display=move || if ctx.display_name.get().is_some() { "block" } else { "none" }
            >
                "Log out"
            </button>
        </nav>
    }
}
