pub mod blind;
pub mod compare;
pub mod evaluation;
pub mod login;
pub mod optimization;
pub mod register;
pub mod settings;

use leptos::prelude::*;

use crate::app::AppContext;
use crate::error::ClientError;

/// Error display for a form: validation messages go next to their field,
/// everything else into a banner above the results.
#[derive(Clone, Copy)]
pub struct FormErrors {
    field: RwSignal<Option<(&'static str, String)>>,
    banner: RwSignal<Option<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self {
            field: RwSignal::new(None),
            banner: RwSignal::new(None),
        }
    }

    pub fn clear(&self) {
        self.field.set(None);
        self.banner.set(None);
    }

    pub fn report(&self, ctx: &AppContext, err: ClientError) {
        match err.field() {
            Some(name) => self.field.set(Some((name, err.to_string()))),
            None => self.banner.set(Some(ctx.report(err))),
        }
    }

    /// Message for `name`, if the last validation failure was on that field.
    pub fn for_field(&self, name: &'static str) -> Option<String> {
        self.field
            .get()
            .filter(|(f, _)| *f == name)
            .map(|(_, msg)| msg)
    }

    pub fn banner(&self) -> Option<String> {
        self.banner.get()
    }
}

impl Default for FormErrors {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline validation message under a field.
#[component]
pub fn FieldError(errors: FormErrors, field: &'static str) -> impl IntoView {
    move || {
        errors.for_field(field).map(|msg| {
            view! { <span class="status-text status-error">{msg}</span> }
        })
    }
}

#[component]
pub fn ErrorBanner(errors: FormErrors) -> impl IntoView {
    move || {
        errors.banner().map(|msg| {
            view! {
                <div class="error-banner">
                    <span class="status-text status-error">{msg}</span>
                </div>
            }
        })
    }
}
