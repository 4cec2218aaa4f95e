use leptos::prelude::*;
use leptos_router::components::*;
use leptos_router::path;
use tracing::warn;

use crate::api::http::HttpBackend;
use crate::components::sidebar::Sidebar;
use crate::config::{keys, AppConfig};
use crate::error::ClientError;
use crate::pages::blind::BlindResultsPage;
use crate::pages::compare::ComparePage;
use crate::pages::evaluation::EvaluationPage;
use crate::pages::login::LoginPage;
use crate::pages::optimization::OptimizationPage;
use crate::pages::register::RegisterPage;
use crate::pages::settings::SettingsPage;
use crate::session::SessionStore;
use crate::storage::{BrowserStorage, Preferences};
use crate::theme::{apply_theme, Theme, ThemeContext};

/// Shared client state handed to every page through context.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub session: SessionStore<BrowserStorage>,
    pub prefs: Preferences<BrowserStorage>,
    pub api_base_url: RwSignal<String>,
    /// `Some` while logged in; the name itself may still be empty.
    pub display_name: RwSignal<Option<String>>,
    pub session_expired: RwSignal<bool>,
}

impl AppContext {
    fn new(config: AppConfig) -> Self {
        let session = SessionStore::new(BrowserStorage);
        Self {
            session,
            prefs: Preferences::new(BrowserStorage),
            api_base_url: RwSignal::new(config.api_base_url),
            display_name: RwSignal::new(session.current().map(|s| s.display_name)),
            session_expired: RwSignal::new(false),
        }
    }

    pub fn backend(&self) -> HttpBackend<BrowserStorage> {
        HttpBackend::new(self.api_base_url.get_untracked(), self.session)
    }

    /// Turns an error into display text. A rejected session is cleared so
    /// the sidebar asks the user to log in again.
    pub fn report(&self, err: ClientError) -> String {
        if matches!(err, ClientError::SessionInvalid) {
            if let Err(e) = self.session.clear() {
                warn!("Failed to clear session: {}", e);
            }
            self.display_name.set(None);
            self.session_expired.set(true);
        }
        err.to_string()
    }

    pub fn logout(&self) {
        if let Err(e) = self.session.clear() {
            warn!("Failed to clear session: {}", e);
        }
        self.display_name.set(None);
        self.session_expired.set(false);
    }

    pub fn remember(&self, key: &str, value: &str) {
        if let Err(e) = self.prefs.set(key, value) {
            warn!("Failed to save preference {}: {}", key, e);
        }
    }

    pub fn recall(&self, key: &str) -> Option<String> {
        self.prefs.get(key).ok().flatten()
    }
}

pub fn use_app() -> AppContext {
    expect_context::<AppContext>()
}

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new(AppConfig::load(&Preferences::new(BrowserStorage)));
    provide_context(ctx);

    let saved_theme = ctx
        .recall(keys::THEME)
        .map(|t| Theme::parse(&t))
        .unwrap_or_default();
    let (theme, set_theme) = signal(saved_theme);
    provide_context(ThemeContext { theme, set_theme });

    // Apply theme to DOM whenever the signal changes
    Effect::new(move |_| {
        apply_theme(theme.get());
    });

    view! {
        <Router>
            <div class="app-layout">
                <Sidebar />
                <main class="content">
                    <Routes fallback=|| view! { <p>"Page not found"</p> }>
                        <Route path=path!("/") view=LoginPage />
                        <Route path=path!("/register") view=RegisterPage />
                        <Route path=path!("/optimize") view=OptimizationPage />
                        <Route path=path!("/evaluate") view=EvaluationPage />
                        <Route path=path!("/compare") view=ComparePage />
                        <Route path=path!("/blind") view=BlindResultsPage />
                        <Route path=path!("/settings") view=SettingsPage />
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
