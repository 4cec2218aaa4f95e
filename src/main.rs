use promptlab::app::App;
use promptlab::config::AppConfig;
use promptlab::logging;
use promptlab::storage::{BrowserStorage, Preferences};

fn main() {
    logging::init(&AppConfig::load(&Preferences::new(BrowserStorage)));
    tracing::info!("Starting PromptLab");
    leptos::mount::mount_to_body(App);
}
