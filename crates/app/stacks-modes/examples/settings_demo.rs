//! Mounts the Settings screen over an in-memory backend and prints what it renders.
//!
//! RUST_LOG=debug cargo run -p stacks-modes --example settings_demo

use std::sync::Arc;

use stacks_modes::{Mode, ModeContext, ModeHost, SettingsView, UiEvent, dispatch_key};
use stacks_settings::{EnterBehavior, MemoryBackend, Modifier, SettingsStore, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct LoggingHost;

impl ModeHost for LoggingHost {
    fn deactivate(&self) {
        info!("Host: settings screen popped");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let backend = Arc::new(MemoryBackend::with_values(
        Some([Modifier::Ctrl].into_iter().collect()),
        Some(EnterBehavior::Copy),
    ));
    let store = SettingsStore::builder()
        .backend(backend.clone())
        .config(StoreConfig::from_jsonc("{}")?)
        .build()?;

    let view = SettingsView::new(store.clone());
    let cx = ModeContext::new(vec!["Settings".to_owned()], Arc::new(LoggingHost));

    info!("Before load renders: {:?}", view.render(&cx));
    store.wait_until_ready().await;

    view.handle(&cx, &UiEvent::click(SettingsView::toggle_name(Modifier::Shift)));
    view.handle(
        &cx,
        &UiEvent::select(SettingsView::enter_behavior_name(), "paste-or-copy"),
    );

    if let Some(tree) = view.render(&cx) {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    }

    store.flush().await;
    info!(
        "Backend now holds {:?} / {:?}",
        backend.shortcut().map(|shortcut| shortcut.accelerator()),
        backend.enter_behavior()
    );

    dispatch_key(&view, &cx, "Escape");
    Ok(())
}
