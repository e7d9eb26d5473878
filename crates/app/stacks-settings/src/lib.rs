mod backend;
mod config;
mod enter_behavior;
mod error;
mod settings;
mod shortcut;
mod store;

pub use backend::{BackendCall, MemoryBackend, PersistenceBackend};
pub use config::StoreConfig;
pub use enter_behavior::EnterBehavior;
pub use error::{Error, Result};
pub use settings::{Settings, SettingsState};
pub use shortcut::{Modifier, ShortcutSet};
pub use store::{SettingsStore, SettingsStoreBuilder};
