use serde::{Deserialize, Serialize};
use specta::Type;

use crate::{EnterBehavior, ShortcutSet};

/// The settings unit shown on the Settings screen and persisted by the backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Type, Default)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Activation shortcut; `None` until loaded from the backend
    pub shortcut: Option<ShortcutSet>,
    pub enter_behavior: EnterBehavior,
}

/// Snapshot published to store observers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsState {
    pub settings: Settings,
    /// Both initial backend reads have settled
    pub ready: bool,
}
