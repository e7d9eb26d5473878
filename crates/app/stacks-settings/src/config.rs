use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    EnterBehavior, Settings, ShortcutSet,
    error::{Error, Result},
};

pub(crate) static DEFAULTS: &str = include_str!("../assets/defaults.jsonc");

/// Placeholder values the store is seeded with before the backend answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub default_enter_behavior: EnterBehavior,
    pub initial_shortcut: Option<ShortcutSet>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_enter_behavior: EnterBehavior::Copy,
            initial_shortcut: None,
        }
    }
}

impl StoreConfig {
    /// Parse a JSON-with-comments document, layering its non-null values over
    /// the shipped defaults.
    pub fn from_jsonc(customizations: &str) -> Result<Self> {
        let customizations: Value = serde_json_lenient::from_str(customizations)?;
        let mut config: Value = serde_json_lenient::from_str(DEFAULTS)?;

        merge_non_null(customizations, &mut config);

        let config: StoreConfig = serde_json::from_value(config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(shortcut) = &self.initial_shortcut
            && let Some(name) = shortcut.unrecognized().next()
        {
            return Err(Error::configuration(format!(
                "initialShortcut holds unknown modifier {name:?}"
            )));
        }
        Ok(())
    }

    pub(crate) fn seed(&self) -> Settings {
        Settings {
            shortcut: self.initial_shortcut.clone(),
            enter_behavior: self.default_enter_behavior,
        }
    }
}

fn merge_non_null(update: Value, target: &mut Value) {
    match (update, target) {
        (Value::Object(update), Value::Object(target)) => {
            for (key, value) in update {
                if value.is_null() {
                    continue;
                }
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() => merge_non_null(value, existing),
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (update, target) if !update.is_null() => *target = update,
        _ => {}
    }
}
