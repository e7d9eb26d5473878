use stacks_settings::{EnterBehavior, Modifier, SettingsStore, ShortcutSet};
use tracing::{debug, warn};

use crate::{
    element::{Element, SelectOption, UiEvent},
    host::{HotKey, Mode, ModeContext},
};

const ENTER_BEHAVIOR: &str = "enter-behavior";
const MODIFIER_PREFIX: &str = "modifier:";

/// The Settings screen: Enter behavior and the activation shortcut.
///
/// Renders nothing until the store has finished its initial load.
pub struct SettingsView {
    store: SettingsStore,
}

impl SettingsView {
    /// Mounting the view starts the store's initial load if nobody has yet.
    pub fn new(store: SettingsStore) -> Self {
        store.initialize();
        Self { store }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Element name of the toggle for `modifier`.
    pub fn toggle_name(modifier: Modifier) -> String {
        format!("{MODIFIER_PREFIX}{}", modifier.as_str())
    }

    pub fn enter_behavior_name() -> &'static str {
        ENTER_BEHAVIOR
    }

    fn enter_behavior_row(selected: EnterBehavior) -> Element {
        let options = EnterBehavior::ALL
            .into_iter()
            .map(|behavior| SelectOption {
                value: behavior.as_str().to_owned(),
                label: behavior.label().to_owned(),
            })
            .collect();

        Element::container(
            "enter-behavior-row",
            vec![
                Element::label("On Enter"),
                Element::Select {
                    name: ENTER_BEHAVIOR.to_owned(),
                    options,
                    selected: selected.as_str().to_owned(),
                },
            ],
        )
    }

    fn shortcut_row(shortcut: Option<&ShortcutSet>) -> Element {
        let mut children = vec![Element::label("Activation shortcut")];
        children.extend(Modifier::ALL.into_iter().map(|modifier| Element::Toggle {
            name: Self::toggle_name(modifier),
            label: modifier.label().to_owned(),
            active: shortcut.is_some_and(|shortcut| shortcut.is_held(modifier)),
        }));
        children.push(Element::label("+ SPACE"));

        Element::container("shortcut-row", children)
    }
}

impl Mode for SettingsView {
    fn name(&self) -> &str {
        "Settings"
    }

    fn hot_keys(&self, cx: &ModeContext) -> Vec<HotKey> {
        let host = cx.host.clone();
        vec![HotKey::new("Back", &["Escape"], move || host.deactivate())]
    }

    fn render(&self, _cx: &ModeContext) -> Option<Element> {
        let state = self.store.snapshot();
        if !state.ready {
            return None;
        }

        Some(Element::container(
            "settings",
            vec![
                Element::Heading {
                    text: "Settings".to_owned(),
                },
                Self::enter_behavior_row(state.settings.enter_behavior),
                Self::shortcut_row(state.settings.shortcut.as_ref()),
            ],
        ))
    }

    fn handle(&self, _cx: &ModeContext, event: &UiEvent) {
        match event {
            UiEvent::Select { name, value } if name == ENTER_BEHAVIOR => {
                match value.parse::<EnterBehavior>() {
                    Ok(behavior) => self.store.set_enter_behavior(behavior),
                    Err(e) => warn!("Ignoring enter behavior selection: {}", e),
                }
            }
            UiEvent::Click { name } => match name.strip_prefix(MODIFIER_PREFIX) {
                Some(modifier) => {
                    self.store.toggle_shortcut_modifier(modifier);
                }
                None => debug!("Settings: unhandled click on {}", name),
            },
            UiEvent::Select { name, .. } => debug!("Settings: unhandled select on {}", name),
        }
    }
}
