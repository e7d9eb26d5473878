//! Contract between a screen (mode) and the host that stacks them.

use std::{fmt, sync::Arc};

use crate::element::{Element, UiEvent};

/// Capabilities the host hands to its modes.
pub trait ModeHost: Send + Sync {
    /// Remove the topmost mode from the stack.
    fn deactivate(&self);
}

/// What a mode sees when it is asked for hotkeys or a render.
#[derive(Clone)]
pub struct ModeContext {
    /// Names of the active modes, bottom first
    pub stack: Vec<String>,
    pub host: Arc<dyn ModeHost>,
}

impl ModeContext {
    pub fn new(stack: Vec<String>, host: Arc<dyn ModeHost>) -> Self {
        Self { stack, host }
    }
}

/// A key binding a mode contributes to the host's dispatch table.
#[derive(Clone)]
pub struct HotKey {
    pub name: String,
    pub keys: Vec<String>,
    on_mouse_down: Arc<dyn Fn() + Send + Sync>,
}

impl HotKey {
    pub fn new(
        name: impl Into<String>,
        keys: &[&str],
        on_mouse_down: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            keys: keys.iter().map(|key| (*key).to_owned()).collect(),
            on_mouse_down: Arc::new(on_mouse_down),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.keys.iter().any(|bound| bound.eq_ignore_ascii_case(key))
    }

    /// Run the action, as a key press or a click on the hint would.
    pub fn trigger(&self) {
        (self.on_mouse_down)();
    }
}

impl fmt::Debug for HotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotKey")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// One screen in the launcher's stack.
pub trait Mode: Send + Sync {
    fn name(&self) -> &str;

    fn hot_keys(&self, cx: &ModeContext) -> Vec<HotKey>;

    /// `None` renders nothing.
    fn render(&self, cx: &ModeContext) -> Option<Element>;

    fn handle(&self, cx: &ModeContext, event: &UiEvent);
}

/// Trigger the first hotkey of `mode` bound to `key`. Returns whether one matched.
pub fn dispatch_key(mode: &dyn Mode, cx: &ModeContext, key: &str) -> bool {
    match mode.hot_keys(cx).into_iter().find(|hot_key| hot_key.matches(key)) {
        Some(hot_key) => {
            tracing::debug!("{}: hotkey {} ({})", mode.name(), hot_key.name, key);
            hot_key.trigger();
            true
        }
        None => false,
    }
}
