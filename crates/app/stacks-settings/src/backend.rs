use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    EnterBehavior, ShortcutSet,
    error::{Error, Result},
};

/// Remote side that persists launcher settings.
///
/// Reads may answer "nothing stored" with `Ok(None)`. Writes always carry the
/// complete value, never a delta.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    async fn get_shortcut(&self) -> Result<Option<ShortcutSet>>;

    async fn get_enter_behavior(&self) -> Result<Option<EnterBehavior>>;

    async fn update_shortcut(&self, shortcut: &ShortcutSet) -> Result<()>;

    async fn update_enter_behavior(&self, enter_behavior: EnterBehavior) -> Result<()>;
}

/// A call received by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    GetShortcut,
    GetEnterBehavior,
    UpdateShortcut(ShortcutSet),
    UpdateEnterBehavior(EnterBehavior),
}

impl BackendCall {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            BackendCall::UpdateShortcut(_) | BackendCall::UpdateEnterBehavior(_)
        )
    }
}

#[derive(Default)]
struct Stored {
    shortcut: Option<ShortcutSet>,
    enter_behavior: Option<EnterBehavior>,
    fail: bool,
}

/// In-process backend that keeps values in memory and records every call.
#[derive(Default)]
pub struct MemoryBackend {
    stored: Mutex<Stored>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(shortcut: Option<ShortcutSet>, enter_behavior: Option<EnterBehavior>) -> Self {
        Self {
            stored: Mutex::new(Stored {
                shortcut,
                enter_behavior,
                fail: false,
            }),
            calls: Mutex::default(),
        }
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, fail: bool) {
        self.stored.lock().fail = fail;
    }

    pub fn shortcut(&self) -> Option<ShortcutSet> {
        self.stored.lock().shortcut.clone()
    }

    pub fn enter_behavior(&self) -> Option<EnterBehavior> {
        self.stored.lock().enter_behavior
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    pub fn writes(&self) -> Vec<BackendCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.is_write())
            .cloned()
            .collect()
    }

    fn record(&self, call: BackendCall) -> Result<()> {
        self.calls.lock().push(call);
        if self.stored.lock().fail {
            return Err(Error::backend("memory backend set to fail"));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn get_shortcut(&self) -> Result<Option<ShortcutSet>> {
        self.record(BackendCall::GetShortcut)?;
        Ok(self.shortcut())
    }

    async fn get_enter_behavior(&self) -> Result<Option<EnterBehavior>> {
        self.record(BackendCall::GetEnterBehavior)?;
        Ok(self.enter_behavior())
    }

    async fn update_shortcut(&self, shortcut: &ShortcutSet) -> Result<()> {
        self.record(BackendCall::UpdateShortcut(shortcut.clone()))?;
        self.stored.lock().shortcut = Some(shortcut.clone());
        Ok(())
    }

    async fn update_enter_behavior(&self, enter_behavior: EnterBehavior) -> Result<()> {
        self.record(BackendCall::UpdateEnterBehavior(enter_behavior))?;
        self.stored.lock().enter_behavior = Some(enter_behavior);
        Ok(())
    }
}
