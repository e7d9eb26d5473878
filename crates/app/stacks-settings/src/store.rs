//! Reactive settings store with optimistic backend synchronization

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    EnterBehavior, PersistenceBackend, Settings, SettingsState, ShortcutSet, StoreConfig,
    error::{Error, Result},
};

/// Builder for [`SettingsStore`]
#[derive(Default)]
pub struct SettingsStoreBuilder {
    backend: Option<Arc<dyn PersistenceBackend>>,
    config: Option<StoreConfig>,
    runtime: Option<Handle>,
}

impl SettingsStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(mut self, backend: Arc<dyn PersistenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Runtime used for backend calls. Defaults to the current runtime.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<SettingsStore> {
        let backend = self
            .backend
            .ok_or_else(|| Error::configuration("settings store needs a backend"))?;
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|e| {
                Error::configuration(format!("settings store needs a tokio runtime: {e}"))
            })?,
        };

        debug!("Creating settings store with config: {:?}", config);

        let (state, _) = watch::channel(SettingsState {
            settings: config.seed(),
            ready: false,
        });

        Ok(SettingsStore {
            inner: Arc::new(Inner {
                backend,
                runtime,
                state,
                load: Mutex::default(),
                initialized: AtomicBool::new(false),
                in_flight: Mutex::default(),
            }),
        })
    }
}

/// Tracks the initial load and local edits that happened during it.
#[derive(Debug, Default)]
struct LoadProgress {
    shortcut_settled: bool,
    enter_behavior_settled: bool,
    shortcut_edited: bool,
    enter_behavior_edited: bool,
}

impl LoadProgress {
    fn done(&self) -> bool {
        self.shortcut_settled && self.enter_behavior_settled
    }
}

struct Inner {
    backend: Arc<dyn PersistenceBackend>,
    runtime: Handle,
    state: watch::Sender<SettingsState>,
    load: Mutex<LoadProgress>,
    initialized: AtomicBool,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl Inner {
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = self.runtime.spawn(task);
        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|task| !task.is_finished());
        in_flight.push(handle);
    }

    /// Settle the shortcut read. `Err` leaves the field as seeded.
    ///
    /// The `load` guard is held across `send_modify` so a concurrent local edit
    /// either lands before the check (and wins) or after the overwrite.
    fn apply_loaded_shortcut(&self, loaded: Result<Option<ShortcutSet>>) {
        let mut load = self.load.lock();
        load.shortcut_settled = true;
        let keep_local = load.shortcut_edited;
        let ready = load.done();

        self.state.send_modify(|state| {
            match loaded {
                Ok(Some(_)) if keep_local => {
                    debug!("Shortcut edited during load; keeping local value");
                }
                Ok(Some(shortcut)) => state.settings.shortcut = Some(shortcut),
                Ok(None) => {}
                Err(e) => warn!("Failed to load shortcut, keeping default: {}", e),
            }
            state.ready = ready;
        });
    }

    /// Settle the enter behavior read. An empty answer means `copy`; `Err`
    /// leaves the field as seeded.
    fn apply_loaded_enter_behavior(&self, loaded: Result<Option<EnterBehavior>>) {
        let mut load = self.load.lock();
        load.enter_behavior_settled = true;
        let keep_local = load.enter_behavior_edited;
        let ready = load.done();

        self.state.send_modify(|state| {
            match loaded {
                Ok(_) if keep_local => {
                    debug!("Enter behavior edited during load; keeping local value");
                }
                Ok(enter_behavior) => {
                    state.settings.enter_behavior = enter_behavior.unwrap_or_default();
                }
                Err(e) => warn!("Failed to load enter behavior, keeping default: {}", e),
            }
            state.ready = ready;
        });
    }
}

/// Single source of truth for launcher [`Settings`].
///
/// Every mutation is applied locally first, published to subscribers, and then
/// persisted by a fire-and-forget backend call. Backend failures are logged and
/// otherwise ignored: the local value stays authoritative and the next write
/// resends the complete value.
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<Inner>,
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    /// Store with default config on the current tokio runtime.
    pub fn new(backend: Arc<dyn PersistenceBackend>) -> Result<Self> {
        Self::builder().backend(backend).build()
    }

    /// Issue the two initial backend reads. Only the first call has an effect.
    pub fn initialize(&self) {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        debug!("Loading settings from backend");

        let inner = Arc::clone(&self.inner);
        self.inner.spawn(async move {
            let loaded = inner.backend.get_shortcut().await;
            inner.apply_loaded_shortcut(loaded);
        });

        let inner = Arc::clone(&self.inner);
        self.inner.spawn(async move {
            let loaded = inner.backend.get_enter_behavior().await;
            inner.apply_loaded_enter_behavior(loaded);
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> SettingsState {
        self.inner.state.borrow().clone()
    }

    pub fn settings(&self) -> Settings {
        self.inner.state.borrow().settings.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.state.borrow().ready
    }

    pub fn enter_behavior(&self) -> EnterBehavior {
        self.inner.state.borrow().settings.enter_behavior
    }

    pub fn shortcut(&self) -> Option<ShortcutSet> {
        self.inner.state.borrow().settings.shortcut.clone()
    }

    /// Whether `name` is part of the current shortcut.
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .state
            .borrow()
            .settings
            .shortcut
            .as_ref()
            .is_some_and(|shortcut| shortcut.contains(name))
    }

    pub fn set_enter_behavior(&self, enter_behavior: EnterBehavior) {
        {
            let mut load = self.inner.load.lock();
            load.enter_behavior_edited = true;
            self.inner
                .state
                .send_modify(|state| state.settings.enter_behavior = enter_behavior);
        }

        debug!("Enter behavior set to {}", enter_behavior);

        let backend = Arc::clone(&self.inner.backend);
        self.inner.spawn(async move {
            if let Err(e) = backend.update_enter_behavior(enter_behavior).await {
                warn!("Failed to persist enter behavior: {}", e);
            }
        });
    }

    /// Flip `name` in the latest local shortcut and persist the whole set.
    ///
    /// An absent shortcut counts as empty. Returns the new set.
    pub fn toggle_shortcut_modifier(&self, name: &str) -> ShortcutSet {
        let mut next = ShortcutSet::default();
        {
            let mut load = self.inner.load.lock();
            load.shortcut_edited = true;
            self.inner.state.send_modify(|state| {
                let shortcut = state
                    .settings
                    .shortcut
                    .get_or_insert_with(ShortcutSet::default);
                shortcut.toggle(name);
                next = shortcut.clone();
            });
        }

        debug!("Shortcut toggled {}: now {}", name, next);

        let backend = Arc::clone(&self.inner.backend);
        let payload = next.clone();
        self.inner.spawn(async move {
            if let Err(e) = backend.update_shortcut(&payload).await {
                warn!("Failed to persist shortcut {}: {}", payload, e);
            }
        });

        next
    }

    /// Resolves once both initial reads have settled, starting them if
    /// [`initialize`](Self::initialize) has not been called yet.
    pub async fn wait_until_ready(&self) {
        self.initialize();
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|state| state.ready).await;
    }

    /// Wait for every backend call issued so far to finish.
    pub async fn flush(&self) {
        loop {
            let pending = std::mem::take(&mut *self.inner.in_flight.lock());
            if pending.is_empty() {
                return;
            }
            for task in pending {
                if let Err(e) = task.await {
                    warn!("Settings backend task failed: {}", e);
                }
            }
        }
    }
}
