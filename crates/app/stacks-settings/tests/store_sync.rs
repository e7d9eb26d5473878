//! Store synchronization against a backend whose calls can be held pending.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use stacks_settings::{
    EnterBehavior, Error, MemoryBackend, Modifier, PersistenceBackend, Result, SettingsStore,
    ShortcutSet, StoreConfig,
};
use tokio::sync::watch;

/// Backend whose reads and writes block until their gate is opened.
struct GatedBackend {
    shortcut: Option<ShortcutSet>,
    enter_behavior: Option<EnterBehavior>,
    fail_reads: bool,
    reads: watch::Sender<bool>,
    writes: watch::Sender<bool>,
    issued: Mutex<Vec<ShortcutSet>>,
    completed: Mutex<Vec<ShortcutSet>>,
}

impl GatedBackend {
    fn new(shortcut: Option<ShortcutSet>, enter_behavior: Option<EnterBehavior>) -> Arc<Self> {
        Arc::new(Self {
            shortcut,
            enter_behavior,
            fail_reads: false,
            reads: watch::channel(false).0,
            writes: watch::channel(false).0,
            issued: Mutex::default(),
            completed: Mutex::default(),
        })
    }

    fn failing_reads() -> Arc<Self> {
        Arc::new(Self {
            shortcut: None,
            enter_behavior: None,
            fail_reads: true,
            reads: watch::channel(false).0,
            writes: watch::channel(false).0,
            issued: Mutex::default(),
            completed: Mutex::default(),
        })
    }

    fn open_reads(&self) {
        self.reads.send_replace(true);
    }

    fn open_writes(&self) {
        self.writes.send_replace(true);
    }

    async fn pass(gate: &watch::Sender<bool>) {
        let mut rx = gate.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

#[async_trait]
impl PersistenceBackend for GatedBackend {
    async fn get_shortcut(&self) -> Result<Option<ShortcutSet>> {
        Self::pass(&self.reads).await;
        if self.fail_reads {
            return Err(Error::backend("unreachable"));
        }
        Ok(self.shortcut.clone())
    }

    async fn get_enter_behavior(&self) -> Result<Option<EnterBehavior>> {
        Self::pass(&self.reads).await;
        if self.fail_reads {
            return Err(Error::backend("unreachable"));
        }
        Ok(self.enter_behavior)
    }

    async fn update_shortcut(&self, shortcut: &ShortcutSet) -> Result<()> {
        self.issued.lock().push(shortcut.clone());
        Self::pass(&self.writes).await;
        self.completed.lock().push(shortcut.clone());
        Ok(())
    }

    async fn update_enter_behavior(&self, _enter_behavior: EnterBehavior) -> Result<()> {
        Self::pass(&self.writes).await;
        Ok(())
    }
}

fn set(modifiers: &[Modifier]) -> ShortcutSet {
    modifiers.iter().copied().collect()
}

#[tokio::test]
async fn initial_load_overwrites_defaults() {
    let backend = GatedBackend::new(
        Some(set(&[Modifier::Ctrl])),
        Some(EnterBehavior::PasteOrCopy),
    );
    let store = SettingsStore::new(backend.clone()).unwrap();

    store.initialize();
    tokio::task::yield_now().await;

    assert!(!store.is_ready());
    assert_eq!(store.shortcut(), None);
    assert_eq!(store.enter_behavior(), EnterBehavior::Copy);

    backend.open_reads();
    store.wait_until_ready().await;

    assert_eq!(store.shortcut(), Some(set(&[Modifier::Ctrl])));
    assert_eq!(store.enter_behavior(), EnterBehavior::PasteOrCopy);
}

#[tokio::test]
async fn empty_enter_behavior_falls_back_to_copy() {
    let backend = Arc::new(MemoryBackend::with_values(Some(ShortcutSet::new()), None));
    let store = SettingsStore::new(backend).unwrap();

    store.initialize();
    store.wait_until_ready().await;

    assert_eq!(store.enter_behavior(), EnterBehavior::Copy);
    assert_eq!(store.shortcut(), Some(ShortcutSet::new()));
}

#[tokio::test]
async fn failed_reads_keep_defaults_and_still_become_ready() {
    let backend = GatedBackend::failing_reads();
    let store = SettingsStore::new(backend.clone()).unwrap();

    store.initialize();
    backend.open_reads();
    store.wait_until_ready().await;

    assert_eq!(store.shortcut(), None);
    assert_eq!(store.enter_behavior(), EnterBehavior::Copy);
}

#[tokio::test]
async fn toggles_build_on_latest_local_snapshot() {
    let backend = GatedBackend::new(None, None);
    let store = SettingsStore::new(backend.clone()).unwrap();

    store.toggle_shortcut_modifier("shift");
    store.toggle_shortcut_modifier("command");

    let expected = set(&[Modifier::Shift, Modifier::Command]);
    assert_eq!(store.shortcut(), Some(expected.clone()));

    // Let both writes start; neither can complete yet.
    tokio::task::yield_now().await;
    assert!(backend.completed.lock().is_empty());

    let issued = backend.issued.lock().clone();
    assert_eq!(issued.len(), 2);
    assert_eq!(issued[0], set(&[Modifier::Shift]));
    assert_eq!(issued[1], expected);

    backend.open_writes();
    store.flush().await;

    assert_eq!(backend.completed.lock().len(), 2);
    assert_eq!(store.shortcut(), Some(expected));
}

#[tokio::test]
async fn toggle_parity_over_many_calls() {
    let backend = Arc::new(MemoryBackend::new());
    let store = SettingsStore::new(backend.clone()).unwrap();

    for n in 1..=9 {
        store.toggle_shortcut_modifier("alt");
        assert_eq!(store.contains("alt"), n % 2 == 1);
    }

    store.flush().await;
    assert_eq!(backend.writes().len(), 9);
    assert!(!backend.shortcut().unwrap().contains("shift"));
    assert!(backend.shortcut().unwrap().contains("alt"));
}

#[tokio::test]
async fn local_edits_survive_a_late_initial_load() {
    let backend = GatedBackend::new(
        Some(set(&[Modifier::Ctrl])),
        Some(EnterBehavior::Copy),
    );
    let store = SettingsStore::new(backend.clone()).unwrap();

    store.initialize();
    store.toggle_shortcut_modifier("alt");
    store.set_enter_behavior(EnterBehavior::PasteOrCopy);

    backend.open_reads();
    store.wait_until_ready().await;

    assert_eq!(store.shortcut(), Some(set(&[Modifier::Alt])));
    assert_eq!(store.enter_behavior(), EnterBehavior::PasteOrCopy);
}

#[tokio::test]
async fn failed_writes_leave_local_state_alone() {
    let backend = Arc::new(MemoryBackend::new());
    backend.set_failing(true);
    let store = SettingsStore::new(backend.clone()).unwrap();

    store.set_enter_behavior(EnterBehavior::PasteOrCopy);
    store.toggle_shortcut_modifier("ctrl");
    store.flush().await;

    assert_eq!(store.enter_behavior(), EnterBehavior::PasteOrCopy);
    assert!(store.contains("ctrl"));
    assert_eq!(backend.writes().len(), 2);
    assert_eq!(backend.shortcut(), None);

    // Next write resends the full set once the backend recovers.
    backend.set_failing(false);
    store.toggle_shortcut_modifier("shift");
    store.flush().await;
    assert_eq!(
        backend.shortcut(),
        Some(set(&[Modifier::Shift, Modifier::Ctrl]))
    );
}

#[tokio::test]
async fn subscribers_see_every_mutation() {
    let store = SettingsStore::new(Arc::new(MemoryBackend::new())).unwrap();
    let mut rx = store.subscribe();

    store.set_enter_behavior(EnterBehavior::PasteOrCopy);
    assert!(rx.has_changed().unwrap());
    assert_eq!(
        rx.borrow_and_update().settings.enter_behavior,
        EnterBehavior::PasteOrCopy
    );

    store.toggle_shortcut_modifier("command");
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().settings.shortcut.as_ref().unwrap().contains("command"));
}

#[tokio::test]
async fn enter_behavior_written_once_per_selection() {
    let backend = Arc::new(MemoryBackend::new());
    let store = SettingsStore::new(backend.clone()).unwrap();

    store.set_enter_behavior(EnterBehavior::PasteOrCopy);
    assert_eq!(store.enter_behavior(), EnterBehavior::PasteOrCopy);
    store.flush().await;

    assert_eq!(
        backend.writes(),
        vec![stacks_settings::BackendCall::UpdateEnterBehavior(
            EnterBehavior::PasteOrCopy
        )]
    );
}

#[tokio::test]
async fn failed_read_keeps_configured_seed() {
    let backend = GatedBackend::failing_reads();
    let store = SettingsStore::builder()
        .backend(backend.clone())
        .config(StoreConfig {
            default_enter_behavior: EnterBehavior::PasteOrCopy,
            initial_shortcut: Some(set(&[Modifier::Command])),
        })
        .build()
        .unwrap();

    store.initialize();
    backend.open_reads();
    store.wait_until_ready().await;

    assert_eq!(store.enter_behavior(), EnterBehavior::PasteOrCopy);
    assert_eq!(store.shortcut(), Some(set(&[Modifier::Command])));
}

#[tokio::test]
async fn empty_read_overrides_configured_seed_with_copy() {
    let backend = Arc::new(MemoryBackend::with_values(None, None));
    let store = SettingsStore::builder()
        .backend(backend)
        .config(StoreConfig {
            default_enter_behavior: EnterBehavior::PasteOrCopy,
            initial_shortcut: None,
        })
        .build()
        .unwrap();

    store.wait_until_ready().await;

    assert_eq!(store.enter_behavior(), EnterBehavior::Copy);
}

/// Edits from a thread outside the runtime race the load tasks on the workers.
#[test]
fn edit_from_ui_thread_survives_concurrent_load() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();

    for _ in 0..200 {
        let backend = Arc::new(MemoryBackend::with_values(
            Some(set(&[Modifier::Ctrl])),
            None,
        ));
        let store = SettingsStore::builder()
            .backend(backend.clone())
            .runtime(runtime.handle().clone())
            .build()
            .unwrap();

        store.initialize();
        store.toggle_shortcut_modifier("alt");
        store.set_enter_behavior(EnterBehavior::PasteOrCopy);

        runtime.block_on(async {
            store.wait_until_ready().await;
            store.flush().await;
        });

        assert!(store.contains("alt"));
        assert_eq!(store.enter_behavior(), EnterBehavior::PasteOrCopy);
        assert!(backend.shortcut().unwrap().contains("alt"));
    }
}
