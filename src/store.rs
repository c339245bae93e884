//! The shared state store: load, save, seeding, and corruption recovery
//! over the single storage slot.
//!
//! Every view reads and writes through a [`StateStore`]. A load hands back
//! a fresh deserialized copy of the whole aggregate; a save replaces the
//! slot wholesale. There is no partial update: the latest save wins.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::state::AppState;
use crate::storage::{FileBackend, MemoryBackend, StorageBackend};

/// Which collection a mutation touched.
///
/// Delivered to change listeners so each view can re-render only when its
/// own collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Revistas,
    Eventos,
    Aniversariantes,
    Doacoes,
}

/// Callback invoked after a successful collection mutation.
type ChangeListener = Box<dyn Fn(CollectionKind) + Send>;

/// The single source of truth all record views read and write.
///
/// Generic over its [`StorageBackend`] so production code runs against a
/// file while tests inject an in-memory slot or a pre-corrupted fixture.
pub struct StateStore<B: StorageBackend> {
    backend: B,
    listeners: Mutex<Vec<ChangeListener>>,
}

// Manual `Debug` because listeners are opaque closures.
impl<B: StorageBackend + std::fmt::Debug> std::fmt::Debug for StateStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("backend", &self.backend)
            .finish()
    }
}

impl StateStore<MemoryBackend> {
    /// Create a store over a fresh, never-written in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl StateStore<FileBackend> {
    /// Create a store persisting under the given directory.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(dir))
    }
}

impl<B: StorageBackend> StateStore<B> {
    /// Create a store over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Load the current state from the slot.
    ///
    /// - Absent slot: the seeded default (one admin credential, four empty
    ///   collections) is written to the slot and returned, so the very
    ///   first load persists the default as a side effect.
    /// - Unparseable slot: logged at `warn`, then recovered exactly like
    ///   an absent slot. Prior data is discarded.
    /// - Otherwise the deserialized state is returned as-is. No schema
    ///   validation happens here; a parseable blob with odd contents
    ///   passes through and surfaces downstream, not as a load error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] only for backend I/O failures.
    /// Deserialization failure is recovered, never surfaced.
    pub fn load(&self) -> Result<AppState, StoreError> {
        let Some(raw) = self.backend.read()? else {
            tracing::debug!("storage slot empty; seeding default state");
            return self.reseed();
        };

        match serde_json::from_str::<AppState>(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize state; reseeding defaults");
                self.reseed()
            }
        }
    }

    /// Serialize the entire aggregate and overwrite the slot.
    ///
    /// Full replace: no merge, no versioning, no concurrency check.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the backend write fails.
    pub fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let blob = serde_json::to_string(state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.backend.write(&blob)?;
        Ok(())
    }

    /// Register a listener invoked with the mutated collection's kind
    /// after every successful collection mutation.
    ///
    /// Listeners run synchronously inside the mutating call, in
    /// registration order. Validation failures do not notify.
    pub fn subscribe(&self, listener: impl Fn(CollectionKind) + Send + 'static) {
        self.listeners
            .lock()
            .expect("listener mutex poisoned")
            .push(Box::new(listener));
    }

    /// Write the seeded default to the slot and return a copy of it.
    fn reseed(&self) -> Result<AppState, StoreError> {
        let state = AppState::default();
        self.save(&state)?;
        Ok(state)
    }

    /// Returns the backend this store persists through.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) fn notify(&self, kind: CollectionKind) {
        for listener in self
            .listeners
            .lock()
            .expect("listener mutex poisoned")
            .iter()
        {
            listener(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DEFAULT_USERNAME, Evento, Revista};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[test]
    fn first_load_seeds_default_and_persists_it() {
        let store = StateStore::in_memory();

        let state = store.load().expect("load should succeed");
        assert_eq!(state, AppState::default());

        // Seeding must be a side effect of the first load, not lazy.
        let blob = store
            .backend()
            .read()
            .expect("read should succeed")
            .expect("slot should have been written by the first load");
        let persisted: AppState =
            serde_json::from_str(&blob).expect("persisted blob should be valid JSON");
        assert_eq!(persisted, AppState::default());
    }

    #[test]
    fn corrupt_blob_behaves_like_an_empty_slot() {
        let store = StateStore::new(MemoryBackend::with_blob("this is not valid json!!!"));

        let state = store.load().expect("load should succeed, not Err");
        assert_eq!(state, AppState::default());

        let blob = store
            .backend()
            .read()
            .expect("read should succeed")
            .expect("slot should exist");
        assert!(
            serde_json::from_str::<AppState>(&blob).is_ok(),
            "corrupt slot should have been overwritten with the default"
        );
    }

    #[test]
    fn truncated_json_also_reseeds() {
        let store = StateStore::new(MemoryBackend::with_blob(r#"{"users":[{"user"#));
        let state = store.load().expect("load should succeed");
        assert_eq!(state.users[0].username, DEFAULT_USERNAME);
    }

    #[test]
    fn parseable_blob_passes_through_unchecked() {
        // A blob with no users parses fine and must NOT be reseeded, even
        // though it leaves a portal nobody can log into.
        let store = StateStore::new(MemoryBackend::with_blob(r#"{"users":[]}"#));

        let state = store.load().expect("load should succeed");
        assert!(state.users.is_empty(), "decoded state should be kept as-is");
    }

    #[test]
    fn save_replaces_the_whole_slot() {
        let store = StateStore::in_memory();
        let mut state = store.load().expect("load should succeed");

        state.revistas.push(Revista {
            titulo: "Aurora".to_owned(),
            autor: "Ed.".to_owned(),
            tipo: "mensal".to_owned(),
            quant: 3,
        });
        store.save(&state).expect("save should succeed");

        let reloaded = store.load().expect("reload should succeed");
        assert_eq!(reloaded.revistas.len(), 1);
        assert_eq!(reloaded.revistas[0].titulo, "Aurora");
    }

    #[test]
    fn later_save_clobbers_earlier_tab() {
        // Two stores over one shared slot model two browser tabs. There is
        // no locking and no merge: the later full-aggregate save silently
        // discards the earlier tab's mutation. Accepted behavior.
        let shared = MemoryBackend::new();
        let tab_a = StateStore::new(shared.clone());
        let tab_b = StateStore::new(shared);

        let mut seen_by_a = tab_a.load().expect("load should succeed");
        let mut seen_by_b = tab_b.load().expect("load should succeed");

        seen_by_a.revistas.push(Revista {
            titulo: "Aurora".to_owned(),
            autor: String::new(),
            tipo: String::new(),
            quant: 1,
        });
        tab_a.save(&seen_by_a).expect("save should succeed");

        seen_by_b.eventos.push(Evento {
            titulo: "Culto".to_owned(),
            data: NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
            local: None,
        });
        tab_b.save(&seen_by_b).expect("save should succeed");

        let final_state = tab_a.load().expect("load should succeed");
        assert_eq!(final_state.eventos.len(), 1, "tab B's event should win");
        assert!(
            final_state.revistas.is_empty(),
            "tab A's magazine should have been clobbered"
        );
    }

    #[test]
    fn listeners_receive_the_mutated_collection_kind() {
        let store = StateStore::in_memory();
        let calls = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&calls);
        store.subscribe(move |kind| {
            assert_eq!(kind, CollectionKind::Eventos);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.notify(CollectionKind::Eventos);
        store.notify(CollectionKind::Eventos);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn file_backed_store_seeds_on_disk() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let store = StateStore::open(tmp.path());

        store.load().expect("load should succeed");

        let path = tmp.path().join("portal_igreja_v1.json");
        assert!(path.is_file(), "first load should create the slot file");
    }
}
