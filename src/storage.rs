//! Storage slot trait and built-in backends.
//!
//! The portal keeps its entire state as one serialized blob in a single
//! slot. [`StorageBackend`] abstracts that slot so the store can run
//! against a real file in production and an in-memory slot in tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Fixed key naming the storage slot.
///
/// Part of the external interface: existing installations have their data
/// filed under this key, so changing it orphans them.
pub const STORAGE_KEY: &str = "portal_igreja_v1";

/// A single read/overwrite storage slot holding one serialized blob.
///
/// # Contract
///
/// - [`read`](StorageBackend::read) returns `Ok(None)` iff the slot has
///   never been written; it must not invent an empty blob.
/// - [`write`](StorageBackend::write) replaces the slot contents
///   unconditionally. There is no merge and no partial update.
pub trait StorageBackend {
    /// Read the raw serialized blob, `None` if the slot was never written.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` for failures other than the slot being absent.
    fn read(&self) -> io::Result<Option<String>>;

    /// Overwrite the slot with the given blob.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if persisting the blob fails.
    fn write(&self, blob: &str) -> io::Result<()>;
}

/// File-backed slot: one JSON file named after [`STORAGE_KEY`] inside a
/// caller-supplied directory.
///
/// Writes are atomic via a temp-rename pattern so readers never observe a
/// partially-written file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend storing its slot under the given directory.
    ///
    /// The directory does not need to exist yet; it is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Returns the path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        let dir = self
            .path
            .parent()
            .expect("slot path always has a parent directory");
        fs::create_dir_all(dir)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, blob)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// In-memory slot for tests and fixtures.
///
/// `Clone` is cheap and clones alias the same slot, so two stores built
/// over clones of one `MemoryBackend` model two browser tabs sharing one
/// storage area.
///
/// # Panics
///
/// Methods panic if the inner mutex is poisoned (a writer panicked while
/// holding it). This is treated as an invariant violation.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    /// Create an empty (never-written) slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with the given blob, for fixture injection.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.slot.lock().expect("slot mutex poisoned").clone())
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        *self.slot.lock().expect("slot mutex poisoned") = Some(blob.to_owned());
        Ok(())
    }
}
