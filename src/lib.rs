//! Persistence and record-keeping core for a church administrative portal.
//!
//! One JSON aggregate in a single storage slot, a shared login gate, four
//! record collections, landing-view counters, and the formatting helpers
//! the views use. The UI layer consumes this crate; it is not part of it.

mod collections;
pub use collections::{Aniversariantes, Doacoes, Eventos, Revistas, UpsertOutcome};
mod error;
pub use error::{RecordError, StoreError};
mod format;
pub use format::{iso_day, money};
mod session;
pub use session::Session;
mod state;
pub use state::{
    Aniversariante, AppState, DEFAULT_PASSWORD, DEFAULT_USERNAME, Doacao, Evento, Revista, User,
};
mod storage;
pub use storage::{FileBackend, MemoryBackend, STORAGE_KEY, StorageBackend};
mod store;
pub use store::{CollectionKind, StateStore};
mod summary;
pub use summary::{Summary, summary, summary_today};
