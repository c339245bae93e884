//! The persisted aggregate and its record types.
//!
//! `AppState` is the single aggregate root: everything the portal keeps is
//! one JSON object in one storage slot, and every mutation replaces the
//! whole object. Field names below are the persisted layout; renaming any
//! of them is a breaking change to existing storage slots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Username seeded into a fresh state on first run.
pub const DEFAULT_USERNAME: &str = "admin";

/// Password seeded into a fresh state on first run.
pub const DEFAULT_PASSWORD: &str = "senha123";

/// A login credential. Matched by plain equality on both fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// A magazine record.
///
/// `titulo` doubles as the natural key: upserts match it case-insensitively,
/// so two records never differ only by title casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revista {
    pub titulo: String,
    #[serde(default)]
    pub autor: String,
    /// Free-form category label chosen from a fixed set by the UI.
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub quant: u32,
}

/// A scheduled event. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evento {
    pub titulo: String,
    pub data: NaiveDate,
    #[serde(default)]
    pub local: Option<String>,
}

/// A birthday entry. The year component of `data` is kept but ignored by
/// the month-matching counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aniversariante {
    pub nome: String,
    pub data: NaiveDate,
}

/// A donation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doacao {
    #[serde(default)]
    pub nome: Option<String>,
    /// Amount in whole currency units. A missing value decodes as zero so
    /// old slots without the field still sum cleanly.
    #[serde(default)]
    pub valor: f64,
    pub data: NaiveDate,
}

/// The aggregate root persisted under the storage key.
///
/// Every field carries `#[serde(default)]`: a parseable blob with missing
/// collections decodes to empty ones and passes through unchecked. Only an
/// outright parse or type failure is treated as corruption (and reseeds,
/// see [`StateStore::load`](crate::StateStore::load)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub revistas: Vec<Revista>,
    #[serde(default)]
    pub eventos: Vec<Evento>,
    #[serde(default)]
    pub aniversariantes: Vec<Aniversariante>,
    #[serde(default)]
    pub doacoes: Vec<Doacao>,
}

impl Default for AppState {
    /// The seeded first-run state: one admin credential, four empty
    /// collections.
    fn default() -> Self {
        Self {
            users: vec![User {
                username: DEFAULT_USERNAME.to_owned(),
                password: DEFAULT_PASSWORD.to_owned(),
            }],
            revistas: Vec::new(),
            eventos: Vec::new(),
            aniversariantes: Vec::new(),
            doacoes: Vec::new(),
        }
    }
}
