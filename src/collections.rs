//! The four record collections and their shared CRUD contract.
//!
//! Each collection is a thin typed handle borrowed from the store. Every
//! mutation runs the same cycle: load the whole aggregate, validate,
//! mutate in memory, save the whole aggregate, notify listeners. A
//! validation failure aborts before any mutation and never notifies.
//!
//! Insert semantics differ deliberately between collections: magazines
//! upsert by case-insensitive title (the natural key), while events,
//! birthdays, and donations are append-only: every submission is a new
//! entry even if it duplicates an existing one.

use chrono::NaiveDate;

use crate::error::{RecordError, StoreError};
use crate::state::{Aniversariante, Doacao, Evento, Revista};
use crate::storage::StorageBackend;
use crate::store::{CollectionKind, StateStore};

/// Outcome of a magazine upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No existing title matched; the record was appended.
    Inserted,
    /// An existing record's mutable fields were overwritten in place.
    Replaced,
}

impl<B: StorageBackend> StateStore<B> {
    /// Handle to the magazine collection.
    pub fn revistas(&self) -> Revistas<'_, B> {
        Revistas { store: self }
    }

    /// Handle to the event collection.
    pub fn eventos(&self) -> Eventos<'_, B> {
        Eventos { store: self }
    }

    /// Handle to the birthday collection.
    pub fn aniversariantes(&self) -> Aniversariantes<'_, B> {
        Aniversariantes { store: self }
    }

    /// Handle to the donation collection.
    pub fn doacoes(&self) -> Doacoes<'_, B> {
        Doacoes { store: self }
    }
}

/// Magazine collection: find-or-replace by case-insensitive title.
pub struct Revistas<'a, B: StorageBackend> {
    store: &'a StateStore<B>,
}

impl<B: StorageBackend> Revistas<'_, B> {
    /// All magazines in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn list(&self) -> Result<Vec<Revista>, StoreError> {
        Ok(self.store.load()?.revistas)
    }

    /// The magazine at `index` in insertion order, for edit prefill.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn get(&self, index: usize) -> Result<Option<Revista>, StoreError> {
        Ok(self.store.load()?.revistas.into_iter().nth(index))
    }

    /// Insert a magazine, or update the one whose title already matches.
    ///
    /// The title is trimmed, then matched case-insensitively against
    /// existing records. On a match, `autor`, `quant`, and `tipo` are
    /// overwritten in place while the stored title casing and the record's
    /// position are preserved. Otherwise the record is appended.
    ///
    /// # Errors
    ///
    /// [`RecordError::Validation`] if the trimmed title is empty;
    /// [`RecordError::Store`] if loading or saving fails.
    pub fn upsert(
        &self,
        titulo: &str,
        autor: &str,
        tipo: &str,
        quant: u32,
    ) -> Result<UpsertOutcome, RecordError> {
        let titulo = titulo.trim();
        if titulo.is_empty() {
            return Err(RecordError::Validation("Título obrigatório".to_owned()));
        }
        let autor = autor.trim();

        let mut state = self.store.load()?;
        let needle = titulo.to_lowercase();
        let outcome = match state
            .revistas
            .iter_mut()
            .find(|r| r.titulo.to_lowercase() == needle)
        {
            Some(existing) => {
                existing.autor = autor.to_owned();
                existing.quant = quant;
                existing.tipo = tipo.to_owned();
                UpsertOutcome::Replaced
            }
            None => {
                state.revistas.push(Revista {
                    titulo: titulo.to_owned(),
                    autor: autor.to_owned(),
                    tipo: tipo.to_owned(),
                    quant,
                });
                UpsertOutcome::Inserted
            }
        };

        self.store.save(&state)?;
        self.store.notify(CollectionKind::Revistas);
        Ok(outcome)
    }

    /// Remove and return the magazine at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotFound`] if `index` is out of bounds; the
    /// collection is left unchanged.
    pub fn remove_at(&self, index: usize) -> Result<Revista, RecordError> {
        let mut state = self.store.load()?;
        if index >= state.revistas.len() {
            return Err(RecordError::NotFound {
                index,
                len: state.revistas.len(),
            });
        }
        let removed = state.revistas.remove(index);
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Revistas);
        Ok(removed)
    }
}

/// Event collection: append-only, listed in date order.
pub struct Eventos<'a, B: StorageBackend> {
    store: &'a StateStore<B>,
}

impl<B: StorageBackend> Eventos<'_, B> {
    /// All events sorted ascending by date.
    ///
    /// The sort is stable, so same-date events keep insertion order. Note
    /// that [`get`](Eventos::get) and [`remove_at`](Eventos::remove_at)
    /// index the *stored* insertion order, not this sorted view.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn list(&self) -> Result<Vec<Evento>, StoreError> {
        let mut eventos = self.store.load()?.eventos;
        eventos.sort_by_key(|e| e.data);
        Ok(eventos)
    }

    /// The event at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn get(&self, index: usize) -> Result<Option<Evento>, StoreError> {
        Ok(self.store.load()?.eventos.into_iter().nth(index))
    }

    /// Append an event. Duplicates are allowed.
    ///
    /// # Errors
    ///
    /// [`RecordError::Validation`] if the trimmed title is empty or the
    /// date is absent; [`RecordError::Store`] if loading or saving fails.
    pub fn add(
        &self,
        titulo: &str,
        data: Option<NaiveDate>,
        local: Option<&str>,
    ) -> Result<(), RecordError> {
        let titulo = titulo.trim();
        let Some(data) = data else {
            return Err(RecordError::Validation("Preencha título e data".to_owned()));
        };
        if titulo.is_empty() {
            return Err(RecordError::Validation("Preencha título e data".to_owned()));
        }
        let local = local
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned);

        let mut state = self.store.load()?;
        state.eventos.push(Evento {
            titulo: titulo.to_owned(),
            data,
            local,
        });
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Eventos);
        Ok(())
    }

    /// Remove and return the event at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotFound`] if `index` is out of bounds; the
    /// collection is left unchanged.
    pub fn remove_at(&self, index: usize) -> Result<Evento, RecordError> {
        let mut state = self.store.load()?;
        if index >= state.eventos.len() {
            return Err(RecordError::NotFound {
                index,
                len: state.eventos.len(),
            });
        }
        let removed = state.eventos.remove(index);
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Eventos);
        Ok(removed)
    }
}

/// Birthday collection: append-only, listed in date order.
pub struct Aniversariantes<'a, B: StorageBackend> {
    store: &'a StateStore<B>,
}

impl<B: StorageBackend> Aniversariantes<'_, B> {
    /// All birthday entries sorted ascending by date (year included).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn list(&self) -> Result<Vec<Aniversariante>, StoreError> {
        let mut aniversariantes = self.store.load()?.aniversariantes;
        aniversariantes.sort_by_key(|a| a.data);
        Ok(aniversariantes)
    }

    /// The entry at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn get(&self, index: usize) -> Result<Option<Aniversariante>, StoreError> {
        Ok(self.store.load()?.aniversariantes.into_iter().nth(index))
    }

    /// Append a birthday entry.
    ///
    /// # Errors
    ///
    /// [`RecordError::Validation`] if the trimmed name is empty or the
    /// date is absent; [`RecordError::Store`] if loading or saving fails.
    pub fn add(&self, nome: &str, data: Option<NaiveDate>) -> Result<(), RecordError> {
        let nome = nome.trim();
        let Some(data) = data else {
            return Err(RecordError::Validation("Preencha nome e data".to_owned()));
        };
        if nome.is_empty() {
            return Err(RecordError::Validation("Preencha nome e data".to_owned()));
        }

        let mut state = self.store.load()?;
        state.aniversariantes.push(Aniversariante {
            nome: nome.to_owned(),
            data,
        });
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Aniversariantes);
        Ok(())
    }

    /// Remove and return the entry at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotFound`] if `index` is out of bounds; the
    /// collection is left unchanged.
    pub fn remove_at(&self, index: usize) -> Result<Aniversariante, RecordError> {
        let mut state = self.store.load()?;
        if index >= state.aniversariantes.len() {
            return Err(RecordError::NotFound {
                index,
                len: state.aniversariantes.len(),
            });
        }
        let removed = state.aniversariantes.remove(index);
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Aniversariantes);
        Ok(removed)
    }
}

/// Donation collection: append-only, insertion order.
pub struct Doacoes<'a, B: StorageBackend> {
    store: &'a StateStore<B>,
}

impl<B: StorageBackend> Doacoes<'_, B> {
    /// All donations in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn list(&self) -> Result<Vec<Doacao>, StoreError> {
        Ok(self.store.load()?.doacoes)
    }

    /// The donation at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the aggregate fails.
    pub fn get(&self, index: usize) -> Result<Option<Doacao>, StoreError> {
        Ok(self.store.load()?.doacoes.into_iter().nth(index))
    }

    /// Append a donation. The donor name is optional.
    ///
    /// # Errors
    ///
    /// [`RecordError::Validation`] if `valor` is not a finite positive
    /// amount or the date is absent; [`RecordError::Store`] if loading or
    /// saving fails.
    pub fn add(
        &self,
        nome: Option<&str>,
        valor: f64,
        data: Option<NaiveDate>,
    ) -> Result<(), RecordError> {
        let Some(data) = data else {
            return Err(RecordError::Validation("Preencha valor e data".to_owned()));
        };
        if !valor.is_finite() || valor <= 0.0 {
            return Err(RecordError::Validation("Preencha valor e data".to_owned()));
        }
        let nome = nome
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);

        let mut state = self.store.load()?;
        state.doacoes.push(Doacao { nome, valor, data });
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Doacoes);
        Ok(())
    }

    /// Remove and return the donation at `index` in insertion order.
    ///
    /// # Errors
    ///
    /// [`RecordError::NotFound`] if `index` is out of bounds; the
    /// collection is left unchanged.
    pub fn remove_at(&self, index: usize) -> Result<Doacao, RecordError> {
        let mut state = self.store.load()?;
        if index >= state.doacoes.len() {
            return Err(RecordError::NotFound {
                index,
                len: state.doacoes.len(),
            });
        }
        let removed = state.doacoes.remove(index);
        self.store.save(&state)?;
        self.store.notify(CollectionKind::Doacoes);
        Ok(removed)
    }
}
