//! Landing-view counters derived from the aggregate.
//!
//! These are read models: recomputed from the loaded state on every call
//! and never persisted.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::StoreError;
use crate::storage::StorageBackend;
use crate::store::StateStore;

/// The four derived metrics shown on the landing view.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of registered magazines.
    pub revistas: usize,
    /// Number of events. The landing label reads "Próximos eventos" but no
    /// future-date filter is applied; past events count too.
    pub eventos: usize,
    /// Birthday entries whose month matches the reference date's month.
    /// Year-agnostic: a 1990 birthday counts in every matching month.
    pub aniversariantes_do_mes: usize,
    /// Sum of all donation amounts. Missing amounts were already coerced
    /// to zero when the state was decoded.
    pub total_arrecadado: f64,
}

/// Compute the landing-view counters against an explicit reference date.
///
/// # Errors
///
/// Returns [`StoreError`] if loading the aggregate fails.
pub fn summary<B: StorageBackend>(
    store: &StateStore<B>,
    hoje: NaiveDate,
) -> Result<Summary, StoreError> {
    let state = store.load()?;
    let mes = hoje.month();

    Ok(Summary {
        revistas: state.revistas.len(),
        eventos: state.eventos.len(),
        aniversariantes_do_mes: state
            .aniversariantes
            .iter()
            .filter(|a| a.data.month() == mes)
            .count(),
        total_arrecadado: state.doacoes.iter().map(|d| d.valor).sum(),
    })
}

/// [`summary`] against the local calendar date at call time.
///
/// # Errors
///
/// Returns [`StoreError`] if loading the aggregate fails.
pub fn summary_today<B: StorageBackend>(store: &StateStore<B>) -> Result<Summary, StoreError> {
    summary(store, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::money;
    use crate::storage::MemoryBackend;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn fresh_store_summarizes_to_zero() {
        let store = StateStore::in_memory();
        let s = summary(&store, day(2024, 6, 15)).expect("summary should succeed");

        assert_eq!(s.revistas, 0);
        assert_eq!(s.eventos, 0);
        assert_eq!(s.aniversariantes_do_mes, 0);
        assert_eq!(s.total_arrecadado, 0.0);
    }

    #[test]
    fn birthdays_match_on_month_regardless_of_year() {
        let store = StateStore::in_memory();
        for (nome, year, dia) in [("Ana", 1980, 3), ("Bento", 1995, 17), ("Clara", 2010, 30)] {
            store
                .aniversariantes()
                .add(nome, Some(day(year, 1, dia)))
                .expect("add should succeed");
        }
        store
            .aniversariantes()
            .add("Davi", Some(day(1990, 7, 1)))
            .expect("add should succeed");

        let january = summary(&store, day(2024, 1, 3)).expect("summary should succeed");
        assert_eq!(january.aniversariantes_do_mes, 3);

        let february = summary(&store, day(2024, 2, 3)).expect("summary should succeed");
        assert_eq!(february.aniversariantes_do_mes, 0);
    }

    #[test]
    fn evento_count_includes_past_events() {
        // The landing label says "Próximos eventos", but the count has
        // never filtered by date. Pinned here so nobody "fixes" it without
        // product sign-off.
        let store = StateStore::in_memory();
        store
            .eventos()
            .add("Retiro 2019", Some(day(2019, 8, 10)), None)
            .expect("add should succeed");
        store
            .eventos()
            .add("Culto", Some(day(2030, 8, 10)), None)
            .expect("add should succeed");

        let s = summary(&store, day(2024, 6, 15)).expect("summary should succeed");
        assert_eq!(s.eventos, 2);
    }

    #[test]
    fn total_sums_persisted_donations_only() {
        let store = StateStore::in_memory();
        store
            .doacoes()
            .add(Some("Ana"), 10.0, Some(day(2024, 5, 1)))
            .expect("add should succeed");
        store
            .doacoes()
            .add(None, 20.5, Some(day(2024, 5, 2)))
            .expect("add should succeed");
        // Rejected by validation, so it must not affect the total.
        let _ = store.doacoes().add(None, 0.0, Some(day(2024, 5, 3)));

        let s = summary(&store, day(2024, 5, 10)).expect("summary should succeed");
        assert_eq!(s.total_arrecadado, 30.5);
        assert_eq!(money(s.total_arrecadado), "30,50");
    }

    #[test]
    fn donation_with_missing_valor_counts_as_zero() {
        // A hand-edited or pre-schema slot may carry donations without an
        // amount; the codec coerces those to zero and the sum stays clean.
        let blob = r#"{
            "users":[{"username":"admin","password":"senha123"}],
            "doacoes":[
                {"nome":"Ana","data":"2024-05-01"},
                {"nome":null,"valor":7.25,"data":"2024-05-02"}
            ]
        }"#;
        let store = StateStore::new(MemoryBackend::with_blob(blob));

        let s = summary(&store, day(2024, 5, 10)).expect("summary should succeed");
        assert_eq!(s.total_arrecadado, 7.25);
    }

    #[test]
    fn magazine_count_tracks_upserts_not_replacements() {
        let store = StateStore::in_memory();
        store
            .revistas()
            .upsert("Aurora", "", "mensal", 1)
            .expect("upsert should succeed");
        store
            .revistas()
            .upsert("AURORA", "Ed.", "mensal", 2)
            .expect("upsert should succeed");

        let s = summary(&store, day(2024, 5, 10)).expect("summary should succeed");
        assert_eq!(s.revistas, 1);
    }
}
