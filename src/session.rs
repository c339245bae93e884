//! Session gate: single-credential login check and the tab-scoped flag.

use std::sync::Mutex;

use crate::error::StoreError;
use crate::storage::StorageBackend;
use crate::store::StateStore;

/// The tab-scoped login flag.
///
/// Holds the logged-in username in an in-process slot whose lifetime is the
/// `Session` value itself, separate from the persisted aggregate, which
/// outlives any one session.
///
/// Credentials are matched by plain equality against the stored user list.
/// There is no hashing, no lockout, and no rate limiting.
///
/// # Panics
///
/// Methods panic if the inner mutex is poisoned. This is treated as an
/// invariant violation.
#[derive(Debug, Default)]
pub struct Session {
    user: Mutex<Option<String>>,
}

impl Session {
    /// Create a logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to log in against the stored credential list.
    ///
    /// Loads the state and scans `users` for the first exact match on both
    /// fields. On match the username is written into the session flag and
    /// `true` is returned. On mismatch `false` is returned with no side
    /// effects: an already-logged-in session stays logged in, and the
    /// caller cannot tell an unknown user from a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading the state fails.
    pub fn login<B: StorageBackend>(
        &self,
        store: &StateStore<B>,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        let state = store.load()?;
        let matched = state
            .users
            .iter()
            .find(|u| u.username == username && u.password == password);

        match matched {
            Some(user) => {
                *self.user.lock().expect("session mutex poisoned") = Some(user.username.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Whether the session flag is currently set.
    pub fn is_logged_in(&self) -> bool {
        self.user.lock().expect("session mutex poisoned").is_some()
    }

    /// The username stored in the session flag, if any.
    pub fn current_user(&self) -> Option<String> {
        self.user.lock().expect("session mutex poisoned").clone()
    }

    /// Clear the session flag.
    pub fn logout(&self) {
        *self.user.lock().expect("session mutex poisoned") = None;
    }
}
