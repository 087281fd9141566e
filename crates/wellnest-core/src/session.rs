//! Login state kept in storage.

use thiserror::Error;
use wellnest_logic::constants::storage_keys;
use wellnest_logic::session::{self, LoginError, RouteDecision};

use crate::persistence::{KeyValueStorage, PersistenceError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// The `isLoggedIn` flag. Credentials are only checked for presence.
#[derive(Debug)]
pub struct SessionStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        session::validate_login(email, password)?;
        self.storage
            .set(storage_keys::LOGGED_IN, storage_keys::LOGGED_IN_VALUE)?;
        log::info!("Signed in as {}", email.trim());
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.storage.remove(storage_keys::LOGGED_IN)?;
        log::info!("Signed out");
        Ok(())
    }

    /// Anything other than the exact flag value counts as signed out.
    pub fn is_logged_in(&self) -> Result<bool, SessionError> {
        let flag = self.storage.get(storage_keys::LOGGED_IN)?;
        Ok(flag.as_deref() == Some(storage_keys::LOGGED_IN_VALUE))
    }

    pub fn resolve(&self, path: &str) -> Result<RouteDecision, SessionError> {
        Ok(session::resolve(path, self.is_logged_in()?))
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
