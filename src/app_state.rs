//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    Error, ledger::Ledger, profile::ProfileDirectory, stores::SQLiteStore,
    timezone::get_local_offset,
};

/// The ledger shared between request handlers.
pub type SharedLedger = Arc<Mutex<Ledger<SQLiteStore>>>;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The ledger, persisted to the SQLite database.
    pub ledger: SharedLedger,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,

    /// The personalized content for each user.
    pub profiles: Arc<ProfileDirectory>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the ledger and then load the ledger from it.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Jakarta".
    ///
    /// # Errors
    /// Returns an error if the timezone is invalid, or the database cannot be
    /// initialized or read.
    pub fn new(
        db_connection: Connection,
        local_timezone: &str,
        profiles: ProfileDirectory,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        let store = SQLiteStore::new(db_connection)?;
        let ledger = Ledger::load(store)?;

        Ok(Self {
            ledger: Arc::new(Mutex::new(ledger)),
            local_timezone: local_timezone.to_owned(),
            profiles: Arc::new(profiles),
        })
    }
}

/// The state needed by handlers that only read or write the ledger.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// The ledger, persisted to the SQLite database.
    pub ledger: SharedLedger,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
        }
    }
}

impl FromRef<AppState> for Arc<ProfileDirectory> {
    fn from_ref(state: &AppState) -> Self {
        state.profiles.clone()
    }
}

/// Acquire the lock on the ledger.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_ledger(
    ledger: &SharedLedger,
) -> Result<MutexGuard<'_, Ledger<SQLiteStore>>, Error> {
    ledger.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
