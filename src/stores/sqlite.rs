//! Implements a SQLite backed ledger store.

use rusqlite::Connection;

use crate::{
    Error,
    database_id::TransactionId,
    db::initialize,
    settings::{get_next_id, get_target, save_next_id, save_target},
    stores::LedgerStore,
    transaction::{Transaction, get_all_transactions, overwrite_transactions},
};

/// Stores the ledger in the `transaction` and `settings` tables of a SQLite
/// database.
#[derive(Debug)]
pub struct SQLiteStore {
    connection: Connection,
}

impl SQLiteStore {
    /// Create a new store, adding the ledger tables to the database if they
    /// do not exist yet.
    ///
    /// # Errors
    /// Returns an error if the tables cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }
}

impl LedgerStore for SQLiteStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>, Error> {
        get_all_transactions(&self.connection)
    }

    fn load_next_id(&self) -> Result<Option<TransactionId>, Error> {
        get_next_id(&self.connection)
    }

    /// Saves the transactions and the next ID in a single SQL transaction.
    fn save_transactions(
        &mut self,
        transactions: &[Transaction],
        next_id: TransactionId,
    ) -> Result<(), Error> {
        let sql_transaction = self.connection.unchecked_transaction()?;

        overwrite_transactions(transactions, &sql_transaction)?;
        save_next_id(next_id, &sql_transaction)?;

        sql_transaction.commit()?;

        Ok(())
    }

    fn load_target(&self) -> Result<Option<f64>, Error> {
        get_target(&self.connection)
    }

    fn save_target(&mut self, target: f64) -> Result<(), Error> {
        save_target(target, &self.connection)
    }
}
