//! Defines the trait for persisting a [crate::Ledger] and its implementations.

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SQLiteStore;

use crate::{Error, database_id::TransactionId, transaction::Transaction};

/// Loads and saves the state of a [crate::Ledger] verbatim.
///
/// Transactions are always saved as a whole collection and the target as a
/// single value, there is no incremental persistence.
pub trait LedgerStore {
    /// Load every transaction in the store, in no particular order.
    fn load_transactions(&self) -> Result<Vec<Transaction>, Error>;

    /// Load the ID for the next new transaction, `None` if it has never been
    /// saved.
    fn load_next_id(&self) -> Result<Option<TransactionId>, Error>;

    /// Replace the transactions in the store with `transactions` and record
    /// `next_id` as the ID for the next new transaction.
    ///
    /// Implementers must either save all of `transactions` or leave them
    /// unchanged. The stored next ID must never end up lower than one past the
    /// largest stored transaction ID.
    fn save_transactions(
        &mut self,
        transactions: &[Transaction],
        next_id: TransactionId,
    ) -> Result<(), Error>;

    /// Load the savings target, `None` if it has never been saved.
    fn load_target(&self) -> Result<Option<f64>, Error>;

    /// Save the savings target.
    fn save_target(&mut self, target: f64) -> Result<(), Error>;
}
