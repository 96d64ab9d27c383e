//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{Error, settings::create_settings_table, transaction::create_transaction_table};

/// Create the tables for the ledger if they do not exist yet.
///
/// The tables are created in a single SQL transaction.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;
    create_settings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
