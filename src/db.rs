//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, recurring::create_recurring_cost_table, transaction::create_transaction_table};

/// Create the tables for the ledger and the recurring cost registry.
///
/// Existing tables are left untouched, so this is safe to call on every start up.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;
    create_recurring_cost_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
