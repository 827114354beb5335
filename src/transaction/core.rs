//! Defines the core data models and database queries for the ledger.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, TransactionId},
    date_format::day_month_year,
};

/// The category given to transactions created from recurring costs.
pub const RECURRING_CATEGORY: &str = "recurring";

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Money coming in, e.g. wages.
    Income,
    /// Money going out, e.g. rent.
    Expense,
}

impl TransactionType {
    /// The name used for this type in the database, JSON and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    #[serde(with = "day_month_year")]
    pub date: Date,
    /// A free text label, e.g. "Groceries".
    pub category: String,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability. The transaction
    /// is an uncategorised expense until told otherwise.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            description: description.to_owned(),
            amount,
            transaction_type: TransactionType::Expense,
            date,
            category: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The ID is assigned by the ledger when the transaction is stored.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A human-readable description of the transaction.
    pub description: String,

    /// The monetary amount of the transaction.
    ///
    /// Amounts are never negative: [TransactionType] says which way the money went.
    pub amount: f64,

    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,

    /// The date when the transaction occurred.
    pub date: Date,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: String,
}

impl TransactionBuilder {
    /// Set whether the transaction is income or an expense.
    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Set the category label for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }
}

/// Check that `amount` is a finite, non-negative number.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Append a new transaction to the ledger.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not a number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (id, description, amount, type, date, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount, type, date, category",
        )?
        .query_row(
            (
                DatabaseId::generate(),
                builder.description,
                builder.amount,
                builder.transaction_type,
                builder.date,
                builder.category,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: &TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, description, amount, type, date, category FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction in the ledger, in the order they were added.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, type, date, category FROM \"transaction\" ORDER BY seq",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace the transaction with `id` with the details in `builder`.
///
/// The transaction keeps its ID and its place in the ledger.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not a number,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: &TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    connection
        .prepare(
            "UPDATE \"transaction\"
             SET description = ?1, amount = ?2, type = ?3, date = ?4, category = ?5
             WHERE id = ?6
             RETURNING id, description, amount, type, date, category",
        )?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.transaction_type,
                builder.date,
                builder.category,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => error.into(),
        })
}

/// The number of rows changed by a delete.
pub type RowsAffected = usize;

/// Remove the transaction with `id` from the ledger.
///
/// Deleting a transaction that does not exist is not an error, zero rows are affected.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_transaction(
    id: &TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", id)],
        )
        .map_err(|err| err.into())
}

/// The distinct category labels used in the ledger, sorted alphabetically.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_categories(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT DISTINCT category FROM \"transaction\" ORDER BY category")?
        .query_map([], |row| row.get(0))?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// `seq` records insertion order, `id` is the opaque ID handed to clients.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                type TEXT NOT NULL CHECK (type IN ('Income', 'Expense')),
                date TEXT NOT NULL,
                category TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let transaction_type = row.get(3)?;
    let date = row.get(4)?;
    let category = row.get(5)?;

    Ok(Transaction {
        id,
        description,
        amount,
        transaction_type,
        date,
        category,
    })
}

// ============================================================================
// TESTS
// ============================================================================
