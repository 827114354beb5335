//! Defines the recurring cost model and the registry's database queries.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{DatabaseId, RecurringCostId},
    date_format::day_month_year,
    transaction::{RowsAffected, validate_amount},
};

// ============================================================================
// MODELS
// ============================================================================

/// How often a recurring cost falls due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    /// Every day.
    Daily,
    /// On the last day of every calendar month.
    Monthly,
    /// On the last day of every year.
    Yearly,
}

impl Period {
    /// The name used for this period in the database and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Monthly => "Monthly",
            Period::Yearly => "Yearly",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse a period name.
    ///
    /// # Errors
    /// Returns [Error::UnsupportedPeriod] for anything other than "Daily", "Monthly" or "Yearly".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Daily" => Ok(Period::Daily),
            "Monthly" => Ok(Period::Monthly),
            "Yearly" => Ok(Period::Yearly),
            other => Err(Error::UnsupportedPeriod(other.to_owned())),
        }
    }
}

impl TryFrom<String> for Period {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.as_str().to_owned()
    }
}

impl ToSql for Period {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Period {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A cost that turns into an expense in the ledger on a regular schedule, e.g. rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringCost {
    /// The ID of the recurring cost.
    pub id: RecurringCostId,
    /// The name of the cost, used as the description of the expenses it creates.
    pub name: String,
    /// The amount charged each time the cost falls due.
    pub amount: f64,
    /// How often the cost falls due.
    pub period: Period,
    /// The next date the cost will be added to the ledger.
    #[serde(with = "day_month_year")]
    pub next_fire_date: Date,
}

impl RecurringCost {
    /// Create a new recurring cost.
    ///
    /// Shortcut for [RecurringCostBuilder] for discoverability.
    pub fn build(name: &str, amount: f64, period: Period, next_fire_date: Date) -> RecurringCostBuilder {
        RecurringCostBuilder {
            name: name.to_owned(),
            amount,
            period,
            next_fire_date,
        }
    }
}

/// The details of a recurring cost that has not been given an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringCostBuilder {
    /// The name of the cost.
    pub name: String,
    /// The amount charged each time, zero or more.
    pub amount: f64,
    /// How often the cost falls due.
    pub period: Period,
    /// The first date the cost falls due.
    pub next_fire_date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Add a recurring cost to the registry.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not a number,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_recurring_cost(
    builder: RecurringCostBuilder,
    connection: &Connection,
) -> Result<RecurringCost, Error> {
    validate_amount(builder.amount)?;

    let cost = connection
        .prepare(
            "INSERT INTO recurring_cost (id, name, amount, period, next_fire_date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, name, amount, period, next_fire_date",
        )?
        .query_row(
            (
                DatabaseId::generate(),
                builder.name,
                builder.amount,
                builder.period,
                builder.next_fire_date,
            ),
            map_recurring_cost_row,
        )?;

    Ok(cost)
}

/// Retrieve a recurring cost by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a recurring cost,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_recurring_cost(
    id: &RecurringCostId,
    connection: &Connection,
) -> Result<RecurringCost, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, period, next_fire_date FROM recurring_cost WHERE id = :id",
        )?
        .query_row(&[(":id", id)], map_recurring_cost_row)
        .map_err(Error::from)
}

/// Retrieve the whole registry, in the order the costs were added.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_recurring_costs(connection: &Connection) -> Result<Vec<RecurringCost>, Error> {
    connection
        .prepare("SELECT id, name, amount, period, next_fire_date FROM recurring_cost ORDER BY seq")?
        .query_map([], map_recurring_cost_row)?
        .map(|maybe_cost| maybe_cost.map_err(Error::from))
        .collect()
}

/// Overwrite the stored recurring cost that has the same ID as `cost`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is negative or not a number,
/// - [Error::UpdateMissingRecurringCost] if no recurring cost has the ID,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_recurring_cost(cost: &RecurringCost, connection: &Connection) -> Result<(), Error> {
    validate_amount(cost.amount)?;

    let rows_affected = connection.execute(
        "UPDATE recurring_cost
         SET name = ?1, amount = ?2, period = ?3, next_fire_date = ?4
         WHERE id = ?5",
        (
            &cost.name,
            cost.amount,
            cost.period,
            cost.next_fire_date,
            &cost.id,
        ),
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingRecurringCost),
        _ => Ok(()),
    }
}

/// Move the schedule of the recurring cost `id` to `next_fire_date`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRecurringCost] if no recurring cost has the ID,
/// - or [Error::SqlError] there is some other SQL error.
pub fn set_next_fire_date(
    id: &RecurringCostId,
    next_fire_date: Date,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE recurring_cost SET next_fire_date = ?1 WHERE id = ?2",
        (next_fire_date, id),
    )?;

    match rows_affected {
        0 => Err(Error::UpdateMissingRecurringCost),
        _ => Ok(()),
    }
}

/// Remove the recurring cost `id` from the registry.
///
/// Ledger entries it already created are kept. Deleting a cost that does
/// not exist affects zero rows.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_recurring_cost(
    id: &RecurringCostId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM recurring_cost WHERE id = :id", &[(":id", id)])
        .map_err(|err| err.into())
}

/// Create the recurring cost table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_recurring_cost_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring_cost (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                period TEXT NOT NULL CHECK (period IN ('Daily', 'Monthly', 'Yearly')),
                next_fire_date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a RecurringCost.
pub fn map_recurring_cost_row(row: &Row) -> Result<RecurringCost, rusqlite::Error> {
    Ok(RecurringCost {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        period: row.get(3)?,
        next_fire_date: row.get(4)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
