//! Pocket Ledger is a service for tracking personal income and expenses.
//!
//! The library keeps a ledger of transactions and a registry of recurring
//! costs in SQLite, rolls due recurring costs over into ledger entries,
//! aggregates the ledger for dashboards and exports it as a spreadsheet.
//! A JSON REST API exposes all of this to clients.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod dashboard;
mod database_id;
mod date_format;
mod db;
mod endpoints;
mod export;
mod logging;
mod recurring;
mod routing;
#[cfg(test)]
mod test_utils;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use dashboard::{
    CategoryTotal, DAYS_OF_WEEK, DashboardSummary, WeeklyTotals, balance, build_dashboard,
    sum_by_category, sum_by_day_of_week, sum_by_type,
};
pub use database_id::{DatabaseId, RecurringCostId, TransactionId};
pub use db::initialize as initialize_db;
pub use export::{
    EXPORT_FAILED_MESSAGE, save_transactions_xlsx, write_transactions_csv,
    write_transactions_xlsx,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use recurring::{
    FiredCost, Period, RecurringCost, RecurringCostBuilder, Rollover, RolloverFailure,
    RolloverReport, create_recurring_cost, evaluate_rollover, next_fire_date, run_rollover,
};
pub use routing::build_router;
pub use timezone::{get_local_offset, local_today};
pub use transaction::{
    RECURRING_CATEGORY, Transaction, TransactionBuilder, TransactionType, create_transaction,
    get_transactions,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to update a recurring cost that does not exist
    #[error("tried to update a recurring cost that is not in the database")]
    UpdateMissingRecurringCost,

    /// A recurring cost was given a period other than daily, monthly or yearly.
    ///
    /// There is no fallback period: a cost with an unknown period cannot be
    /// scheduled, so it is rejected instead of being silently frozen.
    #[error("\"{0}\" is not a supported recurring period, expected one of Daily, Monthly or Yearly")]
    UnsupportedPeriod(String),

    /// A request body was not valid JSON or did not match the expected fields.
    ///
    /// The string describes the problem, e.g. a date that is not `DD-MM-YYYY`.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A transaction type other than income or expense was given.
    #[error("\"{0}\" is not a valid transaction type, expected Income or Expense")]
    InvalidTransactionType(String),

    /// Amounts must be finite and not negative, the transaction type carries the sign.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    InvalidAmount(f64),

    /// A date calculation went past the range of representable dates.
    #[error("the calculated date is out of range")]
    DateOutOfRange,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Writing the transactions spreadsheet failed.
    ///
    /// The string holds the underlying encoder or I/O error and is only meant for the logs.
    #[error("could not export transactions: {0}")]
    ExportError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(value: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {value}");
        Error::InvalidRequestBody(value.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::UpdateMissingRecurringCost => (StatusCode::NOT_FOUND, self.to_string()),
            Error::UnsupportedPeriod(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidAmount(_)
            | Error::InvalidRequestBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::ExportError(error) => {
                tracing::error!("Export failed: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    EXPORT_FAILED_MESSAGE.to_owned(),
                )
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
