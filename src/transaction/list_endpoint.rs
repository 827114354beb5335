//! Read-only endpoints for the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::core::{Transaction, get_categories, get_transaction, get_transactions},
};

/// The state needed to read or delete transactions.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists the ledger in the order transactions were added.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionsState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(&connection).map(Json)
}

/// A route handler for getting a single transaction, responds with 404 if it does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionsState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction(&transaction_id, &connection).map(Json)
}

/// A route handler that lists the category labels in use.
pub async fn get_categories_endpoint(
    State(state): State<TransactionsState>,
) -> Result<Json<Vec<String>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_categories(&connection).map(Json)
}
