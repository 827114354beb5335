use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        core::{Transaction, get_transaction, update_transaction},
        create_endpoint::{CreateTransactionState, TransactionForm},
    },
};

/// A route handler for replacing a transaction, responds with the updated transaction.
///
/// If the form has no date the transaction keeps its stored date.
/// Responds with 404 if the transaction does not exist.
pub async fn edit_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Json(form) = form?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let stored_date = match get_transaction(&transaction_id, &connection) {
        Ok(transaction) => transaction.date,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let builder = form.into_builder(stored_date)?;
    let transaction = update_transaction(&transaction_id, builder, &connection)
        .inspect_err(|error| {
            tracing::error!("Could not update transaction {transaction_id}: {error}")
        })?;

    Ok(Json(transaction))
}
