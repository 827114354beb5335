use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{core::delete_transaction, list_endpoint::TransactionsState},
};

/// A route handler for deleting a transaction, responds with 204 No Content.
///
/// Deleting a transaction that does not exist is not an error.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionsState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_transaction(&transaction_id, &connection) {
        Ok(0) => {
            tracing::debug!("Transaction {transaction_id} was already gone, nothing to delete");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(_) => {
            tracing::info!("Deleted transaction {transaction_id}");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error,
        database_id::TransactionId,
        test_utils::get_shared_test_connection,
        transaction::{
            Transaction,
            core::{create_transaction, get_transaction},
            delete_endpoint::delete_transaction_endpoint,
            list_endpoint::TransactionsState,
        },
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let state = TransactionsState {
            db_connection: get_shared_test_connection(),
        };
        let transaction = create_transaction(
            Transaction::build(1.23, date!(2025 - 10 - 26), "Test"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let status = delete_transaction_endpoint(State(state.clone()), Path(transaction.id.clone()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(
            get_transaction(&transaction.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        )
    }

    #[tokio::test]
    async fn deleting_missing_transaction_succeeds() {
        let state = TransactionsState {
            db_connection: get_shared_test_connection(),
        };

        let status = delete_transaction_endpoint(State(state), Path(TransactionId::from("gone")))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
