//! Endpoints that download the ledger as a file.

use axum::{
    extract::State,
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    export::{CSV_FILE_NAME, XLSX_FILE_NAME, write_transactions_csv, write_transactions_xlsx},
    transaction::{core::get_transactions, list_endpoint::TransactionsState},
};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// A route handler that sends the ledger as an Excel workbook download.
pub async fn export_xlsx_endpoint(State(state): State<TransactionsState>) -> Response {
    export(state, XLSX_FILE_NAME, XLSX_CONTENT_TYPE, write_transactions_xlsx)
}

/// A route handler that sends the ledger as a CSV download.
pub async fn export_csv_endpoint(State(state): State<TransactionsState>) -> Response {
    export(state, CSV_FILE_NAME, CSV_CONTENT_TYPE, write_transactions_csv)
}

fn export(
    state: TransactionsState,
    file_name: &str,
    content_type: &'static str,
    encode: fn(&[crate::transaction::Transaction]) -> Result<Vec<u8>, Error>,
) -> Response {
    let transactions = match state.db_connection.lock() {
        Ok(connection) => get_transactions(&connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    // Every failure reaches the client as the same export error.
    let bytes = match transactions.and_then(|transactions| encode(&transactions)) {
        Ok(bytes) => bytes,
        Err(Error::ExportError(error)) => return Error::ExportError(error).into_response(),
        Err(error) => return Error::ExportError(error.to_string()).into_response(),
    };

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
