//! Defines the endpoint for adding a transaction to the ledger.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    date_format::day_month_year,
    endpoints::{self, format_endpoint},
    timezone::local_today,
    transaction::core::{Transaction, TransactionBuilder, TransactionType, create_transaction},
};

/// The state needed to create or edit a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for creating or replacing a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction in dollars, zero or more.
    pub amount: f64,
    /// "Income" or "Expense".
    ///
    /// Kept as text so that an unknown type is reported as such rather
    /// than as a generic body parsing failure.
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The date when the transaction ocurred.
    #[serde(default, with = "day_month_year::option")]
    pub date: Option<Date>,
    /// A free text category label.
    #[serde(default)]
    pub category: String,
}

impl TransactionForm {
    /// Convert the form into a builder, using `default_date` if no date was given.
    ///
    /// # Errors
    /// Returns [Error::InvalidTransactionType] if the type is not "Income" or "Expense".
    pub(crate) fn into_builder(self, default_date: Date) -> Result<TransactionBuilder, Error> {
        let transaction_type: TransactionType = self.transaction_type.parse()?;

        Ok(Transaction::build(
            self.amount,
            self.date.unwrap_or(default_date),
            &self.description,
        )
        .transaction_type(transaction_type)
        .category(&self.category))
    }
}

/// A route handler for adding a new transaction, responds with the stored transaction.
///
/// The transaction is dated today in the local timezone if the form has no date.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = form?;
    let today = local_today(&state.local_timezone)?;
    let builder = form.into_builder(today)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(builder, &connection)?;
    tracing::info!(
        "Added {} transaction {} for {}",
        transaction.transaction_type,
        transaction.id,
        transaction.amount
    );

    let location = format_endpoint(endpoints::TRANSACTION, transaction.id.as_str());

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode, http::header::LOCATION};
    use time::macros::date;

    use crate::{
        Error,
        endpoints::{self, format_endpoint},
        test_utils::{TEST_TIMEZONE, assert_status, get_shared_test_connection, response_json},
        timezone::local_today,
        transaction::{
            Transaction, TransactionType,
            core::get_transactions,
            create_endpoint::{CreateTransactionState, TransactionForm, create_transaction_endpoint},
        },
    };

    fn get_test_state() -> CreateTransactionState {
        CreateTransactionState {
            db_connection: get_shared_test_connection(),
            local_timezone: TEST_TIMEZONE.to_owned(),
        }
    }

    fn expense_form(amount: f64) -> TransactionForm {
        TransactionForm {
            description: "Coffee".to_owned(),
            amount,
            transaction_type: "Expense".to_owned(),
            date: None,
            category: "Food".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();
        let form = TransactionForm {
            description: "Salary".to_owned(),
            amount: 1500.0,
            transaction_type: "Income".to_owned(),
            date: Some(date!(2025 - 10 - 05)),
            category: "Work".to_owned(),
        };

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(form)))
            .await
            .expect("could not create transaction");

        assert_status(&response, StatusCode::CREATED);
        let location = response
            .headers()
            .get(LOCATION)
            .expect("missing location header")
            .to_str()
            .unwrap()
            .to_owned();
        let transaction: Transaction = response_json(response).await;
        assert_eq!(
            location,
            format_endpoint(endpoints::TRANSACTION, transaction.id.as_str())
        );
        assert_eq!(transaction.description, "Salary");
        assert_eq!(transaction.amount, 1500.0);
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.date, date!(2025 - 10 - 05));
        assert_eq!(transaction.category, "Work");
        let stored = get_transactions(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored, vec![transaction]);
    }

    #[tokio::test]
    async fn date_defaults_to_today() {
        let state = get_test_state();

        let response = create_transaction_endpoint(State(state), Ok(Json(expense_form(4.5))))
            .await
            .unwrap();

        let transaction: Transaction = response_json(response).await;
        assert_eq!(transaction.date, local_today(TEST_TIMEZONE).unwrap());
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        let state = get_test_state();

        let result =
            create_transaction_endpoint(State(state.clone()), Ok(Json(expense_form(-4.5)))).await;

        assert_eq!(result.err(), Some(Error::InvalidAmount(-4.5)));
        assert!(
            get_transactions(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn rejects_unknown_transaction_type() {
        let state = get_test_state();
        let mut form = expense_form(4.5);
        form.transaction_type = "Transfer".to_owned();

        let result = create_transaction_endpoint(State(state.clone()), Ok(Json(form))).await;

        assert_eq!(
            result.err(),
            Some(Error::InvalidTransactionType("Transfer".to_owned()))
        );
        assert!(
            get_transactions(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn form_parses_day_first_date_and_type() {
        let form: TransactionForm = serde_json::from_str(
            r#"{"description": "Bus", "amount": 2.5, "type": "Expense", "date": "31-01-2024"}"#,
        )
        .unwrap();

        assert_eq!(form.date, Some(date!(2024 - 01 - 31)));
        assert_eq!(form.category, "");
        assert_eq!(
            form.into_builder(date!(2024 - 02 - 01))
                .unwrap()
                .transaction_type,
            TransactionType::Expense
        );
    }
}
